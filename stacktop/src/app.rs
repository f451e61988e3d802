//! Dashboard loop: poll providers, render, overwrite the previous frame in place.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{cursor, execute};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::providers::{poll_all, MetricProvider};
use crate::ui::frame::{write_frame, Frame, WriteOptions};
use crate::ui::render::Renderer;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("terminal not supported: {0}")]
    UnsupportedTerminal(String),
    #[error("writing to terminal: {0}")]
    Io(#[from] io::Error),
}

/// Refuse to start when stdout cannot take cursor control sequences.
pub fn check_terminal() -> Result<(), DashboardError> {
    if !io::stdout().is_terminal() {
        return Err(DashboardError::UnsupportedTerminal(
            "stdout is not a terminal (use --once for plain output)".into(),
        ));
    }
    if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        return Err(DashboardError::UnsupportedTerminal(
            "TERM=dumb has no cursor movement".into(),
        ));
    }
    Ok(())
}

/// Hides the cursor on entry and shows it again exactly once, on `restore` or drop.
pub struct TerminalGuard<W: Write> {
    out: W,
    cursor_hidden: bool,
}

impl<W: Write> TerminalGuard<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        execute!(out, cursor::Hide)?;
        Ok(Self {
            out,
            cursor_hidden: true,
        })
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.cursor_hidden {
            return Ok(());
        }
        self.cursor_hidden = false;
        execute!(self.out, cursor::Show)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Resolves on SIGINT or SIGTERM. Handlers are installed before this returns,
/// so the default disposition never kills the process with the cursor hidden.
#[cfg(unix)]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("interrupt received"),
            _ = terminate.recv() => info!("terminate received"),
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("interrupt received");
    })
}

/// Drive `fut` to completion on a current-thread runtime, then shut the runtime
/// down without waiting on blocking-pool threads. A host query stuck in the
/// kernel must not keep the process alive after the dashboard has stopped.
pub fn block_on_detached<F: Future>(fut: F) -> io::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let out = rt.block_on(fut);
    rt.shutdown_background();
    Ok(out)
}

pub struct App {
    providers: Vec<Box<dyn MetricProvider>>,
    renderer: Renderer,
    interval: Duration,
    opts: WriteOptions,
}

impl App {
    pub fn new(providers: Vec<Box<dyn MetricProvider>>, renderer: Renderer, interval: Duration) -> Self {
        Self {
            providers,
            renderer,
            interval,
            opts: WriteOptions::default(),
        }
    }

    pub fn with_write_options(mut self, opts: WriteOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Poll every provider once and render the result.
    pub async fn cycle(&self, previous_line_count: usize) -> Frame {
        let snap = poll_all(&self.providers).await;
        self.renderer
            .render(&snap, previous_line_count, Local::now())
    }

    /// Run until `shutdown` resolves or the terminal stops accepting writes.
    /// A cycle in flight when `shutdown` fires is dropped without writing.
    pub async fn run<W, S>(&self, out: W, shutdown: S) -> Result<(), DashboardError>
    where
        W: Write,
        S: Future<Output = ()>,
    {
        let mut term = TerminalGuard::enter(out)?;
        info!(
            providers = self.providers.len(),
            interval_ms = self.interval.as_millis() as u64,
            "dashboard started"
        );

        let res = tokio::select! {
            res = self.event_loop(&mut term) => res,
            _ = shutdown => Ok(()),
        };

        let restored = term.restore();
        info!("dashboard stopped");
        res?;
        restored?;
        Ok(())
    }

    async fn event_loop<W: Write>(&self, term: &mut TerminalGuard<W>) -> Result<(), DashboardError> {
        let mut previous_line_count = 0usize;
        // CPU counters need a minimum gap after the sampler's baseline
        let first = tokio::time::Instant::now() + sysinfo::MINIMUM_CPU_UPDATE_INTERVAL;
        let mut ticker = tokio::time::interval_at(first, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let started = Instant::now();

            let frame = self.cycle(previous_line_count).await;
            write_frame(term.writer(), &frame, previous_line_count, self.opts)?;
            previous_line_count = frame.len();

            let took = started.elapsed();
            if took > self.interval {
                warn!(took_ms = took.as_millis() as u64, "cycle overran the refresh interval");
            }
        }
    }

    /// Single frame with no cursor movement, for pipes and scripts. A priming poll
    /// `warmup` earlier gives CPU counters a delta to measure.
    pub async fn once<W: Write>(&self, out: &mut W, warmup: Duration) -> Result<(), DashboardError> {
        if !warmup.is_zero() {
            let _ = poll_all(&self.providers).await;
            tokio::time::sleep(warmup).await;
        }
        let frame = self.cycle(0).await;
        let opts = WriteOptions {
            cursor_control: false,
            ..self.opts
        };
        write_frame(out, &frame, 0, opts)?;
        Ok(())
    }
}
