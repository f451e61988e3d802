//! Event loop behavior against an in-memory terminal.

mod common;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use common::{cpu_reading, SharedBuf, Stalling, HIDE_CURSOR, SHOW_CURSOR};
use stacktop::app::{block_on_detached, App, TerminalGuard};
use stacktop::config::Config;
use stacktop::query::{bounded, QueryError};
use stacktop::types::{ProviderId, ProviderKind, Snapshot};
use stacktop::ui::frame::WriteOptions;
use stacktop::ui::render::Renderer;
use tokio::sync::Notify;

fn renderer() -> Renderer {
    Renderer::new(&Config::default(), "test-host")
}

fn app(ready_polls: usize, stuck: Arc<Notify>) -> App {
    App::new(
        vec![Box::new(Stalling::new(ready_polls, stuck))],
        renderer(),
        Duration::from_millis(10),
    )
}

#[tokio::test]
async fn interrupt_during_first_poll_writes_no_frame() {
    let stuck = Arc::new(Notify::new());
    let out = SharedBuf::default();
    let waiter = stuck.clone();

    app(0, stuck)
        .run(out.clone(), async move { waiter.notified().await })
        .await
        .expect("clean shutdown");

    let text = out.contents();
    assert!(text.starts_with(HIDE_CURSOR));
    assert_eq!(text.matches(SHOW_CURSOR).count(), 1);
    assert!(!text.contains("stacktop"), "partial frame written: {text:?}");
}

#[tokio::test]
async fn first_cycle_waits_for_a_usable_cpu_delta() {
    let stuck = Arc::new(Notify::new());
    let waiter = stuck.clone();
    let started = Instant::now();
    let mut polled_after = Duration::ZERO;

    app(0, stuck)
        .run(SharedBuf::default(), async {
            waiter.notified().await;
            polled_after = started.elapsed();
        })
        .await
        .expect("clean shutdown");

    assert!(
        polled_after >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL,
        "first poll after {polled_after:?}"
    );
}

#[tokio::test]
async fn second_frame_overwrites_the_first_in_place() {
    let stuck = Arc::new(Notify::new());
    let out = SharedBuf::default();
    let waiter = stuck.clone();

    app(2, stuck)
        .run(out.clone(), async move { waiter.notified().await })
        .await
        .expect("clean shutdown");

    let mut snap = Snapshot::new();
    snap.push(ProviderId::new("CPU"), ProviderKind::Cpu, cpu_reading());
    let n = renderer().render(&snap, 0, Local::now()).len();

    let text = out.contents();
    assert_eq!(text.matches(" stacktop").count(), 2);
    assert_eq!(text.matches(&format!("\x1b[{n}A")).count(), 1);
    assert_eq!(text.matches(SHOW_CURSOR).count(), 1);
    assert!(text.ends_with(SHOW_CURSOR));
}

#[tokio::test]
async fn once_writes_a_plain_frame_without_cursor_control() {
    let stuck = Arc::new(Notify::new());
    let mut out = Vec::new();
    app(1, stuck)
        .with_write_options(WriteOptions {
            color: false,
            cursor_control: true,
        })
        .once(&mut out, Duration::ZERO)
        .await
        .expect("once");

    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains('\x1b'), "{text:?}");
    assert!(text.contains("test cpu"));
    assert!(text.contains("Status"));
}

#[test]
fn guard_shows_the_cursor_exactly_once() {
    let out = SharedBuf::default();
    {
        let mut guard = TerminalGuard::enter(out.clone()).unwrap();
        guard.restore().unwrap();
        guard.restore().unwrap();
    }
    let text = out.contents();
    assert_eq!(text.matches(HIDE_CURSOR).count(), 1);
    assert_eq!(text.matches(SHOW_CURSOR).count(), 1);

    let dropped = SharedBuf::default();
    drop(TerminalGuard::enter(dropped.clone()).unwrap());
    assert_eq!(dropped.contents().matches(SHOW_CURSOR).count(), 1);
}

#[test]
fn stuck_blocking_query_does_not_delay_exit() {
    let started = Instant::now();
    let outcome = block_on_detached(async {
        let host_call = bounded(Duration::from_secs(10), async {
            tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(3)))
                .await
                .map_err(|e| QueryError::Io(io::Error::other(e)))
        });
        tokio::select! {
            _ = host_call => "finished",
            _ = tokio::time::sleep(Duration::from_millis(50)) => "interrupted",
        }
    })
    .expect("runtime");

    assert_eq!(outcome, "interrupted");
    // Runtime teardown returned without joining the sleeping thread
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
}
