//! Entry point for the stacktop dashboard. Parses args, loads config and runs the App.

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use stacktop::app::{block_on_detached, check_terminal, shutdown_signal, App};
use stacktop::config::{self, to_pretty_json};
use stacktop::host::HostSampler;
use stacktop::providers;
use stacktop::ui::frame::WriteOptions;
use stacktop::ui::render::Renderer;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "[--config PATH|-c PATH] [--interval MS|-i MS] [--once] [--no-gpu] [--no-color] [--print-config]";

#[derive(Debug, Default)]
struct ParsedArgs {
    config: Option<PathBuf>,
    interval_ms: Option<u64>,
    once: bool,
    no_gpu: bool,
    no_color: bool,
    print_config: bool,
}

enum ArgError {
    Help(String),
    Invalid(String),
}

fn parse_interval(v: Option<String>, prog: &str) -> Result<u64, ArgError> {
    v.as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ArgError::Invalid(format!("--interval expects milliseconds. Usage: {prog} {USAGE}")))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "stacktop".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(ArgError::Help(format!("Usage: {prog} {USAGE}")));
            }
            "--config" | "-c" => {
                parsed.config = it.next().map(PathBuf::from);
            }
            "--interval" | "-i" => {
                parsed.interval_ms = Some(parse_interval(it.next(), &prog)?);
            }
            "--once" => parsed.once = true,
            "--no-gpu" => parsed.no_gpu = true,
            "--no-color" => parsed.no_color = true,
            "--print-config" => parsed.print_config = true,
            _ if arg.starts_with("--config=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.config = Some(PathBuf::from(v));
                    }
                }
            }
            _ if arg.starts_with("--interval=") => {
                let v = arg.split_once('=').map(|(_, v)| v.to_string());
                parsed.interval_ms = Some(parse_interval(v, &prog)?);
            }
            _ => {
                return Err(ArgError::Invalid(format!(
                    "Unexpected argument '{arg}'. Usage: {prog} {USAGE}"
                )));
            }
        }
    }
    Ok(parsed)
}

fn init_tracing() {
    // stderr shares the screen with the dashboard, so logging is opt-in
    let filter = EnvFilter::try_from_env("STACKTOP_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgError::Help(msg)) => {
            eprintln!("{msg}");
            return Ok(());
        }
        Err(ArgError::Invalid(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    init_tracing();
    block_on_detached(run(parsed))?
}

async fn run(parsed: ParsedArgs) -> anyhow::Result<()> {
    let mut cfg = config::load(parsed.config.as_deref())?;
    cfg.apply_env();
    if let Some(ms) = parsed.interval_ms {
        cfg.interval_ms = ms;
    }
    if parsed.no_gpu {
        cfg.gpu = false;
    }
    cfg.validate()?;

    if parsed.print_config {
        println!("{}", to_pretty_json(&cfg));
        return Ok(());
    }

    let host = HostSampler::shared();
    let hostname = sysinfo::System::host_name().unwrap_or_else(|| "unknown".into());
    let opts = WriteOptions {
        color: !parsed.no_color && env::var_os("NO_COLOR").is_none(),
        cursor_control: true,
    };
    let app = App::new(
        providers::from_config(&cfg, &host),
        Renderer::new(&cfg, hostname),
        Duration::from_millis(cfg.interval_ms),
    )
    .with_write_options(opts);

    if parsed.once {
        let mut out = io::stdout();
        app.once(&mut out, Duration::from_secs(1)).await?;
        return Ok(());
    }

    check_terminal()?;
    let shutdown = shutdown_signal()?;
    app.run(io::stdout(), shutdown).await?;
    Ok(())
}
