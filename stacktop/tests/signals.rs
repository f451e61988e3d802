//! Real SIGINT delivered while a provider is stuck. Kept in its own test binary
//! because the handler stays installed for the life of the process.
#![cfg(unix)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{SharedBuf, Stalling, HIDE_CURSOR, SHOW_CURSOR};
use stacktop::app::{shutdown_signal, App};
use stacktop::config::Config;
use stacktop::ui::render::Renderer;
use tokio::process::Command;
use tokio::sync::Notify;

#[tokio::test]
async fn sigint_mid_poll_restores_cursor_once_and_stops() {
    let stuck = Arc::new(Notify::new());
    let app = App::new(
        vec![Box::new(Stalling::new(1, stuck.clone()))],
        Renderer::new(&Config::default(), "test-host"),
        Duration::from_millis(10),
    );
    let out = SharedBuf::default();
    let shutdown = shutdown_signal().expect("install handlers");
    let pid = std::process::id().to_string();

    let send_interrupt = async {
        stuck.notified().await;
        Command::new("kill")
            .args(["-INT", &pid])
            .status()
            .await
            .expect("run kill")
    };

    let (res, kill_status) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(app.run(out.clone(), shutdown), send_interrupt)
    })
    .await
    .expect("dashboard stopped on SIGINT");

    assert!(kill_status.success());
    res.expect("clean shutdown");
    let text = out.contents();
    assert!(text.starts_with(HIDE_CURSOR));
    assert_eq!(text.matches(SHOW_CURSOR).count(), 1);
    assert!(text.ends_with(SHOW_CURSOR));
    // One frame from the first poll, nothing from the interrupted one
    assert_eq!(text.matches(" stacktop").count(), 1);
}
