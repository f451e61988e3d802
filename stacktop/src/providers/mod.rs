//! Metric providers: one metric group each, polled once per cycle.

pub mod container;
pub mod cpu;
pub mod gpu;
pub mod mem;
pub mod process;

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::host::SharedHost;
use crate::query::QueryError;
use crate::types::{MetricReading, ProviderId, ProviderKind, Snapshot};

pub use container::ContainerWatcher;
pub use cpu::CpuProvider;
pub use gpu::GpuProvider;
pub use mem::MemoryProvider;
pub use process::ProcessWatcher;

/// A source of one metric group. `poll` never fails: an absent or misbehaving
/// source comes back as [`MetricReading::Unavailable`].
#[async_trait]
pub trait MetricProvider: Send + Sync {
    fn id(&self) -> &ProviderId;

    fn kind(&self) -> ProviderKind;

    async fn poll(&self) -> MetricReading;
}

pub(crate) fn degrade(id: &ProviderId, err: QueryError) -> MetricReading {
    debug!(provider = %id, reason = %err, "reading unavailable");
    MetricReading::unavailable(err.to_string())
}

/// Poll each provider once, in order.
pub async fn poll_all(providers: &[Box<dyn MetricProvider>]) -> Snapshot {
    let mut snap = Snapshot::new();
    for p in providers {
        let reading = p.poll().await;
        snap.push(p.id().clone(), p.kind(), reading);
    }
    snap
}

/// Build the provider set described by `cfg`, in display order.
pub fn from_config(cfg: &Config, host: &SharedHost) -> Vec<Box<dyn MetricProvider>> {
    let timeout = Duration::from_millis(cfg.query_timeout_ms);
    let mut out: Vec<Box<dyn MetricProvider>> = Vec::new();
    if cfg.gpu {
        out.push(Box::new(GpuProvider::nvidia_smi(timeout)));
    }
    out.push(Box::new(CpuProvider::host(host.clone(), timeout)));
    out.push(Box::new(MemoryProvider::host(host.clone(), timeout)));
    for rule in &cfg.processes {
        out.push(Box::new(ProcessWatcher::host(
            rule.clone(),
            host.clone(),
            timeout,
        )));
    }
    for rule in &cfg.containers {
        out.push(Box::new(ContainerWatcher::cli(rule.clone(), timeout)));
    }
    out
}
