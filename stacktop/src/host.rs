//! Host sampling via sysinfo: CPU, memory and the process table.
//!
//! One `System` handle is shared by every host-backed provider. The process table is
//! refreshed at most once per [`PROC_TTL`] so that all watchers in a cycle see the
//! same scan and per-process CPU deltas span a whole interval.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind,
    System, UpdateKind,
};
use tracing::debug;

use crate::query::{bounded, ExternalQuery, QueryError};

const PROC_TTL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct CpuSample {
    pub usage_pct: f32,
    pub load: [f64; 3],
    pub cores: usize,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemSample {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    /// Per-core scale, so a process saturating several cores reports over 100.
    pub cpu_pct: f32,
    pub rss_bytes: u64,
}

pub type SharedHost = Arc<HostSampler>;

pub struct HostSampler {
    sys: Mutex<System>,
    procs_at: Mutex<Option<Instant>>,
    self_pid: Option<u32>,
}

impl HostSampler {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());
        let mut sys = System::new_with_specifics(refresh_kind);
        // Baseline so the first usage reading has a delta to work from
        sys.refresh_cpu_usage();
        Self {
            sys: Mutex::new(sys),
            procs_at: Mutex::new(None),
            self_pid: sysinfo::get_current_pid().ok().map(|p| p.as_u32()),
        }
    }

    pub fn shared() -> SharedHost {
        Arc::new(Self::new())
    }

    fn lock_sys(&self) -> Result<std::sync::MutexGuard<'_, System>, QueryError> {
        self.sys
            .lock()
            .map_err(|_| QueryError::Io(io::Error::other("host sampler lock poisoned")))
    }

    pub fn sample_cpu(&self) -> Result<CpuSample, QueryError> {
        let mut sys = self.lock_sys()?;
        sys.refresh_cpu_usage();
        let cores = sys.cpus().len();
        if cores == 0 {
            return Err(QueryError::parse("no cpus reported"));
        }
        let model = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "unknown cpu".into());
        let load = System::load_average();
        Ok(CpuSample {
            usage_pct: sys.global_cpu_usage(),
            load: [load.one, load.five, load.fifteen],
            cores,
            model,
        })
    }

    pub fn sample_memory(&self) -> Result<MemSample, QueryError> {
        let mut sys = self.lock_sys()?;
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(QueryError::parse("total memory reported as zero"));
        }
        Ok(MemSample {
            total,
            used: sys.used_memory(),
            free: sys.free_memory(),
            available: sys.available_memory(),
        })
    }

    pub fn find_process(&self, pattern: &str) -> Result<ProcessSample, QueryError> {
        let mut sys = self.lock_sys()?;
        self.refresh_processes_if_stale(&mut sys)?;

        let candidates = sys.processes().values().map(|p| {
            let cmd = p
                .cmd()
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");
            let cmd = if cmd.is_empty() {
                p.name().to_string_lossy().into_owned()
            } else {
                cmd
            };
            (p.pid().as_u32(), cmd)
        });
        let pid = first_match(candidates, pattern, self.self_pid).ok_or(QueryError::NotRunning)?;
        let p = sys
            .process(Pid::from_u32(pid))
            .ok_or(QueryError::NotRunning)?;
        Ok(ProcessSample {
            pid,
            cpu_pct: p.cpu_usage(),
            rss_bytes: p.memory(),
        })
    }

    fn refresh_processes_if_stale(&self, sys: &mut System) -> Result<(), QueryError> {
        let mut at = self
            .procs_at
            .lock()
            .map_err(|_| QueryError::Io(io::Error::other("host sampler lock poisoned")))?;
        let now = Instant::now();
        if at.is_none_or(|t| now.duration_since(t) >= PROC_TTL) {
            let kind = ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_cmd(UpdateKind::OnlyIfNotSet)
                .without_tasks();
            let n = sys.refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
            debug!(updated = n, "process table refreshed");
            *at = Some(now);
        }
        Ok(())
    }
}

impl Default for HostSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowest PID whose command line contains `pattern`, skipping `exclude`.
pub fn first_match<I>(candidates: I, pattern: &str, exclude: Option<u32>) -> Option<u32>
where
    I: IntoIterator<Item = (u32, String)>,
{
    candidates
        .into_iter()
        .filter(|(pid, cmd)| Some(*pid) != exclude && cmd.contains(pattern))
        .map(|(pid, _)| pid)
        .min()
}

async fn on_blocking_pool<T, F>(host: &SharedHost, timeout: Duration, f: F) -> Result<T, QueryError>
where
    T: Send + 'static,
    F: FnOnce(&HostSampler) -> Result<T, QueryError> + Send + 'static,
{
    let host = Arc::clone(host);
    bounded(timeout, async move {
        tokio::task::spawn_blocking(move || f(host.as_ref()))
            .await
            .map_err(|e| QueryError::Io(io::Error::other(e)))?
    })
    .await
}

pub struct CpuQuery {
    host: SharedHost,
    timeout: Duration,
}

impl CpuQuery {
    pub fn new(host: SharedHost, timeout: Duration) -> Self {
        Self { host, timeout }
    }
}

#[async_trait]
impl ExternalQuery for CpuQuery {
    type Output = CpuSample;

    async fn query(&self) -> Result<CpuSample, QueryError> {
        on_blocking_pool(&self.host, self.timeout, |h| h.sample_cpu()).await
    }
}

pub struct MemoryQuery {
    host: SharedHost,
    timeout: Duration,
}

impl MemoryQuery {
    pub fn new(host: SharedHost, timeout: Duration) -> Self {
        Self { host, timeout }
    }
}

#[async_trait]
impl ExternalQuery for MemoryQuery {
    type Output = MemSample;

    async fn query(&self) -> Result<MemSample, QueryError> {
        on_blocking_pool(&self.host, self.timeout, |h| h.sample_memory()).await
    }
}

pub struct ProcessQuery {
    host: SharedHost,
    pattern: String,
    timeout: Duration,
}

impl ProcessQuery {
    pub fn new(host: SharedHost, pattern: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host,
            pattern: pattern.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ExternalQuery for ProcessQuery {
    type Output = ProcessSample;

    async fn query(&self) -> Result<ProcessSample, QueryError> {
        let pattern = self.pattern.clone();
        on_blocking_pool(&self.host, self.timeout, move |h| h.find_process(&pattern)).await
    }
}
