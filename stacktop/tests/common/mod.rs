//! Fakes shared by the integration tests.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stacktop::host::CpuSample;
use stacktop::providers::{cpu, MetricProvider};
use stacktop::query::{ExternalQuery, QueryError};
use stacktop::types::{MetricReading, ProviderId, ProviderKind};
use tokio::sync::Notify;

/// Query answered by a closure, so each test decides what the "tool" returns.
pub struct FnQuery<T>(Box<dyn Fn() -> Result<T, QueryError> + Send + Sync>);

impl<T> FnQuery<T> {
    pub fn new(f: impl Fn() -> Result<T, QueryError> + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }
}

pub fn ok<T: Clone + Send + Sync + 'static>(v: T) -> FnQuery<T> {
    FnQuery::new(move || Ok(v.clone()))
}

pub fn missing<T>(tool: &'static str) -> FnQuery<T> {
    FnQuery::new(move || Err(QueryError::Missing(tool.into())))
}

#[async_trait]
impl<T: Send + 'static> ExternalQuery for FnQuery<T> {
    type Output = T;

    async fn query(&self) -> Result<T, QueryError> {
        (self.0)()
    }
}

/// Writer that keeps everything for inspection after the writer was moved away.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub const MIB: u64 = 1024 * 1024;
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

pub fn cpu_reading() -> MetricReading {
    MetricReading::Available(cpu::fields(&CpuSample {
        usage_pct: 12.0,
        load: [0.5, 0.4, 0.3],
        cores: 4,
        model: "test cpu".into(),
    }))
}

/// CPU provider that answers `ready_polls` times, then signals `stuck` and never returns.
pub struct Stalling {
    id: ProviderId,
    polls: AtomicUsize,
    ready_polls: usize,
    stuck: Arc<Notify>,
}

impl Stalling {
    pub fn new(ready_polls: usize, stuck: Arc<Notify>) -> Self {
        Self {
            id: ProviderId::new("CPU"),
            polls: AtomicUsize::new(0),
            ready_polls,
            stuck,
        }
    }
}

#[async_trait]
impl MetricProvider for Stalling {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Cpu
    }

    async fn poll(&self) -> MetricReading {
        if self.polls.fetch_add(1, Ordering::SeqCst) < self.ready_polls {
            return cpu_reading();
        }
        self.stuck.notify_one();
        std::future::pending::<()>().await;
        cpu_reading()
    }
}
