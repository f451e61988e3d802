use std::time::Duration;

use async_trait::async_trait;

use crate::host::{CpuQuery, CpuSample, SharedHost};
use crate::providers::{degrade, MetricProvider};
use crate::query::ExternalQuery;
use crate::types::{Fields, MetricReading, ProviderId, ProviderKind, Value};

pub const USAGE: &str = "usage";
pub const LOAD_1: &str = "load_1";
pub const LOAD_5: &str = "load_5";
pub const LOAD_15: &str = "load_15";
pub const CORES: &str = "cores";
pub const MODEL: &str = "model";

pub struct CpuProvider<Q = CpuQuery> {
    id: ProviderId,
    query: Q,
}

impl CpuProvider<CpuQuery> {
    pub fn host(host: SharedHost, timeout: Duration) -> Self {
        Self::new("CPU", CpuQuery::new(host, timeout))
    }
}

impl<Q> CpuProvider<Q>
where
    Q: ExternalQuery<Output = CpuSample>,
{
    pub fn new(label: impl Into<String>, query: Q) -> Self {
        Self {
            id: ProviderId::new(label),
            query,
        }
    }
}

pub fn fields(s: &CpuSample) -> Fields {
    Fields::new()
        .with(USAGE, Value::Percent(f64::from(s.usage_pct).clamp(0.0, 100.0)))
        .with(LOAD_1, Value::Ratio(s.load[0]))
        .with(LOAD_5, Value::Ratio(s.load[1]))
        .with(LOAD_15, Value::Ratio(s.load[2]))
        .with(CORES, Value::Count(s.cores as u64))
        .with(MODEL, Value::Label(s.model.clone()))
}

#[async_trait]
impl<Q> MetricProvider for CpuProvider<Q>
where
    Q: ExternalQuery<Output = CpuSample>,
{
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Cpu
    }

    async fn poll(&self) -> MetricReading {
        match self.query.query().await {
            Ok(s) if s.usage_pct.is_finite() => MetricReading::Available(fields(&s)),
            Ok(s) => MetricReading::unavailable(format!("cpu usage reads {}", s.usage_pct)),
            Err(e) => degrade(&self.id, e),
        }
    }
}
