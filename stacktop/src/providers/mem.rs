//! System memory totals.

use std::time::Duration;

use async_trait::async_trait;

use crate::host::{MemSample, MemoryQuery, SharedHost};
use crate::providers::{degrade, MetricProvider};
use crate::query::ExternalQuery;
use crate::types::{Fields, MetricReading, ProviderId, ProviderKind, Value};

pub const TOTAL: &str = "total";
pub const USED: &str = "used";
pub const FREE: &str = "free";
pub const AVAILABLE: &str = "available";
pub const USAGE: &str = "usage";

pub struct MemoryProvider<Q = MemoryQuery> {
    id: ProviderId,
    query: Q,
}

impl MemoryProvider<MemoryQuery> {
    pub fn host(host: SharedHost, timeout: Duration) -> Self {
        Self::new("Memory", MemoryQuery::new(host, timeout))
    }
}

impl<Q> MemoryProvider<Q>
where
    Q: ExternalQuery<Output = MemSample>,
{
    pub fn new(label: impl Into<String>, query: Q) -> Self {
        Self {
            id: ProviderId::new(label),
            query,
        }
    }
}

/// `None` when the totals are unusable (zero total).
pub fn fields(s: &MemSample) -> Option<Fields> {
    if s.total == 0 {
        return None;
    }
    let usage = (s.used as f64 / s.total as f64 * 100.0).clamp(0.0, 100.0);
    Some(
        Fields::new()
            .with(TOTAL, Value::Bytes(s.total))
            .with(USED, Value::Bytes(s.used))
            .with(FREE, Value::Bytes(s.free))
            .with(AVAILABLE, Value::Bytes(s.available))
            .with(USAGE, Value::Percent(usage)),
    )
}

#[async_trait]
impl<Q> MetricProvider for MemoryProvider<Q>
where
    Q: ExternalQuery<Output = MemSample>,
{
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Memory
    }

    async fn poll(&self) -> MetricReading {
        match self.query.query().await {
            Ok(s) => fields(&s)
                .map(MetricReading::Available)
                .unwrap_or_else(|| MetricReading::unavailable("total memory reported as zero")),
            Err(e) => degrade(&self.id, e),
        }
    }
}
