//! Watches one service process, found by a command-line pattern.

use std::time::Duration;

use async_trait::async_trait;

use crate::host::{ProcessQuery, ProcessSample, SharedHost};
use crate::providers::{degrade, MetricProvider};
use crate::query::{ExternalQuery, QueryError};
use crate::types::{Fields, MetricReading, ProcessRule, ProviderId, ProviderKind, Value};

pub const PID: &str = "pid";
pub const CPU: &str = "cpu";
pub const RSS: &str = "rss";

pub const NOT_RUNNING: &str = "not running";

pub struct ProcessWatcher<Q = ProcessQuery> {
    id: ProviderId,
    rule: ProcessRule,
    query: Q,
}

impl ProcessWatcher<ProcessQuery> {
    pub fn host(rule: ProcessRule, host: SharedHost, timeout: Duration) -> Self {
        let query = ProcessQuery::new(host, rule.pattern.clone(), timeout);
        Self::new(rule, query)
    }
}

impl<Q> ProcessWatcher<Q>
where
    Q: ExternalQuery<Output = ProcessSample>,
{
    pub fn new(rule: ProcessRule, query: Q) -> Self {
        Self {
            id: ProviderId::new(rule.label.clone()),
            rule,
            query,
        }
    }
}

#[async_trait]
impl<Q> MetricProvider for ProcessWatcher<Q>
where
    Q: ExternalQuery<Output = ProcessSample>,
{
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Process {
            inference: self.rule.inference,
            color: self.rule.color,
            units: self.rule.units,
        }
    }

    async fn poll(&self) -> MetricReading {
        match self.query.query().await {
            Ok(s) if s.cpu_pct.is_finite() => MetricReading::Available(
                Fields::new()
                    .with(PID, Value::Count(u64::from(s.pid)))
                    .with(CPU, Value::Percent(f64::from(s.cpu_pct.max(0.0))))
                    .with(RSS, Value::Bytes(s.rss_bytes)),
            ),
            Ok(s) => MetricReading::unavailable(format!("cpu reads {}", s.cpu_pct)),
            // Absence is an expected state, not a fault
            Err(QueryError::NotRunning) => MetricReading::unavailable(NOT_RUNNING),
            Err(e) => degrade(&self.id, e),
        }
    }
}
