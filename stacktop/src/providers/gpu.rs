//! Accelerator metrics from `nvidia-smi` CSV output.

use std::time::Duration;

use async_trait::async_trait;

use crate::providers::{degrade, MetricProvider};
use crate::query::{CommandQuery, ExternalQuery, QueryError};
use crate::types::{Fields, MetricReading, ProviderId, ProviderKind, Value};

pub const NAME: &str = "name";
pub const UTIL: &str = "util";
pub const MEM_USED: &str = "mem_used";
pub const MEM_TOTAL: &str = "mem_total";
pub const MEM_PCT: &str = "mem_pct";
pub const TEMP: &str = "temp";
pub const POWER_DRAW: &str = "power_draw";
pub const POWER_LIMIT: &str = "power_limit";

const QUERY_FIELDS: &str = "--query-gpu=name,utilization.gpu,memory.used,memory.total,temperature.gpu,power.draw,power.limit";
const MIB: u64 = 1024 * 1024;

pub struct GpuProvider<Q = CommandQuery> {
    id: ProviderId,
    query: Q,
}

impl GpuProvider<CommandQuery> {
    pub fn nvidia_smi(timeout: Duration) -> Self {
        Self::new(
            "GPU",
            CommandQuery::new(
                "nvidia-smi",
                [QUERY_FIELDS, "--format=csv,noheader,nounits"],
                timeout,
            ),
        )
    }
}

impl<Q> GpuProvider<Q>
where
    Q: ExternalQuery<Output = String>,
{
    pub fn new(label: impl Into<String>, query: Q) -> Self {
        Self {
            id: ProviderId::new(label),
            query,
        }
    }
}

#[async_trait]
impl<Q> MetricProvider for GpuProvider<Q>
where
    Q: ExternalQuery<Output = String>,
{
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gpu
    }

    async fn poll(&self) -> MetricReading {
        match self.query.query().await.and_then(|out| parse_csv(&out)) {
            Ok(fields) => MetricReading::Available(fields),
            Err(e) => degrade(&self.id, e),
        }
    }
}

fn required(col: Option<&str>, what: &str) -> Result<f64, QueryError> {
    let raw = col.ok_or_else(|| QueryError::parse(format!("missing {what}")))?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| QueryError::parse(format!("{what}: {raw:?}")))
}

fn optional(col: Option<&str>) -> Option<f64> {
    col.and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// Parse the first line of `--format=csv,noheader,nounits` output.
///
/// Name, utilization and memory columns are required; temperature and power
/// columns often read `[N/A]` and are left out when not numeric.
pub fn parse_csv(out: &str) -> Result<Fields, QueryError> {
    let line = out
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| QueryError::parse("empty accelerator query output"))?;
    let cols: Vec<&str> = line.split(',').map(str::trim).collect();
    let mut it = cols.iter().copied();

    let name = it
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| QueryError::parse("missing name"))?;
    let util = required(it.next(), "utilization")?;
    let used_mib = required(it.next(), "memory.used")?;
    let total_mib = required(it.next(), "memory.total")?;
    if total_mib == 0.0 {
        return Err(QueryError::parse("memory.total is zero"));
    }

    let used = used_mib as u64 * MIB;
    let total = total_mib as u64 * MIB;
    let mem_pct = (used_mib / total_mib * 100.0).clamp(0.0, 100.0);

    let mut fields = Fields::new()
        .with(NAME, Value::Label(name.to_string()))
        .with(UTIL, Value::Percent(util))
        .with(MEM_USED, Value::Bytes(used))
        .with(MEM_TOTAL, Value::Bytes(total))
        .with(MEM_PCT, Value::Percent(mem_pct));
    if let Some(t) = optional(it.next()) {
        fields.insert(TEMP, Value::Celsius(t));
    }
    if let Some(w) = optional(it.next()) {
        fields.insert(POWER_DRAW, Value::Watts(w));
    }
    if let Some(w) = optional(it.next()) {
        fields.insert(POWER_LIMIT, Value::Watts(w));
    }
    Ok(fields)
}
