//! Readings, snapshots and the static watch rules shared by providers and the renderer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Typed value of one metric field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 0..100 for gauges; per-process CPU may exceed 100 on multi-core saturation.
    Percent(f64),
    Bytes(u64),
    Celsius(f64),
    Watts(f64),
    Count(u64),
    /// Unitless number such as a load average.
    Ratio(f64),
    Label(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Percent(v) | Value::Celsius(v) | Value::Watts(v) | Value::Ratio(v) => Some(*v),
            Value::Bytes(v) | Value::Count(v) => Some(*v as f64),
            Value::Label(_) => None,
        }
    }
}

/// Named fields of an available reading. Keys are the per-provider constants
/// declared next to each provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<&'static str, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, v: Value) -> Self {
        self.0.insert(key, v);
        self
    }

    pub fn insert(&mut self, key: &'static str, v: Value) {
        self.0.insert(key, v);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn bytes(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Bytes(b) => Some(*b),
            _ => None,
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Label(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one provider poll.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricReading {
    Available(Fields),
    Unavailable { reason: String },
}

impl MetricReading {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        MetricReading::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn fields(&self) -> Option<&Fields> {
        match self {
            MetricReading::Available(f) => Some(f),
            MetricReading::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricReading::Available(_))
    }
}

/// Display label of a provider; unique within one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gpu,
    Cpu,
    Memory,
    Process {
        inference: bool,
        color: ColorClass,
        units: MemUnit,
    },
    Container { color: ColorClass },
}

impl ProviderKind {
    /// Process and container watchers share the "Services" section.
    pub fn is_service(&self) -> bool {
        matches!(
            self,
            ProviderKind::Process { .. } | ProviderKind::Container { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub id: ProviderId,
    pub kind: ProviderKind,
    pub reading: MetricReading,
}

/// Every provider's reading from one cycle, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ProviderId, kind: ProviderKind, reading: MetricReading) {
        self.entries.push(SnapshotEntry { id, kind, reading });
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.id.as_str() == id)
    }

    pub fn first_of(&self, pred: impl Fn(&ProviderKind) -> bool) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| pred(&e.kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accent color of a watched service line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    #[default]
    Cyan,
    Green,
    Magenta,
    Blue,
    Yellow,
}

/// Unit used for a process's resident memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MemUnit {
    #[default]
    GiB,
    MiB,
}

/// A process to watch, matched by a substring of its command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRule {
    pub label: String,
    pub pattern: String,
    #[serde(default)]
    pub color: ColorClass,
    #[serde(default)]
    pub units: MemUnit,
    /// Marks the model runner whose load drives the status line.
    #[serde(default)]
    pub inference: bool,
}

/// A container to watch, matched by image name through the container runtime CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRule {
    pub label: String,
    pub image: String,
    #[serde(default = "default_runtime")]
    pub runtime: String,
    #[serde(default)]
    pub color: ColorClass,
}

fn default_runtime() -> String {
    "docker".into()
}
