//! One-line summary of what the inference stack is doing.

use crate::config::StatusThresholds;
use crate::providers::{gpu, process};
use crate::types::{ProviderKind, Snapshot};
use crate::ui::frame::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Model runner saturating more than one core: weights spilled to host memory.
    Overflow,
    GpuPrimary,
    Idle,
    NoModel,
}

impl Status {
    pub fn text(self) -> &'static str {
        match self {
            Status::Overflow => "generating / overflow to host memory",
            Status::GpuPrimary => "GPU-primary inference",
            Status::Idle => "ready, idle",
            Status::NoModel => "no model loaded",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Status::Overflow => Tone::Alert,
            Status::GpuPrimary => Tone::Normal,
            Status::Idle => Tone::Warning,
            Status::NoModel => Tone::Dim,
        }
    }
}

/// First matching rule wins. `inference_cpu` is `None` when the inference
/// process is not running; `gpu_util` is `None` when the GPU is unavailable.
pub fn classify(inference_cpu: Option<f64>, gpu_util: Option<f64>, t: &StatusThresholds) -> Status {
    let Some(cpu) = inference_cpu else {
        return Status::NoModel;
    };
    if cpu > t.overflow_cpu_pct {
        Status::Overflow
    } else if gpu_util.is_some_and(|u| u > t.gpu_primary_util_pct) {
        Status::GpuPrimary
    } else {
        Status::Idle
    }
}

pub fn from_snapshot(snap: &Snapshot, t: &StatusThresholds) -> Status {
    let inference_cpu = snap
        .first_of(|k| matches!(k, ProviderKind::Process { inference: true, .. }))
        .and_then(|e| e.reading.fields())
        .map(|f| f.number(process::CPU).unwrap_or(0.0));
    let gpu_util = snap
        .first_of(|k| matches!(k, ProviderKind::Gpu))
        .and_then(|e| e.reading.fields())
        .and_then(|f| f.number(gpu::UTIL));
    classify(inference_cpu, gpu_util, t)
}
