//! Dashboard configuration: a JSON file with the watch rules and timings.
//! Stored under XDG config dir: $XDG_CONFIG_HOME/stacktop/config.json (fallback ~/.config/stacktop/config.json)

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ColorClass, ContainerRule, MemUnit, ProcessRule};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Status line thresholds. Tuned for one GPU box; override per machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Inference process CPU% above which the model is spilling to host memory.
    #[serde(default = "default_overflow_cpu")]
    pub overflow_cpu_pct: f64,
    /// GPU utilization above which inference is GPU-bound.
    #[serde(default = "default_gpu_primary")]
    pub gpu_primary_util_pct: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            overflow_cpu_pct: default_overflow_cpu(),
            gpu_primary_util_pct: default_gpu_primary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Column width every frame line is padded or cut to.
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_gauge_width")]
    pub gauge_width: usize,
    #[serde(default = "default_true")]
    pub gpu: bool,
    #[serde(default)]
    pub status: StatusThresholds,
    #[serde(default = "default_processes")]
    pub processes: Vec<ProcessRule>,
    #[serde(default = "default_containers")]
    pub containers: Vec<ContainerRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            width: default_width(),
            gauge_width: default_gauge_width(),
            gpu: true,
            status: StatusThresholds::default(),
            processes: default_processes(),
            containers: default_containers(),
        }
    }
}

fn default_interval_ms() -> u64 {
    2_000
}
fn default_query_timeout_ms() -> u64 {
    1_500
}
fn default_width() -> usize {
    78
}
fn default_gauge_width() -> usize {
    30
}
fn default_true() -> bool {
    true
}
fn default_overflow_cpu() -> f64 {
    100.0
}
fn default_gpu_primary() -> f64 {
    50.0
}

fn default_processes() -> Vec<ProcessRule> {
    vec![
        ProcessRule {
            label: "Ollama".into(),
            pattern: "ollama serve".into(),
            color: ColorClass::Green,
            units: MemUnit::MiB,
            inference: false,
        },
        ProcessRule {
            label: "Model runner".into(),
            pattern: "ollama runner".into(),
            color: ColorClass::Magenta,
            units: MemUnit::GiB,
            inference: true,
        },
        ProcessRule {
            label: "API server".into(),
            pattern: "uvicorn".into(),
            color: ColorClass::Blue,
            units: MemUnit::MiB,
            inference: false,
        },
        ProcessRule {
            label: "Chat UI".into(),
            pattern: "streamlit run".into(),
            color: ColorClass::Cyan,
            units: MemUnit::MiB,
            inference: false,
        },
    ]
}

fn default_containers() -> Vec<ContainerRule> {
    vec![ContainerRule {
        label: "Qdrant".into(),
        image: "qdrant/qdrant".into(),
        runtime: "docker".into(),
        color: ColorClass::Yellow,
    }]
}

impl Config {
    /// Width of the label column in the services section.
    pub fn label_width(&self) -> usize {
        self.processes
            .iter()
            .map(|p| p.label.chars().count())
            .chain(self.containers.iter().map(|c| c.label.chars().count()))
            .max()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms < 200 {
            return Err(ConfigError::Invalid(
                "interval_ms must be at least 200".into(),
            ));
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "query_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.gauge_width == 0 || self.gauge_width + 20 > self.width {
            return Err(ConfigError::Invalid(format!(
                "gauge_width {} does not fit in width {}",
                self.gauge_width, self.width
            )));
        }
        let mut seen = HashSet::new();
        for label in ["GPU", "CPU", "Memory"] {
            seen.insert(label.to_string());
        }
        for p in &self.processes {
            if p.pattern.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "process '{}' has an empty pattern",
                    p.label
                )));
            }
            if !seen.insert(p.label.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate label '{}'",
                    p.label
                )));
            }
        }
        for c in &self.containers {
            if c.image.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "container '{}' has an empty image",
                    c.label
                )));
            }
            if !seen.insert(c.label.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate label '{}'",
                    c.label
                )));
            }
        }
        if self.processes.iter().filter(|p| p.inference).count() > 1 {
            return Err(ConfigError::Invalid(
                "at most one process may be marked inference".into(),
            ));
        }
        Ok(())
    }

    /// Apply `STACKTOP_GPU` and `STACKTOP_INTERVAL_MS` from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("STACKTOP_GPU") {
            self.gpu = v != "0";
        }
        if let Some(ms) = std::env::var("STACKTOP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.interval_ms = ms;
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("stacktop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stacktop")
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_json::from_str(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load an explicit path, else the default location, else built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(p) => load_from(p),
        None => {
            let path = config_path();
            if path.exists() {
                load_from(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn to_pretty_json(cfg: &Config) -> String {
    serde_json::to_string_pretty(cfg).unwrap_or_default()
}
