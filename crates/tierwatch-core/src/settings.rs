//! `tierwatch.toml` runtime settings.
//!
//! Every field is optional; [`Settings::resolve`] folds the file over the
//! built-in defaults (which match the original operational values) into
//! the concrete [`RunSettings`] the engine consumes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::safety::SafetyThresholds;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub thresholds: Option<ThresholdsSection>,
    pub timing: Option<TimingSection>,
    pub metrics: Option<MetricsSection>,
    pub mutation: Option<MutationSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdsSection {
    pub cpu_mean_pct: Option<f64>,
    pub memory_fraction: Option<f64>,
    pub iops_fraction: Option<f64>,
    pub connections_fraction: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingSection {
    /// Minimum hours since the last tier change before a revert.
    pub min_dwell_hours: Option<f64>,
    /// Age beyond which a recorded timestamp is treated as stale and the
    /// current scale-up as a brand-new event.
    pub new_event_threshold_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSection {
    /// ISO-8601 lookback window, e.g. "PT30M".
    pub period: Option<String>,
    /// ISO-8601 sample granularity, e.g. "PT1M".
    pub granularity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationSection {
    /// Electable node count written on every tier change.
    pub node_count: Option<u32>,
    /// Disk size assumed when the live topology does not report one.
    pub default_disk_size_gb: Option<f64>,
}

/// Fully-resolved settings, ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub thresholds: SafetyThresholds,
    pub min_dwell_hours: f64,
    pub new_event_threshold_hours: f64,
    pub metrics_period: String,
    pub metrics_granularity: String,
    pub node_count: u32,
    pub default_disk_size_gb: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            thresholds: SafetyThresholds::default(),
            min_dwell_hours: 4.0,
            new_event_threshold_hours: 24.0,
            metrics_period: "PT30M".to_string(),
            metrics_granularity: "PT1M".to_string(),
            node_count: 3,
            default_disk_size_gb: 80.0,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Fold file values over the defaults.
    pub fn resolve(&self) -> RunSettings {
        let mut run = RunSettings::default();

        if let Some(t) = &self.thresholds {
            if let Some(v) = t.cpu_mean_pct {
                run.thresholds.cpu_mean_pct = v;
            }
            if let Some(v) = t.memory_fraction {
                run.thresholds.memory_fraction = v;
            }
            if let Some(v) = t.iops_fraction {
                run.thresholds.iops_fraction = v;
            }
            if let Some(v) = t.connections_fraction {
                run.thresholds.connections_fraction = v;
            }
        }
        if let Some(t) = &self.timing {
            if let Some(v) = t.min_dwell_hours {
                run.min_dwell_hours = v;
            }
            if let Some(v) = t.new_event_threshold_hours {
                run.new_event_threshold_hours = v;
            }
        }
        if let Some(m) = &self.metrics {
            if let Some(v) = &m.period {
                run.metrics_period = v.clone();
            }
            if let Some(v) = &m.granularity {
                run.metrics_granularity = v.clone();
            }
        }
        if let Some(m) = &self.mutation {
            if let Some(v) = m.node_count {
                run.node_count = v;
            }
            if let Some(v) = m.default_disk_size_gb {
                run.default_disk_size_gb = v;
            }
        }
        run
    }
}
