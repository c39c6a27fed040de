//! Revert safety evaluation.
//!
//! Decides whether a shard sitting at the scale-up tier can be reverted to
//! its base tier. Every rule must pass; every violated margin is reported
//! so an operator sees the full picture in one run, not one reason per
//! run.

use crate::specs::TierSpecTable;
use crate::stats::ShardMetrics;

/// Threshold set for the safety rules.
///
/// An explicit value struct rather than process-wide constants so tests
/// and `tierwatch.toml` can override individual margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyThresholds {
    /// Max acceptable mean CPU utilization, percent.
    pub cpu_mean_pct: f64,
    /// Mean resident memory must stay below this fraction of the current
    /// tier's RAM.
    pub memory_fraction: f64,
    /// Mean IOPS must stay below this fraction of the current tier's max.
    pub iops_fraction: f64,
    /// Mean connections must stay below this fraction of the *base*
    /// tier's limit — the tier the shard would land on.
    pub connections_fraction: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            cpu_mean_pct: 35.0,
            memory_fraction: 0.6,
            iops_fraction: 0.6,
            connections_fraction: 0.5,
        }
    }
}

/// Outcome of a safety evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyVerdict {
    pub safe: bool,
    /// Every violated margin, in rule order. Empty iff `safe`.
    pub reasons: Vec<String>,
}

/// Apply the full rule set for reverting `current_tier` → `base_tier`.
///
/// A missing tier spec for either tier fails immediately with a single
/// reason; the remaining rules need the specs and are skipped.
pub fn evaluate(
    base_tier: &str,
    current_tier: &str,
    metrics: &ShardMetrics,
    specs: &TierSpecTable,
    thresholds: &SafetyThresholds,
) -> SafetyVerdict {
    let (Some(base_spec), Some(current_spec)) = (specs.get(base_tier), specs.get(current_tier))
    else {
        return SafetyVerdict {
            safe: false,
            reasons: vec![format!(
                "missing tier specs for base tier {base_tier} or current tier {current_tier}"
            )],
        };
    };

    let mut reasons = Vec::new();

    if metrics.cpu.mean >= thresholds.cpu_mean_pct {
        reasons.push(format!(
            "CPU mean ({:.2}%) >= {}% threshold",
            metrics.cpu.mean, thresholds.cpu_mean_pct
        ));
    }

    if current_spec.ram_gb > 0.0 {
        let memory_limit = current_spec.ram_gb * thresholds.memory_fraction;
        if metrics.memory_gb.mean >= memory_limit {
            reasons.push(format!(
                "memory mean ({:.2}GB) >= {:.0}% of {current_tier} RAM ({memory_limit:.2}GB)",
                metrics.memory_gb.mean,
                thresholds.memory_fraction * 100.0,
            ));
        }
    } else {
        // Cannot bound memory risk without a RAM figure.
        reasons.push(format!(
            "could not determine memory threshold for {current_tier}"
        ));
    }

    let iops_limit = f64::from(current_spec.max_iops) * thresholds.iops_fraction;
    if metrics.iops.mean >= iops_limit {
        reasons.push(format!(
            "IOPS mean ({:.2}) >= {:.0}% of {current_tier} IOPS ({iops_limit:.2})",
            metrics.iops.mean,
            thresholds.iops_fraction * 100.0,
        ));
    }

    let connections_limit =
        f64::from(base_spec.max_connections) * thresholds.connections_fraction;
    if metrics.connections.mean >= connections_limit {
        reasons.push(format!(
            "connections mean ({:.2}) >= {:.0}% of {base_tier} connection limit ({connections_limit:.2})",
            metrics.connections.mean,
            thresholds.connections_fraction * 100.0,
        ));
    }

    SafetyVerdict {
        safe: reasons.is_empty(),
        reasons,
    }
}
