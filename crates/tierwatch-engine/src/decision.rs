//! Per-shard decision state machine.
//!
//! Fixed evaluation order, short-circuiting on the first non-pass:
//! tier classification → autoscale-bounds check → staleness → dwell →
//! primary location → metrics → safety. Every terminal outcome except
//! [`ShardOutcome::Eligible`] leaves the topology untouched.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use tierwatch_atlas::{
    AtlasApi, Process, find_primary_for_shard, METRIC_CONNECTIONS, METRIC_CPU_USER,
    METRIC_DISK_IOPS_TOTAL, METRIC_MEMORY_RESIDENT,
};
use tierwatch_core::settings::RunSettings;
use tierwatch_core::stats::{summarize, summarize_with, ShardMetrics};
use tierwatch_core::{safety, tier, TierSpecTable};
use tierwatch_topology::{locate, RegionConfig, Topology};

use crate::gate::StalenessGate;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A revert this run intends to perform. Run-scoped: consumed by the
/// batch mutation builder, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub shard_index: usize,
    pub target_tier: String,
    /// Live disk size to carry through the tier change.
    pub disk_size_gb: f64,
}

/// Terminal state of one shard's evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShardOutcome {
    /// Shard is not at the scale-up tier (or not determinable as such);
    /// nothing to do.
    NoAction { reason: String },
    /// A gate failed; reverting now would be unsafe or unverifiable.
    Blocked { reasons: Vec<String> },
    /// First sighting of this scale-up — the caller records "now" and
    /// the dwell clock restarts.
    RecordAndWait,
    /// Inside the dwell window; re-check next run.
    Wait { elapsed_hours: f64 },
    /// All gates passed; queue the revert.
    Eligible(PendingChange),
}

/// Everything known about a shard before evaluation starts.
#[derive(Debug, Clone, Copy)]
pub struct ShardContext<'a> {
    pub cluster_name: &'a str,
    pub shard_index: usize,
    pub base_tier: &'a str,
    pub scale_up_tier: &'a str,
    pub last_tier_update: Option<&'a str>,
}

/// The decision engine: settings plus the tier capacity table.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    settings: RunSettings,
    specs: TierSpecTable,
}

impl DecisionEngine {
    pub fn new(specs: TierSpecTable, settings: RunSettings) -> Self {
        Self { settings, specs }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn gate(&self) -> StalenessGate {
        StalenessGate {
            new_event_threshold_hours: self.settings.new_event_threshold_hours,
            min_dwell_hours: self.settings.min_dwell_hours,
        }
    }

    /// Run the state machine for one shard of a normalized topology.
    ///
    /// Pure with respect to the topology and bookkeeping: the only I/O
    /// is the metric fetch, which happens after every cheaper gate has
    /// passed.
    pub async fn evaluate_shard(
        &self,
        atlas: &dyn AtlasApi,
        topology: &Topology,
        processes: &[Process],
        ctx: &ShardContext<'_>,
        now: DateTime<Utc>,
    ) -> ShardOutcome {
        let shard_index = ctx.shard_index;

        // Tier classification.
        let Some(current_tier) = locate::shard_tier(topology, shard_index) else {
            return ShardOutcome::Blocked {
                reasons: vec![format!("could not determine current tier for shard[{shard_index}]")],
            };
        };
        if current_tier == ctx.base_tier {
            return ShardOutcome::NoAction {
                reason: format!("already at base tier {}", ctx.base_tier),
            };
        }
        if current_tier != ctx.scale_up_tier {
            // The watchdog only manages the configured two-tier
            // oscillation; anything else was changed by someone else.
            return ShardOutcome::NoAction {
                reason: format!(
                    "at {current_tier}, which is neither {} nor {}",
                    ctx.base_tier, ctx.scale_up_tier
                ),
            };
        }
        debug!(
            cluster = ctx.cluster_name,
            shard_index, current_tier, "shard is at scale-up tier"
        );

        // Autoscale bounds.
        let reasons = match locate::region_config(topology, shard_index) {
            Some(region) => self.bounds_reasons(region, ctx),
            None => vec![format!("no region config found for shard[{shard_index}]")],
        };
        if !reasons.is_empty() {
            return ShardOutcome::Blocked { reasons };
        }

        // Staleness, then dwell.
        let gate = self.gate();
        if gate.is_new_event(now, ctx.last_tier_update) {
            info!(
                cluster = ctx.cluster_name,
                shard_index,
                age_hours = gate.age_hours(now, ctx.last_tier_update),
                "new scale-up event detected; restarting dwell clock"
            );
            return ShardOutcome::RecordAndWait;
        }
        if !gate.dwell_satisfied(now, ctx.last_tier_update) {
            let elapsed_hours = gate.age_hours(now, ctx.last_tier_update).unwrap_or(0.0);
            return ShardOutcome::Wait { elapsed_hours };
        }

        // Primary process. A miss means metrics cannot be verified —
        // that blocks the shard, it never defaults to safe.
        let primary = find_primary_for_shard(processes, ctx.cluster_name, shard_index);
        let Some(process_id) = primary.and_then(|p| p.id.as_deref()) else {
            return ShardOutcome::Blocked {
                reasons: vec![format!(
                    "could not locate a primary process for shard[{shard_index}]"
                )],
            };
        };

        // Metrics and safety.
        let metrics = self.collect_metrics(atlas, process_id).await;
        if metrics.is_inconclusive() {
            warn!(
                cluster = ctx.cluster_name,
                shard_index, process_id, "no metric samples; safety check is inconclusive"
            );
        }
        let verdict = safety::evaluate(
            ctx.base_tier,
            current_tier,
            &metrics,
            &self.specs,
            &self.settings.thresholds,
        );
        if !verdict.safe {
            return ShardOutcome::Blocked {
                reasons: verdict.reasons,
            };
        }

        let disk_size_gb =
            locate::effective_disk_size(topology, shard_index, self.settings.default_disk_size_gb);
        ShardOutcome::Eligible(PendingChange {
            shard_index,
            target_tier: ctx.base_tier.to_string(),
            disk_size_gb,
        })
    }

    fn bounds_reasons(&self, region: &RegionConfig, ctx: &ShardContext<'_>) -> Vec<String> {
        let shard_index = ctx.shard_index;
        let bounds = region
            .auto_scaling
            .as_ref()
            .and_then(|auto| auto.compute.as_ref())
            .and_then(|compute| compute.min_max());
        let Some((min, max)) = bounds else {
            return vec![format!(
                "autoscale compute bounds not configured for shard[{shard_index}]"
            )];
        };

        let mut reasons = Vec::new();
        for (label, candidate) in [("base tier", ctx.base_tier), ("scale-up tier", ctx.scale_up_tier)]
        {
            if !tier::within_bounds(candidate, min, max) {
                reasons.push(format!(
                    "{label} {candidate} outside autoscale limits [{min}, {max}]"
                ));
            }
        }
        reasons
    }

    /// Pull and summarize the four series for a primary. Any series that
    /// fails to fetch reduces to a zero summary — inconclusive, never an
    /// error.
    pub(crate) async fn collect_metrics(
        &self,
        atlas: &dyn AtlasApi,
        process_id: &str,
    ) -> ShardMetrics {
        let fetch = |metric: &'static str| async move {
            match atlas
                .get_metric_series(
                    process_id,
                    metric,
                    &self.settings.metrics_granularity,
                    &self.settings.metrics_period,
                )
                .await
            {
                Ok(samples) => samples,
                Err(error) => {
                    warn!(process_id, metric, %error, "metric fetch failed; treating as empty");
                    Vec::new()
                }
            }
        };

        ShardMetrics {
            cpu: summarize(&fetch(METRIC_CPU_USER).await),
            memory_gb: summarize_with(&fetch(METRIC_MEMORY_RESIDENT).await, |v| v / BYTES_PER_GB),
            iops: summarize(&fetch(METRIC_DISK_IOPS_TOTAL).await),
            connections: summarize(&fetch(METRIC_CONNECTIONS).await),
        }
    }
}
