//! The scale-down monitoring sweep and its loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use tierwatch_atlas::{AtlasApi, Process};
use tierwatch_store::{FleetStore, ValidClusterEntry};
use tierwatch_topology::normalize;

use crate::batch::submit_cluster_changes;
use crate::decision::{DecisionEngine, PendingChange, ShardContext, ShardOutcome};

/// Counters from one sweep over the fleet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub clusters_checked: usize,
    pub clusters_skipped: usize,
    pub shards_reverted: usize,
    pub shards_waiting: usize,
    pub shards_blocked: usize,
}

/// Walks the fleet, evaluates every shard, and submits whatever became
/// eligible — one PATCH per cluster per sweep.
pub struct ScaleDownMonitor {
    atlas: Arc<dyn AtlasApi>,
    store: FleetStore,
    engine: DecisionEngine,
}

impl ScaleDownMonitor {
    pub fn new(atlas: Arc<dyn AtlasApi>, store: FleetStore, engine: DecisionEngine) -> Self {
        Self {
            atlas,
            store,
            engine,
        }
    }

    /// One sweep at the current wall-clock time.
    pub async fn run_once(&self) -> anyhow::Result<RunReport> {
        self.run_once_at(Utc::now()).await
    }

    /// One sweep with an injected clock.
    ///
    /// Cluster-level failures (unreachable topology, shape mismatch) skip
    /// that cluster and the sweep continues; only a broken fleet file
    /// aborts the sweep.
    pub async fn run_once_at(&self, now: DateTime<Utc>) -> anyhow::Result<RunReport> {
        let entries = self
            .store
            .load()
            .with_context(|| format!("loading fleet file {}", self.store.path().display()))?;
        let processes = self.atlas.get_processes().await;
        info!(
            clusters = entries.len(),
            processes = processes.len(),
            "starting scale-down sweep"
        );

        let mut report = RunReport::default();
        for entry in &entries {
            let Some(cluster) = entry.validated() else {
                warn!(
                    cluster = entry.cluster_name.as_deref().unwrap_or("<unnamed>"),
                    "fleet entry is missing required fields; skipping"
                );
                report.clusters_skipped += 1;
                continue;
            };
            match self.check_cluster(&cluster, &processes, now, &mut report).await {
                Ok(()) => report.clusters_checked += 1,
                Err(error) => {
                    warn!(cluster = %cluster.cluster_name, %error, "cluster check failed; skipping");
                    report.clusters_skipped += 1;
                }
            }
        }
        info!(?report, "sweep complete");
        Ok(report)
    }

    async fn check_cluster(
        &self,
        cluster: &ValidClusterEntry,
        processes: &[Process],
        now: DateTime<Utc>,
        report: &mut RunReport,
    ) -> anyhow::Result<()> {
        let raw = self.atlas.get_cluster_topology(&cluster.cluster_name).await?;
        let topology = normalize(raw)?;

        let mut pending: Vec<PendingChange> = Vec::new();
        for shard in &cluster.shards {
            let ctx = ShardContext {
                cluster_name: &cluster.cluster_name,
                shard_index: shard.shard_index,
                base_tier: &cluster.base_tier,
                scale_up_tier: &cluster.scale_up_tier,
                last_tier_update: shard.last_tier_update.as_deref(),
            };
            let outcome = self
                .engine
                .evaluate_shard(self.atlas.as_ref(), &topology, processes, &ctx, now)
                .await;
            match outcome {
                ShardOutcome::NoAction { reason } => {
                    debug!(cluster = %cluster.cluster_name, shard.shard_index, %reason, "no action");
                }
                ShardOutcome::Blocked { reasons } => {
                    report.shards_blocked += 1;
                    info!(
                        cluster = %cluster.cluster_name,
                        shard.shard_index,
                        ?reasons,
                        "revert blocked"
                    );
                }
                ShardOutcome::RecordAndWait => {
                    report.shards_waiting += 1;
                    self.store.record_tier_change(
                        &cluster.cluster_name,
                        shard.shard_index,
                        &now.to_rfc3339(),
                    )?;
                }
                ShardOutcome::Wait { elapsed_hours } => {
                    report.shards_waiting += 1;
                    info!(
                        cluster = %cluster.cluster_name,
                        shard.shard_index,
                        elapsed_hours,
                        "inside dwell window"
                    );
                }
                ShardOutcome::Eligible(change) => pending.push(change),
            }
        }

        if pending.is_empty() {
            return Ok(());
        }
        let applied = submit_cluster_changes(
            self.atlas.as_ref(),
            &cluster.cluster_name,
            &pending,
            self.engine.settings().node_count,
        )
        .await?;
        report.shards_reverted += applied.len();

        // The PATCH has landed; a bookkeeping failure past this point
        // must not abort the sweep. An unrecorded change re-arms the
        // staleness gate and is re-observed next sweep.
        let stamp = now.to_rfc3339();
        for shard_index in applied {
            if let Err(store_error) =
                self.store
                    .record_tier_change(&cluster.cluster_name, shard_index, &stamp)
            {
                error!(
                    cluster = %cluster.cluster_name,
                    shard_index,
                    %store_error,
                    "tier change applied but not recorded"
                );
            }
        }
        Ok(())
    }

    /// Sweep on an interval until `shutdown` flips to true. Sweep
    /// failures are logged and the loop keeps going.
    pub async fn run(
        &self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        loop {
            if let Err(error) = self.run_once().await {
                error!(%error, "sweep failed");
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown requested; monitor stopping");
                        return Ok(());
                    }
                }
            }
        }
    }
}
