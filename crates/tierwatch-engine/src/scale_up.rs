//! Manual fleet-wide scale-up.
//!
//! The inverse convenience operation: push every shard sitting at its
//! base tier up to the configured scale-up tier, ahead of a known load
//! event. No safety gating — the operator asked for capacity — but the
//! same batch discipline (one PATCH per cluster) and the same
//! bookkeeping, so the scale-down monitor sees a fresh dwell clock.

use anyhow::Context;
use chrono::Utc;
use tracing::{error, info, warn};

use tierwatch_atlas::AtlasApi;
use tierwatch_core::settings::RunSettings;
use tierwatch_store::{FleetStore, ValidClusterEntry};
use tierwatch_topology::{apply_tier_change, locate, normalize};

/// Counters from one scale-up pass. A nonzero `clusters_skipped` means
/// the pass only partially succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleUpReport {
    pub clusters_patched: usize,
    pub clusters_skipped: usize,
    pub shards_scaled: usize,
}

/// Scale every base-tier shard in the fleet up to its scale-up tier.
///
/// Shards already above base (or with an undeterminable tier) are left
/// alone. Cluster failures skip that cluster; only a broken fleet file
/// aborts the pass.
pub async fn scale_up_fleet(
    atlas: &dyn AtlasApi,
    store: &FleetStore,
    settings: &RunSettings,
) -> anyhow::Result<ScaleUpReport> {
    let entries = store
        .load()
        .with_context(|| format!("loading fleet file {}", store.path().display()))?;

    let mut report = ScaleUpReport::default();
    for entry in &entries {
        let Some(cluster) = entry.validated() else {
            warn!(
                cluster = entry.cluster_name.as_deref().unwrap_or("<unnamed>"),
                "fleet entry is missing required fields; skipping"
            );
            report.clusters_skipped += 1;
            continue;
        };
        let applied = match scale_up_cluster(atlas, &cluster, settings).await {
            Ok(applied) => applied,
            Err(scale_error) => {
                warn!(cluster = %cluster.cluster_name, %scale_error, "scale-up failed; skipping");
                report.clusters_skipped += 1;
                continue;
            }
        };
        if applied.is_empty() {
            continue;
        }
        report.clusters_patched += 1;
        report.shards_scaled += applied.len();

        let stamp = Utc::now().to_rfc3339();
        for shard_index in applied {
            if let Err(store_error) =
                store.record_tier_change(&cluster.cluster_name, shard_index, &stamp)
            {
                error!(
                    cluster = %cluster.cluster_name,
                    shard_index,
                    %store_error,
                    "scale-up applied but not recorded"
                );
            }
        }
    }
    info!(?report, "scale-up pass complete");
    Ok(report)
}

async fn scale_up_cluster(
    atlas: &dyn AtlasApi,
    cluster: &ValidClusterEntry,
    settings: &RunSettings,
) -> anyhow::Result<Vec<usize>> {
    let raw = atlas.get_cluster_topology(&cluster.cluster_name).await?;
    let mut topology = normalize(raw)?;

    let mut applied = Vec::new();
    for shard in &cluster.shards {
        let shard_index = shard.shard_index;
        let current = locate::shard_tier(&topology, shard_index).map(str::to_string);
        match current.as_deref() {
            Some(tier) if tier == cluster.base_tier => {
                let disk = locate::requested_disk_size(
                    &topology,
                    shard_index,
                    settings.default_disk_size_gb,
                );
                match apply_tier_change(
                    &mut topology,
                    shard_index,
                    &cluster.scale_up_tier,
                    disk,
                    settings.node_count,
                ) {
                    Ok(()) => applied.push(shard_index),
                    Err(mutate_error) => warn!(
                        cluster = %cluster.cluster_name,
                        shard_index,
                        %mutate_error,
                        "shard dropped from scale-up"
                    ),
                }
            }
            Some(tier) => info!(
                cluster = %cluster.cluster_name,
                shard_index,
                tier,
                "not at base tier; leaving as is"
            ),
            None => warn!(
                cluster = %cluster.cluster_name,
                shard_index,
                "could not determine current tier; skipping"
            ),
        }
    }
    if applied.is_empty() {
        return Ok(Vec::new());
    }

    atlas
        .patch_cluster_topology(&cluster.cluster_name, &topology)
        .await
        .with_context(|| format!("submitting scale-up for {}", cluster.cluster_name))?;
    info!(cluster = %cluster.cluster_name, shards = ?applied, "scale-up submitted");
    Ok(applied)
}
