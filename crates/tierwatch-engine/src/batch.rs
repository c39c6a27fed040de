//! Batch assembly and submission of tier changes.
//!
//! All of a cluster's eligible reverts go out in a single PATCH. The
//! topology is refetched and renormalized immediately before the write
//! so the submitted document reflects the freshest server state, not
//! the one the decisions were made against.

use anyhow::Context;
use tracing::{info, warn};

use tierwatch_atlas::AtlasApi;
use tierwatch_topology::{apply_tier_change, normalize};

use crate::decision::PendingChange;

/// Apply `changes` to a fresh copy of the cluster topology and submit
/// the result. Returns the shard indices actually written.
///
/// A shard whose region config or electable specs disappeared between
/// evaluation and submission is skipped with a warning; the rest of the
/// batch still goes out. No PATCH is issued when nothing survives.
pub async fn submit_cluster_changes(
    atlas: &dyn AtlasApi,
    cluster_name: &str,
    changes: &[PendingChange],
    node_count: u32,
) -> anyhow::Result<Vec<usize>> {
    if changes.is_empty() {
        return Ok(Vec::new());
    }

    let fresh = atlas
        .get_cluster_topology(cluster_name)
        .await
        .with_context(|| format!("refetching topology for {cluster_name}"))?;
    let mut topology =
        normalize(fresh).with_context(|| format!("normalizing topology for {cluster_name}"))?;

    let mut applied = Vec::new();
    for change in changes {
        match apply_tier_change(
            &mut topology,
            change.shard_index,
            &change.target_tier,
            change.disk_size_gb,
            node_count,
        ) {
            Ok(()) => applied.push(change.shard_index),
            Err(error) => {
                warn!(
                    cluster = cluster_name,
                    shard_index = change.shard_index,
                    %error,
                    "shard dropped from batch"
                );
            }
        }
    }
    if applied.is_empty() {
        info!(cluster = cluster_name, "no changes survived batch assembly");
        return Ok(Vec::new());
    }

    atlas
        .patch_cluster_topology(cluster_name, &topology)
        .await
        .with_context(|| format!("submitting tier changes for {cluster_name}"))?;
    info!(cluster = cluster_name, shards = ?applied, "tier changes submitted");
    Ok(applied)
}
