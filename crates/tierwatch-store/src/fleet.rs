//! Fleet file model and read-modify-write updates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StoreResult;

/// One managed cluster in the fleet file.
///
/// Required fields are modeled as `Option` so a single malformed entry
/// degrades to a skip-with-warning instead of failing the whole file;
/// [`ClusterEntry::validated`] is the gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_up_tier: Option<String>,
    #[serde(default)]
    pub shards: Vec<ShardEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One shard's bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShardEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_index: Option<usize>,
    /// RFC 3339 timestamp of the last tier change this tool observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tier_update: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A cluster entry that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidClusterEntry {
    pub cluster_name: String,
    pub base_tier: String,
    pub scale_up_tier: String,
    pub shards: Vec<ValidShardEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidShardEntry {
    pub shard_index: usize,
    pub last_tier_update: Option<String>,
}

impl ClusterEntry {
    /// The entry with required fields present and trimmed, or `None`.
    /// Shards without an index are dropped here as well.
    pub fn validated(&self) -> Option<ValidClusterEntry> {
        let required = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let cluster_name = required(&self.cluster_name)?;
        let base_tier = required(&self.base_tier)?;
        let scale_up_tier = required(&self.scale_up_tier)?;
        let shards = self
            .shards
            .iter()
            .filter_map(|shard| {
                Some(ValidShardEntry {
                    shard_index: shard.shard_index?,
                    last_tier_update: shard.last_tier_update.clone(),
                })
            })
            .collect();
        Some(ValidClusterEntry {
            cluster_name,
            base_tier,
            scale_up_tier,
            shards,
        })
    }
}

/// The fleet file on disk.
#[derive(Debug, Clone)]
pub struct FleetStore {
    path: PathBuf,
}

impl FleetStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries, malformed ones included (validation is the
    /// caller's per-entry decision).
    pub fn load(&self) -> StoreResult<Vec<ClusterEntry>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Record `timestamp` as the last tier change for one shard.
    ///
    /// Reads the file fresh, touches only the matching shard entry, and
    /// rewrites the whole file pretty-printed — sibling entries and
    /// unrecognized fields survive byte-for-byte. A missing (cluster,
    /// shard) pair is a warning, not an error: the remote mutation it
    /// would have bookmarked already happened.
    pub fn record_tier_change(
        &self,
        cluster_name: &str,
        shard_index: usize,
        timestamp: &str,
    ) -> StoreResult<()> {
        let mut entries = self.load()?;
        let mut touched = false;

        for entry in &mut entries {
            if entry.cluster_name.as_deref() != Some(cluster_name) {
                continue;
            }
            for shard in &mut entry.shards {
                if shard.shard_index == Some(shard_index) {
                    shard.last_tier_update = Some(timestamp.to_string());
                    touched = true;
                    break;
                }
            }
        }

        if !touched {
            warn!(
                cluster = cluster_name,
                shard_index, "no fleet entry to record tier change against"
            );
            return Ok(());
        }

        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!(cluster = cluster_name, shard_index, timestamp, "tier change recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
  {
    "clusterName": "OrdersCluster",
    "baseTier": "M30",
    "scaleUpTier": "M40",
    "owner": "payments-team",
    "shards": [
      {"shardIndex": 0, "lastTierUpdate": "2026-08-01T06:00:00+00:00"},
      {"shardIndex": 1}
    ]
  },
  {
    "clusterName": "BrokenEntry",
    "shards": [{"shardIndex": 0}]
  }
]"#;

    fn sample_store() -> (tempfile::TempDir, FleetStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusterConfig.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        (dir, FleetStore::open(path))
    }

    #[test]
    fn loads_all_entries() {
        let (_dir, store) = sample_store();
        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].shards.len(), 2);
        // Unrecognized fields ride along.
        assert_eq!(entries[0].extra["owner"], "payments-team");
    }

    #[test]
    fn validation_gates_required_fields() {
        let (_dir, store) = sample_store();
        let entries = store.load().unwrap();

        let valid = entries[0].validated().unwrap();
        assert_eq!(valid.cluster_name, "OrdersCluster");
        assert_eq!(valid.base_tier, "M30");
        assert_eq!(valid.scale_up_tier, "M40");
        assert_eq!(valid.shards.len(), 2);
        assert_eq!(
            valid.shards[0].last_tier_update.as_deref(),
            Some("2026-08-01T06:00:00+00:00")
        );
        assert!(valid.shards[1].last_tier_update.is_none());

        // Missing tiers → entry is skipped.
        assert!(entries[1].validated().is_none());
    }

    #[test]
    fn whitespace_only_fields_fail_validation() {
        let entry = ClusterEntry {
            cluster_name: Some("  ".into()),
            base_tier: Some("M30".into()),
            scale_up_tier: Some("M40".into()),
            ..Default::default()
        };
        assert!(entry.validated().is_none());
    }

    #[test]
    fn record_updates_only_the_target_shard() {
        let (_dir, store) = sample_store();
        store
            .record_tier_change("OrdersCluster", 1, "2026-08-27T10:00:00+00:00")
            .unwrap();

        let entries = store.load().unwrap();
        let shards = &entries[0].shards;
        // Sibling shard and entries untouched.
        assert_eq!(
            shards[0].last_tier_update.as_deref(),
            Some("2026-08-01T06:00:00+00:00")
        );
        assert_eq!(
            shards[1].last_tier_update.as_deref(),
            Some("2026-08-27T10:00:00+00:00")
        );
        assert_eq!(entries[0].extra["owner"], "payments-team");
        assert_eq!(entries[1].cluster_name.as_deref(), Some("BrokenEntry"));
    }

    #[test]
    fn record_against_missing_shard_is_a_noop() {
        let (_dir, store) = sample_store();
        let before = store.load().unwrap();
        store
            .record_tier_change("NoSuchCluster", 0, "2026-08-27T10:00:00+00:00")
            .unwrap();
        store
            .record_tier_change("OrdersCluster", 7, "2026-08-27T10:00:00+00:00")
            .unwrap();
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FleetStore::open(dir.path().join("absent.json"));
        assert!(store.load().is_err());
    }
}
