//! Topology normalization for read-modify-write.
//!
//! Atlas returns a superset of what it accepts back on PATCH. Before a
//! topology can be re-submitted, server-managed cluster fields must be
//! stripped and any legacy `regionsConfig` mapping flattened into the
//! `regionConfigs` sequence. Normalization is pure and deterministic, and
//! the shard count must survive it exactly — a mismatch aborts the whole
//! cluster rather than risking a partial topology write.

use crate::error::{TopologyError, TopologyResult};
use crate::types::{RegionConfig, Topology};

/// Cluster-level fields the API rejects (or ignores destructively) on
/// write. This list is a contract with the Atlas API, versioned with the
/// `2024-10-23` document shape; a test pins its exact membership so drift
/// shows up as a diff. A field the server adds later and is not listed
/// here will surface as a rejected write, not be silently passed through.
pub const WRITE_DENY_LIST: [&str; 32] = [
    "id",
    "mongoURI",
    "connectionStrings",
    "stateName",
    "createDate",
    "updateDate",
    "links",
    "groupId",
    "replicationSpec",
    "mongoURIUpdated",
    "mongoURIWithOptions",
    "srvAddress",
    "mongoDBVersion",
    "numShards",
    "name",
    "mongoDBMajorVersion",
    "providerBackupEnabled",
    "pitEnabled",
    "backupEnabled",
    "clusterType",
    "replicationFactor",
    "rootCertType",
    "terminationProtectionEnabled",
    "versionReleaseSystem",
    "diskWarmingMode",
    "encryptionAtRestProvider",
    "globalClusterSelfManagedSharding",
    "labels",
    "biConnector",
    "customOpensslCipherConfigTls13",
    "minimumEnabledTlsProtocol",
    "tlsCipherConfigMode",
];

/// Priority written to legacy regions that declare none.
pub const DEFAULT_REGION_PRIORITY: i64 = 7;

/// Provider name used when cluster-level provider settings are absent.
pub const DEFAULT_PROVIDER: &str = "AWS";

/// Convert a freshly-read topology into canonical, writable form.
///
/// After this call every shard spec uses the flat `regionConfigs`
/// encoding and the document contains no server-managed cluster fields.
/// The number of shard specs is guaranteed unchanged.
pub fn normalize(mut topology: Topology) -> TopologyResult<Topology> {
    let read_count = topology.replication_specs.len();

    let provider = topology
        .provider_settings
        .as_ref()
        .and_then(|p| p.provider_name.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    for spec in &mut topology.replication_specs {
        // Server-assigned shard fields are not valid on write.
        spec.id = None;
        spec.num_shards = None;
        spec.zone_name = None;

        if let Some(regions) = spec.regions_config.take() {
            if spec.region_configs.is_none() {
                let flattened: Vec<RegionConfig> = regions
                    .into_iter()
                    .map(|(region_name, data)| RegionConfig {
                        priority: Some(data.priority.unwrap_or(DEFAULT_REGION_PRIORITY)),
                        region_name: Some(region_name),
                        provider_name: Some(provider.clone()),
                        electable_specs: data.electable_specs,
                        effective_electable_specs: data.effective_electable_specs,
                        analytics_specs: data.analytics_specs,
                        read_only_specs: data.read_only_specs,
                        auto_scaling: data.auto_scaling,
                        extra: Default::default(),
                    })
                    .collect();
                spec.region_configs = Some(flattened);
            }
            // If both encodings were present, the flat one wins and the
            // mapping is dropped either way.
        }
    }

    for field in WRITE_DENY_LIST {
        topology.extra.remove(field);
    }
    // Legacy provider-era cluster fields, superseded by per-region values.
    topology.extra.remove("autoScaling");
    topology.extra.remove("diskSizeGB");
    topology.provider_settings = None;

    let writing_count = topology.replication_specs.len();
    if writing_count != read_count {
        return Err(TopologyError::ShapeMismatch {
            read: read_count,
            writing: writing_count,
        });
    }
    Ok(topology)
}
