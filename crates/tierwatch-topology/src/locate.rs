//! Shard-index lookups over a normalized topology.
//!
//! All lookups expect the flat `regionConfigs` encoding, i.e. a document
//! that has been through [`crate::normalize`]. Out-of-range indices and
//! missing substructure return `None`; callers decide whether that blocks
//! a shard or the whole cluster.

use crate::types::{RegionConfig, Topology};

/// The shard's first (effective) region config, if the index is valid.
pub fn region_config(topology: &Topology, shard_index: usize) -> Option<&RegionConfig> {
    topology
        .replication_specs
        .get(shard_index)?
        .region_configs
        .as_ref()?
        .first()
}

/// Mutable variant of [`region_config`].
pub fn region_config_mut(topology: &mut Topology, shard_index: usize) -> Option<&mut RegionConfig> {
    topology
        .replication_specs
        .get_mut(shard_index)?
        .region_configs
        .as_mut()?
        .first_mut()
}

/// The tier a shard is actually running at, per the API-reported live
/// hardware. `electableSpecs` holds the *requested* size and can lag
/// behind an in-flight autoscale, so only the effective specs count.
pub fn shard_tier(topology: &Topology, shard_index: usize) -> Option<&str> {
    region_config(topology, shard_index)?
        .effective_electable_specs
        .as_ref()?
        .instance_size
        .as_deref()
}

/// The live disk size for a shard, falling back to `default_gb` when the
/// API does not report one.
pub fn effective_disk_size(topology: &Topology, shard_index: usize, default_gb: f64) -> f64 {
    region_config(topology, shard_index)
        .and_then(|region| region.effective_electable_specs.as_ref())
        .and_then(|specs| specs.disk_size_gb)
        .unwrap_or(default_gb)
}

/// The *requested* disk size for a shard (from `electableSpecs`), falling
/// back to `default_gb`. Used by the scale-up path, which runs before any
/// effective values could differ.
pub fn requested_disk_size(topology: &Topology, shard_index: usize, default_gb: f64) -> f64 {
    region_config(topology, shard_index)
        .and_then(|region| region.electable_specs.as_ref())
        .and_then(|specs| specs.disk_size_gb)
        .unwrap_or(default_gb)
}
