//! Tier-change mutation for a single shard.

use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::locate;
use crate::types::Topology;

/// Volume type written on every tier change; provisioned-IOPS volumes are
/// dropped back to the platform default for the new tier.
pub const STANDARD_VOLUME_TYPE: &str = "STANDARD";

/// Rewrite one shard's electable hardware for `target_tier`.
///
/// Sets the instance size, pins the node count, carries the preserved
/// disk size (truncated to whole GB — the API rejects fractional sizes),
/// clears any explicit IOPS override, and resets the volume type. The
/// shard's `autoScaling` block is deliberately left alone: bounds remain
/// exactly as configured in Atlas.
///
/// Idempotent: applying the same change twice leaves the same document.
pub fn apply_tier_change(
    topology: &mut Topology,
    shard_index: usize,
    target_tier: &str,
    disk_size_gb: f64,
    node_count: u32,
) -> TopologyResult<()> {
    let region = locate::region_config_mut(topology, shard_index)
        .ok_or(TopologyError::NoRegionConfig { shard_index })?;
    let specs = region
        .electable_specs
        .as_mut()
        .ok_or(TopologyError::MissingSpecs { shard_index })?;

    specs.instance_size = Some(target_tier.to_string());
    specs.node_count = Some(node_count);
    specs.disk_size_gb = Some(disk_size_gb.trunc());
    specs.disk_iops = None;
    specs.ebs_volume_type = Some(STANDARD_VOLUME_TYPE.to_string());

    debug!(shard_index, target_tier, disk_size_gb, "tier change applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn one_shard_topology() -> Topology {
        Topology {
            replication_specs: vec![ShardSpec {
                region_configs: Some(vec![RegionConfig {
                    electable_specs: Some(HardwareSpec {
                        instance_size: Some("M40".into()),
                        node_count: Some(3),
                        disk_size_gb: Some(120.0),
                        disk_iops: Some(3000),
                        ebs_volume_type: Some("PROVISIONED".into()),
                        ..Default::default()
                    }),
                    auto_scaling: Some(AutoScaling {
                        compute: Some(ComputeBounds {
                            min_instance_size: Some("M30".into()),
                            max_instance_size: Some("M50".into()),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn rewrites_electable_specs() {
        let mut topology = one_shard_topology();
        apply_tier_change(&mut topology, 0, "M30", 120.7, 3).unwrap();

        let specs = topology.replication_specs[0].region_configs.as_ref().unwrap()[0]
            .electable_specs
            .as_ref()
            .unwrap();
        assert_eq!(specs.instance_size.as_deref(), Some("M30"));
        assert_eq!(specs.node_count, Some(3));
        assert_eq!(specs.disk_size_gb, Some(120.0));
        assert_eq!(specs.disk_iops, None);
        assert_eq!(specs.ebs_volume_type.as_deref(), Some(STANDARD_VOLUME_TYPE));
    }

    #[test]
    fn autoscaling_bounds_are_untouched() {
        let mut topology = one_shard_topology();
        let before = topology.replication_specs[0].region_configs.as_ref().unwrap()[0]
            .auto_scaling
            .clone();
        apply_tier_change(&mut topology, 0, "M30", 120.0, 3).unwrap();
        let after = &topology.replication_specs[0].region_configs.as_ref().unwrap()[0].auto_scaling;
        assert_eq!(*after, before);
    }

    #[test]
    fn is_idempotent() {
        let mut once = one_shard_topology();
        apply_tier_change(&mut once, 0, "M30", 120.0, 3).unwrap();
        let mut twice = once.clone();
        apply_tier_change(&mut twice, 0, "M30", 120.0, 3).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_region_and_specs_are_distinct_errors() {
        let mut topology = one_shard_topology();
        assert_eq!(
            apply_tier_change(&mut topology, 5, "M30", 80.0, 3),
            Err(TopologyError::NoRegionConfig { shard_index: 5 })
        );

        topology.replication_specs[0]
            .region_configs
            .as_mut()
            .unwrap()[0]
            .electable_specs = None;
        assert_eq!(
            apply_tier_change(&mut topology, 0, "M30", 80.0, 3),
            Err(TopologyError::MissingSpecs { shard_index: 0 })
        );
    }
}
