//! Typed view of the Atlas cluster topology document.
//!
//! Only the fields the watchdog reads or rewrites are typed; everything
//! else is carried in `extra` flatten maps and round-tripped verbatim.
//! Wire names are camelCase throughout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A cluster's full replication configuration.
///
/// `replication_specs` is index-significant: entry order identifies
/// shards and must never change between read and write.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(default)]
    pub replication_specs: Vec<ShardSpec>,
    /// Legacy cluster-level provider settings; read for the provider name
    /// when flattening legacy regions, then stripped before write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_settings: Option<ProviderSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry in the replication sequence — one shard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShardSpec {
    /// Server-assigned identifier; not valid on write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_shards: Option<u32>,
    /// The flat region encoding. After normalization this is the only
    /// encoding downstream code ever sees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_configs: Option<Vec<RegionConfig>>,
    /// The legacy mapping encoding (region name → region data), seen on
    /// clusters created against older API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions_config: Option<BTreeMap<String, LegacyRegionData>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A shard's configuration within one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// The requested hardware for electable nodes — what a mutation
    /// rewrites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electable_specs: Option<HardwareSpec>,
    /// The live hardware as reported by Atlas. Read-only: the current
    /// tier and disk size are read from here, never written here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_electable_specs: Option<HardwareSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics_specs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_specs: Option<Value>,
    /// Autoscaling bounds. Read to validate the base/scale-up pair;
    /// never rewritten by this system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scaling: Option<AutoScaling>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hardware shape of a node group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_iops: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Region autoscaling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoScaling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeBounds>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Instance-size bounds for compute autoscaling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_instance_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_instance_size: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Region data in the legacy mapping encoding.
///
/// Only the fields the flat form inherits are kept; anything else in a
/// legacy region entry is dropped on normalization, matching the API's
/// own migration behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRegionData {
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub electable_specs: Option<HardwareSpec>,
    #[serde(default)]
    pub effective_electable_specs: Option<HardwareSpec>,
    #[serde(default)]
    pub analytics_specs: Option<Value>,
    #[serde(default)]
    pub read_only_specs: Option<Value>,
    #[serde(default)]
    pub auto_scaling: Option<AutoScaling>,
}

/// Legacy cluster-level provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComputeBounds {
    /// Both bounds, when both are configured and non-empty.
    pub fn min_max(&self) -> Option<(&str, &str)> {
        match (self.min_instance_size.as_deref(), self.max_instance_size.as_deref()) {
            (Some(min), Some(max)) if !min.is_empty() && !max.is_empty() => Some((min, max)),
            _ => None,
        }
    }
}
