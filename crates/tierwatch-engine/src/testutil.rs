//! Shared test doubles and fixtures for the engine crate.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use tierwatch_atlas::{
    AtlasApi, AtlasError, AtlasResult, Process, METRIC_CONNECTIONS, METRIC_CPU_USER,
    METRIC_DISK_IOPS_TOTAL, METRIC_MEMORY_RESIDENT,
};
use tierwatch_core::settings::RunSettings;
use tierwatch_core::specs::{TierSpec, TierSpecTable};
use tierwatch_topology::{
    AutoScaling, ComputeBounds, HardwareSpec, RegionConfig, ShardSpec, Topology,
};

pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// In-memory [`AtlasApi`] double. Builder methods layer behavior onto a
/// seeded topology; every PATCH body is captured for assertion.
pub struct MockAtlas {
    topology: Mutex<Topology>,
    pub processes: Vec<Process>,
    series: HashMap<&'static str, Vec<Option<f64>>>,
    fail_topology: bool,
    fail_metrics: bool,
    reject_patch: bool,
    pub patches: Mutex<Vec<(String, Topology)>>,
}

impl MockAtlas {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology: Mutex::new(topology),
            processes: Vec::new(),
            series: HashMap::new(),
            fail_topology: false,
            fail_metrics: false,
            reject_patch: false,
            patches: Mutex::new(Vec::new()),
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology.lock().unwrap().clone()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.lock().unwrap().len()
    }

    /// Primary processes for the given shard indices of "OrdersCluster",
    /// named so the shard locator heuristic finds them.
    pub fn with_shard_processes(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        for index in indices {
            let (host_part, replica_set) = if index == 0 {
                ("shard-00".to_string(), "atlas-xyz-config-0".to_string())
            } else {
                (format!("shard-{index:02}"), format!("atlas-xyz-shard-{}", index - 1))
            };
            self.processes.push(Process {
                id: Some(format!("orders-{host_part}-00.abcde.mongodb.net:27017")),
                hostname: format!("orders-{host_part}-00.abcde.mongodb.net"),
                type_name: Some("REPLICA_PRIMARY".into()),
                replica_set_name: Some(replica_set),
            });
        }
        self
    }

    /// All four series well under the default thresholds.
    pub fn with_quiet_metrics(mut self) -> Self {
        self.series.insert(METRIC_CPU_USER, flat(20.0));
        self.series.insert(METRIC_MEMORY_RESIDENT, flat(25.6 * GIB)); // 40% of M40's 64GB
        self.series.insert(METRIC_DISK_IOPS_TOTAL, flat(500.0));
        self.series.insert(METRIC_CONNECTIONS, flat(200.0));
        self
    }

    /// CPU and memory both over their margins.
    pub fn with_busy_metrics(mut self) -> Self {
        self.series.insert(METRIC_CPU_USER, flat(80.0));
        self.series.insert(METRIC_MEMORY_RESIDENT, flat(50.0 * GIB));
        self.series.insert(METRIC_DISK_IOPS_TOTAL, flat(500.0));
        self.series.insert(METRIC_CONNECTIONS, flat(200.0));
        self
    }

    pub fn with_series(mut self, metric: &'static str, samples: Vec<Option<f64>>) -> Self {
        self.series.insert(metric, samples);
        self
    }

    pub fn failing_topology(mut self) -> Self {
        self.fail_topology = true;
        self
    }

    pub fn failing_metrics(mut self) -> Self {
        self.fail_metrics = true;
        self
    }

    pub fn rejecting_patches(mut self) -> Self {
        self.reject_patch = true;
        self
    }
}

#[async_trait]
impl AtlasApi for MockAtlas {
    async fn get_cluster_topology(&self, cluster_name: &str) -> AtlasResult<Topology> {
        if self.fail_topology {
            return Err(AtlasError::NotFound(cluster_name.to_string()));
        }
        Ok(self.topology())
    }

    async fn get_processes(&self) -> Vec<Process> {
        self.processes.clone()
    }

    async fn get_metric_series(
        &self,
        _process_id: &str,
        metric: &str,
        _granularity: &str,
        _period: &str,
    ) -> AtlasResult<Vec<Option<f64>>> {
        if self.fail_metrics {
            return Err(AtlasError::Status(503));
        }
        Ok(self.series.get(metric).cloned().unwrap_or_default())
    }

    async fn patch_cluster_topology(
        &self,
        cluster_name: &str,
        topology: &Topology,
    ) -> AtlasResult<()> {
        if self.reject_patch {
            return Err(AtlasError::Rejected {
                status: 400,
                body: "INVALID_ATTRIBUTE".to_string(),
            });
        }
        self.patches
            .lock()
            .unwrap()
            .push((cluster_name.to_string(), topology.clone()));
        *self.topology.lock().unwrap() = topology.clone();
        Ok(())
    }
}

fn flat(value: f64) -> Vec<Option<f64>> {
    vec![Some(value); 10]
}

fn shard(effective_tier: &str) -> ShardSpec {
    ShardSpec {
        id: Some("abc123".into()),
        num_shards: Some(1),
        region_configs: Some(vec![RegionConfig {
            priority: Some(7),
            region_name: Some("EU_WEST_1".into()),
            provider_name: Some("AWS".into()),
            electable_specs: Some(HardwareSpec {
                instance_size: Some(effective_tier.to_string()),
                node_count: Some(3),
                disk_size_gb: Some(100.0),
                ..Default::default()
            }),
            effective_electable_specs: Some(HardwareSpec {
                instance_size: Some(effective_tier.to_string()),
                disk_size_gb: Some(120.0),
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
    }
}

/// A two-shard cluster document in the flat region encoding, with
/// autoscale bounds M30..M50 and a 120GB live disk on every shard.
pub fn two_shard_topology(tier0: &str, tier1: &str) -> Topology {
    Topology {
        replication_specs: vec![shard(tier0), shard(tier1)],
        ..Default::default()
    }
}

pub fn test_specs() -> TierSpecTable {
    let mut table = TierSpecTable::new();
    table.insert(
        "M30",
        TierSpec {
            ram_gb: 8.0,
            max_connections: 3000,
            max_iops: 3000,
        },
    );
    table.insert(
        "M40",
        TierSpec {
            ram_gb: 64.0,
            max_connections: 6000,
            max_iops: 6000,
        },
    );
    table
}

pub fn test_settings() -> RunSettings {
    RunSettings::default()
}

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
}
