//! The collaborator contract the engine depends on.

use async_trait::async_trait;

use tierwatch_topology::Topology;

use crate::error::AtlasResult;
use crate::types::Process;

/// Everything the decision engine needs from Atlas.
///
/// Implementations are expected to be plain request/response: no retry,
/// no caching. The one deliberate asymmetry is [`get_processes`], which
/// degrades to an empty list on failure instead of erroring — a missing
/// process listing blocks individual shards, not the run.
///
/// [`get_processes`]: AtlasApi::get_processes
#[async_trait]
pub trait AtlasApi: Send + Sync {
    /// Fetch a cluster's replication topology, as-is (not normalized).
    async fn get_cluster_topology(&self, cluster_name: &str) -> AtlasResult<Topology>;

    /// List all processes in the project. Empty on failure.
    async fn get_processes(&self) -> Vec<Process>;

    /// Raw sample series for one metric of one process, nulls preserved.
    async fn get_metric_series(
        &self,
        process_id: &str,
        metric: &str,
        granularity: &str,
        period: &str,
    ) -> AtlasResult<Vec<Option<f64>>>;

    /// Submit a full replacement topology for the cluster in one PATCH.
    async fn patch_cluster_topology(
        &self,
        cluster_name: &str,
        topology: &Topology,
    ) -> AtlasResult<()>;
}
