//! reqwest-backed Atlas API client.
//!
//! Uses the versioned v2 API for cluster documents (the version pin in
//! the media type must match the topology deny-list's contract version)
//! and the v1.0 API for processes and measurements, as the measurement
//! endpoints were never carried over to v2.

use async_trait::async_trait;
use tracing::{debug, warn};

use tierwatch_topology::Topology;

use crate::api::AtlasApi;
use crate::error::{AtlasError, AtlasResult};
use crate::types::{MeasurementsResponse, Process, ProcessesResponse};

pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com";

/// Media type pinning the v2 cluster document shape.
const V2_MEDIA_TYPE: &str = "application/vnd.atlas.2024-10-23+json";

/// Atlas HTTP client for one project.
#[derive(Debug, Clone)]
pub struct AtlasClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

impl AtlasClient {
    /// Client for `project_id`, authenticating with a service-account
    /// bearer token.
    pub fn new(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Override the API base URL (testing against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn cluster_url(&self, cluster_name: &str) -> String {
        format!(
            "{}/api/atlas/v2/groups/{}/clusters/{}",
            self.base_url, self.project_id, cluster_name
        )
    }
}

#[async_trait]
impl AtlasApi for AtlasClient {
    async fn get_cluster_topology(&self, cluster_name: &str) -> AtlasResult<Topology> {
        let response = self
            .http
            .get(self.cluster_url(cluster_name))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, V2_MEDIA_TYPE)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AtlasError::NotFound(cluster_name.to_string()));
        }
        let topology = response.error_for_status()?.json::<Topology>().await?;
        debug!(
            cluster = cluster_name,
            shards = topology.replication_specs.len(),
            "fetched cluster topology"
        );
        Ok(topology)
    }

    async fn get_processes(&self) -> Vec<Process> {
        let url = format!(
            "{}/api/atlas/v1.0/groups/{}/processes",
            self.base_url, self.project_id
        );
        let result = async {
            self.http
                .get(&url)
                .bearer_auth(&self.access_token)
                .send()
                .await?
                .error_for_status()?
                .json::<ProcessesResponse>()
                .await
        }
        .await;

        match result {
            Ok(response) => response.results,
            Err(error) => {
                warn!(%error, "process listing failed; treating as empty");
                Vec::new()
            }
        }
    }

    async fn get_metric_series(
        &self,
        process_id: &str,
        metric: &str,
        granularity: &str,
        period: &str,
    ) -> AtlasResult<Vec<Option<f64>>> {
        let url = format!(
            "{}/api/atlas/v1.0/groups/{}/processes/{}/measurements",
            self.base_url, self.project_id, process_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("granularity", granularity), ("period", period), ("m", metric)])
            .send()
            .await?
            .error_for_status()?
            .json::<MeasurementsResponse>()
            .await?;
        Ok(response.series(metric))
    }

    async fn patch_cluster_topology(
        &self,
        cluster_name: &str,
        topology: &Topology,
    ) -> AtlasResult<()> {
        let response = self
            .http
            .patch(self.cluster_url(cluster_name))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, V2_MEDIA_TYPE)
            .header(reqwest::header::CONTENT_TYPE, V2_MEDIA_TYPE)
            .json(topology)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(cluster = cluster_name, "topology mutation accepted");
            return Ok(());
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AtlasError::NotFound(cluster_name.to_string()));
        }
        if status.is_client_error() {
            // The server refused the document we constructed — most
            // likely a read-only field outside the deny list.
            let body = response.text().await.unwrap_or_default();
            return Err(AtlasError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Err(AtlasError::Status(status.as_u16()))
    }
}
