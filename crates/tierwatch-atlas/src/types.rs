//! Wire types for the Atlas process and measurement endpoints.

use serde::Deserialize;

/// Measurement identifiers this system pulls for a shard's primary.
pub const METRIC_CPU_USER: &str = "CPU_USER";
pub const METRIC_MEMORY_RESIDENT: &str = "MEMORY_RESIDENT";
pub const METRIC_DISK_IOPS_TOTAL: &str = "DISK_PARTITION_IOPS_TOTAL";
pub const METRIC_CONNECTIONS: &str = "CONNECTIONS";

/// One `mongod`/`mongos` process in a project.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub hostname: String,
    /// Role, e.g. `REPLICA_PRIMARY`, `REPLICA_SECONDARY`,
    /// `SHARD_CONFIG_PRIMARY`.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub replica_set_name: Option<String>,
}

impl Process {
    /// True when Atlas reports this process as a primary.
    pub fn is_primary(&self) -> bool {
        matches!(
            self.type_name.as_deref(),
            Some("REPLICA_PRIMARY" | "SHARD_CONFIG_PRIMARY")
        )
    }
}

/// Paged process listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessesResponse {
    #[serde(default)]
    pub results: Vec<Process>,
}

/// Response of the measurements endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementsResponse {
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// One named series within a measurements response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
}

/// A single sample. `value` is null for gaps in the series.
#[derive(Debug, Default, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl MeasurementsResponse {
    /// Sample values for the named metric, nulls preserved.
    pub fn series(&self, metric: &str) -> Vec<Option<f64>> {
        self.measurements
            .iter()
            .find(|m| m.name == metric)
            .map(|m| m.data_points.iter().map(|p| p.value).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurements_series_extraction() {
        let raw = serde_json::json!({
            "measurements": [{
                "name": "CPU_USER",
                "units": "PERCENT",
                "dataPoints": [
                    {"timestamp": "2026-08-27T09:00:00Z", "value": 12.5},
                    {"timestamp": "2026-08-27T09:01:00Z", "value": null},
                    {"timestamp": "2026-08-27T09:02:00Z", "value": 14.0}
                ]
            }]
        });
        let response: MeasurementsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(
            response.series(METRIC_CPU_USER),
            vec![Some(12.5), None, Some(14.0)]
        );
        assert!(response.series(METRIC_CONNECTIONS).is_empty());
    }

    #[test]
    fn process_primary_roles() {
        let mut process = Process {
            type_name: Some("REPLICA_SECONDARY".into()),
            ..Default::default()
        };
        assert!(!process.is_primary());
        process.type_name = Some("REPLICA_PRIMARY".into());
        assert!(process.is_primary());
        process.type_name = Some("SHARD_CONFIG_PRIMARY".into());
        assert!(process.is_primary());
        process.type_name = None;
        assert!(!process.is_primary());
    }
}
