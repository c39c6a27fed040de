//! Shard-index → primary-process matching.
//!
//! Atlas does not expose a direct "primary of shard N" lookup, so the
//! watchdog matches on naming conventions: hostnames embed a fragment of
//! the cluster name, and replica-set names embed `config`/`shard-N`
//! markers. Index 0 designates the config/primary shard in sharded
//! layouts, which is why shard *n* (n > 0) maps to the `shard-(n-1)`
//! replica set.
//!
//! The heuristic is best effort and deliberately confined to this one
//! function. A miss means "cannot verify metrics" and blocks the shard —
//! it never defaults to safe.

use crate::types::Process;

/// Find the process acting as primary for `shard_index` of the cluster.
///
/// A process is a candidate iff its hostname contains the lower-cased
/// cluster name with the literal `"cluster"` substring removed, and its
/// replica-set name matches the shard-index pattern. An explicit primary
/// role wins; otherwise the first candidate; otherwise `None`.
pub fn find_primary_for_shard<'a>(
    processes: &'a [Process],
    cluster_name: &str,
    shard_index: usize,
) -> Option<&'a Process> {
    let fragment = cluster_name.to_lowercase().replace("cluster", "");
    let mut first_candidate = None;

    for process in processes {
        if !process.hostname.to_lowercase().contains(&fragment) {
            continue;
        }
        let replica_set = process
            .replica_set_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let matched = if shard_index == 0 {
            replica_set.contains("config") || replica_set.contains("shard-0")
        } else {
            replica_set.contains(&format!("shard-{}", shard_index - 1))
        };
        if !matched {
            continue;
        }
        if process.is_primary() {
            return Some(process);
        }
        if first_candidate.is_none() {
            first_candidate = Some(process);
        }
    }
    first_candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(hostname: &str, replica_set: &str, type_name: &str) -> Process {
        Process {
            id: Some(format!("{hostname}:27017")),
            hostname: hostname.to_string(),
            type_name: Some(type_name.to_string()),
            replica_set_name: Some(replica_set.to_string()),
        }
    }

    fn fleet() -> Vec<Process> {
        vec![
            process(
                "orders-shard-00-00.abcde.mongodb.net",
                "atlas-xyz-config-0",
                "SHARD_CONFIG_PRIMARY",
            ),
            process(
                "orders-shard-01-00.abcde.mongodb.net",
                "atlas-xyz-shard-0",
                "REPLICA_SECONDARY",
            ),
            process(
                "orders-shard-01-01.abcde.mongodb.net",
                "atlas-xyz-shard-0",
                "REPLICA_PRIMARY",
            ),
            process(
                "other-app-00-00.abcde.mongodb.net",
                "atlas-qqq-shard-0",
                "REPLICA_PRIMARY",
            ),
        ]
    }

    #[test]
    fn shard_zero_matches_config_server() {
        let processes = fleet();
        let found = find_primary_for_shard(&processes, "OrdersCluster", 0).unwrap();
        assert!(found.hostname.starts_with("orders-shard-00"));
        assert_eq!(found.type_name.as_deref(), Some("SHARD_CONFIG_PRIMARY"));
    }

    #[test]
    fn shard_n_maps_to_replica_set_n_minus_one() {
        let processes = fleet();
        let found = find_primary_for_shard(&processes, "OrdersCluster", 1).unwrap();
        assert_eq!(found.replica_set_name.as_deref(), Some("atlas-xyz-shard-0"));
        // The explicit primary beats the earlier secondary.
        assert_eq!(found.type_name.as_deref(), Some("REPLICA_PRIMARY"));
    }

    #[test]
    fn hostname_must_contain_cluster_fragment() {
        let processes = fleet();
        // "other-app" hosts never match the "orders" fragment.
        let found = find_primary_for_shard(&processes, "OrdersCluster", 1).unwrap();
        assert!(!found.hostname.starts_with("other-app"));
        assert!(find_primary_for_shard(&processes, "PaymentsCluster", 1).is_none());
    }

    #[test]
    fn falls_back_to_first_candidate_without_explicit_primary() {
        let processes = vec![
            process(
                "orders-shard-01-00.abcde.mongodb.net",
                "atlas-xyz-shard-0",
                "REPLICA_SECONDARY",
            ),
            process(
                "orders-shard-01-01.abcde.mongodb.net",
                "atlas-xyz-shard-0",
                "REPLICA_SECONDARY",
            ),
        ];
        let found = find_primary_for_shard(&processes, "OrdersCluster", 1).unwrap();
        assert!(found.hostname.contains("01-00"));
    }

    #[test]
    fn no_match_is_none() {
        let processes = fleet();
        assert!(find_primary_for_shard(&processes, "OrdersCluster", 9).is_none());
        assert!(find_primary_for_shard(&[], "OrdersCluster", 0).is_none());
    }
}
