//! tierwatch-store — the fleet bookkeeping file.
//!
//! A flat JSON array describing which clusters the watchdog manages
//! (base/scale-up tier pair, shard list) and, per shard, when this tool
//! last observed a tier change. This is the only state that outlives a
//! run. It is keyed by (cluster name, shard index) and rewritten with a
//! read-modify-write on every timestamp update; fields and entries the
//! watchdog does not understand are preserved verbatim.

pub mod error;
pub mod fleet;

pub use error::{StoreError, StoreResult};
pub use fleet::{ClusterEntry, FleetStore, ShardEntry, ValidClusterEntry, ValidShardEntry};
