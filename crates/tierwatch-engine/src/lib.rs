//! tierwatch-engine — orchestration of the tier watchdog.
//!
//! Ties the pure decision primitives to the Atlas boundary and the fleet
//! bookkeeping file: the per-shard decision state machine, the staleness
//! and dwell gates it consults, batch submission of eligible reverts,
//! the monitoring sweep/loop, and the manual scale-up pass.

pub mod batch;
pub mod decision;
pub mod gate;
pub mod monitor;
pub mod scale_up;

#[cfg(test)]
pub(crate) mod testutil;

pub use decision::{DecisionEngine, PendingChange, ShardContext, ShardOutcome};
pub use gate::StalenessGate;
pub use monitor::{RunReport, ScaleDownMonitor};
pub use scale_up::{scale_up_fleet, ScaleUpReport};
