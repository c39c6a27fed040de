//! tierwatch-core — pure decision primitives for the tier watchdog.
//!
//! Everything in this crate is synchronous and free of I/O (the one
//! exception is the thin file wrappers on [`specs::TierSpecTable`] and
//! [`settings::Settings`]). The HTTP and bookkeeping seams live in the
//! `tierwatch-atlas` and `tierwatch-store` crates; the orchestration in
//! `tierwatch-engine`.

pub mod safety;
pub mod settings;
pub mod specs;
pub mod stats;
pub mod tier;

pub use safety::{SafetyThresholds, SafetyVerdict};
pub use settings::Settings;
pub use specs::{TierSpec, TierSpecTable};
pub use stats::{MetricSummary, ShardMetrics};
pub use tier::{tier_ordinal, within_bounds};
