//! tierwatch-topology — the cluster replication-topology document.
//!
//! Atlas models a cluster's replication layout as one document: an ordered
//! sequence of shard specs plus cluster-level metadata. This crate owns
//! the typed view of that document and the three operations the watchdog
//! needs on it:
//!
//! - [`normalize`]: convert either historical region encoding into the
//!   flat `regionConfigs` form, strip server-managed fields, and verify
//!   shard-count invariance, producing a document fit for re-submission.
//! - [`locate`]: bounds-checked shard-index → region/tier/disk lookups.
//! - [`apply_tier_change`]: rewrite one shard's electable hardware for a
//!   target tier, leaving autoscaling bounds untouched.
//!
//! Fields the watchdog does not interpret ride along in `extra` flatten
//! maps so a read-modify-write never loses them.

pub mod error;
pub mod locate;
pub mod mutate;
pub mod normalize;
pub mod types;

pub use error::TopologyError;
pub use mutate::apply_tier_change;
pub use normalize::normalize;
pub use types::*;
