//! tierwatch-atlas — the MongoDB Atlas collaborator boundary.
//!
//! The engine talks to Atlas only through the [`AtlasApi`] trait; the
//! reqwest-backed [`AtlasClient`] is its production implementation and
//! tests substitute mocks. Authentication is a ready service-account
//! bearer token — credential exchange and retry policy are outside this
//! system's scope.

pub mod api;
pub mod client;
pub mod error;
pub mod process;
pub mod types;

pub use api::AtlasApi;
pub use client::AtlasClient;
pub use error::{AtlasError, AtlasResult};
pub use process::find_primary_for_shard;
pub use types::*;
