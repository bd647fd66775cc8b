//! Domain layer for the deployer: the node registry operations used by `web`,
//! and translation of lower-layer errors into domain errors.
//!
//! Items from `entity_api` are re-exported here so that `web` never depends on
//! `entity_api` directly.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{nodes, Id};

pub mod error;
pub mod node;
