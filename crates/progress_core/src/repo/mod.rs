//! Repository layer owning the track collection.
//!
//! # Responsibility
//! - Expose the operation surface callers use to change tracks.
//! - Keep persistence details behind the `KeyValueStore` contract.
//!
//! # Invariants
//! - Every state-changing operation persists the full collection before it
//!   returns.

pub mod track_repo;
