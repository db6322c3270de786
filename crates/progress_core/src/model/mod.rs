//! Domain model for progress tracks and user-facing notifications.
//!
//! # Responsibility
//! - Define the persisted track shape and its closed vocabularies.
//! - Define the ephemeral notification value object.
//!
//! # Invariants
//! - Every track is identified by a stable `TrackId`.
//! - `progress` and milestone values never exceed `MAX_PROGRESS`.

pub mod notification;
pub mod track;
