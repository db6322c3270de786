//! Stateless and single-slot services used around the repository.
//!
//! # Responsibility
//! - Detect milestone crossings for a progress step.
//! - Manage the lifetime of the user-facing notification.

pub mod milestone;
pub mod notifier;
