//! Core engine for the progress tracker.
//! This crate is the single source of truth for track invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::notification::{Notification, NOTIFICATION_LIFETIME_MS};
pub use model::track::{
    default_milestones, starter_tracks, Category, Milestone, Tag, Track, TrackId,
    TrackValidationError, VocabularyError, DEFAULT_TRACK_COLOR, MAX_PROGRESS,
};
pub use repo::track_repo::{AdvanceOutcome, TrackRepository, PROGRESS_STEP, TRACKS_STORAGE_KEY};
pub use service::milestone::evaluate as evaluate_milestone;
pub use service::notifier::{Countdown, NotificationEmitter};
pub use store::kv_store::{KeyValueStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
