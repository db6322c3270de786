//! Track repository: the ordered track collection and its operations.
//!
//! # Responsibility
//! - Own the in-memory track collection for the process.
//! - Apply add/rename/advance/reset/delete operations and persist the
//!   resulting collection through the injected store.
//!
//! # Invariants
//! - Track ids are pairwise distinct. New ids are time-derived and strictly
//!   greater than every id issued or loaded before; once that range is
//!   exhausted the lowest free positive id is used instead.
//! - `progress` stays within `0..=MAX_PROGRESS`.
//! - Insertion order is preserved and is the default display order.
//! - Operations never fail: an unknown id or a rejected add is a no-op and
//!   nothing is written to the store.
//!
//! # See also
//! - `crate::service::milestone` for crossing detection.
//! - `crate::store` for the fail-soft persistence contract.

use crate::clock::{Clock, SystemClock};
use crate::model::notification::Notification;
use crate::model::track::{Category, Tag, Track, TrackId, DEFAULT_TRACK_COLOR, MAX_PROGRESS};
use crate::service::milestone;
use crate::store::kv_store::KeyValueStore;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Fixed store key holding the JSON array of tracks.
pub const TRACKS_STORAGE_KEY: &str = "progressTracks";
/// Progress added by one `advance_progress` call.
pub const PROGRESS_STEP: u8 = 5;

/// Result of `advance_progress`.
#[derive(Debug)]
pub struct AdvanceOutcome<'a> {
    pub tracks: &'a [Track],
    /// Present when the step crossed a milestone.
    pub notification: Option<Notification>,
}

/// Owner of the track collection, constructed once per process.
pub struct TrackRepository<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    tracks: Vec<Track>,
    last_issued_id: TrackId,
}

impl<S: KeyValueStore> TrackRepository<S, SystemClock> {
    /// Loads the persisted collection, or an empty one on first run.
    pub fn open(store: S) -> Self {
        Self::open_with(store, SystemClock, Vec::new())
    }
}

impl<S: KeyValueStore, C: Clock> TrackRepository<S, C> {
    /// Loads the persisted collection, falling back to `seed` when nothing
    /// usable is stored.
    ///
    /// Loaded tracks come back with `is_editing = false`. Entries that do not
    /// decode, fail validation, or repeat an earlier id are dropped one by
    /// one; the rest of the collection is kept.
    pub fn open_with(store: S, clock: C, seed: Vec<Track>) -> Self {
        let stored: Option<Vec<Value>> = store.load_or(TRACKS_STORAGE_KEY, None);
        let loaded = match stored {
            Some(entries) => decode_entries(entries),
            None => seed,
        };
        let tracks = sanitize_loaded(loaded);
        let last_issued_id = tracks.iter().map(|track| track.id).max().unwrap_or(0);
        info!(
            "event=repo_open module=repo status=ok track_count={}",
            tracks.len()
        );

        Self {
            store,
            clock,
            tracks,
            last_issued_id,
        }
    }

    /// Current collection in display order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// Tracks shown for a project filter.
    ///
    /// `None` shows everything. A selection that no longer matches any track
    /// counts as cleared.
    pub fn visible_tracks(&self, selection: Option<TrackId>) -> Vec<&Track> {
        match selection.and_then(|id| self.track(id)) {
            Some(track) => vec![track],
            None => self.tracks.iter().collect(),
        }
    }

    /// Appends a new track named `name.trim()`.
    ///
    /// Returns `None` and changes nothing when the trimmed name is empty or
    /// no unused id is left.
    pub fn add_track(
        &mut self,
        name: &str,
        category: Category,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Option<&Track> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            info!("event=track_add module=repo status=rejected reason=empty_name");
            return None;
        }

        let Some(id) = self.next_id() else {
            warn!("event=track_add module=repo status=rejected reason=ids_exhausted");
            return None;
        };
        self.tracks
            .push(Track::new(id, trimmed, DEFAULT_TRACK_COLOR, category, tags));
        info!(
            "event=track_add module=repo status=ok track_id={} category={} track_count={}",
            id,
            category,
            self.tracks.len()
        );
        self.persist("track_add");
        self.tracks.last()
    }

    /// Sets the name and leaves edit mode. Empty names are accepted here.
    pub fn rename_track(&mut self, id: TrackId, new_name: impl Into<String>) -> &[Track] {
        let Some(index) = self.index_of(id, "track_rename") else {
            return &self.tracks;
        };

        let track = &mut self.tracks[index];
        track.name = new_name.into();
        track.is_editing = false;
        info!("event=track_rename module=repo status=ok track_id={id}");
        self.persist("track_rename");
        &self.tracks
    }

    /// Puts one track into edit mode.
    ///
    /// Other tracks keep their flag, so several can be in edit mode at once.
    pub fn begin_renaming(&mut self, id: TrackId) -> &[Track] {
        let Some(index) = self.index_of(id, "track_begin_rename") else {
            return &self.tracks;
        };

        self.tracks[index].is_editing = true;
        info!("event=track_begin_rename module=repo status=ok track_id={id}");
        self.persist("track_begin_rename");
        &self.tracks
    }

    /// Adds `PROGRESS_STEP`, clamped to `MAX_PROGRESS`, and reports the
    /// first milestone crossed by the step.
    ///
    /// A complete track is left untouched and yields no notification.
    pub fn advance_progress(&mut self, id: TrackId) -> AdvanceOutcome<'_> {
        let Some(index) = self.index_of(id, "track_advance") else {
            return self.unchanged();
        };
        if self.tracks[index].is_complete() {
            info!("event=track_advance module=repo status=noop reason=complete track_id={id}");
            return self.unchanged();
        }

        let now = self.clock.now_epoch_ms();
        let track = &mut self.tracks[index];
        let old_progress = track.progress;
        let new_progress = old_progress.saturating_add(PROGRESS_STEP).min(MAX_PROGRESS);
        let notification = milestone::evaluate(&track.milestones, old_progress, new_progress)
            .map(|reached| {
                Notification::new(
                    format!("{}: Reached {}!", track.name, reached.label),
                    track.color.clone(),
                    now,
                )
            });
        track.progress = new_progress;

        info!(
            "event=track_advance module=repo status=ok track_id={} from={} to={} milestone_reached={}",
            id,
            old_progress,
            new_progress,
            notification.is_some()
        );
        self.persist("track_advance");
        AdvanceOutcome {
            tracks: &self.tracks,
            notification,
        }
    }

    /// Sets progress back to zero. Milestones are not re-fired.
    pub fn reset_progress(&mut self, id: TrackId) -> &[Track] {
        let Some(index) = self.index_of(id, "track_reset") else {
            return &self.tracks;
        };

        self.tracks[index].progress = 0;
        info!("event=track_reset module=repo status=ok track_id={id}");
        self.persist("track_reset");
        &self.tracks
    }

    /// Removes a track permanently.
    pub fn delete_track(&mut self, id: TrackId) -> &[Track] {
        let Some(index) = self.index_of(id, "track_delete") else {
            return &self.tracks;
        };

        self.tracks.remove(index);
        info!(
            "event=track_delete module=repo status=ok track_id={} track_count={}",
            id,
            self.tracks.len()
        );
        self.persist("track_delete");
        &self.tracks
    }

    fn index_of(&self, id: TrackId, event: &str) -> Option<usize> {
        let index = self.tracks.iter().position(|track| track.id == id);
        if index.is_none() {
            info!("event={event} module=repo status=noop reason=not_found track_id={id}");
        }
        index
    }

    fn unchanged(&self) -> AdvanceOutcome<'_> {
        AdvanceOutcome {
            tracks: &self.tracks,
            notification: None,
        }
    }

    fn next_id(&mut self) -> Option<TrackId> {
        match self.last_issued_id.checked_add(1) {
            Some(after_last) => {
                let id = self.clock.now_epoch_ms().max(after_last);
                self.last_issued_id = id;
                Some(id)
            }
            None => {
                let used: HashSet<TrackId> = self.tracks.iter().map(|track| track.id).collect();
                let id = (1..=TrackId::MAX).find(|candidate| !used.contains(candidate));
                warn!(
                    "event=track_add module=repo status=fallback reason=id_overflow track_id={}",
                    id.unwrap_or(0)
                );
                id
            }
        }
    }

    fn persist(&self, event: &str) {
        if !self.store.save(TRACKS_STORAGE_KEY, &self.tracks) {
            warn!(
                "event={event} module=repo status=degraded reason=persist_failed track_count={}",
                self.tracks.len()
            );
        }
    }
}

fn decode_entries(entries: Vec<Value>) -> Vec<Track> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Track>(entry) {
            Ok(track) => Some(track),
            Err(err) => {
                warn!(
                    "event=repo_open module=repo status=dropped reason=undecodable index={index} error={err}"
                );
                None
            }
        })
        .collect()
}

fn sanitize_loaded(loaded: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(loaded.len());
    loaded
        .into_iter()
        .filter_map(|mut track| {
            if let Err(err) = track.validate() {
                warn!("event=repo_open module=repo status=dropped reason=invalid error={err}");
                return None;
            }
            if !seen.insert(track.id) {
                warn!(
                    "event=repo_open module=repo status=dropped reason=duplicate_id track_id={}",
                    track.id
                );
                return None;
            }
            track.is_editing = false;
            Some(track)
        })
        .collect()
}
