//! Track domain model.
//!
//! # Responsibility
//! - Define the canonical record for one progress-tracked project.
//! - Define the closed category and tag vocabularies and their parsing.
//!
//! # Invariants
//! - `id` is stable and never reused for another track.
//! - `progress` stays within `0..=MAX_PROGRESS`.
//! - `milestones` are fixed at creation and never mutated afterwards.
//! - `tags` cannot hold duplicates.
//!
//! # See also
//! - `crate::repo::track_repo` for the operations that mutate tracks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier derived from creation time (Unix epoch milliseconds).
pub type TrackId = i64;

/// Upper bound for `progress` and milestone values.
pub const MAX_PROGRESS: u8 = 100;
/// Completion ceiling assigned to newly created tracks.
pub const DEFAULT_TARGET: u32 = 100;

/// Bar color given to every newly created track.
pub const DEFAULT_TRACK_COLOR: &str = "#0F7B6C";

/// Project category. Serialized with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Learning,
    Health,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Learning,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Learning => "Learning",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }

    /// Parses a display name. Matching is exact after trimming.
    pub fn parse(raw: &str) -> Result<Self, VocabularyError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .ok_or_else(|| VocabularyError::UnknownCategory(trimmed.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project label. Serialized with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Priority,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Long Term")]
    LongTerm,
    #[serde(rename = "Quick Win")]
    QuickWin,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Priority,
        Tag::InProgress,
        Tag::OnHold,
        Tag::LongTerm,
        Tag::QuickWin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::LongTerm => "Long Term",
            Self::QuickWin => "Quick Win",
        }
    }

    /// Parses a display name. Matching is exact after trimming.
    pub fn parse(raw: &str) -> Result<Self, VocabularyError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == trimmed)
            .ok_or_else(|| VocabularyError::UnknownTag(trimmed.to_string()))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text outside the allowed category/tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    UnknownCategory(String),
    UnknownTag(String),
}

impl Display for VocabularyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`; expected one of {}",
                join_names(Category::ALL.iter().map(|c| c.as_str()))
            ),
            Self::UnknownTag(value) => write!(
                f,
                "unknown tag `{value}`; expected one of {}",
                join_names(Tag::ALL.iter().map(|t| t.as_str()))
            ),
        }
    }
}

impl Error for VocabularyError {}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join("|")
}

/// Percentage checkpoint on a track's progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub value: u8,
    pub label: String,
}

impl Milestone {
    pub fn new(value: u8, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Ladder assigned to every newly created track.
pub fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new(25, "Start"),
        Milestone::new(50, "Halfway"),
        Milestone::new(75, "Almost There"),
        Milestone::new(100, "Complete"),
    ]
}

/// Demo track set shown on first run, before anything has been saved.
pub fn starter_tracks() -> Vec<Track> {
    vec![Track {
        id: 1,
        name: "Project 1".to_string(),
        color: DEFAULT_TRACK_COLOR.to_string(),
        target: 80,
        category: Category::Work,
        tags: BTreeSet::new(),
        progress: 0,
        is_editing: false,
        milestones: vec![
            Milestone::new(25, "Planning"),
            Milestone::new(50, "Development"),
            Milestone::new(75, "Testing"),
            Milestone::new(100, "Launch"),
        ],
    }]
}

/// One progress-tracked project.
///
/// Serialized with camelCase keys; fields missing from older saved data
/// fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    /// Display-only completion ceiling.
    #[serde(default = "default_target")]
    pub target: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub progress: u8,
    /// Transient UI flag. Forced to `false` on load.
    #[serde(default)]
    pub is_editing: bool,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

fn default_target() -> u32 {
    DEFAULT_TARGET
}

impl Track {
    /// Creates a fresh track with zero progress and the default ladder.
    ///
    /// Does not trim or validate `name`; the repository owns that contract.
    pub fn new(
        id: TrackId,
        name: impl Into<String>,
        color: impl Into<String>,
        category: Category,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            target: DEFAULT_TARGET,
            category,
            tags: tags.into_iter().collect(),
            progress: 0,
            is_editing: false,
            milestones: default_milestones(),
        }
    }

    /// Adds a tag. Returns `false` when it was already present.
    pub fn insert_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    /// Removes a tag. Returns `false` when it was absent.
    pub fn remove_tag(&mut self, tag: Tag) -> bool {
        self.tags.remove(&tag)
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= MAX_PROGRESS
    }

    /// Checks the numeric range invariants.
    pub fn validate(&self) -> Result<(), TrackValidationError> {
        if self.progress > MAX_PROGRESS {
            return Err(TrackValidationError::ProgressOutOfRange {
                id: self.id,
                progress: self.progress,
            });
        }
        if let Some(milestone) = self.milestones.iter().find(|m| m.value > MAX_PROGRESS) {
            return Err(TrackValidationError::MilestoneOutOfRange {
                id: self.id,
                value: milestone.value,
            });
        }
        Ok(())
    }
}

/// Range violation found on a persisted or constructed track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackValidationError {
    ProgressOutOfRange { id: TrackId, progress: u8 },
    MilestoneOutOfRange { id: TrackId, value: u8 },
}

impl Display for TrackValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProgressOutOfRange { id, progress } => write!(
                f,
                "track {id} has progress {progress}, expected 0..={MAX_PROGRESS}"
            ),
            Self::MilestoneOutOfRange { id, value } => write!(
                f,
                "track {id} has milestone value {value}, expected 0..={MAX_PROGRESS}"
            ),
        }
    }
}

impl Error for TrackValidationError {}
