//! Milestone crossing detection.
//!
//! # Invariants
//! - Pure: no input is mutated and no state is kept between calls.
//! - First match in sequence order wins, not the lowest or highest value.

use crate::model::track::Milestone;

/// Returns the first milestone crossed by a step from `old_progress` to
/// `new_progress`.
///
/// A milestone is crossed when `old_progress < value <= new_progress`. When
/// a single step crosses several, only the first one in `milestones` order
/// is reported, so a large step can skip reporting intermediate ones.
pub fn evaluate(
    milestones: &[Milestone],
    old_progress: u8,
    new_progress: u8,
) -> Option<&Milestone> {
    milestones
        .iter()
        .find(|milestone| milestone.value > old_progress && milestone.value <= new_progress)
}
