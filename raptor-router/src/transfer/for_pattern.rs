//! A transfer rule as seen from the pattern it boards.

use super::{TransferConstraint, TransferPointMatcher};
use crate::model::{StopIndex, Trip, TripId};

/// One constrained transfer anchored at a stop position of a target pattern.
///
/// The source endpoint is kept as a matcher, the target endpoint is reduced to
/// an optional trip: the pattern and stop position are implied by where the
/// rule is stored in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferForPattern {
    source_point: TransferPointMatcher,
    target_trip: Option<TripId>,
    constraint: TransferConstraint,
    specificity_rank: u16,
}

impl TransferForPattern {
    pub fn new(
        source_point: TransferPointMatcher,
        target_trip: Option<TripId>,
        constraint: TransferConstraint,
        specificity_rank: u16,
    ) -> Self {
        Self {
            source_point,
            target_trip,
            constraint,
            specificity_rank,
        }
    }

    pub fn source_point(&self) -> &TransferPointMatcher {
        &self.source_point
    }

    pub fn constraint(&self) -> &TransferConstraint {
        &self.constraint
    }

    pub fn specificity_rank(&self) -> u16 {
        self.specificity_rank
    }

    pub fn matches_source_point(&self, stop_index: StopIndex, trip: &Trip) -> bool {
        self.source_point.matches(stop_index, trip)
    }

    /// Returns true if the rule is not limited to one target trip.
    pub fn applies_to_all_target_trips(&self) -> bool {
        self.target_trip.is_none()
    }

    pub fn applies_to_target_trip(&self, trip: &Trip) -> bool {
        self.target_trip.as_ref() == Some(trip.id())
    }
}
