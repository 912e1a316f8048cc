//! Result of a constrained boarding search.

use std::sync::Arc;

use super::TransferConstraint;
use crate::model::{StopIndex, TripSchedule};
use crate::time::Time;

/// A trip selected for boarding by a transfer rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstrainedBoarding {
    pub trip_index: usize,
    pub trip: Arc<TripSchedule>,
    pub stop_position: usize,
    pub stop_index: StopIndex,
    /// Board time of the trip (arrival time in a reverse search).
    pub time: Time,
    pub earliest_board_time: Time,
    pub constraint: TransferConstraint,
}

/// Outcome of [`find`](super::ConstrainedTransferBoarding::find).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardingEvent {
    /// No constrained boarding here. The caller falls back to a regular
    /// trip search from `earliest_board_time`.
    Empty { earliest_board_time: Time },
    Board(ConstrainedBoarding),
}

impl BoardingEvent {
    pub fn empty(earliest_board_time: Time) -> Self {
        BoardingEvent::Empty {
            earliest_board_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BoardingEvent::Empty { .. })
    }

    pub fn boarding(&self) -> Option<&ConstrainedBoarding> {
        match self {
            BoardingEvent::Board(b) => Some(b),
            BoardingEvent::Empty { .. } => None,
        }
    }

    pub fn earliest_board_time(&self) -> Time {
        match self {
            BoardingEvent::Empty {
                earliest_board_time,
            } => *earliest_board_time,
            BoardingEvent::Board(b) => b.earliest_board_time,
        }
    }

    /// The constraint applied, regular if nothing was found.
    pub fn transfer_constraint(&self) -> &TransferConstraint {
        match self {
            BoardingEvent::Board(b) => &b.constraint,
            BoardingEvent::Empty { .. } => &TransferConstraint::REGULAR,
        }
    }

    /// Returns true if a rule forbids every trip of the pattern here. The
    /// caller must not board the pattern from this source trip.
    pub fn is_transfer_blocked(&self) -> bool {
        self.transfer_constraint().is_not_allowed()
    }
}
