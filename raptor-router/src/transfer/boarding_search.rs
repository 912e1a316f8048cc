//! Find the trip to board when a constrained transfer applies.
//!
//! The router calls [`transfer_exists_at_target`] for every stop position
//! where it may board a pattern, and only if that returns true it calls
//! [`find`] with the trip it arrived on. The search scans the pattern's trips
//! in search order and returns the first one a matching rule licenses.
//!
//! [`transfer_exists_at_target`]: ConstrainedTransferBoarding::transfer_exists_at_target
//! [`find`]: ConstrainedTransferBoarding::find

use tracing::trace;

use super::{
    BoardingEvent, ConstrainedBoarding, ConstrainedTransfersForPatterns, TransferConstraint,
    TransferForPattern, TransferForPatternByStopPos,
};
use crate::direction::SearchDirection;
use crate::model::{StopIndex, Timetable, TripSchedule};
use crate::time::{Seconds, Time};

/// Rules are written relative to "the next trip". If none of the first
/// reachable trips is licensed, the rest are not examined.
pub const ABORT_SEARCH_AFTER_N_VALID_NORMAL_TRIPS: usize = 5;

/// Constrained boarding for one pattern in one search direction.
pub trait ConstrainedTransferBoarding {
    /// Returns true if a rule is anchored where the pattern is boarded at
    /// `stop_pos`. Must be called before [`find`](Self::find) for that
    /// position.
    fn transfer_exists_at_target(&mut self, stop_pos: usize) -> bool;

    /// Returns true if a rule is anchored where the pattern is left at
    /// `stop_pos`.
    fn transfer_exists_at_source(&self, stop_pos: usize) -> bool;

    /// Find the trip to board at the position last passed to
    /// [`transfer_exists_at_target`](Self::transfer_exists_at_target).
    ///
    /// `prev_transit_arrival_time` is when the source trip reached
    /// `source_stop_index`, `earliest_board_time` is the regular earliest
    /// boarding time with all slack applied.
    fn find(
        &self,
        timetable: &dyn Timetable,
        transfer_slack: Seconds,
        source_trip: &TripSchedule,
        source_stop_index: StopIndex,
        prev_transit_arrival_time: Time,
        earliest_board_time: Time,
    ) -> BoardingEvent;
}

/// Boarding search over the constrained-transfer index.
///
/// Holds the target position between `transfer_exists_at_target` and `find`,
/// so one instance serves one search thread.
#[derive(Debug, Clone)]
pub struct ConstrainedBoardingSearch<'a> {
    direction: SearchDirection,
    target: Option<&'a TransferForPatternByStopPos>,
    source: Option<&'a TransferForPatternByStopPos>,
    min_transfer_time_is_definitive: bool,
    current: Option<(usize, &'a [TransferForPattern])>,
}

impl<'a> ConstrainedBoardingSearch<'a> {
    /// Boarding search for `pattern`. A forward search boards on arriving
    /// transfers, a reverse search on departing transfers.
    pub fn new(
        direction: SearchDirection,
        transfers: &'a ConstrainedTransfersForPatterns,
        pattern: usize,
    ) -> Self {
        let (target, source) = match direction {
            SearchDirection::Forward => (transfers.to_stop(pattern), transfers.from_stop(pattern)),
            SearchDirection::Reverse => (transfers.from_stop(pattern), transfers.to_stop(pattern)),
        };
        Self::with_indexes(direction, target, source)
            .min_transfer_time_is_definitive(transfers.min_transfer_time_is_definitive())
    }

    pub fn with_indexes(
        direction: SearchDirection,
        target: Option<&'a TransferForPatternByStopPos>,
        source: Option<&'a TransferForPatternByStopPos>,
    ) -> Self {
        Self {
            direction,
            target,
            source,
            min_transfer_time_is_definitive: false,
            current: None,
        }
    }

    pub fn min_transfer_time_is_definitive(mut self, definitive: bool) -> Self {
        self.min_transfer_time_is_definitive = definitive;
        self
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// First rule in `candidates` that licenses boarding `trip` at `time`.
    ///
    /// Returns the rule and its earliest board time, or flags that a
    /// trip-specific rule forbids this trip.
    fn find_matching_rule<'c>(
        &self,
        candidates: &[&'c TransferForPattern],
        trip: &TripSchedule,
        time: Time,
        transfer_slack: Seconds,
        prev_transit_arrival_time: Time,
        earliest_board_time: Time,
    ) -> RuleMatch<'c> {
        for &tx in candidates {
            let constraint = tx.constraint();
            let target_time = constraint.calculate_transfer_target_time(
                prev_transit_arrival_time,
                transfer_slack,
                || earliest_board_time,
                self.direction,
                self.min_transfer_time_is_definitive,
            );

            if !constraint.is_facilitated() && self.direction.time_is_before(time, target_time) {
                continue;
            }

            if tx.applies_to_all_target_trips() {
                return RuleMatch::Board(tx, target_time);
            }
            if tx.applies_to_target_trip(trip.trip()) {
                if constraint.is_not_allowed() {
                    return RuleMatch::Forbidden;
                }
                return RuleMatch::Board(tx, target_time);
            }
        }
        RuleMatch::None
    }
}

enum RuleMatch<'c> {
    None,
    Forbidden,
    Board(&'c TransferForPattern, Time),
}

impl ConstrainedTransferBoarding for ConstrainedBoardingSearch<'_> {
    fn transfer_exists_at_target(&mut self, stop_pos: usize) -> bool {
        self.current = self
            .target
            .and_then(|index| index.get(stop_pos))
            .map(|list| (stop_pos, list));
        self.current.is_some()
    }

    fn transfer_exists_at_source(&self, stop_pos: usize) -> bool {
        self.source.is_some_and(|index| index.contains(stop_pos))
    }

    fn find(
        &self,
        timetable: &dyn Timetable,
        transfer_slack: Seconds,
        source_trip: &TripSchedule,
        source_stop_index: StopIndex,
        prev_transit_arrival_time: Time,
        earliest_board_time: Time,
    ) -> BoardingEvent {
        let Some((stop_pos, transfers)) = self.current else {
            return BoardingEvent::empty(earliest_board_time);
        };

        let candidates: Vec<&TransferForPattern> = transfers
            .iter()
            .filter(|tx| tx.matches_source_point(source_stop_index, source_trip.trip()))
            .collect();
        if candidates.is_empty() {
            return BoardingEvent::empty(earliest_board_time);
        }

        let direction = self.direction;
        let stop_index = timetable.stop_index(stop_pos);
        let mut use_next_normal_trip = false;
        let mut n_examined = 0;

        for trip_index in direction.trip_indexes(timetable) {
            let trip = timetable.trip_schedule(trip_index);
            let time = direction.board_time(trip, stop_pos);

            if direction.time_is_before(time, prev_transit_arrival_time) {
                continue;
            }
            n_examined += 1;

            let boarding = |constraint: TransferConstraint, earliest: Time| {
                BoardingEvent::Board(ConstrainedBoarding {
                    trip_index,
                    trip: trip.clone(),
                    stop_position: stop_pos,
                    stop_index,
                    time,
                    earliest_board_time: earliest,
                    constraint,
                })
            };

            match self.find_matching_rule(
                &candidates,
                trip,
                time,
                transfer_slack,
                prev_transit_arrival_time,
                earliest_board_time,
            ) {
                RuleMatch::Board(tx, earliest) => return boarding(*tx.constraint(), earliest),
                RuleMatch::Forbidden => use_next_normal_trip = true,
                RuleMatch::None => {
                    if use_next_normal_trip && !direction.time_is_before(time, earliest_board_time)
                    {
                        return boarding(TransferConstraint::REGULAR, earliest_board_time);
                    }
                }
            }

            if n_examined == ABORT_SEARCH_AFTER_N_VALID_NORMAL_TRIPS {
                trace!(
                    stop_pos,
                    %direction,
                    "constrained boarding search aborted after {n_examined} trips"
                );
                break;
            }
        }

        BoardingEvent::empty(earliest_board_time)
    }
}

/// Boarding search for patterns without constrained transfers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConstrainedBoarding;

impl ConstrainedTransferBoarding for NoopConstrainedBoarding {
    fn transfer_exists_at_target(&mut self, _stop_pos: usize) -> bool {
        false
    }

    fn transfer_exists_at_source(&self, _stop_pos: usize) -> bool {
        false
    }

    fn find(
        &self,
        _timetable: &dyn Timetable,
        _transfer_slack: Seconds,
        _source_trip: &TripSchedule,
        _source_stop_index: StopIndex,
        _prev_transit_arrival_time: Time,
        earliest_board_time: Time,
    ) -> BoardingEvent {
        BoardingEvent::empty(earliest_board_time)
    }
}
