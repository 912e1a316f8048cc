//! Search direction and the direction-aware time strategy.
//!
//! A forward search moves from departure towards arrival, a reverse search
//! runs the same algorithms on a time-reversed view of the timetable. Code
//! that must work in both directions asks the direction for comparisons and
//! time arithmetic instead of branching itself.

use std::fmt;

use crate::model::{Timetable, TripSchedule};
use crate::time::{Seconds, Time};

/// Direction of a search in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Reverse,
}

impl SearchDirection {
    pub fn is_forward(self) -> bool {
        self == SearchDirection::Forward
    }

    pub fn is_reverse(self) -> bool {
        self == SearchDirection::Reverse
    }

    /// The opposite direction.
    pub fn invert(self) -> Self {
        match self {
            SearchDirection::Forward => SearchDirection::Reverse,
            SearchDirection::Reverse => SearchDirection::Forward,
        }
    }

    /// Returns true if `a` happens strictly before `b` in search order.
    ///
    /// In a reverse search "before" means later on the clock.
    pub fn time_is_before(self, a: Time, b: Time) -> bool {
        match self {
            SearchDirection::Forward => a < b,
            SearchDirection::Reverse => a > b,
        }
    }

    /// Move `time` forward in search order by `delta`.
    pub fn plus(self, time: Time, delta: Seconds) -> Time {
        match self {
            SearchDirection::Forward => time + delta,
            SearchDirection::Reverse => time - delta,
        }
    }

    /// Move `time` backward in search order by `delta`.
    pub fn minus(self, time: Time, delta: Seconds) -> Time {
        self.plus(time, -delta)
    }

    /// The later of two times in search order.
    pub fn max(self, a: Time, b: Time) -> Time {
        if self.time_is_before(a, b) { b } else { a }
    }

    /// The time a trip is boarded at a stop position.
    ///
    /// Forward searches board on departure, reverse searches "board" where
    /// the trip arrives.
    pub fn board_time(self, trip: &TripSchedule, stop_pos: usize) -> Time {
        match self {
            SearchDirection::Forward => trip.departure(stop_pos),
            SearchDirection::Reverse => trip.arrival(stop_pos),
        }
    }

    /// The time a trip is left at a stop position.
    pub fn alight_time(self, trip: &TripSchedule, stop_pos: usize) -> Time {
        self.invert().board_time(trip, stop_pos)
    }

    /// Iterate the trip indexes of a timetable in search order.
    ///
    /// Timetables are sorted by departure, so forward order is ascending
    /// and reverse order is descending.
    pub fn trip_indexes(self, timetable: &dyn Timetable) -> TripIndexIter {
        TripIndexIter {
            next: 0,
            len: timetable.num_trips(),
            direction: self,
        }
    }
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchDirection::Forward => write!(f, "forward"),
            SearchDirection::Reverse => write!(f, "reverse"),
        }
    }
}

/// Trip index iterator produced by [`SearchDirection::trip_indexes`].
#[derive(Debug, Clone)]
pub struct TripIndexIter {
    next: usize,
    len: usize,
    direction: SearchDirection,
}

impl Iterator for TripIndexIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.len {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(match self.direction {
            SearchDirection::Forward => i,
            SearchDirection::Reverse => self.len - 1 - i,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TripIndexIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatternTimetable, RouteId, Trip, TripId};
    use std::sync::Arc;

    fn timetable(n: usize) -> PatternTimetable {
        let trips = (0..n)
            .map(|i| {
                let t = 36_000 + i as i32 * 300;
                TripSchedule::new(
                    Arc::new(Trip::new(TripId::new(format!("T{i}")), RouteId::new("R"))),
                    0,
                    vec![t, t + 600],
                    vec![t + 60, t + 600],
                )
            })
            .collect();
        PatternTimetable::new(0, vec![0, 1], trips)
    }

    #[test]
    fn forward_comparisons() {
        let d = SearchDirection::Forward;
        assert!(d.time_is_before(1, 2));
        assert!(!d.time_is_before(2, 2));
        assert_eq!(d.plus(100, 20), 120);
        assert_eq!(d.minus(100, 20), 80);
        assert_eq!(d.max(5, 9), 9);
    }

    #[test]
    fn reverse_comparisons() {
        let d = SearchDirection::Reverse;
        assert!(d.time_is_before(2, 1));
        assert!(!d.time_is_before(2, 2));
        assert_eq!(d.plus(100, 20), 80);
        assert_eq!(d.minus(100, 20), 120);
        assert_eq!(d.max(5, 9), 5);
    }

    #[test]
    fn board_and_alight_times() {
        let tt = timetable(1);
        let trip = tt.trip_schedule(0);
        assert_eq!(SearchDirection::Forward.board_time(trip, 0), 36_060);
        assert_eq!(SearchDirection::Reverse.board_time(trip, 0), 36_000);
        assert_eq!(SearchDirection::Forward.alight_time(trip, 1), 36_600);
    }

    #[test]
    fn trip_index_order() {
        let tt = timetable(3);
        let fwd: Vec<_> = SearchDirection::Forward.trip_indexes(&tt).collect();
        let rev: Vec<_> = SearchDirection::Reverse.trip_indexes(&tt).collect();
        assert_eq!(fwd, vec![0, 1, 2]);
        assert_eq!(rev, vec![2, 1, 0]);
        assert_eq!(SearchDirection::Reverse.trip_indexes(&tt).len(), 3);
    }

    #[test]
    fn empty_timetable_yields_nothing() {
        let tt = timetable(0);
        assert_eq!(SearchDirection::Reverse.trip_indexes(&tt).count(), 0);
    }

    #[test]
    fn display() {
        assert_eq!(SearchDirection::Forward.to_string(), "forward");
        assert_eq!(SearchDirection::Reverse.invert(), SearchDirection::Forward);
    }
}
