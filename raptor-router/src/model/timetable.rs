//! Per-pattern timetables.
//!
//! A pattern is a unique sequence of stops; every trip serving exactly that
//! sequence belongs to the pattern's timetable. Trips are kept sorted by
//! departure from the first stop, which the router relies on when it scans
//! forward (ascending) or in reverse (descending).

use std::sync::Arc;

use tracing::warn;

use super::{StopIndex, TripSchedule};

/// Read access to the trips of one pattern, in departure order.
pub trait Timetable {
    /// Number of trips in the timetable.
    fn num_trips(&self) -> usize;

    /// The trip schedule at `index`. Panics if out of range.
    fn trip_schedule(&self, index: usize) -> &Arc<TripSchedule>;

    /// The stop served at a stop position of the pattern.
    fn stop_index(&self, stop_pos: usize) -> StopIndex;
}

/// In-memory timetable of one pattern.
#[derive(Debug, Clone)]
pub struct PatternTimetable {
    pattern_index: usize,
    stops: Vec<StopIndex>,
    trips: Vec<Arc<TripSchedule>>,
}

impl PatternTimetable {
    /// Build a timetable, sorting trips by their first departure.
    ///
    /// Schedules without one time per stop of the pattern are dropped.
    pub fn new(pattern_index: usize, stops: Vec<StopIndex>, trips: Vec<TripSchedule>) -> Self {
        let total = trips.len();
        let mut trips: Vec<Arc<TripSchedule>> = trips
            .into_iter()
            .filter(|t| t.num_stops() == stops.len())
            .map(Arc::new)
            .collect();
        if trips.len() < total {
            warn!(
                pattern_index,
                dropped = total - trips.len(),
                "dropped trip schedules not matching the pattern's stops"
            );
        }
        trips.sort_by_key(|t| t.first_departure());
        Self {
            pattern_index,
            stops,
            trips,
        }
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// Stops served by the pattern, by stop position.
    pub fn stops(&self) -> &[StopIndex] {
        &self.stops
    }

    /// The stop at a stop position.
    pub fn stop_index(&self, stop_pos: usize) -> StopIndex {
        self.stops[stop_pos]
    }

    /// First position at which the pattern visits `stop`.
    pub fn stop_position(&self, stop: StopIndex) -> Option<usize> {
        self.stops.iter().position(|&s| s == stop)
    }

    pub fn trips(&self) -> &[Arc<TripSchedule>] {
        &self.trips
    }
}

impl Timetable for PatternTimetable {
    fn num_trips(&self) -> usize {
        self.trips.len()
    }

    fn trip_schedule(&self, index: usize) -> &Arc<TripSchedule> {
        &self.trips[index]
    }

    fn stop_index(&self, stop_pos: usize) -> StopIndex {
        self.stops[stop_pos]
    }
}
