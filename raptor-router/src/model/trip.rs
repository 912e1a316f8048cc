//! Trips and trip schedules.

use std::sync::Arc;

use super::{RouteId, TripId};
use crate::time::Time;

/// A trip as defined by the timetable data: which route it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trip {
    id: TripId,
    route: RouteId,
}

impl Trip {
    pub fn new(id: TripId, route: RouteId) -> Self {
        Self { id, route }
    }

    pub fn id(&self) -> &TripId {
        &self.id
    }

    pub fn route(&self) -> &RouteId {
        &self.route
    }
}

/// The stop times of one trip along its pattern.
///
/// Arrival and departure times are indexed by stop position in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSchedule {
    trip: Arc<Trip>,
    pattern_index: usize,
    arrivals: Vec<Time>,
    departures: Vec<Time>,
}

impl TripSchedule {
    /// Create a schedule. `arrivals` and `departures` must have one entry per
    /// stop position.
    pub fn new(
        trip: Arc<Trip>,
        pattern_index: usize,
        arrivals: Vec<Time>,
        departures: Vec<Time>,
    ) -> Self {
        debug_assert_eq!(arrivals.len(), departures.len());
        Self {
            trip,
            pattern_index,
            arrivals,
            departures,
        }
    }

    /// Create a schedule where arrival and departure coincide at every stop.
    pub fn with_times(trip: Arc<Trip>, pattern_index: usize, times: Vec<Time>) -> Self {
        Self::new(trip, pattern_index, times.clone(), times)
    }

    /// The underlying trip.
    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    pub fn arrival(&self, stop_pos: usize) -> Time {
        self.arrivals[stop_pos]
    }

    pub fn departure(&self, stop_pos: usize) -> Time {
        self.departures[stop_pos]
    }

    pub fn first_departure(&self) -> Option<Time> {
        self.departures.first().copied()
    }

    pub fn num_stops(&self) -> usize {
        self.departures.len()
    }
}
