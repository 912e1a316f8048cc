//! Transfer point matchers.
//!
//! A transfer rule names its two endpoints at one of five granularities.
//! At search time the router only has a stop index and a trip in hand, so
//! each endpoint is turned into a predicate over that pair.

use crate::model::{PatternTimetable, RouteId, Station, StationId, StopIndex, Trip, TripId};

/// Predicate matching one endpoint of a constrained transfer.
///
/// Variants are listed from least to most specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferPointMatcher {
    /// Any stop belonging to the station.
    Station {
        station: StationId,
        /// Sorted child stop indexes.
        stops: Vec<StopIndex>,
    },
    /// One specific stop.
    Stop { stop: StopIndex },
    /// One route at any stop belonging to the station.
    RouteStation {
        route: RouteId,
        station: StationId,
        /// Sorted child stop indexes.
        stops: Vec<StopIndex>,
    },
    /// One route at one stop.
    Route { route: RouteId, stop: StopIndex },
    /// One trip at one stop.
    Trip { trip: TripId, stop: StopIndex },
}

impl TransferPointMatcher {
    /// Match any stop of `station`. The child stop set is captured once.
    pub fn station(station: &Station) -> Self {
        TransferPointMatcher::Station {
            station: station.id().clone(),
            stops: sorted_child_stops(station),
        }
    }

    /// Match `route` at any stop of `station`.
    pub fn route_station(route: RouteId, station: &Station) -> Self {
        TransferPointMatcher::RouteStation {
            route,
            station: station.id().clone(),
            stops: sorted_child_stops(station),
        }
    }

    pub fn stop(stop: StopIndex) -> Self {
        TransferPointMatcher::Stop { stop }
    }

    pub fn route(route: RouteId, stop: StopIndex) -> Self {
        TransferPointMatcher::Route { route, stop }
    }

    pub fn trip(trip: TripId, stop: StopIndex) -> Self {
        TransferPointMatcher::Trip { trip, stop }
    }

    /// Returns true if the stop/trip pair is covered by this endpoint.
    pub fn matches(&self, stop_index: StopIndex, trip: &Trip) -> bool {
        match self {
            TransferPointMatcher::Station { stops, .. } => stops.binary_search(&stop_index).is_ok(),
            TransferPointMatcher::Stop { stop } => *stop == stop_index,
            TransferPointMatcher::RouteStation { route, stops, .. } => {
                trip.route() == route && stops.binary_search(&stop_index).is_ok()
            }
            TransferPointMatcher::Route { route, stop } => {
                *stop == stop_index && trip.route() == route
            }
            TransferPointMatcher::Trip { trip: id, stop } => {
                *stop == stop_index && trip.id() == id
            }
        }
    }

    /// Returns true if the endpoint covers the pattern at `stop_pos` for at
    /// least one of its trips.
    pub fn matches_pattern(&self, pattern: &PatternTimetable, stop_pos: usize) -> bool {
        let stop_index = pattern.stop_index(stop_pos);
        match self {
            TransferPointMatcher::Station { stops, .. } => stops.binary_search(&stop_index).is_ok(),
            TransferPointMatcher::Stop { stop } => *stop == stop_index,
            TransferPointMatcher::RouteStation { .. }
            | TransferPointMatcher::Route { .. }
            | TransferPointMatcher::Trip { .. } => pattern
                .trips()
                .iter()
                .any(|t| self.matches(stop_index, t.trip())),
        }
    }

    /// The trip this endpoint is limited to, if any.
    pub fn trip_id(&self) -> Option<&TripId> {
        match self {
            TransferPointMatcher::Trip { trip, .. } => Some(trip),
            _ => None,
        }
    }

    /// Rank of the endpoint granularity, higher is more specific.
    pub fn specificity_ranking(&self) -> u8 {
        match self {
            TransferPointMatcher::Station { .. } => 0,
            TransferPointMatcher::Stop { .. } => 1,
            TransferPointMatcher::RouteStation { .. } => 2,
            TransferPointMatcher::Route { .. } => 3,
            TransferPointMatcher::Trip { .. } => 4,
        }
    }
}

fn sorted_child_stops(station: &Station) -> Vec<StopIndex> {
    let mut stops = station.child_stops().to_vec();
    stops.sort_unstable();
    stops.dedup();
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripSchedule;
    use std::sync::Arc;

    fn trip(id: &str, route: &str) -> Trip {
        Trip::new(TripId::new(id), RouteId::new(route))
    }

    #[test]
    fn station_matches_any_child_stop() {
        let station = Station::new(StationId::new("B"), vec![5, 2, 5]);
        let m = TransferPointMatcher::station(&station);
        let t = trip("T1", "R1");

        assert!(m.matches(2, &t));
        assert!(m.matches(5, &t));
        assert!(!m.matches(3, &t));
    }

    #[test]
    fn stop_matches_only_its_index() {
        let m = TransferPointMatcher::stop(4);
        assert!(m.matches(4, &trip("T1", "R1")));
        assert!(!m.matches(5, &trip("T1", "R1")));
    }

    #[test]
    fn route_requires_stop_and_route() {
        let m = TransferPointMatcher::route(RouteId::new("R1"), 4);
        assert!(m.matches(4, &trip("T1", "R1")));
        assert!(!m.matches(4, &trip("T1", "R2")));
        assert!(!m.matches(3, &trip("T1", "R1")));
    }

    #[test]
    fn trip_requires_stop_and_trip() {
        let m = TransferPointMatcher::trip(TripId::new("T1"), 4);
        assert!(m.matches(4, &trip("T1", "R1")));
        assert!(!m.matches(4, &trip("T2", "R1")));
        assert!(!m.matches(3, &trip("T1", "R1")));
        assert_eq!(m.trip_id(), Some(&TripId::new("T1")));
        assert_eq!(TransferPointMatcher::stop(4).trip_id(), None);
    }

    #[test]
    fn specificity_increases_with_granularity() {
        let station = Station::new(StationId::new("B"), vec![1]);
        let ranks = [
            TransferPointMatcher::station(&station).specificity_ranking(),
            TransferPointMatcher::stop(1).specificity_ranking(),
            TransferPointMatcher::route_station(RouteId::new("R"), &station).specificity_ranking(),
            TransferPointMatcher::route(RouteId::new("R"), 1).specificity_ranking(),
            TransferPointMatcher::trip(TripId::new("T"), 1).specificity_ranking(),
        ];
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn route_station_requires_route_and_child_stop() {
        let station = Station::new(StationId::new("B"), vec![5, 2]);
        let m = TransferPointMatcher::route_station(RouteId::new("R1"), &station);
        assert!(m.matches(2, &trip("T1", "R1")));
        assert!(m.matches(5, &trip("T9", "R1")));
        assert!(!m.matches(5, &trip("T1", "R2")));
        assert!(!m.matches(3, &trip("T1", "R1")));
        assert_eq!(m.trip_id(), None);
    }

    #[test]
    fn matches_pattern_by_route_and_trip() {
        let schedule = TripSchedule::with_times(Arc::new(trip("T1", "R1")), 0, vec![100, 200]);
        let pattern = PatternTimetable::new(0, vec![7, 8], vec![schedule]);

        assert!(TransferPointMatcher::stop(8).matches_pattern(&pattern, 1));
        assert!(!TransferPointMatcher::stop(8).matches_pattern(&pattern, 0));
        assert!(TransferPointMatcher::route(RouteId::new("R1"), 7).matches_pattern(&pattern, 0));
        assert!(!TransferPointMatcher::route(RouteId::new("R2"), 7).matches_pattern(&pattern, 0));
        let station = Station::new(StationId::new("S"), vec![8, 9]);
        let r1_at_station = TransferPointMatcher::route_station(RouteId::new("R1"), &station);
        assert!(r1_at_station.matches_pattern(&pattern, 1));
        assert!(!r1_at_station.matches_pattern(&pattern, 0));
        let r2_at_station = TransferPointMatcher::route_station(RouteId::new("R2"), &station);
        assert!(!r2_at_station.matches_pattern(&pattern, 1));
        assert!(TransferPointMatcher::trip(TripId::new("T1"), 8).matches_pattern(&pattern, 1));
        assert!(!TransferPointMatcher::trip(TripId::new("T9"), 8).matches_pattern(&pattern, 1));
    }
}
