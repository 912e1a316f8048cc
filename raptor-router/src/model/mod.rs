//! Transit model types consumed by the constrained boarding search.
//!
//! These are the read-only views of the loaded schedule: identifiers, trips
//! with their stop times, stations and per-pattern timetables. They are built
//! once and shared across all concurrent searches.

mod ids;
mod station;
mod timetable;
mod trip;

pub use ids::{RouteId, StationId, StopIndex, TripId};
pub use station::Station;
pub use timetable::{PatternTimetable, Timetable};
pub use trip::{Trip, TripSchedule};
