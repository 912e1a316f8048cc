//! Results of a heuristic search.

use crate::model::StopIndex;
use crate::time::Seconds;

/// Bounds produced by one heuristic search. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Heuristics {
    best_overall_duration: Seconds,
    min_wait_time: Seconds,
    destination_reached: bool,
    best_travel_durations: Vec<Option<Seconds>>,
    best_num_transfers: Vec<Option<u32>>,
}

impl Heuristics {
    /// Heuristics for a search that reached the destination.
    pub fn new(best_overall_duration: Seconds, min_wait_time: Seconds) -> Self {
        Self {
            best_overall_duration,
            min_wait_time,
            destination_reached: true,
            best_travel_durations: Vec::new(),
            best_num_transfers: Vec::new(),
        }
    }

    /// Heuristics for a search that never reached the destination.
    pub fn unreached() -> Self {
        Self::default()
    }

    /// Attach the per-stop bounds used for destination pruning.
    pub fn with_stop_bounds(
        mut self,
        best_travel_durations: Vec<Option<Seconds>>,
        best_num_transfers: Vec<Option<u32>>,
    ) -> Self {
        self.best_travel_durations = best_travel_durations;
        self.best_num_transfers = best_num_transfers;
        self
    }

    /// Shortest travel duration over all journeys reaching the destination.
    pub fn best_overall_duration(&self) -> Seconds {
        self.best_overall_duration
    }

    /// Minimum wait time among journeys reaching the destination.
    pub fn min_wait_time(&self) -> Seconds {
        self.min_wait_time
    }

    pub fn destination_reached(&self) -> bool {
        self.destination_reached
    }

    /// Best travel duration between `stop` and the search origin, if the
    /// stop was reached.
    pub fn best_travel_duration(&self, stop: StopIndex) -> Option<Seconds> {
        self.best_travel_durations.get(stop).copied().flatten()
    }

    pub fn best_num_transfers(&self, stop: StopIndex) -> Option<u32> {
        self.best_num_transfers.get(stop).copied().flatten()
    }

    /// Number of stops with per-stop bounds.
    pub fn size(&self) -> usize {
        self.best_travel_durations.len()
    }
}
