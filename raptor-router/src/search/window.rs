//! Dynamic search-window calculation.
//!
//! Fills in the earliest departure time and the search window when the
//! request leaves them open, using the bounds found by the heuristics:
//!
//! ```text
//! window = round_up(step, C + T * min_transit_time + W * min_wait_time)
//! EDT    = LAT - (window + min_transit_time)
//! ```
//!
//! When both EDT and LAT are given, the window is whatever fits between
//! them after the minimum transit time.

use super::{Heuristics, SearchParams, SearchWindowTuning};
use crate::time::{Seconds, Time, round_down_to_minute, round_up_to_step, seconds_of};

/// Resolved dynamic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicWindow {
    pub earliest_departure_time: Time,
    /// Unchanged from the request.
    pub latest_arrival_time: Option<Time>,
    pub search_window: Seconds,
}

/// Accumulates what is known about a request's time bounds.
#[derive(Debug, Clone)]
pub struct SearchWindowCalculator {
    tuning: SearchWindowTuning,
    min_transit_time: Option<Seconds>,
    min_wait_time: Option<Seconds>,
    earliest_departure_time: Option<Time>,
    latest_arrival_time: Option<Time>,
    search_window: Option<Seconds>,
    default_earliest_departure_time: Time,
}

impl SearchWindowCalculator {
    pub fn new(tuning: SearchWindowTuning) -> Self {
        Self {
            tuning,
            min_transit_time: None,
            min_wait_time: None,
            earliest_departure_time: None,
            latest_arrival_time: None,
            search_window: None,
            default_earliest_departure_time: 0,
        }
    }

    pub fn with_search_params(mut self, params: &SearchParams) -> Self {
        self.earliest_departure_time = params.earliest_departure_time();
        self.latest_arrival_time = params.latest_arrival_time();
        self.search_window = params.search_window();
        self
    }

    /// EDT to use when the request has neither EDT nor LAT, normally the
    /// start of the loaded transit data.
    pub fn with_default_earliest_departure_time(mut self, time: Time) -> Self {
        self.default_earliest_departure_time = time;
        self
    }

    pub fn with_heuristics(mut self, min_transit_time: Seconds, min_wait_time: Seconds) -> Self {
        self.fold(min_transit_time, min_wait_time);
        self
    }

    /// Fold the bounds of a completed heuristic search into the state.
    pub fn fold_heuristics(&mut self, heuristics: &Heuristics) {
        self.fold(heuristics.best_overall_duration(), heuristics.min_wait_time());
    }

    fn fold(&mut self, min_transit_time: Seconds, min_wait_time: Seconds) {
        self.min_transit_time = Some(min_transit_time.max(0));
        self.min_wait_time = Some(min_wait_time.max(0));
    }

    pub fn has_heuristics(&self) -> bool {
        self.min_transit_time.is_some()
    }

    /// Resolve EDT and window from what is known so far.
    pub fn calculate(&self) -> DynamicWindow {
        let min_transit_time = self.min_transit_time.unwrap_or(0);

        let search_window = match (
            self.search_window,
            self.earliest_departure_time,
            self.latest_arrival_time,
        ) {
            (Some(window), _, _) => window,
            (None, Some(edt), Some(lat)) => self.window_between(edt, lat, min_transit_time),
            (None, _, _) => self.dynamic_window(min_transit_time),
        };

        let earliest_departure_time = match (self.earliest_departure_time, self.latest_arrival_time) {
            (Some(edt), _) => edt,
            (None, Some(lat)) => {
                let travel_window = search_window + round_up_to_step(min_transit_time, 60);
                round_down_to_minute(lat - travel_window)
            }
            (None, None) => self.default_earliest_departure_time,
        };

        DynamicWindow {
            earliest_departure_time,
            latest_arrival_time: self.latest_arrival_time,
            search_window,
        }
    }

    /// Latest arrival time used to bound a reverse heuristic when the
    /// request has none: the end of the window plus the best travel time.
    pub fn heuristic_latest_arrival_time(&self) -> Option<Time> {
        if self.latest_arrival_time.is_some() {
            return self.latest_arrival_time;
        }
        let min_transit_time = self.min_transit_time?;
        let w = self.calculate();
        Some(w.earliest_departure_time + w.search_window + min_transit_time)
    }

    /// Heuristic window, rounded up to the step rather than to the
    /// nearest step, so it is never shorter than the raw estimate.
    fn dynamic_window(&self, min_transit_time: Seconds) -> Seconds {
        let t = &self.tuning;
        let raw = t.min_transit_time_coefficient * f64::from(min_transit_time)
            + t.min_wait_time_coefficient * f64::from(self.min_wait_time.unwrap_or(0))
            + f64::from(seconds_of(t.min_window()));
        let window = round_up_to_step(raw.ceil() as Seconds, self.step());
        window.min(self.max_window())
    }

    /// Window fitting between EDT and LAT, rounded down so it never
    /// reaches past LAT.
    fn window_between(&self, edt: Time, lat: Time, min_transit_time: Seconds) -> Seconds {
        let step = self.step();
        let available = (lat - edt - min_transit_time).max(0);
        (available - available % step).min(self.max_window())
    }

    fn step(&self) -> Seconds {
        seconds_of(self.tuning.step()).max(1)
    }

    fn max_window(&self) -> Seconds {
        seconds_of(self.tuning.max_window())
    }
}
