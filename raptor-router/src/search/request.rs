//! Routing requests.
//!
//! A [`RaptorRequest`] is immutable. Derived requests (for heuristics, or
//! with resolved dynamic parameters) are made with [`RaptorRequest::mutate`],
//! which hands back a builder pre-filled with the current values.

use std::fmt;
use std::str::FromStr;

use super::RoutingError;
use crate::direction::SearchDirection;
use crate::model::StopIndex;
use crate::time::{Seconds, ServiceTime, Time};

/// Optimisation profile of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    /// Earliest arrival with range iterations.
    #[default]
    Standard,
    /// Pareto search over arrival time, transfers and cost.
    MultiCriteria,
    /// Single-iteration heuristic computing minimum travel durations.
    MinTravelDuration,
}

impl Profile {
    pub fn is_multi_criteria(self) -> bool {
        self == Profile::MultiCriteria
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::MultiCriteria => "multi-criteria",
            Profile::MinTravelDuration => "min-travel-duration",
        }
    }
}

impl FromStr for Profile {
    type Err = RoutingError;

    /// Accepts the dashed name, or the same name with underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(Profile::Standard),
            "multi-criteria" | "mc" => Ok(Profile::MultiCriteria),
            "min-travel-duration" => Ok(Profile::MinTravelDuration),
            _ => Err(RoutingError::UnknownProfile(s.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimisations shaping the result of the main search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Optimizations {
    /// Prune with bounds from a heuristic run from the destination.
    pub destination_pruning: bool,
}

impl Optimizations {
    pub fn is_empty(&self) -> bool {
        !self.destination_pruning
    }
}

/// A stop reachable from the origin (access) or destination (egress).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopAccess {
    pub stop: StopIndex,
    /// Time to walk between the stop and the origin/destination.
    pub duration: Seconds,
}

impl StopAccess {
    pub fn new(stop: StopIndex, duration: Seconds) -> Self {
        Self { stop, duration }
    }
}

/// Where and when to search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParams {
    access: Vec<StopAccess>,
    egress: Vec<StopAccess>,
    earliest_departure_time: Option<Time>,
    latest_arrival_time: Option<Time>,
    search_window: Option<Seconds>,
    one_iteration_only: bool,
}

impl SearchParams {
    pub fn access(&self) -> &[StopAccess] {
        &self.access
    }

    pub fn egress(&self) -> &[StopAccess] {
        &self.egress
    }

    pub fn earliest_departure_time(&self) -> Option<Time> {
        self.earliest_departure_time
    }

    pub fn latest_arrival_time(&self) -> Option<Time> {
        self.latest_arrival_time
    }

    /// Length of the departure window, in seconds.
    pub fn search_window(&self) -> Option<Seconds> {
        self.search_window
    }

    pub fn is_earliest_departure_time_set(&self) -> bool {
        self.earliest_departure_time.is_some()
    }

    pub fn is_latest_arrival_time_set(&self) -> bool {
        self.latest_arrival_time.is_some()
    }

    pub fn is_search_window_set(&self) -> bool {
        self.search_window.is_some()
    }

    pub fn one_iteration_only(&self) -> bool {
        self.one_iteration_only
    }
}

/// A routing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaptorRequest {
    params: SearchParams,
    direction: SearchDirection,
    profile: Profile,
    optimizations: Optimizations,
    run_in_parallel: bool,
    debug: bool,
}

impl RaptorRequest {
    pub fn builder() -> RaptorRequestBuilder {
        RaptorRequestBuilder::default()
    }

    /// A builder initialised with this request's values.
    pub fn mutate(&self) -> RaptorRequestBuilder {
        RaptorRequestBuilder {
            request: self.clone(),
        }
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.params
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn optimizations(&self) -> Optimizations {
        self.optimizations
    }

    /// Destination pruning only has an effect on multi-criteria searches.
    pub fn use_destination_pruning(&self) -> bool {
        self.profile.is_multi_criteria() && self.optimizations.destination_pruning
    }

    pub fn run_in_parallel(&self) -> bool {
        self.run_in_parallel
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Reject requests that cannot be searched.
    pub fn validate(&self) -> Result<(), RoutingError> {
        let p = &self.params;
        let invalid = |msg: String| Err(RoutingError::InvalidRequest(msg));

        if p.access.is_empty() {
            return invalid("no access stops".to_string());
        }
        if p.egress.is_empty() {
            return invalid("no egress stops".to_string());
        }
        if let Some(a) = p.access.iter().chain(&p.egress).find(|a| a.duration < 0) {
            return invalid(format!("negative access duration at stop {}", a.stop));
        }
        if let Some(window) = p.search_window.filter(|w| *w < 0) {
            return invalid(format!("negative search window: {window}s"));
        }
        if let (Some(edt), Some(lat)) = (p.earliest_departure_time, p.latest_arrival_time) {
            if lat < edt {
                return invalid(format!(
                    "latest arrival time {} is before earliest departure time {}",
                    ServiceTime(lat),
                    ServiceTime(edt)
                ));
            }
            if let Some(window) = p
                .search_window
                .filter(|w| edt.checked_add(*w).is_none_or(|end| end > lat))
            {
                return invalid(format!(
                    "search window of {window}s from {} extends past latest arrival time {}",
                    ServiceTime(edt),
                    ServiceTime(lat)
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RaptorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        write!(f, "{} {}", self.profile, self.direction)?;
        if let Some(edt) = p.earliest_departure_time {
            write!(f, " edt={}", ServiceTime(edt))?;
        }
        if let Some(lat) = p.latest_arrival_time {
            write!(f, " lat={}", ServiceTime(lat))?;
        }
        if let Some(sw) = p.search_window {
            write!(f, " window={sw}s")?;
        }
        write!(f, " access={} egress={}", p.access.len(), p.egress.len())
    }
}

/// Builder for [`RaptorRequest`].
#[derive(Debug, Clone, Default)]
pub struct RaptorRequestBuilder {
    request: RaptorRequest,
}

impl RaptorRequestBuilder {
    pub fn add_access(mut self, stop: StopIndex, duration: Seconds) -> Self {
        self.request.params.access.push(StopAccess::new(stop, duration));
        self
    }

    pub fn add_egress(mut self, stop: StopIndex, duration: Seconds) -> Self {
        self.request.params.egress.push(StopAccess::new(stop, duration));
        self
    }

    pub fn earliest_departure_time(mut self, time: impl Into<Option<Time>>) -> Self {
        self.request.params.earliest_departure_time = time.into();
        self
    }

    pub fn latest_arrival_time(mut self, time: impl Into<Option<Time>>) -> Self {
        self.request.params.latest_arrival_time = time.into();
        self
    }

    pub fn search_window(mut self, seconds: impl Into<Option<Seconds>>) -> Self {
        self.request.params.search_window = seconds.into();
        self
    }

    pub fn one_iteration_only(mut self, one: bool) -> Self {
        self.request.params.one_iteration_only = one;
        self
    }

    pub fn direction(mut self, direction: SearchDirection) -> Self {
        self.request.direction = direction;
        self
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.request.profile = profile;
        self
    }

    pub fn destination_pruning(mut self, on: bool) -> Self {
        self.request.optimizations.destination_pruning = on;
        self
    }

    pub fn clear_optimizations(mut self) -> Self {
        self.request.optimizations = Optimizations::default();
        self
    }

    pub fn run_in_parallel(mut self, parallel: bool) -> Self {
        self.request.run_in_parallel = parallel;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.request.debug = debug;
        self
    }

    pub fn build(self) -> RaptorRequest {
        self.request
    }
}
