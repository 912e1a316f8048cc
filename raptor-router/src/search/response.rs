//! Search results.

use std::fmt;

use super::RaptorRequest;
use crate::model::StopIndex;
use crate::time::{Seconds, ServiceTime, Time};

/// One journey found by a routing worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaptorPath {
    pub start_time: Time,
    pub end_time: Time,
    pub number_of_transfers: u32,
    /// Generalized cost, set by multi-criteria searches only.
    pub generalized_cost: Option<i32>,
}

impl RaptorPath {
    pub fn new(start_time: Time, end_time: Time, number_of_transfers: u32) -> Self {
        Self {
            start_time,
            end_time,
            number_of_transfers,
            generalized_cost: None,
        }
    }

    pub fn with_generalized_cost(mut self, cost: i32) -> Self {
        self.generalized_cost = Some(cost);
        self
    }

    pub fn duration(&self) -> Seconds {
        self.end_time - self.start_time
    }
}

impl fmt::Display for RaptorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} transfers",
            ServiceTime(self.start_time),
            ServiceTime(self.end_time),
            self.number_of_transfers
        )?;
        if let Some(c) = self.generalized_cost {
            write!(f, ", cost {c}")?;
        }
        write!(f, ")")
    }
}

/// Best arrival time at every stop, as left by the main search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopArrivals {
    best_arrival_times: Vec<Option<Time>>,
}

impl StopArrivals {
    pub fn new(best_arrival_times: Vec<Option<Time>>) -> Self {
        Self { best_arrival_times }
    }

    pub fn best_arrival_time(&self, stop: StopIndex) -> Option<Time> {
        self.best_arrival_times.get(stop).copied().flatten()
    }

    pub fn reached(&self, stop: StopIndex) -> bool {
        self.best_arrival_time(stop).is_some()
    }
}

/// What a routing worker hands back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouterResult {
    pub paths: Vec<RaptorPath>,
    pub stop_arrivals: StopArrivals,
}

/// Response of a dynamic search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaptorResponse {
    paths: Vec<RaptorPath>,
    stop_arrivals: Option<StopArrivals>,
    original_request: RaptorRequest,
    request: RaptorRequest,
    success: bool,
}

impl RaptorResponse {
    pub fn success(result: RouterResult, original_request: RaptorRequest, request: RaptorRequest) -> Self {
        Self {
            paths: result.paths,
            stop_arrivals: Some(result.stop_arrivals),
            original_request,
            request,
            success: true,
        }
    }

    /// Response for a search that did not reach the destination. The
    /// resolved request is kept so the caller can page on from it.
    pub fn destination_not_reached(original_request: RaptorRequest, request: RaptorRequest) -> Self {
        Self {
            paths: Vec::new(),
            stop_arrivals: None,
            original_request,
            request,
            success: false,
        }
    }

    pub fn paths(&self) -> &[RaptorPath] {
        &self.paths
    }

    pub fn stop_arrivals(&self) -> Option<&StopArrivals> {
        self.stop_arrivals.as_ref()
    }

    pub fn original_request(&self) -> &RaptorRequest {
        &self.original_request
    }

    /// The request with its dynamic parameters resolved.
    pub fn request(&self) -> &RaptorRequest {
        &self.request
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn no_data(&self) -> bool {
        self.paths.is_empty()
    }
}
