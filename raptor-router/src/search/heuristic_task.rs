//! One heuristic search, run to bound the main search.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{CancelToken, Heuristics, Profile, RaptorConfig, RaptorRequest, RoutingError, TransitDataProvider};
use crate::direction::SearchDirection;

/// A single-direction, single-iteration search whose result bounds the
/// main search.
///
/// The task does nothing until [`enable`](Self::enable)d. The result is
/// memoized: running again with the same request does not search again.
pub struct HeuristicSearchTask {
    direction: SearchDirection,
    name: &'static str,
    data: Arc<dyn TransitDataProvider>,
    config: Arc<RaptorConfig>,
    enabled: bool,
    request: Option<RaptorRequest>,
    ran_with: Option<RaptorRequest>,
    result: Option<Heuristics>,
}

impl HeuristicSearchTask {
    pub fn new(
        direction: SearchDirection,
        name: &'static str,
        data: Arc<dyn TransitDataProvider>,
        config: Arc<RaptorConfig>,
    ) -> Self {
        Self {
            direction,
            name,
            data,
            config,
            enabled: false,
            request: None,
            ran_with: None,
            result: None,
        }
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the request the heuristic is derived from.
    pub fn with_request(&mut self, request: RaptorRequest) -> &mut Self {
        self.request = Some(request);
        self
    }

    /// Run the search unless disabled or already run with this request.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<(), RoutingError> {
        if !self.enabled {
            return Ok(());
        }
        let Some(request) = &self.request else {
            return Err(RoutingError::InvalidRequest(format!(
                "{} heuristic search has no request",
                self.name
            )));
        };
        if self.result.is_some() && self.ran_with.as_ref() == Some(request) {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }

        let heuristic_request = self.heuristic_request(request);
        let start = Instant::now();
        debug!(task = self.name, request = %heuristic_request, "heuristic search started");

        let mut worker = self
            .config
            .factory()
            .heuristic_worker(&self.data, &heuristic_request)?;
        let heuristics = worker.route(cancel)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !heuristics.destination_reached() {
            debug!(task = self.name, elapsed_ms, "heuristic search did not reach destination");
            return Err(RoutingError::DestinationNotReached);
        }

        debug!(
            task = self.name,
            elapsed_ms,
            best_overall_duration = heuristics.best_overall_duration(),
            min_wait_time = heuristics.min_wait_time(),
            "heuristic search finished"
        );
        self.ran_with = Some(request.clone());
        self.result = Some(heuristics);
        Ok(())
    }

    /// The heuristics, if the task has run.
    pub fn result(&self) -> Option<&Heuristics> {
        self.result.as_ref()
    }

    /// Log both results side by side if both tasks have run.
    pub fn debug_compare_result<'a>(
        &'a self,
        other: &'a HeuristicSearchTask,
    ) -> Option<(&'a Heuristics, &'a Heuristics)> {
        if !(self.enabled && other.enabled) {
            return None;
        }
        let (a, b) = (self.result.as_ref()?, other.result.as_ref()?);
        debug!(
            "heuristics {}: best duration {}s, min wait {}s; {}: best duration {}s, min wait {}s",
            self.name,
            a.best_overall_duration(),
            a.min_wait_time(),
            other.name,
            b.best_overall_duration(),
            b.min_wait_time()
        );
        Some((a, b))
    }

    fn heuristic_request(&self, request: &RaptorRequest) -> RaptorRequest {
        request
            .mutate()
            .profile(Profile::MinTravelDuration)
            .direction(self.direction)
            .clear_optimizations()
            .run_in_parallel(false)
            .one_iteration_only(true)
            .search_window(0)
            .build()
    }
}

impl std::fmt::Debug for HeuristicSearchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicSearchTask")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("enabled", &self.enabled)
            .field("result", &self.result)
            .finish()
    }
}
