//! Dynamic search: heuristics, then search window, then the main search.
//!
//! A request may leave the earliest departure time, the latest arrival time
//! and the search window open. The dynamic search runs up to two cheap
//! heuristic searches to find bounds, resolves the open parameters from
//! them, and then runs the main standard or multi-criteria search.
//!
//! If the destination cannot be reached, the response is empty and marked
//! unsuccessful, but carries the resolved request so the caller can page.

use std::sync::Arc;

use tracing::{debug, warn};

use super::window::{DynamicWindow, SearchWindowCalculator};
use super::{
    CancelToken, ExtraMcSearch, Heuristics, HeuristicSearchTask, RaptorConfig, RaptorRequest,
    RaptorResponse, RouterResult, RoutingError, TransitDataProvider,
};
use crate::direction::SearchDirection;

/// Which heuristic searches a request needs, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicPlan {
    pub forward: bool,
    pub reverse: bool,
    /// Run order when sequential. Only enabled tasks are run.
    pub order: [SearchDirection; 2],
}

impl HeuristicPlan {
    /// Decide from the request shape alone.
    ///
    /// * forward: an open window must be calculated from a known EDT (or
    ///   from nothing at all).
    /// * reverse: the EDT must be derived from a known LAT.
    /// * destination pruning adds the task searching from the destination.
    ///
    /// Reverse runs first when only LAT is known, forward first otherwise.
    pub fn for_request(request: &RaptorRequest) -> Self {
        let p = request.search_params();
        let edt = p.is_earliest_departure_time_set();
        let lat = p.is_latest_arrival_time_set();
        let window = p.is_search_window_set();

        let mut forward = !window && (edt || !lat);
        let mut reverse = lat && !edt;

        if request.use_destination_pruning() {
            match request.direction() {
                SearchDirection::Forward => reverse = true,
                SearchDirection::Reverse => forward = true,
            }
        }

        let order = if lat && !edt {
            [SearchDirection::Reverse, SearchDirection::Forward]
        } else {
            [SearchDirection::Forward, SearchDirection::Reverse]
        };

        Self {
            forward,
            reverse,
            order,
        }
    }

    pub fn is_enabled(&self, direction: SearchDirection) -> bool {
        match direction {
            SearchDirection::Forward => self.forward,
            SearchDirection::Reverse => self.reverse,
        }
    }

    /// Enabled directions, in run order.
    pub fn run_order(&self) -> impl Iterator<Item = SearchDirection> + '_ {
        self.order.iter().copied().filter(|d| self.is_enabled(*d))
    }
}

/// Runs one request end to end.
pub struct RangeRaptorDynamicSearch {
    config: Arc<RaptorConfig>,
    data: Arc<dyn TransitDataProvider>,
    original_request: RaptorRequest,
    extra_mc_search: Option<Arc<dyn ExtraMcSearch>>,
    cancel: CancelToken,
    fwd_heuristics: HeuristicSearchTask,
    rev_heuristics: HeuristicSearchTask,
    window: SearchWindowCalculator,
}

impl RangeRaptorDynamicSearch {
    pub fn new(
        config: Arc<RaptorConfig>,
        data: Arc<dyn TransitDataProvider>,
        request: RaptorRequest,
    ) -> Self {
        let window = config
            .search_window_calculator()
            .with_search_params(request.search_params())
            .with_default_earliest_departure_time(data.valid_transit_data_start_time());
        Self {
            fwd_heuristics: Self::heuristic_task(SearchDirection::Forward, &data, &config),
            rev_heuristics: Self::heuristic_task(SearchDirection::Reverse, &data, &config),
            config,
            data,
            original_request: request,
            extra_mc_search: None,
            cancel: CancelToken::new(),
            window,
        }
    }

    /// Merge results of an extra multi-criteria search into the main one.
    pub fn with_extra_mc_search(mut self, extra: Arc<dyn ExtraMcSearch>) -> Self {
        self.extra_mc_search = Some(extra);
        self
    }

    /// Cancel the search from the outside through `cancel`.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn heuristic_task(
        direction: SearchDirection,
        data: &Arc<dyn TransitDataProvider>,
        config: &Arc<RaptorConfig>,
    ) -> HeuristicSearchTask {
        let name = match direction {
            SearchDirection::Forward => "Forward",
            SearchDirection::Reverse => "Reverse",
        };
        HeuristicSearchTask::new(direction, name, data.clone(), config.clone())
    }

    pub fn route(&mut self) -> Result<RaptorResponse, RoutingError> {
        self.config.validate_request(&self.original_request)?;
        self.check_cancelled()?;

        let plan = HeuristicPlan::for_request(&self.original_request);
        debug!(
            request = %self.original_request,
            forward = plan.forward,
            reverse = plan.reverse,
            "heuristic plan"
        );
        if plan.forward {
            self.fwd_heuristics.enable();
        }
        if plan.reverse {
            self.rev_heuristics.enable();
        }

        match self.run_heuristics(&plan) {
            Ok(()) => {}
            Err(RoutingError::DestinationNotReached) => return Ok(self.unsuccessful_response()),
            Err(e) => return Err(e),
        }

        let request = self.resolved_request();
        debug!(request = %request, "main search");
        match self.run_main_search(&request) {
            Ok(result) => Ok(RaptorResponse::success(
                result,
                self.original_request.clone(),
                request,
            )),
            Err(RoutingError::DestinationNotReached) => Ok(self.unsuccessful_response()),
            Err(e) => Err(e),
        }
    }

    /// Heuristics from the destination, when destination pruning is on.
    pub fn destination_heuristics(&self) -> Option<&Heuristics> {
        if !self.original_request.use_destination_pruning() {
            return None;
        }
        self.task(self.original_request.direction().invert()).result()
    }

    pub fn forward_heuristics(&self) -> Option<&Heuristics> {
        self.fwd_heuristics.result()
    }

    pub fn reverse_heuristics(&self) -> Option<&Heuristics> {
        self.rev_heuristics.result()
    }

    fn run_heuristics(&mut self, plan: &HeuristicPlan) -> Result<(), RoutingError> {
        let p = self.original_request.search_params();
        let parallel = self.config.is_multi_threaded()
            && self.original_request.run_in_parallel()
            && p.is_earliest_departure_time_set()
            && p.is_latest_arrival_time_set()
            && plan.forward
            && plan.reverse;

        if parallel {
            debug!("running heuristics in parallel");
            self.run_heuristics_in_parallel()?;
        } else {
            self.run_heuristics_sequentially(plan)?;
        }

        if self.original_request.debug() {
            self.fwd_heuristics.debug_compare_result(&self.rev_heuristics);
        }
        Ok(())
    }

    fn run_heuristics_sequentially(&mut self, plan: &HeuristicPlan) -> Result<(), RoutingError> {
        let cancel = self.cancel.clone();
        let mut first = true;
        for direction in plan.run_order() {
            let request = self.heuristic_request(direction);
            let task = self.task_mut(direction);
            task.with_request(request);
            task.run(&cancel)?;

            // The second task can use the tighter bounds of the first
            if first {
                self.fold_result(direction);
                first = false;
            }
        }
        Ok(())
    }

    /// Forward on the worker pool, reverse on this thread. Whichever fails
    /// first cancels the other.
    fn run_heuristics_in_parallel(&mut self) -> Result<(), RoutingError> {
        let pool = self
            .config
            .pool()
            .cloned()
            .ok_or_else(|| RoutingError::Config("no worker pool".into()))?;

        let fwd_request = self.heuristic_request(SearchDirection::Forward);
        let rev_request = self.heuristic_request(SearchDirection::Reverse);

        let placeholder = Self::heuristic_task(SearchDirection::Forward, &self.data, &self.config);
        let mut fwd = std::mem::replace(&mut self.fwd_heuristics, placeholder);
        fwd.with_request(fwd_request);

        let fwd_cancel = self.cancel.child();
        let rev_cancel = self.cancel.child();
        let handle = {
            let fwd_cancel = fwd_cancel.clone();
            let rev_cancel = rev_cancel.clone();
            pool.spawn_blocking(move || {
                let result = fwd.run(&fwd_cancel);
                if result.is_err() {
                    rev_cancel.cancel();
                }
                (fwd, result)
            })
        };

        self.rev_heuristics.with_request(rev_request);
        let rev_result = self.rev_heuristics.run(&rev_cancel);
        if rev_result.is_err() {
            fwd_cancel.cancel();
        }

        let fwd_result = match futures::executor::block_on(handle) {
            Ok((task, result)) => {
                self.fwd_heuristics = task;
                result
            }
            Err(e) => Err(self.config.map_interrupted(e)),
        };

        self.check_cancelled()?;
        match (rev_result, fwd_result) {
            (Ok(()), Ok(())) => {}
            // Reverse was stopped because forward failed
            (Err(RoutingError::Cancelled), Err(e)) | (Ok(()), Err(e)) => {
                warn!(error = %e, "forward heuristic search failed");
                return Err(e);
            }
            (Err(e), _) => return Err(e),
        }

        // Same fold as the sequential order: EDT is known, so forward first
        self.fold_result(SearchDirection::Forward);
        Ok(())
    }

    fn fold_result(&mut self, direction: SearchDirection) {
        let heuristics = match direction {
            SearchDirection::Forward => self.fwd_heuristics.result(),
            SearchDirection::Reverse => self.rev_heuristics.result(),
        };
        if let Some(h) = heuristics {
            self.window.fold_heuristics(h);
            let w = self.window.calculate();
            debug!(
                edt = w.earliest_departure_time,
                search_window = w.search_window,
                "dynamic parameters from {direction} heuristics"
            );
        }
    }

    /// The request a heuristic task runs from, with the bound its direction
    /// starts at filled in.
    fn heuristic_request(&self, direction: SearchDirection) -> RaptorRequest {
        let w = self.window.calculate();
        let builder = self.original_request.mutate();
        match direction {
            SearchDirection::Forward => builder.earliest_departure_time(w.earliest_departure_time),
            SearchDirection::Reverse => {
                let lat = self
                    .window
                    .heuristic_latest_arrival_time()
                    .unwrap_or_else(|| self.data.valid_transit_data_end_time());
                builder.latest_arrival_time(lat)
            }
        }
        .build()
    }

    /// The original request with EDT and window resolved. LAT is left as
    /// given.
    fn resolved_request(&self) -> RaptorRequest {
        let DynamicWindow {
            earliest_departure_time,
            search_window,
            ..
        } = self.window.calculate();
        self.original_request
            .mutate()
            .earliest_departure_time(earliest_departure_time)
            .search_window(search_window)
            .build()
    }

    fn run_main_search(&self, request: &RaptorRequest) -> Result<RouterResult, RoutingError> {
        self.check_cancelled()?;
        let factory = self.config.factory();
        let mut worker = if request.profile().is_multi_criteria() {
            if self.data.cost_calculator().is_none() {
                return Err(RoutingError::Config(
                    "multi-criteria search needs a cost calculator".into(),
                ));
            }
            factory.mc_worker(
                &self.data,
                request,
                self.destination_heuristics().cloned(),
                self.extra_mc_search.clone(),
            )?
        } else {
            factory.standard_worker(&self.data, request)?
        };
        worker.route(&self.cancel)
    }

    fn unsuccessful_response(&self) -> RaptorResponse {
        let request = self.resolved_request();
        debug!(request = %request, "destination not reached");
        RaptorResponse::destination_not_reached(self.original_request.clone(), request)
    }

    fn task(&self, direction: SearchDirection) -> &HeuristicSearchTask {
        match direction {
            SearchDirection::Forward => &self.fwd_heuristics,
            SearchDirection::Reverse => &self.rev_heuristics,
        }
    }

    fn task_mut(&mut self, direction: SearchDirection) -> &mut HeuristicSearchTask {
        match direction {
            SearchDirection::Forward => &mut self.fwd_heuristics,
            SearchDirection::Reverse => &mut self.rev_heuristics,
        }
    }

    fn check_cancelled(&self) -> Result<(), RoutingError> {
        if self.cancel.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Profile;

    fn request(edt: bool, lat: bool, window: bool) -> RaptorRequest {
        let mut b = RaptorRequest::builder().add_access(0, 0).add_egress(1, 0);
        if edt {
            b = b.earliest_departure_time(28_800);
        }
        if lat {
            b = b.latest_arrival_time(36_000);
        }
        if window {
            b = b.search_window(3600);
        }
        b.build()
    }

    fn order(plan: &HeuristicPlan) -> Vec<SearchDirection> {
        plan.run_order().collect()
    }

    use SearchDirection::{Forward, Reverse};

    #[test]
    fn edt_only_runs_forward_first() {
        let plan = HeuristicPlan::for_request(&request(true, false, false));
        assert!(plan.forward);
        assert!(!plan.reverse);
        assert_eq!(plan.order, [Forward, Reverse]);
    }

    #[test]
    fn lat_only_runs_reverse_first() {
        let plan = HeuristicPlan::for_request(&request(false, true, false));
        assert!(!plan.forward);
        assert!(plan.reverse);
        assert_eq!(plan.order, [Reverse, Forward]);
        assert_eq!(order(&plan), vec![Reverse]);
    }

    #[test]
    fn pruning_enables_both_in_deterministic_order() {
        let edt = request(true, false, false)
            .mutate()
            .profile(Profile::MultiCriteria)
            .destination_pruning(true)
            .build();
        assert_eq!(order(&HeuristicPlan::for_request(&edt)), vec![Forward, Reverse]);

        let lat = edt
            .mutate()
            .earliest_departure_time(None)
            .latest_arrival_time(36_000)
            .direction(Reverse)
            .build();
        assert_eq!(order(&HeuristicPlan::for_request(&lat)), vec![Reverse, Forward]);
    }

    #[test]
    fn pruning_is_ignored_for_standard_profile() {
        let r = request(true, false, false).mutate().destination_pruning(true).build();
        let plan = HeuristicPlan::for_request(&r);
        assert!(!plan.reverse);
    }

    #[test]
    fn explicit_window_and_edt_need_no_heuristics() {
        let plan = HeuristicPlan::for_request(&request(true, false, true));
        assert!(order(&plan).is_empty());
        let plan = HeuristicPlan::for_request(&request(false, false, true));
        assert!(order(&plan).is_empty());
    }

    #[test]
    fn explicit_window_and_lat_still_derive_edt() {
        let plan = HeuristicPlan::for_request(&request(false, true, true));
        assert_eq!(order(&plan), vec![Reverse]);
    }

    #[test]
    fn no_anchor_runs_forward() {
        let plan = HeuristicPlan::for_request(&request(false, false, false));
        assert_eq!(order(&plan), vec![Forward]);

        let pruned = request(false, false, false)
            .mutate()
            .profile(Profile::MultiCriteria)
            .destination_pruning(true)
            .build();
        let plan = HeuristicPlan::for_request(&pruned);
        assert_eq!(order(&plan), vec![Forward, Reverse]);
    }

    #[test]
    fn both_anchors_compute_window_forward() {
        let plan = HeuristicPlan::for_request(&request(true, true, false));
        assert_eq!(order(&plan), vec![Forward]);
        let plan = HeuristicPlan::for_request(&request(true, true, true));
        assert!(order(&plan).is_empty());
    }
}
