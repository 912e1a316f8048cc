//! Interfaces to the collaborators of the dynamic search: the transit data
//! and the routing workers.

use std::sync::Arc;

use super::{CancelToken, Heuristics, RaptorPath, RaptorRequest, RouterResult, RoutingError};
use crate::direction::SearchDirection;
use crate::model::Timetable;
use crate::time::{Seconds, Time};
use crate::transfer::{
    ConstrainedBoardingSearch, ConstrainedTransferBoarding, ConstrainedTransfersForPatterns,
    NoopConstrainedBoarding,
};

/// Cost model of multi-criteria searches.
pub trait CostCalculator: Send + Sync {
    /// Cost of boarding a trip after waiting `wait_time`.
    fn boarding_cost(&self, first_boarding: bool, wait_time: Seconds) -> i32;

    /// Cost of riding a trip for `duration`.
    fn transit_cost(&self, duration: Seconds) -> i32;
}

/// Read-only view of the loaded schedule, shared by concurrent searches.
pub trait TransitDataProvider: Send + Sync {
    fn number_of_stops(&self) -> usize;

    /// Timetable of a pattern, if the pattern runs on the search day.
    fn timetable(&self, pattern: usize) -> Option<&dyn Timetable>;

    fn valid_transit_data_start_time(&self) -> Time;

    fn valid_transit_data_end_time(&self) -> Time;

    fn cost_calculator(&self) -> Option<&dyn CostCalculator> {
        None
    }

    fn constrained_transfers(&self) -> Option<&ConstrainedTransfersForPatterns> {
        None
    }

    /// Boarding search for a pattern, a no-op if the pattern has no
    /// constrained transfers.
    fn constrained_boarding_search(
        &self,
        pattern: usize,
        direction: SearchDirection,
    ) -> Box<dyn ConstrainedTransferBoarding + '_> {
        match self.constrained_transfers() {
            Some(tx) if tx.to_stop(pattern).is_some() || tx.from_stop(pattern).is_some() => {
                Box::new(ConstrainedBoardingSearch::new(direction, tx, pattern))
            }
            _ => Box::new(NoopConstrainedBoarding),
        }
    }
}

/// Single-iteration search producing [`Heuristics`].
pub trait HeuristicWorker: Send {
    fn route(&mut self, cancel: &CancelToken) -> Result<Heuristics, RoutingError>;
}

/// Standard or multi-criteria range search.
pub trait RouterWorker: Send {
    fn route(&mut self, cancel: &CancelToken) -> Result<RouterResult, RoutingError>;
}

/// Extra multi-criteria search over an alternative view of the transit
/// data, merged into the main result.
pub trait ExtraMcSearch: Send + Sync {
    fn transit_data(&self, data: &Arc<dyn TransitDataProvider>) -> Arc<dyn TransitDataProvider>;

    fn merge(&self, main: Vec<RaptorPath>, alternative: Vec<RaptorPath>) -> Vec<RaptorPath>;
}

/// Creates routing workers for a request.
pub trait WorkerFactory: Send + Sync {
    fn heuristic_worker(
        &self,
        data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
    ) -> Result<Box<dyn HeuristicWorker>, RoutingError>;

    fn standard_worker(
        &self,
        data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
    ) -> Result<Box<dyn RouterWorker>, RoutingError>;

    /// `destination_heuristics` is set when destination pruning is on.
    fn mc_worker(
        &self,
        data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
        destination_heuristics: Option<Heuristics>,
        extra: Option<Arc<dyn ExtraMcSearch>>,
    ) -> Result<Box<dyn RouterWorker>, RoutingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatternTimetable, RouteId, Trip, TripId, TripSchedule};
    use crate::transfer::{
        ConstrainedTransfer, TransferConstraint, TransferIndexGenerator, TransferPointMatcher,
    };

    struct Data {
        patterns: Vec<PatternTimetable>,
        transfers: Option<ConstrainedTransfersForPatterns>,
    }

    impl TransitDataProvider for Data {
        fn number_of_stops(&self) -> usize {
            3
        }

        fn timetable(&self, pattern: usize) -> Option<&dyn Timetable> {
            self.patterns.get(pattern).map(|p| p as &dyn Timetable)
        }

        fn valid_transit_data_start_time(&self) -> Time {
            0
        }

        fn valid_transit_data_end_time(&self) -> Time {
            86_400
        }

        fn constrained_transfers(&self) -> Option<&ConstrainedTransfersForPatterns> {
            self.transfers.as_ref()
        }
    }

    fn data(with_transfers: bool) -> Data {
        let trip = |id: &str, p| {
            TripSchedule::with_times(
                Arc::new(Trip::new(TripId::new(id), RouteId::new("R"))),
                p,
                vec![100, 200],
            )
        };
        let patterns = vec![
            PatternTimetable::new(0, vec![0, 1], vec![trip("A", 0)]),
            PatternTimetable::new(1, vec![1, 2], vec![trip("B", 1)]),
        ];
        let transfers = with_transfers.then(|| {
            let rule = ConstrainedTransfer::new(
                TransferPointMatcher::stop(1),
                TransferPointMatcher::trip(TripId::new("B"), 1),
                TransferConstraint::builder().guaranteed().build(),
            );
            TransferIndexGenerator::new(vec![rule], &patterns).generate()
        });
        Data {
            patterns,
            transfers,
        }
    }

    #[test]
    fn boarding_search_is_noop_without_transfers() {
        let d = data(false);
        let mut search = d.constrained_boarding_search(1, SearchDirection::Forward);
        assert!(!search.transfer_exists_at_target(0));
    }

    #[test]
    fn boarding_search_uses_index_when_present() {
        let d = data(true);
        let mut forward = d.constrained_boarding_search(1, SearchDirection::Forward);
        assert!(forward.transfer_exists_at_target(0));

        let mut reverse = d.constrained_boarding_search(0, SearchDirection::Reverse);
        assert!(reverse.transfer_exists_at_target(1));
        assert!(d.timetable(5).is_none());
    }
}
