//! In-memory transit data and scripted routing workers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use raptor_router::direction::SearchDirection;
use raptor_router::model::Timetable;
use raptor_router::search::{
    CancelToken, CostCalculator, ExtraMcSearch, HeuristicWorker, Heuristics, RaptorConfig,
    RaptorPath, RaptorRequest, RaptorTuning, RouterResult, RouterWorker, RoutingError,
    StopArrivals, TransitDataProvider, WorkerFactory,
};
use raptor_router::time::{Seconds, Time};

/// First second of the loaded transit data, 05:00.
pub const DATA_START: Time = 18_000;
/// Last second of the loaded transit data, 23:00.
pub const DATA_END: Time = 82_800;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct FlatCost;

impl CostCalculator for FlatCost {
    fn boarding_cost(&self, first_boarding: bool, wait_time: Seconds) -> i32 {
        if first_boarding { 0 } else { 600 + wait_time }
    }

    fn transit_cost(&self, duration: Seconds) -> i32 {
        duration
    }
}

/// Transit data with no patterns; the scripted workers never read it.
pub struct Data {
    cost: Option<FlatCost>,
}

impl Data {
    pub fn shared() -> Arc<dyn TransitDataProvider> {
        Arc::new(Self {
            cost: Some(FlatCost),
        })
    }

    pub fn without_cost_calculator() -> Arc<dyn TransitDataProvider> {
        Arc::new(Self { cost: None })
    }
}

impl TransitDataProvider for Data {
    fn number_of_stops(&self) -> usize {
        4
    }

    fn timetable(&self, _pattern: usize) -> Option<&dyn Timetable> {
        None
    }

    fn valid_transit_data_start_time(&self) -> Time {
        DATA_START
    }

    fn valid_transit_data_end_time(&self) -> Time {
        DATA_END
    }

    fn cost_calculator(&self) -> Option<&dyn CostCalculator> {
        self.cost.as_ref().map(|c| c as &dyn CostCalculator)
    }
}

/// What a scripted heuristic worker does.
#[derive(Debug, Clone)]
pub enum Script {
    Reach(Heuristics),
    Unreached,
    Fail(String),
    /// Spin until cancelled, then report cancellation.
    WaitForCancel,
}

struct ScriptedHeuristic(Script);

impl HeuristicWorker for ScriptedHeuristic {
    fn route(&mut self, cancel: &CancelToken) -> Result<Heuristics, RoutingError> {
        match &self.0 {
            Script::Reach(h) => Ok(h.clone()),
            Script::Unreached => Ok(Heuristics::unreached()),
            Script::Fail(msg) => Err(RoutingError::Worker(msg.clone())),
            Script::WaitForCancel => {
                let deadline = Instant::now() + Duration::from_secs(5);
                while !cancel.is_cancelled() {
                    if Instant::now() > deadline {
                        return Err(RoutingError::Worker("never cancelled".into()));
                    }
                    thread::sleep(Duration::from_millis(1));
                }
                Err(RoutingError::Cancelled)
            }
        }
    }
}

struct ScriptedMain(Option<Vec<RaptorPath>>);

impl RouterWorker for ScriptedMain {
    fn route(&mut self, _cancel: &CancelToken) -> Result<RouterResult, RoutingError> {
        match self.0.take() {
            Some(paths) => Ok(RouterResult {
                paths,
                stop_arrivals: StopArrivals::new(vec![Some(DATA_START), None, None, Some(31_500)]),
            }),
            None => Err(RoutingError::DestinationNotReached),
        }
    }
}

/// A main-search worker creation seen by the factory.
#[derive(Debug, Clone, PartialEq)]
pub struct MainCall {
    pub request: RaptorRequest,
    pub multi_criteria: bool,
    pub destination_heuristics: Option<Heuristics>,
    pub extra_mc_search: bool,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub heuristic: Vec<RaptorRequest>,
    pub main: Vec<MainCall>,
}

/// Factory handing out scripted workers and recording what it was asked.
pub struct Factory {
    forward: Script,
    reverse: Script,
    paths: Option<Vec<RaptorPath>>,
    calls: Mutex<Calls>,
}

impl Factory {
    pub fn new(forward: Script, reverse: Script) -> Self {
        Self {
            forward,
            reverse,
            paths: Some(vec![RaptorPath::new(28_800, 31_500, 1).with_generalized_cost(4200)]),
            calls: Mutex::new(Calls::default()),
        }
    }

    /// Both heuristics reach the destination; the main search finds one
    /// path.
    pub fn reaching() -> Self {
        Self::new(
            Script::Reach(Heuristics::new(1800, 300)),
            Script::Reach(Heuristics::new(2100, 0)),
        )
    }

    pub fn main_not_reached(mut self) -> Self {
        self.paths = None;
        self
    }

    pub fn heuristic_requests(&self) -> Vec<RaptorRequest> {
        self.calls.lock().unwrap().heuristic.clone()
    }

    pub fn heuristic_directions(&self) -> Vec<SearchDirection> {
        self.heuristic_requests().iter().map(|r| r.direction()).collect()
    }

    pub fn main_calls(&self) -> Vec<MainCall> {
        self.calls.lock().unwrap().main.clone()
    }

    fn record_main(&self, call: MainCall) -> Box<dyn RouterWorker> {
        self.calls.lock().unwrap().main.push(call);
        Box::new(ScriptedMain(self.paths.clone()))
    }
}

impl WorkerFactory for Factory {
    fn heuristic_worker(
        &self,
        _data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
    ) -> Result<Box<dyn HeuristicWorker>, RoutingError> {
        self.calls.lock().unwrap().heuristic.push(request.clone());
        let script = match request.direction() {
            SearchDirection::Forward => self.forward.clone(),
            SearchDirection::Reverse => self.reverse.clone(),
        };
        Ok(Box::new(ScriptedHeuristic(script)))
    }

    fn standard_worker(
        &self,
        _data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
    ) -> Result<Box<dyn RouterWorker>, RoutingError> {
        Ok(self.record_main(MainCall {
            request: request.clone(),
            multi_criteria: false,
            destination_heuristics: None,
            extra_mc_search: false,
        }))
    }

    fn mc_worker(
        &self,
        _data: &Arc<dyn TransitDataProvider>,
        request: &RaptorRequest,
        destination_heuristics: Option<Heuristics>,
        extra: Option<Arc<dyn ExtraMcSearch>>,
    ) -> Result<Box<dyn RouterWorker>, RoutingError> {
        Ok(self.record_main(MainCall {
            request: request.clone(),
            multi_criteria: true,
            destination_heuristics,
            extra_mc_search: extra.is_some(),
        }))
    }
}

/// Keeps the main result.
pub struct KeepMain;

impl ExtraMcSearch for KeepMain {
    fn transit_data(&self, data: &Arc<dyn TransitDataProvider>) -> Arc<dyn TransitDataProvider> {
        data.clone()
    }

    fn merge(&self, main: Vec<RaptorPath>, _alternative: Vec<RaptorPath>) -> Vec<RaptorPath> {
        main
    }
}

pub fn config(threads: usize, factory: &Arc<Factory>) -> Arc<RaptorConfig> {
    let tuning = RaptorTuning {
        threads,
        ..RaptorTuning::default()
    };
    Arc::new(RaptorConfig::new(tuning, factory.clone()).unwrap())
}
