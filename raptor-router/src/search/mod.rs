//! Dynamic search orchestration.
//!
//! [`RangeRaptorDynamicSearch`] is the entry point: it validates a
//! [`RaptorRequest`], runs the heuristic searches it needs, resolves the
//! open time bounds and dispatches the main search to a worker created by
//! the configured [`WorkerFactory`].

mod cancel;
mod config;
mod dynamic_search;
mod error;
mod heuristic_task;
mod heuristics;
mod provider;
mod request;
mod response;
mod window;

pub use cancel::CancelToken;
pub use config::{RaptorConfig, RaptorTuning, SearchWindowTuning};
pub use dynamic_search::{HeuristicPlan, RangeRaptorDynamicSearch};
pub use error::RoutingError;
pub use heuristic_task::HeuristicSearchTask;
pub use heuristics::Heuristics;
pub use provider::{
    CostCalculator, ExtraMcSearch, HeuristicWorker, RouterWorker, TransitDataProvider,
    WorkerFactory,
};
pub use request::{
    Optimizations, Profile, RaptorRequest, RaptorRequestBuilder, SearchParams, StopAccess,
};
pub use response::{RaptorPath, RaptorResponse, RouterResult, StopArrivals};
pub use window::{DynamicWindow, SearchWindowCalculator};
