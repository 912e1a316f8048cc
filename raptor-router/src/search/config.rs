//! Router configuration.
//!
//! [`RaptorTuning`] holds the deployment parameters and can be loaded from
//! JSON. [`RaptorConfig`] binds the tuning to the worker factory and, when
//! `threads > 0`, a bounded worker pool shared by every request.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinError;
use tracing::debug;

use super::window::SearchWindowCalculator;
use super::{RaptorRequest, RoutingError, WorkerFactory};
use crate::model::PatternTimetable;
use crate::time::seconds_of;
use crate::transfer::{ConstrainedTransfer, TransferIndexGenerator};

/// Coefficients of the dynamic search-window calculation.
///
/// ```text
/// window = round_up(step, min_window + T * min_transit_time + W * min_wait_time)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWindowTuning {
    /// `T`, between 0.0 and 3.0.
    pub min_transit_time_coefficient: f64,

    /// `W`, between 0.0 and 1.0.
    pub min_wait_time_coefficient: f64,

    /// Constant part of the window (minutes).
    pub min_window_mins: i64,

    /// Upper bound of the calculated window (minutes).
    pub max_window_mins: i64,

    /// The window is rounded up to a multiple of this (minutes).
    pub step_mins: i64,
}

impl SearchWindowTuning {
    pub fn min_window(&self) -> Duration {
        Duration::minutes(self.min_window_mins)
    }

    pub fn max_window(&self) -> Duration {
        Duration::minutes(self.max_window_mins)
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(self.step_mins)
    }
}

impl Default for SearchWindowTuning {
    fn default() -> Self {
        Self {
            min_transit_time_coefficient: 0.5,
            min_wait_time_coefficient: 0.5,
            min_window_mins: 40,
            max_window_mins: 180, // 3 hours
            step_mins: 10,
        }
    }
}

/// Deployment tuning of the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaptorTuning {
    /// Threads of the shared worker pool. 0 runs every search on the
    /// calling thread.
    pub threads: usize,

    /// Dynamic search-window coefficients.
    pub search_window: SearchWindowTuning,

    /// Let a transfer rule's minimum transfer time replace the regular
    /// transfer slack instead of only extending it.
    pub min_transfer_time_is_definitive: bool,

    /// Longest search window a request may ask for (minutes).
    pub max_search_window_mins: i64,
}

impl Default for RaptorTuning {
    fn default() -> Self {
        Self {
            threads: 0,
            search_window: SearchWindowTuning::default(),
            min_transfer_time_is_definitive: false,
            max_search_window_mins: 24 * 60,
        }
    }
}

impl RaptorTuning {
    pub fn new(
        threads: usize,
        search_window: SearchWindowTuning,
        min_transfer_time_is_definitive: bool,
    ) -> Self {
        Self {
            threads,
            search_window,
            min_transfer_time_is_definitive,
            ..Self::default()
        }
    }

    pub fn max_search_window(&self) -> Duration {
        Duration::minutes(self.max_search_window_mins)
    }

    /// Parse tuning from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| RoutingError::Config(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RoutingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RoutingError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), RoutingError> {
        let sw = &self.search_window;
        if sw.step_mins <= 0 {
            return Err(RoutingError::Config("search window step must be positive".into()));
        }
        if sw.min_window_mins < 0 || sw.min_window_mins > sw.max_window_mins {
            return Err(RoutingError::Config(format!(
                "search window bounds {}..{} minutes are inconsistent",
                sw.min_window_mins, sw.max_window_mins
            )));
        }
        if self.max_search_window_mins <= 0 {
            return Err(RoutingError::Config(
                "max search window must be positive".into(),
            ));
        }
        if sw.min_transit_time_coefficient < 0.0 || sw.min_wait_time_coefficient < 0.0 {
            return Err(RoutingError::Config(
                "search window coefficients must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Tuning, worker factory and worker pool of a router instance.
pub struct RaptorConfig {
    tuning: RaptorTuning,
    factory: Arc<dyn WorkerFactory>,
    pool: Option<Arc<Runtime>>,
}

impl RaptorConfig {
    /// Build the configuration, starting the worker pool if the tuning asks
    /// for threads.
    pub fn new(tuning: RaptorTuning, factory: Arc<dyn WorkerFactory>) -> Result<Self, RoutingError> {
        tuning.validate()?;
        let pool = match tuning.threads {
            0 => None,
            n => {
                let runtime = Builder::new_multi_thread()
                    .worker_threads(n)
                    .max_blocking_threads(n)
                    .thread_name("raptor-worker")
                    .build()
                    .map_err(|e| RoutingError::Config(format!("cannot start worker pool: {e}")))?;
                debug!(threads = n, "started raptor worker pool");
                Some(Arc::new(runtime))
            }
        };
        Ok(Self {
            tuning,
            factory,
            pool,
        })
    }

    pub fn tuning(&self) -> &RaptorTuning {
        &self.tuning
    }

    pub fn factory(&self) -> &Arc<dyn WorkerFactory> {
        &self.factory
    }

    pub fn is_multi_threaded(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Option<&Arc<Runtime>> {
        self.pool.as_ref()
    }

    pub fn min_transfer_time_is_definitive(&self) -> bool {
        self.tuning.min_transfer_time_is_definitive
    }

    /// An index builder for `transfers` over `patterns`, using this
    /// configuration's minimum-transfer-time rule.
    pub fn transfer_index_generator<'a>(
        &self,
        transfers: Vec<ConstrainedTransfer>,
        patterns: &'a [PatternTimetable],
    ) -> TransferIndexGenerator<'a> {
        TransferIndexGenerator::new(transfers, patterns)
            .min_transfer_time_is_definitive(self.min_transfer_time_is_definitive())
    }

    /// Validate `request`, including the configured window limit.
    pub fn validate_request(&self, request: &RaptorRequest) -> Result<(), RoutingError> {
        request.validate()?;
        let max = seconds_of(self.tuning.max_search_window());
        match request.search_params().search_window() {
            Some(window) if window > max => Err(RoutingError::InvalidRequest(format!(
                "search window of {window}s exceeds the maximum of {max}s"
            ))),
            _ => Ok(()),
        }
    }

    /// A fresh calculator with this configuration's coefficients.
    pub fn search_window_calculator(&self) -> SearchWindowCalculator {
        SearchWindowCalculator::new(self.tuning.search_window.clone())
    }

    /// Map a failed join on the worker pool to the caller-facing error.
    pub fn map_interrupted(&self, error: JoinError) -> RoutingError {
        if error.is_cancelled() {
            return RoutingError::Cancelled;
        }
        match error.try_into_panic() {
            Ok(payload) => RoutingError::HeuristicSearchFailed(panic_message(payload.as_ref())),
            Err(e) => RoutingError::HeuristicSearchFailed(e.to_string()),
        }
    }
}

impl std::fmt::Debug for RaptorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaptorConfig")
            .field("tuning", &self.tuning)
            .field("multi_threaded", &self.is_multi_threaded())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
