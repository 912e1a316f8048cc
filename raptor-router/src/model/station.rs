//! Stations.

use super::{StationId, StopIndex};

/// A station groups the stops (platforms, bays) that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: StationId,
    child_stops: Vec<StopIndex>,
}

impl Station {
    pub fn new(id: StationId, child_stops: Vec<StopIndex>) -> Self {
        Self { id, child_stops }
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    /// The stops belonging to this station.
    pub fn child_stops(&self) -> &[StopIndex] {
        &self.child_stops
    }

    pub fn contains(&self, stop: StopIndex) -> bool {
        self.child_stops.contains(&stop)
    }
}
