//! RAPTOR transit router core.
//!
//! Answers: "which heuristic searches bound this request, what search
//! window follows from them, and which trip is boarded where a constrained
//! transfer applies?"

pub mod direction;
pub mod model;
pub mod search;
pub mod time;
pub mod transfer;
