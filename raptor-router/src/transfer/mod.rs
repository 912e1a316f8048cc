//! Constrained transfers: rules that override regular transfer behaviour
//! between specific stops, routes or trips, and the boarding search that
//! applies them.

mod boarding_event;
mod boarding_search;
mod constraint;
mod for_pattern;
mod index;
mod point;

pub use boarding_event::{BoardingEvent, ConstrainedBoarding};
pub use boarding_search::{
    ABORT_SEARCH_AFTER_N_VALID_NORMAL_TRIPS, ConstrainedBoardingSearch,
    ConstrainedTransferBoarding, NoopConstrainedBoarding,
};
pub use constraint::{TransferConstraint, TransferConstraintBuilder, TransferPriority};
pub use for_pattern::TransferForPattern;
pub use index::{
    ConstrainedTransfer, ConstrainedTransfersForPatterns, TransferForPatternByStopPos,
    TransferIndexGenerator,
};
pub use point::TransferPointMatcher;
