//! Identifier types.
//!
//! Stops are addressed by a dense integer index (the index used by the
//! router's arrays), everything else by a cheaply clonable string id.

use std::fmt;
use std::sync::Arc;

/// Dense index of a stop in the transit data.
pub type StopIndex = usize;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a station (a parent of one or more stops).
    StationId
);
string_id!(
    /// Identifier of a route.
    RouteId
);
string_id!(
    /// Identifier of a trip.
    TripId
);
