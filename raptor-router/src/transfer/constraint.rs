//! Transfer constraints.
//!
//! A constraint describes how one transfer rule changes boarding: it may
//! guarantee the connection, keep the passenger seated, forbid it, or
//! override the minimum transfer time.

use std::fmt;

use crate::direction::SearchDirection;
use crate::time::{Seconds, Time};

/// Priority of a transfer as given by the timetable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TransferPriority {
    /// The transfer is forbidden.
    NotAllowed,
    #[default]
    Allowed,
    Recommended,
    Preferred,
}

/// The effect of a transfer rule on boarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferConstraint {
    priority: TransferPriority,
    stay_seated: bool,
    guaranteed: bool,
    min_transfer_time: Option<Seconds>,
}

impl TransferConstraint {
    /// The constraint of a transfer no rule applies to.
    pub const REGULAR: TransferConstraint = TransferConstraint {
        priority: TransferPriority::Allowed,
        stay_seated: false,
        guaranteed: false,
        min_transfer_time: None,
    };

    pub fn builder() -> TransferConstraintBuilder {
        TransferConstraintBuilder {
            constraint: Self::REGULAR,
        }
    }

    pub fn priority(&self) -> TransferPriority {
        self.priority
    }

    pub fn is_stay_seated(&self) -> bool {
        self.stay_seated
    }

    pub fn is_guaranteed(&self) -> bool {
        self.guaranteed
    }

    /// Stay-seated and guaranteed transfers bypass every slack and
    /// minimum-transfer-time check.
    pub fn is_facilitated(&self) -> bool {
        self.stay_seated || self.guaranteed
    }

    pub fn is_not_allowed(&self) -> bool {
        self.priority == TransferPriority::NotAllowed
    }

    pub fn min_transfer_time(&self) -> Option<Seconds> {
        self.min_transfer_time
    }

    /// Returns true if the constraint does not change regular boarding.
    pub fn is_regular(&self) -> bool {
        *self == Self::REGULAR
    }

    /// Earliest time (in search order) the target trip can be boarded.
    ///
    /// * facilitated: the source arrival time itself.
    /// * min-transfer-time set: source arrival plus the minimum transfer time
    ///   and transfer slack. Unless `min_transfer_time_is_definitive`, the
    ///   regular target time still applies if it is later.
    /// * otherwise: the regular target time.
    pub fn calculate_transfer_target_time(
        &self,
        source_arrival_time: Time,
        transfer_slack: Seconds,
        regular_target_time: impl FnOnce() -> Time,
        direction: SearchDirection,
        min_transfer_time_is_definitive: bool,
    ) -> Time {
        if self.is_facilitated() {
            return source_arrival_time;
        }

        if let Some(min_transfer_time) = self.min_transfer_time {
            let target = direction.plus(source_arrival_time, min_transfer_time + transfer_slack);
            if min_transfer_time_is_definitive {
                return target;
            }
            return direction.max(target, regular_target_time());
        }

        regular_target_time()
    }
}

impl Default for TransferConstraint {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl fmt::Display for TransferConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_regular() {
            return write!(f, "{{regular}}");
        }
        let mut parts: Vec<String> = Vec::new();
        if self.priority != TransferPriority::Allowed {
            parts.push(format!("priority: {:?}", self.priority));
        }
        if self.stay_seated {
            parts.push("stay-seated".to_string());
        }
        if self.guaranteed {
            parts.push("guaranteed".to_string());
        }
        if let Some(mtt) = self.min_transfer_time {
            parts.push(format!("min-transfer-time: {mtt}s"));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Builder for [`TransferConstraint`], starting from the regular constraint.
#[derive(Debug, Clone)]
pub struct TransferConstraintBuilder {
    constraint: TransferConstraint,
}

impl TransferConstraintBuilder {
    pub fn priority(mut self, priority: TransferPriority) -> Self {
        self.constraint.priority = priority;
        self
    }

    pub fn not_allowed(self) -> Self {
        self.priority(TransferPriority::NotAllowed)
    }

    pub fn stay_seated(mut self) -> Self {
        self.constraint.stay_seated = true;
        self
    }

    pub fn guaranteed(mut self) -> Self {
        self.constraint.guaranteed = true;
        self
    }

    pub fn min_transfer_time(mut self, seconds: Seconds) -> Self {
        self.constraint.min_transfer_time = Some(seconds);
        self
    }

    pub fn build(self) -> TransferConstraint {
        self.constraint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRIVAL: Time = 36_000;
    const SLACK: Seconds = 60;

    fn regular_forward() -> Time {
        ARRIVAL + 120
    }

    #[test]
    fn builder_flags() {
        let c = TransferConstraint::builder().guaranteed().build();
        assert!(c.is_guaranteed());
        assert!(c.is_facilitated());
        assert!(!c.is_regular());

        let c = TransferConstraint::builder().stay_seated().build();
        assert!(c.is_stay_seated());
        assert!(c.is_facilitated());

        let c = TransferConstraint::builder().not_allowed().build();
        assert!(c.is_not_allowed());
        assert!(!c.is_facilitated());

        assert!(TransferConstraint::default().is_regular());
        assert!(!TransferConstraint::builder().min_transfer_time(0).build().is_regular());
    }

    #[test]
    fn facilitated_target_time_is_arrival() {
        let c = TransferConstraint::builder()
            .guaranteed()
            .min_transfer_time(900)
            .build();
        for direction in [SearchDirection::Forward, SearchDirection::Reverse] {
            let t = c.calculate_transfer_target_time(ARRIVAL, SLACK, || 0, direction, false);
            assert_eq!(t, ARRIVAL);
        }
    }

    #[test]
    fn regular_target_time_is_passed_through() {
        let t = TransferConstraint::REGULAR.calculate_transfer_target_time(
            ARRIVAL,
            SLACK,
            regular_forward,
            SearchDirection::Forward,
            false,
        );
        assert_eq!(t, regular_forward());
    }

    #[test]
    fn min_transfer_time_can_only_delay_regular_boarding() {
        let long = TransferConstraint::builder().min_transfer_time(600).build();
        let short = TransferConstraint::builder().min_transfer_time(0).build();

        let fwd = SearchDirection::Forward;
        assert_eq!(
            long.calculate_transfer_target_time(ARRIVAL, SLACK, regular_forward, fwd, false),
            ARRIVAL + 660
        );
        assert_eq!(
            short.calculate_transfer_target_time(ARRIVAL, SLACK, regular_forward, fwd, false),
            regular_forward()
        );
    }

    #[test]
    fn definitive_min_transfer_time_overrides_regular_boarding() {
        let short = TransferConstraint::builder().min_transfer_time(0).build();
        let t = short.calculate_transfer_target_time(
            ARRIVAL,
            0,
            regular_forward,
            SearchDirection::Forward,
            true,
        );
        assert_eq!(t, ARRIVAL);
    }

    #[test]
    fn reverse_min_transfer_time_moves_backwards() {
        let c = TransferConstraint::builder().min_transfer_time(600).build();
        let t = c.calculate_transfer_target_time(
            ARRIVAL,
            0,
            || ARRIVAL - 120,
            SearchDirection::Reverse,
            false,
        );
        assert_eq!(t, ARRIVAL - 600);
    }

    #[test]
    fn display() {
        assert_eq!(TransferConstraint::REGULAR.to_string(), "{regular}");
        let c = TransferConstraint::builder()
            .guaranteed()
            .min_transfer_time(120)
            .build();
        assert_eq!(c.to_string(), "{guaranteed, min-transfer-time: 120s}");
        let c = TransferConstraint::builder().not_allowed().build();
        assert_eq!(c.to_string(), "{priority: NotAllowed}");
    }
}
