//! Constrained-transfer index.
//!
//! Rules are looked up by (pattern, stop position). Each pattern has two
//! indexes: one for transfers arriving into the pattern at a stop position
//! (used when boarding in a forward search) and one for transfers departing
//! from it (used when "boarding" in a reverse search). Storing both avoids
//! re-deriving direction semantics at query time.
//!
//! The index is built once per loaded schedule and shared read-only by every
//! search.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use tracing::debug;

use super::{TransferConstraint, TransferForPattern, TransferPointMatcher};
use crate::model::PatternTimetable;

/// Transfers of one pattern, keyed by stop position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForPatternByStopPos {
    transfers: BTreeMap<usize, Vec<TransferForPattern>>,
}

impl TransferForPatternByStopPos {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule at `stop_pos`. Rules keep registration order until
    /// [`sort`](Self::sort) is called.
    pub fn add(&mut self, stop_pos: usize, transfer: TransferForPattern) {
        self.transfers.entry(stop_pos).or_default().push(transfer);
    }

    /// Order the rules at every stop position by specificity, most specific
    /// first. Rules with equal rank keep their registration order.
    pub fn sort(&mut self) {
        for list in self.transfers.values_mut() {
            list.sort_by_key(|t| Reverse(t.specificity_rank()));
        }
    }

    pub fn get(&self, stop_pos: usize) -> Option<&[TransferForPattern]> {
        self.transfers.get(&stop_pos).map(Vec::as_slice)
    }

    pub fn contains(&self, stop_pos: usize) -> bool {
        self.transfers.contains_key(&stop_pos)
    }

    /// Stop positions with at least one rule, ascending.
    pub fn stop_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.transfers.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// The arriving and departing indexes of every pattern.
#[derive(Debug, Clone, Default)]
pub struct ConstrainedTransfersForPatterns {
    to_stop: Vec<Option<TransferForPatternByStopPos>>,
    from_stop: Vec<Option<TransferForPatternByStopPos>>,
    min_transfer_time_is_definitive: bool,
}

impl ConstrainedTransfersForPatterns {
    /// Both vectors are indexed by pattern index.
    pub fn new(
        to_stop: Vec<Option<TransferForPatternByStopPos>>,
        from_stop: Vec<Option<TransferForPatternByStopPos>>,
    ) -> Self {
        Self {
            to_stop,
            from_stop,
            min_transfer_time_is_definitive: false,
        }
    }

    /// When set, a rule's minimum transfer time replaces the regular
    /// transfer calculation instead of only extending it.
    pub fn with_min_transfer_time_is_definitive(mut self, definitive: bool) -> Self {
        self.min_transfer_time_is_definitive = definitive;
        self
    }

    pub fn min_transfer_time_is_definitive(&self) -> bool {
        self.min_transfer_time_is_definitive
    }

    /// Transfers arriving into `pattern`, by target stop position.
    pub fn to_stop(&self, pattern: usize) -> Option<&TransferForPatternByStopPos> {
        self.to_stop.get(pattern).and_then(Option::as_ref)
    }

    /// Transfers departing from `pattern`, by source stop position.
    pub fn from_stop(&self, pattern: usize) -> Option<&TransferForPatternByStopPos> {
        self.from_stop.get(pattern).and_then(Option::as_ref)
    }
}

/// A transfer rule between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstrainedTransfer {
    from: TransferPointMatcher,
    to: TransferPointMatcher,
    constraint: TransferConstraint,
}

impl ConstrainedTransfer {
    pub fn new(
        from: TransferPointMatcher,
        to: TransferPointMatcher,
        constraint: TransferConstraint,
    ) -> Self {
        Self {
            from,
            to,
            constraint,
        }
    }

    pub fn from(&self) -> &TransferPointMatcher {
        &self.from
    }

    pub fn to(&self) -> &TransferPointMatcher {
        &self.to
    }

    pub fn constraint(&self) -> &TransferConstraint {
        &self.constraint
    }

    /// Combined specificity of both endpoints. Ties on the sum are broken
    /// by the source endpoint.
    pub fn specificity_ranking(&self) -> u16 {
        let from = u16::from(self.from.specificity_ranking());
        let to = u16::from(self.to.specificity_ranking());
        (from + to) * 10 + from
    }
}

/// Builds [`ConstrainedTransfersForPatterns`] from rules and patterns.
pub struct TransferIndexGenerator<'a> {
    transfers: Vec<ConstrainedTransfer>,
    patterns: &'a [PatternTimetable],
    min_transfer_time_is_definitive: bool,
}

impl<'a> TransferIndexGenerator<'a> {
    pub fn new(transfers: Vec<ConstrainedTransfer>, patterns: &'a [PatternTimetable]) -> Self {
        Self {
            transfers,
            patterns,
            min_transfer_time_is_definitive: false,
        }
    }

    pub fn min_transfer_time_is_definitive(mut self, definitive: bool) -> Self {
        self.min_transfer_time_is_definitive = definitive;
        self
    }

    /// Anchor every rule at each pattern stop position its endpoints cover.
    pub fn generate(self) -> ConstrainedTransfersForPatterns {
        let n_patterns = self
            .patterns
            .iter()
            .map(|p| p.pattern_index() + 1)
            .max()
            .unwrap_or(0);
        let mut to_stop: Vec<Option<TransferForPatternByStopPos>> = vec![None; n_patterns];
        let mut from_stop: Vec<Option<TransferForPatternByStopPos>> = vec![None; n_patterns];
        let mut anchored = 0usize;

        for tx in &self.transfers {
            let rank = tx.specificity_ranking();

            for pattern in self.patterns {
                let p = pattern.pattern_index();

                for stop_pos in 0..pattern.stops().len() {
                    // Boarding the pattern here: the source side is matched at query time
                    if tx.to.matches_pattern(pattern, stop_pos) {
                        to_stop[p].get_or_insert_with(Default::default).add(
                            stop_pos,
                            TransferForPattern::new(
                                tx.from.clone(),
                                tx.to.trip_id().cloned(),
                                tx.constraint,
                                rank,
                            ),
                        );
                        anchored += 1;
                    }
                    // Leaving the pattern here: mirrored for the reverse search
                    if tx.from.matches_pattern(pattern, stop_pos) {
                        from_stop[p].get_or_insert_with(Default::default).add(
                            stop_pos,
                            TransferForPattern::new(
                                tx.to.clone(),
                                tx.from.trip_id().cloned(),
                                tx.constraint,
                                rank,
                            ),
                        );
                        anchored += 1;
                    }
                }
            }
        }

        for index in to_stop.iter_mut().chain(from_stop.iter_mut()).flatten() {
            index.sort();
        }

        debug!(
            transfers = self.transfers.len(),
            patterns = self.patterns.len(),
            anchored,
            "built constrained transfer index"
        );

        ConstrainedTransfersForPatterns::new(to_stop, from_stop)
            .with_min_transfer_time_is_definitive(self.min_transfer_time_is_definitive)
    }
}
