//! Running counters and the capacity metrics derived from them.

use std::fmt;

use crate::{target::TargetPolicy, Result};

/// The four running counters an estimator accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Counters {
    pub(crate) functions: i64,
    pub(crate) blocks: i64,
    pub(crate) code_size: i64,
    pub(crate) fall_throughs: i64,
}

impl Counters {
    fn checked_add(self, other: Counters) -> Option<Counters> {
        Some(Counters {
            functions: self.functions.checked_add(other.functions)?,
            blocks: self.blocks.checked_add(other.blocks)?,
            code_size: self.code_size.checked_add(other.code_size)?,
            fall_throughs: self.fall_throughs.checked_add(other.fall_throughs)?,
        })
    }
}

/// A point-in-time copy of an estimator's counters.
///
/// Only the counters, the budget and the policy are stored. Leftover bytes and both
/// placement counts are computed on every call, so they can never disagree with the
/// counters. Every derived value may be negative once the code outgrows the budget; that
/// means no safe randomization capacity remains and is not an error.
///
/// Counters are non-negative `i64`s, so `budget - code_size` always fits an `i64`. The
/// placement counts do not (a large penalty times many fall-throughs), and are returned as
/// `i128` so they stay exact.
///
/// # Examples
///
/// ```rust
/// use slotscope::{BlockObservation, EstimatorConfig, FunctionObservation, LayoutCapacityEstimator};
///
/// let mut estimator = LayoutCapacityEstimator::new(EstimatorConfig::new(1024)?);
/// estimator.observe_function(&FunctionObservation::new(vec![
///     BlockObservation::new(false, vec![4, 4, 4]),
/// ]))?;
///
/// let state = estimator.snapshot();
/// assert_eq!(state.leftover_bytes(), 1012);
/// assert_eq!(state.function_placement_count(), 507);
/// assert_eq!(state.block_placement_count(), 507);
/// # Ok::<(), slotscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EstimatorState {
    budget: i64,
    policy: TargetPolicy,
    counters: Counters,
}

impl EstimatorState {
    pub(crate) fn new(budget: i64, policy: TargetPolicy, counters: Counters) -> Self {
        EstimatorState {
            budget,
            policy,
            counters,
        }
    }

    /// Code budget the state was measured against.
    #[must_use]
    pub const fn budget(&self) -> i64 {
        self.budget
    }

    /// Policy used for the placement formulas.
    #[must_use]
    pub const fn policy(&self) -> TargetPolicy {
        self.policy
    }

    /// Functions with at least one basic block observed so far.
    #[must_use]
    pub const fn function_count(&self) -> i64 {
        self.counters.functions
    }

    /// Basic blocks observed so far.
    #[must_use]
    pub const fn block_count(&self) -> i64 {
        self.counters.blocks
    }

    /// Sum of every observed instruction size.
    #[must_use]
    pub const fn code_size_bytes(&self) -> i64 {
        self.counters.code_size
    }

    /// Blocks that fall through into their layout successor.
    #[must_use]
    pub const fn fall_through_count(&self) -> i64 {
        self.counters.fall_throughs
    }

    /// `budget - code_size_bytes`.
    #[must_use]
    pub const fn leftover_bytes(&self) -> i64 {
        self.budget - self.counters.code_size
    }

    /// Whether the observed code no longer fits in the budget.
    #[must_use]
    pub const fn is_over_budget(&self) -> bool {
        self.leftover_bytes() < 0
    }

    /// `function_count + floor(leftover_bytes / divisor)`.
    #[must_use]
    pub const fn function_placement_count(&self) -> i128 {
        self.counters.functions as i128 + self.policy.slots(self.leftover_bytes()) as i128
    }

    /// `block_count + floor(leftover_bytes / divisor) - fall_through_count * penalty`.
    ///
    /// Falls below [`Self::function_placement_count`] once the branch penalty outweighs the
    /// extra blocks.
    #[must_use]
    pub const fn block_placement_count(&self) -> i128 {
        self.counters.blocks as i128 + self.policy.slots(self.leftover_bytes()) as i128
            - self.counters.fall_throughs as i128 * self.policy.fallthrough_penalty() as i128
    }

    /// Combines the counters of two states measured against the same budget and policy.
    ///
    /// Used to roll independently estimated compilation units up into whole-program totals.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the budgets or policies differ, or
    /// [`crate::Error::InvalidObservation`] if a combined counter does not fit an `i64`.
    pub fn merge(&self, other: &EstimatorState) -> Result<EstimatorState> {
        if self.budget != other.budget {
            return Err(config_error!(
                "cannot merge states with budgets {} and {}",
                self.budget,
                other.budget
            ));
        }
        if self.policy != other.policy {
            return Err(config_error!(
                "cannot merge states with policies {:?} and {:?}",
                self.policy,
                other.policy
            ));
        }

        let counters = self
            .counters
            .checked_add(other.counters)
            .ok_or_else(|| observation_error!("merged counters overflow: {} + {}", self, other))?;

        Ok(EstimatorState::new(self.budget, self.policy, counters))
    }
}

impl fmt::Display for EstimatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "functions={} blocks={} code={}B leftover={}B fall-throughs={} function-places={} block-places={}",
            self.function_count(),
            self.block_count(),
            self.code_size_bytes(),
            self.leftover_bytes(),
            self.fall_through_count(),
            self.function_placement_count(),
            self.block_placement_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn state(
        budget: i64,
        functions: i64,
        blocks: i64,
        code_size: i64,
        falls: i64,
    ) -> EstimatorState {
        EstimatorState::new(
            budget,
            TargetPolicy::default(),
            Counters {
                functions,
                blocks,
                code_size,
                fall_throughs: falls,
            },
        )
    }

    #[test]
    fn test_derived_metrics() {
        let s = state(1024, 2, 3, 24, 1);
        assert_eq!(s.leftover_bytes(), 1000);
        assert_eq!(s.function_placement_count(), 502);
        assert_eq!(s.block_placement_count(), 499);
        assert!(!s.is_over_budget());
    }

    #[test]
    fn test_negative_leftover_is_not_clamped() {
        let s = state(1024, 3, 4, 2025, 1);
        assert_eq!(s.leftover_bytes(), -1001);
        // floor(-1001 / 2) = -501
        assert_eq!(s.function_placement_count(), 3 - 501);
        assert_eq!(s.block_placement_count(), 4 - 501 - 4);
        assert!(s.is_over_budget());
    }

    #[test]
    fn test_block_places_below_function_places() {
        let s = state(16, 1, 2, 0, 2);
        assert_eq!(s.function_placement_count(), 9);
        assert_eq!(s.block_placement_count(), 2);
    }

    #[test]
    fn test_custom_policy() {
        let s = EstimatorState::new(
            100,
            TargetPolicy::new(4, 8).unwrap(),
            Counters {
                functions: 1,
                blocks: 2,
                code_size: 20,
                fall_throughs: 1,
            },
        );
        assert_eq!(s.function_placement_count(), 21);
        assert_eq!(s.block_placement_count(), 14);
    }

    #[test]
    fn test_merge() {
        let merged = state(1024, 1, 1, 12, 0)
            .merge(&state(1024, 1, 2, 12, 1))
            .unwrap();
        assert_eq!(merged, state(1024, 2, 3, 24, 1));
    }

    #[test]
    fn test_merge_mismatched_budget() {
        assert!(matches!(
            state(1024, 0, 0, 0, 0).merge(&state(2048, 0, 0, 0, 0)),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_merge_overflow() {
        let full = state(i64::MAX, 1, 1, i64::MAX, 0);
        assert!(matches!(
            full.merge(&state(i64::MAX, 1, 1, 1, 0)),
            Err(Error::InvalidObservation { .. })
        ));
        assert!(full.merge(&state(i64::MAX, 1, 1, 0, 0)).is_ok());
    }

    #[test]
    fn test_extreme_penalty_is_exact() {
        let s = EstimatorState::new(
            i64::MAX,
            TargetPolicy::new(1, i64::MAX).unwrap(),
            Counters {
                functions: 1,
                blocks: 2,
                code_size: 0,
                fall_throughs: 2,
            },
        );
        let max = i128::from(i64::MAX);
        assert_eq!(s.leftover_bytes(), i64::MAX);
        assert_eq!(s.function_placement_count(), 1 + max);
        assert_eq!(s.block_placement_count(), 2 + max - 2 * max);
    }

    #[test]
    fn test_extreme_leftover_is_exact() {
        let s = state(0, i64::MAX, i64::MAX, i64::MAX, i64::MAX);
        let max = i128::from(i64::MAX);
        assert_eq!(s.leftover_bytes(), -i64::MAX);
        // floor(-max / 2) = -(max + 1) / 2
        assert_eq!(s.function_placement_count(), max - (max + 1) / 2);
        assert_eq!(s.block_placement_count(), max - (max + 1) / 2 - 4 * max);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            state(1024, 1, 1, 12, 0).to_string(),
            "functions=1 blocks=1 code=12B leftover=1012B fall-throughs=0 function-places=507 block-places=507"
        );
    }
}
