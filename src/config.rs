//! Configuration for the layout capacity estimator.
//!
//! An [`EstimatorConfig`] fixes the code budget and target policy for the lifetime of an
//! estimator, and selects which counter families a report shows.

use bitflags::bitflags;

use crate::{
    target::{TargetArch, TargetPolicy},
    Result,
};

/// Code memory assumed by the function-level measurement pass (12 MiB).
pub const PICOXOM_CODE_BUDGET: i64 = 12 * 1024 * 1024;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Counter families rendered by a statistics report
    pub struct Statistics : u8 {
        /// Function count, code size, leftover bytes and function placements
        const FUNCTIONS = 0x01;
        /// Block count, fall-through count and block placements
        const BLOCKS = 0x02;
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Statistics::all()
    }
}

/// Configuration for a [`crate::LayoutCapacityEstimator`].
///
/// Both function- and block-level counters are always tracked; `statistics` only decides what
/// a [`crate::StatisticsReport`] renders.
///
/// # Examples
///
/// ```rust
/// use slotscope::{EstimatorConfig, Statistics, TargetArch};
///
/// let config = EstimatorConfig::new(64 * 1024)?
///     .for_arch(TargetArch::Arm)
///     .with_statistics(Statistics::BLOCKS);
/// assert_eq!(config.budget(), 65536);
/// assert_eq!(config.policy().placement_divisor(), 2);
/// # Ok::<(), slotscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorConfig {
    budget: i64,
    policy: TargetPolicy,
    statistics: Statistics,
}

impl EstimatorConfig {
    /// Creates a configuration with the default target policy and every statistic enabled.
    ///
    /// # Arguments
    ///
    /// * `budget` - Total bytes available in the target code segment
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `budget` is negative.
    pub fn new(budget: i64) -> Result<Self> {
        if budget < 0 {
            return Err(config_error!("code budget must not be negative, got {}", budget));
        }

        Ok(EstimatorConfig {
            budget,
            policy: TargetPolicy::default(),
            statistics: Statistics::default(),
        })
    }

    /// The function-level measurement setup: 12 MiB of code memory, default policy, and only
    /// function counters reported.
    #[must_use]
    pub fn picoxom() -> Self {
        EstimatorConfig {
            budget: PICOXOM_CODE_BUDGET,
            policy: TargetPolicy::default(),
            statistics: Statistics::FUNCTIONS,
        }
    }

    /// Replaces the target policy.
    #[must_use]
    pub fn with_policy(mut self, policy: TargetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Uses the policy of a known architecture.
    #[must_use]
    pub fn for_arch(self, arch: TargetArch) -> Self {
        self.with_policy(arch.policy())
    }

    /// Replaces the set of reported statistics.
    #[must_use]
    pub fn with_statistics(mut self, statistics: Statistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Total bytes available in the code segment.
    #[must_use]
    pub const fn budget(&self) -> i64 {
        self.budget
    }

    /// Target policy used by the placement formulas.
    #[must_use]
    pub const fn policy(&self) -> TargetPolicy {
        self.policy
    }

    /// Counter families to report.
    #[must_use]
    pub const fn statistics(&self) -> Statistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_new_rejects_negative_budget() {
        assert!(matches!(
            EstimatorConfig::new(-1),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_budget_is_valid() {
        let config = EstimatorConfig::new(0).unwrap();
        assert_eq!(config.budget(), 0);
        assert_eq!(config.statistics(), Statistics::all());
        assert_eq!(config.policy(), TargetPolicy::default());
    }

    #[test]
    fn test_picoxom_preset() {
        let config = EstimatorConfig::picoxom();
        assert_eq!(config.budget(), 12_582_912);
        assert_eq!(config.statistics(), Statistics::FUNCTIONS);
        assert!(!config.statistics().contains(Statistics::BLOCKS));
    }

    #[test]
    fn test_builders() {
        let policy = TargetPolicy::new(8, 2).unwrap();
        let config = EstimatorConfig::new(100).unwrap().with_policy(policy);
        assert_eq!(config.policy().placement_divisor(), 8);
        assert_eq!(config.policy().fallthrough_penalty(), 2);

        let config = config.for_arch(TargetArch::Thumb);
        assert_eq!(config.policy(), TargetPolicy::default());
    }
}
