//! Code-layout capacity estimation.
//!
//! [`LayoutCapacityEstimator`] consumes one function at a time, the way a compiler emits them,
//! and keeps the running totals needed to answer how many distinct slots a randomizing linker
//! could place functions and basic blocks into:
//!
//! ```text
//! leftover        = budget - code_size
//! function_places = functions + floor(leftover / divisor)
//! block_places    = blocks + floor(leftover / divisor) - fall_throughs * penalty
//! ```
//!
//! The divisor encodes the minimum placement alignment and the penalty the size of the branch
//! that replaces a fall-through once its block is moved; both come from
//! [`crate::TargetPolicy`].
//!
//! # Key Types
//! - [`LayoutCapacityEstimator`] - Single-producer accumulator
//! - [`EstimatorState`] - Snapshot of the counters with derived metrics
//! - [`SharedEstimator`] - Lock-guarded handle for one producer and many observers
//! - [`estimate_units`] - Parallel estimation over independent compilation units

mod shared;
mod state;
mod units;

pub use shared::SharedEstimator;
pub use state::EstimatorState;
pub use units::{estimate_units, UnitEstimates};

use log::{debug, trace, warn};

use crate::{
    config::EstimatorConfig, facts::FunctionFacts, observation::FunctionObservation, Result,
};
use state::Counters;

/// Accumulates per-function layout facts and derives placement capacity.
///
/// The estimator has a single state: it accumulates from construction until it is dropped.
/// It does no internal synchronisation; wrap it in a [`SharedEstimator`] or give each
/// compilation unit its own instance.
///
/// # Examples
///
/// ```rust
/// use slotscope::{BlockObservation, FunctionObservation, LayoutCapacityEstimator};
///
/// let mut estimator = LayoutCapacityEstimator::with_budget(1024)?;
/// estimator.observe_function(&FunctionObservation::new(vec![
///     BlockObservation::new(true, vec![4, 4]),
///     BlockObservation::new(false, vec![4]),
/// ]))?;
///
/// let state = estimator.snapshot();
/// assert_eq!(state.fall_through_count(), 1);
/// assert_eq!(state.block_placement_count(), 2 + 506 - 4);
/// # Ok::<(), slotscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LayoutCapacityEstimator {
    config: EstimatorConfig,
    counters: Counters,
}

impl LayoutCapacityEstimator {
    /// Creates an empty estimator.
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        LayoutCapacityEstimator {
            config,
            counters: Counters::default(),
        }
    }

    /// Creates an empty estimator with the default target policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `budget` is negative.
    pub fn with_budget(budget: i64) -> Result<Self> {
        Ok(LayoutCapacityEstimator::new(EstimatorConfig::new(budget)?))
    }

    /// The configuration the estimator was built with.
    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Adds one function to the running totals.
    ///
    /// Every block bumps the block count, fall-through blocks bump the fall-through count, and
    /// every instruction size is added to the code size. The function itself is only counted
    /// when it has a body, so a bodyless declaration changes nothing.
    ///
    /// The observation is validated up front; a rejected observation leaves the counters
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidObservation`] if any instruction size is negative, or if
    /// the running code size would no longer fit in an `i64`.
    pub fn observe_function(&mut self, observation: &FunctionObservation) -> Result<()> {
        self.observe_named(None, observation)
    }

    /// Adds the function described by a facts provider.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidObservation`] if any instruction size is negative.
    pub fn observe<F: FunctionFacts + ?Sized>(&mut self, facts: &F) -> Result<()> {
        self.observe_named(facts.name(), &facts.observation())
    }

    /// Adds every function yielded by `functions`, in order.
    ///
    /// Stops at the first invalid observation; functions before it stay counted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidObservation`] for the first invalid function.
    pub fn observe_all<'a, F, I>(&mut self, functions: I) -> Result<()>
    where
        F: FunctionFacts + ?Sized + 'a,
        I: IntoIterator<Item = &'a F>,
    {
        functions
            .into_iter()
            .try_for_each(|function| self.observe(function))
    }

    /// Current counters with freshly computed derived metrics.
    #[must_use]
    pub fn snapshot(&self) -> EstimatorState {
        EstimatorState::new(self.config.budget(), self.config.policy(), self.counters)
    }

    fn observe_named(
        &mut self,
        name: Option<&str>,
        observation: &FunctionObservation,
    ) -> Result<()> {
        observation.validate()?;

        let name = name.unwrap_or("<anonymous>");
        if !observation.has_body && observation.blocks.is_empty() {
            trace!("skipping bodyless function {}", name);
            return Ok(());
        }

        let size = observation.size();
        let code_size = i64::try_from(i128::from(self.counters.code_size) + size).map_err(|_| {
            observation_error!(
                "function {} of {} bytes overflows the code size counter at {} bytes",
                name,
                size,
                self.counters.code_size
            )
        })?;

        let was_over_budget = self.snapshot().is_over_budget();

        for block in &observation.blocks {
            self.counters.blocks += 1;
            if block.can_fall_through {
                self.counters.fall_throughs += 1;
            }
        }
        self.counters.code_size = code_size;

        if observation.has_body {
            self.counters.functions += 1;
        }

        debug!(
            "observed function {}: {} blocks, {} bytes",
            name,
            observation.blocks.len(),
            size
        );

        let state = self.snapshot();
        if !was_over_budget && state.is_over_budget() {
            warn!(
                "code size {} bytes exceeds the {} byte budget after function {}",
                state.code_size_bytes(),
                state.budget(),
                name
            );
        }

        Ok(())
    }
}
