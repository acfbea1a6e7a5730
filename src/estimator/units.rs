//! Parallel estimation over independent compilation units.

use rayon::prelude::*;

use crate::{
    config::EstimatorConfig,
    estimator::{EstimatorState, LayoutCapacityEstimator},
    facts::FunctionFacts,
    Result,
};

/// Per-unit snapshots together with the whole-program roll-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitEstimates {
    /// One state per compilation unit, in input order.
    pub units: Vec<EstimatorState>,
    /// Sum of all unit counters measured against the shared budget.
    pub total: EstimatorState,
}

/// Estimates every compilation unit on its own estimator, in parallel.
///
/// Each unit is processed in its own order by exactly one worker, so no estimator is ever
/// shared. Because counters are additive, `total` equals what a single estimator fed every
/// unit in sequence would report.
///
/// # Arguments
///
/// * `config` - Budget and policy shared by every unit and by the total
/// * `units` - Compilation units, each a list of function-facts providers
///
/// # Errors
///
/// Returns the first [`crate::Error::InvalidObservation`] encountered in any unit.
///
/// # Examples
///
/// ```rust
/// use slotscope::{estimate_units, BlockObservation, EstimatorConfig, FunctionObservation};
///
/// let unit = vec![FunctionObservation::new(vec![BlockObservation::new(false, vec![4, 4])])];
/// let estimates = estimate_units(&EstimatorConfig::new(1024)?, &[unit.clone(), unit])?;
///
/// assert_eq!(estimates.units.len(), 2);
/// assert_eq!(estimates.total.code_size_bytes(), 16);
/// assert_eq!(estimates.total.function_count(), 2);
/// # Ok::<(), slotscope::Error>(())
/// ```
pub fn estimate_units<F>(config: &EstimatorConfig, units: &[Vec<F>]) -> Result<UnitEstimates>
where
    F: FunctionFacts + Sync,
{
    let states = units
        .par_iter()
        .map(|unit| {
            let mut estimator = LayoutCapacityEstimator::new(*config);
            estimator.observe_all(unit)?;
            Ok(estimator.snapshot())
        })
        .collect::<Result<Vec<_>>>()?;

    let total = states.iter().try_fold(
        LayoutCapacityEstimator::new(*config).snapshot(),
        |total, state| total.merge(state),
    )?;

    Ok(UnitEstimates {
        units: states,
        total,
    })
}
