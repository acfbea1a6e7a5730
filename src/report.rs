//! Named statistics for reporting an estimator's state.
//!
//! A [`StatisticsReport`] turns an [`EstimatorState`] into the named counters a compiler's
//! statistics output would show, one per line:
//!
//! ```text
//!        1 NumFunctions   - Number of Functions
//!       12 CodeSize       - Size of Code Segment in Bytes
//! ```

use std::fmt;

use log::info;

use crate::{config::Statistics, estimator::EstimatorState};

/// A single named counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistic {
    /// Short counter name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Counter value; placement and leftover counters may be negative.
    pub value: i128,
}

/// The selected statistics of one snapshot, in a fixed order.
///
/// # Examples
///
/// ```rust
/// use slotscope::{EstimatorConfig, LayoutCapacityEstimator, Statistics, StatisticsReport};
///
/// let estimator = LayoutCapacityEstimator::new(EstimatorConfig::new(1024)?);
/// let report = StatisticsReport::from_state(&estimator.snapshot(), Statistics::FUNCTIONS);
///
/// assert_eq!(report.get("LeftOver"), Some(1024));
/// assert_eq!(report.get("NumBlocks"), None);
/// # Ok::<(), slotscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsReport {
    statistics: Vec<Statistic>,
}

impl StatisticsReport {
    /// Builds a report containing the requested counter families.
    #[must_use]
    pub fn from_state(state: &EstimatorState, selection: Statistics) -> Self {
        let mut statistics = Vec::with_capacity(7);

        if selection.contains(Statistics::FUNCTIONS) {
            statistics.push(Statistic {
                name: "NumFunctions",
                description: "Number of Functions",
                value: i128::from(state.function_count()),
            });
        }
        if selection.contains(Statistics::BLOCKS) {
            statistics.push(Statistic {
                name: "NumBlocks",
                description: "Number of Basic Blocks",
                value: i128::from(state.block_count()),
            });
        }
        if !selection.is_empty() {
            statistics.push(Statistic {
                name: "CodeSize",
                description: "Size of Code Segment in Bytes",
                value: i128::from(state.code_size_bytes()),
            });
            statistics.push(Statistic {
                name: "LeftOver",
                description: "Amount of Memory Remaining in Code Segment",
                value: i128::from(state.leftover_bytes()),
            });
        }
        if selection.contains(Statistics::FUNCTIONS) {
            statistics.push(Statistic {
                name: "NumFuncPlaces",
                description: "Number of Places to Locate a Function",
                value: state.function_placement_count(),
            });
        }
        if selection.contains(Statistics::BLOCKS) {
            statistics.push(Statistic {
                name: "NumFallThroughs",
                description: "Number of Fall-Through Blocks",
                value: i128::from(state.fall_through_count()),
            });
            statistics.push(Statistic {
                name: "NumBlockPlaces",
                description: "Number of Places to Locate a Basic Block",
                value: state.block_placement_count(),
            });
        }

        StatisticsReport { statistics }
    }

    /// The statistics in report order.
    #[must_use]
    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    /// Looks a counter up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i128> {
        self.statistics
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }

    /// Emits every statistic at `info` level.
    pub fn log(&self) {
        for stat in &self.statistics {
            info!("{} = {} ({})", stat.name, stat.value, stat.description);
        }
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .statistics
            .iter()
            .map(|stat| stat.name.len())
            .max()
            .unwrap_or(0);

        for stat in &self.statistics {
            writeln!(
                f,
                "{:>8} {:<width$} - {}",
                stat.value,
                stat.name,
                stat.description,
                width = name_width
            )?;
        }

        Ok(())
    }
}
