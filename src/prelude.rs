//! # slotscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the slotscope library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all slotscope operations
pub use crate::Error;

/// The result type used throughout slotscope
pub use crate::Result;

// ================================================================================================
// Estimation
// ================================================================================================

/// Incremental accumulator and its snapshots
pub use crate::estimator::{EstimatorState, LayoutCapacityEstimator, SharedEstimator};

/// Parallel estimation over compilation units
pub use crate::estimator::{estimate_units, UnitEstimates};

// ================================================================================================
// Inputs
// ================================================================================================

/// Per-function and per-block facts
pub use crate::observation::{BlockObservation, FunctionObservation};

/// Providers of function facts
pub use crate::facts::{FunctionFacts, MachineBlock, MachineFunction, Terminator};

// ================================================================================================
// Configuration and Reporting
// ================================================================================================

/// Estimator configuration
pub use crate::config::{EstimatorConfig, Statistics};

/// Target architectures and policies
pub use crate::target::{TargetArch, TargetPolicy};

/// Named statistics
pub use crate::report::{Statistic, StatisticsReport};
