// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # slotscope
//!
//! Estimates how much layout diversity a randomizing linker or loader can draw from a fixed
//! code-segment budget.
//!
//! Execute-only code on ARM and Thumb microcontrollers stops an attacker from reading code,
//! but not from guessing where it lives. Shuffling functions, or individual basic blocks, across
//! the unused part of the code segment makes that guess expensive. `slotscope` measures how
//! expensive: it consumes per-function facts as a compiler produces them and keeps a running
//! count of the distinct placements available at function and at block granularity.
//!
//! ## Features
//!
//! - **Incremental accounting** - Feed one function at a time and snapshot at any point
//! - **Target policies** - Alignment divisor and fall-through branch penalty per architecture
//! - **Exact arithmetic** - Over-budget code shows up as negative capacity, never clamped
//! - **Parallel units** - Estimate compilation units concurrently and roll them up
//! - **Compiler-style statistics** - Named counters ready for a `-stats` style report
//!
//! ## Quick Start
//!
//! ```rust
//! use slotscope::prelude::*;
//!
//! let mut estimator = LayoutCapacityEstimator::new(EstimatorConfig::new(1024)?);
//!
//! estimator.observe_function(&FunctionObservation::new(vec![
//!     BlockObservation::new(false, vec![4, 4, 4]),
//! ]))?;
//! estimator.observe_function(&FunctionObservation::new(vec![
//!     BlockObservation::new(true, vec![4, 4]),
//!     BlockObservation::new(false, vec![4]),
//! ]))?;
//!
//! let state = estimator.snapshot();
//! assert_eq!(state.code_size_bytes(), 24);
//! assert_eq!(state.function_placement_count(), 502);
//! assert_eq!(state.block_placement_count(), 499);
//!
//! print!("{}", StatisticsReport::from_state(&state, Statistics::all()));
//! # Ok::<(), slotscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`estimator`] - The accumulator, its snapshots and concurrency helpers
//! - [`observation`] - Plain per-function and per-block facts
//! - [`facts`] - Providers that translate compiler functions into observations
//! - [`target`] - Architectures and their layout policies
//! - [`config`] - Budget, policy and reported statistics
//! - [`report`] - Named statistics rendering
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: one `debug` record per observed function, a
//! `warn` record when the code first exceeds its budget, and `info` records from
//! [`StatisticsReport::log`]. Install any `log` backend to see them.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use slotscope::prelude::*;
///
/// let estimator = LayoutCapacityEstimator::with_budget(4096)?;
/// assert_eq!(estimator.snapshot().leftover_bytes(), 4096);
/// # Ok::<(), slotscope::Error>(())
/// ```
pub mod prelude;

/// Budget, target policy and reported statistics.
pub mod config;

/// Code-layout capacity estimation.
pub mod estimator;

/// Function-facts providers and a host-neutral machine-function model.
pub mod facts;

/// Plain per-function and per-block observations.
pub mod observation;

/// Named statistics for reporting.
pub mod report;

/// Target architectures and layout policies.
pub mod target;

/// `slotscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `slotscope` Error type
///
/// # Examples
///
/// ```rust
/// use slotscope::{Error, FunctionObservation, BlockObservation, LayoutCapacityEstimator};
///
/// let mut estimator = LayoutCapacityEstimator::with_budget(1024)?;
/// let bad = FunctionObservation::new(vec![BlockObservation::new(false, vec![-4])]);
///
/// match estimator.observe_function(&bad) {
///     Err(Error::InvalidObservation { message, .. }) => println!("rejected: {}", message),
///     other => panic!("unexpected: {:?}", other),
/// }
/// # Ok::<(), slotscope::Error>(())
/// ```
pub use error::Error;

pub use config::{EstimatorConfig, Statistics, PICOXOM_CODE_BUDGET};
pub use estimator::{
    estimate_units, EstimatorState, LayoutCapacityEstimator, SharedEstimator, UnitEstimates,
};
pub use facts::{FunctionFacts, MachineBlock, MachineFunction, Terminator};
pub use observation::{BlockObservation, FunctionObservation};
pub use report::{Statistic, StatisticsReport};
pub use target::{
    TargetArch, TargetPolicy, DEFAULT_FALLTHROUGH_PENALTY, DEFAULT_PLACEMENT_DIVISOR,
};
