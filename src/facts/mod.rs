//! Function-facts providers.
//!
//! The estimator never looks at compiler data structures. Anything that can describe a compiled
//! function as a [`FunctionObservation`] implements [`FunctionFacts`] and can be fed straight
//! into [`crate::LayoutCapacityEstimator::observe`].
//!
//! [`MachineFunction`] is a host-neutral adapter: a function as a list of blocks with
//! instruction sizes and a [`Terminator`], from which fall-through facts are derived.

mod machine;

pub use machine::{MachineBlock, MachineFunction, Terminator};

use crate::observation::FunctionObservation;

/// Source of per-function layout facts.
pub trait FunctionFacts {
    /// Symbol name of the function, used for logging.
    fn name(&self) -> Option<&str> {
        None
    }

    /// The function's layout facts.
    fn observation(&self) -> FunctionObservation;
}

impl FunctionFacts for FunctionObservation {
    fn observation(&self) -> FunctionObservation {
        self.clone()
    }
}
