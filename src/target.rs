//! Target architectures and the layout policy each one implies.
//!
//! The placement formulas depend on two ISA facts: the alignment granularity at which a
//! function or block may start, and how many bytes an unconditional branch costs when a
//! fall-through has to be replaced by an explicit jump. [`TargetPolicy`] carries both.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Result;

/// Alignment-derived divisor used by the placement formulas unless a target overrides it.
pub const DEFAULT_PLACEMENT_DIVISOR: i64 = 2;

/// Bytes charged for each fall-through that relocation turns into an explicit branch.
pub const DEFAULT_FALLTHROUGH_PENALTY: i64 = 4;

/// Architectures the execute-only toolchain knows how to measure.
///
/// Names parse case-insensitively, so `"thumb"`, `"Thumb"` and `"THUMB"` all resolve to
/// [`TargetArch::Thumb`].
///
/// # Examples
///
/// ```rust
/// use slotscope::TargetArch;
///
/// assert_eq!(TargetArch::from_triple("thumbv7m-none-eabi"), Some(TargetArch::Thumb));
/// assert_eq!(TargetArch::from_triple("x86_64-unknown-linux-gnu"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum TargetArch {
    /// 32-bit ARM (A32) code, fixed 4-byte instructions.
    #[strum(serialize = "arm")]
    Arm,
    /// Thumb / Thumb-2 code, mixed 2- and 4-byte instructions.
    #[strum(serialize = "thumb")]
    Thumb,
}

impl TargetArch {
    /// Classifies a target triple by its architecture prefix.
    ///
    /// Returns `None` for anything that is not an ARM or Thumb triple.
    #[must_use]
    pub fn from_triple(triple: &str) -> Option<Self> {
        if triple.starts_with("thumb") {
            Some(TargetArch::Thumb)
        } else if triple.starts_with("arm") {
            Some(TargetArch::Arm)
        } else {
            None
        }
    }

    /// Parses an architecture name, reporting unknown names as configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `name` is not a known architecture.
    pub fn parse(name: &str) -> Result<Self> {
        TargetArch::from_str(name)
            .map_err(|_| config_error!("unknown target architecture '{}'", name))
    }

    /// The layout policy for this architecture.
    ///
    /// Both ARM and Thumb code are measured with a 2-byte placement granularity and a 4-byte
    /// branch per broken fall-through, the numbers the ARM measurement pass uses for all code.
    #[must_use]
    pub const fn policy(self) -> TargetPolicy {
        match self {
            TargetArch::Arm | TargetArch::Thumb => TargetPolicy {
                placement_divisor: DEFAULT_PLACEMENT_DIVISOR,
                fallthrough_penalty: DEFAULT_FALLTHROUGH_PENALTY,
            },
        }
    }
}

/// ISA-specific constants feeding the placement formulas.
///
/// A policy is always valid once constructed: the divisor is strictly positive and the
/// penalty is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPolicy {
    placement_divisor: i64,
    fallthrough_penalty: i64,
}

impl TargetPolicy {
    /// Creates a policy from explicit constants.
    ///
    /// # Arguments
    ///
    /// * `placement_divisor` - Alignment granularity in bytes; leftover space is divided by it
    /// * `fallthrough_penalty` - Size in bytes of the branch inserted per broken fall-through
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the divisor is zero or negative, or
    /// the penalty is negative.
    pub fn new(placement_divisor: i64, fallthrough_penalty: i64) -> Result<Self> {
        if placement_divisor <= 0 {
            return Err(config_error!(
                "placement divisor must be positive, got {}",
                placement_divisor
            ));
        }
        if fallthrough_penalty < 0 {
            return Err(config_error!(
                "fall-through penalty must not be negative, got {}",
                fallthrough_penalty
            ));
        }

        Ok(TargetPolicy {
            placement_divisor,
            fallthrough_penalty,
        })
    }

    /// Alignment granularity the leftover byte count is divided by.
    #[must_use]
    pub const fn placement_divisor(&self) -> i64 {
        self.placement_divisor
    }

    /// Bytes charged per fall-through.
    #[must_use]
    pub const fn fallthrough_penalty(&self) -> i64 {
        self.fallthrough_penalty
    }

    /// Number of aligned slots in `leftover` bytes, rounded toward negative infinity.
    #[must_use]
    pub const fn slots(&self, leftover: i64) -> i64 {
        leftover.div_euclid(self.placement_divisor)
    }
}

impl Default for TargetPolicy {
    fn default() -> Self {
        TargetPolicy {
            placement_divisor: DEFAULT_PLACEMENT_DIVISOR,
            fallthrough_penalty: DEFAULT_FALLTHROUGH_PENALTY,
        }
    }
}
