//! Per-function facts handed to the estimator.
//!
//! Observations are plain data: whatever walks a compiler's machine functions translates them
//! into a [`FunctionObservation`] holding one [`BlockObservation`] per basic block, in layout
//! order.

use crate::Result;

/// Facts about a single basic block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockObservation {
    /// The block runs into its layout successor without a branch, so moving it elsewhere
    /// requires inserting one.
    pub can_fall_through: bool,
    /// Encoded size in bytes of every instruction in the block.
    pub instruction_sizes: Vec<i64>,
}

impl BlockObservation {
    /// Creates a block observation.
    #[must_use]
    pub fn new(can_fall_through: bool, instruction_sizes: Vec<i64>) -> Self {
        BlockObservation {
            can_fall_through,
            instruction_sizes,
        }
    }

    /// Total encoded size of the block in bytes.
    ///
    /// Summed in `i128`, so the result is exact for any instruction sizes.
    #[must_use]
    pub fn size(&self) -> i128 {
        self.instruction_sizes
            .iter()
            .map(|size| i128::from(*size))
            .sum()
    }

    /// Number of instructions in the block.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instruction_sizes.len()
    }

    fn validate(&self, index: usize) -> Result<()> {
        if let Some((position, size)) = self
            .instruction_sizes
            .iter()
            .enumerate()
            .find(|(_, size)| **size < 0)
        {
            return Err(observation_error!(
                "instruction {} of block {} has negative size {}",
                position,
                index,
                size
            ));
        }

        Ok(())
    }
}

/// Facts about a single compiled function.
///
/// # Examples
///
/// ```rust
/// use slotscope::{BlockObservation, FunctionObservation};
///
/// let function = FunctionObservation::new(vec![
///     BlockObservation::new(true, vec![4, 4]),
///     BlockObservation::new(false, vec![4]),
/// ]);
/// assert!(function.has_body);
/// assert_eq!(function.size(), 12);
/// assert_eq!(function.fall_through_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionObservation {
    /// Whether the function has at least one basic block. Only such functions are counted.
    pub has_body: bool,
    /// The function's blocks in layout order.
    pub blocks: Vec<BlockObservation>,
}

impl FunctionObservation {
    /// Creates an observation for a defined function; `has_body` follows from `blocks`.
    #[must_use]
    pub fn new(blocks: Vec<BlockObservation>) -> Self {
        FunctionObservation {
            has_body: !blocks.is_empty(),
            blocks,
        }
    }

    /// Creates an observation for a bare declaration.
    #[must_use]
    pub fn declaration() -> Self {
        FunctionObservation::default()
    }

    /// Total encoded size of the function in bytes.
    #[must_use]
    pub fn size(&self) -> i128 {
        self.blocks.iter().map(BlockObservation::size).sum()
    }

    /// Number of blocks that can fall through.
    #[must_use]
    pub fn fall_through_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.can_fall_through).count()
    }

    /// Checks that every instruction size is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidObservation`] naming the first offending instruction.
    pub fn validate(&self) -> Result<()> {
        self.blocks
            .iter()
            .enumerate()
            .try_for_each(|(index, block)| block.validate(index))
    }
}
