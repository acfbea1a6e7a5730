//! A minimal machine-function model.

use crate::{
    facts::FunctionFacts,
    observation::{BlockObservation, FunctionObservation},
};

/// How control leaves a machine basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// No terminating branch; execution runs into the next block in layout order.
    None,
    /// Unconditional branch to the given block index.
    Branch(usize),
    /// Conditional branch to the given block index; the not-taken path runs into the next block.
    ConditionalBranch(usize),
    /// Return from the function.
    Return,
}

impl Terminator {
    /// Whether some path out of the block relies on the next block being adjacent.
    #[must_use]
    pub const fn reaches_layout_successor(self) -> bool {
        matches!(self, Terminator::None | Terminator::ConditionalBranch(_))
    }
}

/// A basic block as emitted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineBlock {
    /// Encoded size of each instruction in bytes.
    pub instruction_sizes: Vec<i64>,
    /// How the block ends.
    pub terminator: Terminator,
}

impl MachineBlock {
    /// Creates a block.
    #[must_use]
    pub fn new(instruction_sizes: Vec<i64>, terminator: Terminator) -> Self {
        MachineBlock {
            instruction_sizes,
            terminator,
        }
    }
}

/// A compiled function in layout order.
///
/// A block counts as falling through when its terminator reaches the layout successor and a
/// successor actually exists; the last block of a function never falls through.
///
/// # Examples
///
/// ```rust
/// use slotscope::{FunctionFacts, MachineBlock, MachineFunction, Terminator};
///
/// let function = MachineFunction::new(
///     "loop",
///     vec![
///         MachineBlock::new(vec![2, 2], Terminator::None),
///         MachineBlock::new(vec![2, 4], Terminator::ConditionalBranch(0)),
///         MachineBlock::new(vec![2], Terminator::Return),
///     ],
/// );
///
/// let observation = function.observation();
/// assert_eq!(observation.fall_through_count(), 2);
/// assert_eq!(observation.size(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineFunction {
    /// Symbol name.
    pub name: String,
    /// Blocks in layout order; empty for a declaration.
    pub blocks: Vec<MachineBlock>,
}

impl MachineFunction {
    /// Creates a function.
    #[must_use]
    pub fn new(name: impl Into<String>, blocks: Vec<MachineBlock>) -> Self {
        MachineFunction {
            name: name.into(),
            blocks,
        }
    }

    /// Creates an external declaration without blocks.
    #[must_use]
    pub fn declaration(name: impl Into<String>) -> Self {
        MachineFunction::new(name, Vec::new())
    }
}

impl FunctionFacts for MachineFunction {
    fn name(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    fn observation(&self) -> FunctionObservation {
        let last = self.blocks.len().saturating_sub(1);
        let blocks = self
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                BlockObservation::new(
                    index < last && block.terminator.reaches_layout_successor(),
                    block.instruction_sizes.clone(),
                )
            })
            .collect();

        FunctionObservation::new(blocks)
    }
}
