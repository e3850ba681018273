// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsAllocatorError, FsAllocatorResult};

/// Trait for managing allocation of logical units in a filesystem.
///
/// Allocation and release only touch the in-memory allocation state;
/// persisting it is the owner's job.
pub trait FsAllocator {
    /// Allocation unit handed out (block number, cluster id, ...).
    type Unit: Copy;

    /// Allocate a single unit, terminating it as a one-unit chain.
    fn allocate_unit(&mut self) -> FsAllocatorResult<Self::Unit>;

    /// Return a unit to the free pool.
    fn release_unit(&mut self, unit: Self::Unit);

    /// Number of units currently used.
    fn used_units(&self) -> usize;

    /// Number of remaining units.
    fn remaining_units(&self) -> usize;
}
