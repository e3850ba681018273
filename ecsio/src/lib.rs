// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

// Core modules
pub mod bytes;
pub mod errors;
mod macros;
pub mod stats;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::BlockIO;
    pub use super::BlockIOExt;
    pub use super::{BLOCK_SIZE, Block};
    pub use super::errors::*;
    pub use super::stats::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemBlockIO;

    #[cfg(feature = "std")]
    pub use super::std::StdBlockIO;
}

// Internal use
use errors::*;

// Constants

/// Size of one block in bytes. Every transfer addresses exactly one block.
pub const BLOCK_SIZE: usize = 4096;

/// One block worth of bytes.
pub type Block = [u8; BLOCK_SIZE];

// Traits

/// Block store abstraction.
///
/// A store exposes a fixed number of fixed-size blocks addressed by index.
/// Each `read_block`/`write_block` either transfers the whole block or fails;
/// implementations never leave a partially written block behind.
pub trait BlockIO {
    /// Number of blocks exposed by the store.
    fn block_count(&self) -> usize;

    /// Reads block `index` into `buf`.
    fn read_block(&mut self, index: usize, buf: &mut Block) -> BlockIOResult;

    /// Writes `data` to block `index`.
    fn write_block(&mut self, index: usize, data: &Block) -> BlockIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> BlockIOResult;

    /// Releases the store. The default flushes.
    fn close(&mut self) -> BlockIOResult {
        self.flush()
    }

    #[inline]
    fn check_index(&self, index: usize) -> BlockIOResult {
        if index >= self.block_count() {
            return Err(BlockIOError::OutOfBounds);
        }
        Ok(())
    }
}

/// Extension helpers for BlockIO.
///
/// Provides multi-block transfers over contiguous block ranges:
/// - `read_blocks`/`write_blocks` for regions like the FAT
/// - `zero_blocks` for formatting
pub trait BlockIOExt: BlockIO {
    /// Reads `buf.len() / BLOCK_SIZE` consecutive blocks starting at `start`.
    ///
    /// # Errors
    /// Returns `BlockIOError::BadBufferSize` if `buf.len()` is not a multiple of `BLOCK_SIZE`.
    fn read_blocks(&mut self, start: usize, buf: &mut [u8]) -> BlockIOResult {
        if !buf.len().is_multiple_of(BLOCK_SIZE) {
            return Err(BlockIOError::BadBufferSize);
        }
        for (i, chunk) in buf.chunks_exact_mut(BLOCK_SIZE).enumerate() {
            let block: &mut Block = chunk
                .try_into()
                .map_err(|_| BlockIOError::BadBufferSize)?;
            self.read_block(start + i, block)?;
        }
        Ok(())
    }

    /// Writes `buf.len() / BLOCK_SIZE` consecutive blocks starting at `start`.
    ///
    /// # Errors
    /// Returns `BlockIOError::BadBufferSize` if `buf.len()` is not a multiple of `BLOCK_SIZE`.
    fn write_blocks(&mut self, start: usize, buf: &[u8]) -> BlockIOResult {
        if !buf.len().is_multiple_of(BLOCK_SIZE) {
            return Err(BlockIOError::BadBufferSize);
        }
        for (i, chunk) in buf.chunks_exact(BLOCK_SIZE).enumerate() {
            let block: &Block = chunk.try_into().map_err(|_| BlockIOError::BadBufferSize)?;
            self.write_block(start + i, block)?;
        }
        Ok(())
    }

    /// Fills `count` blocks starting at `start` with zeroes.
    fn zero_blocks(&mut self, start: usize, count: usize) -> BlockIOResult {
        const ZERO_BLOCK: Block = [0u8; BLOCK_SIZE];
        for index in start..start + count {
            self.write_block(index, &ZERO_BLOCK)?;
        }
        Ok(())
    }
}

impl<T: BlockIO + ?Sized> BlockIOExt for T {}

impl<T: BlockIO + ?Sized> BlockIO for &mut T {
    #[inline]
    fn block_count(&self) -> usize {
        (**self).block_count()
    }

    #[inline]
    fn read_block(&mut self, index: usize, buf: &mut Block) -> BlockIOResult {
        (**self).read_block(index, buf)
    }

    #[inline]
    fn write_block(&mut self, index: usize, data: &Block) -> BlockIOResult {
        (**self).write_block(index, data)
    }

    #[inline]
    fn flush(&mut self) -> BlockIOResult {
        (**self).flush()
    }

    #[inline]
    fn close(&mut self) -> BlockIOResult {
        (**self).close()
    }
}
