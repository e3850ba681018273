// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

/// A Formatter for a filesystem type.
///
/// Implementations encapsulate all required state (I/O backend, metadata).
/// Used to lay down the initial structure of a filesystem on the target block store.
///
/// The formatter must also zero the data region if `full_format` is `true`.
pub trait FsFormatter {
    /// Format the filesystem.
    ///
    /// - `full_format`: if `true`, perform a full format, else a quick format
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;
}

use crate::core::meta::FsMeta;
use ecsio::{BlockIO, BlockIOExt};

/// Helper to zero out the data region of a filesystem.
pub fn zero_data_region<M: FsMeta<u16>, IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &M,
) -> FsFormatterResult {
    let first = meta.first_data_unit();
    let last = meta.last_data_unit();
    if first > last {
        return Ok(());
    }

    let start = meta.unit_block(first);
    let end = meta.unit_block(last) + 1;
    io.zero_blocks(start, end - start)?;
    Ok(())
}
