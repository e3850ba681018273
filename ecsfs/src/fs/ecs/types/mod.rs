// SPDX-License-Identifier: MIT

mod entry;
mod superblock;

pub use entry::*;
pub use superblock::*;
