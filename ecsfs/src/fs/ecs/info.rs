// SPDX-License-Identifier: MIT

use alloc::string::String;
use core::fmt;

/// Volume summary returned by `Volume::info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsInfo {
    pub total_blocks: u16,
    pub fat_blocks: u8,
    pub root_index: u16,
    pub data_index: u16,
    pub data_blocks: u16,
    pub fat_free: usize,
    pub fat_total: usize,
    pub dir_free: usize,
    pub dir_total: usize,
}

impl fmt::Display for FsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FS Info:")?;
        writeln!(f, "total_blk_count={}", self.total_blocks)?;
        writeln!(f, "fat_blk_count={}", self.fat_blocks)?;
        writeln!(f, "rdir_blk={}", self.root_index)?;
        writeln!(f, "data_blk={}", self.data_index)?;
        writeln!(f, "data_blk_count={}", self.data_blocks)?;
        writeln!(f, "fat_free_ratio={}/{}", self.fat_free, self.fat_total)?;
        write!(f, "rdir_free_ratio={}/{}", self.dir_free, self.dir_total)
    }
}

/// One occupied directory slot, as returned by `Volume::list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,
    pub size: u32,
    pub first_block: u16,
}

impl fmt::Display for FileStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file: {}, size: {}, data_blk: {}",
            self.name, self.size, self.first_block
        )
    }
}
