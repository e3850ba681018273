// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use crate::{
    core::errors::*,
    fs::ecs::{constant::*, types::Superblock},
};

/// Geometry of an ECS150FS volume.
///
/// Block 0 is the superblock, followed by `fat_blocks` FAT blocks, one root
/// directory block, then `data_blocks` data blocks. Data blocks are numbered
/// from 0 relative to `data_index`; data block 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcsMeta {
    pub total_blocks: u16,
    pub fat_blocks: u8,
    pub root_index: u16,
    pub data_index: u16,
    pub data_blocks: u16,
}

impl EcsMeta {
    /// Layout holding exactly `data_blocks` data blocks.
    pub fn new(data_blocks: u16) -> FsFormatterResult<Self> {
        let fat_blocks = (data_blocks as usize).div_ceil(FAT_ENTRIES_PER_BLOCK);
        Self::from_parts(data_blocks as usize, fat_blocks)
    }

    /// Largest layout fitting in a device of `total_blocks` blocks.
    pub fn for_total_blocks(total_blocks: usize) -> FsFormatterResult<Self> {
        let (fat_blocks, data_blocks) = converge_fat_layout(total_blocks);
        Self::from_parts(data_blocks, fat_blocks)
    }

    fn from_parts(data_blocks: usize, fat_blocks: usize) -> FsFormatterResult<Self> {
        if data_blocks == 0 {
            return Err(FsFormatterError::Invalid("Volume needs at least one data block"));
        }
        if fat_blocks > FAT_MAX_BLOCKS {
            return Err(FsFormatterError::Invalid("FAT does not fit in 255 blocks"));
        }
        let root_index = FAT_START_INDEX + fat_blocks;
        let data_index = root_index + ROOT_DIR_BLOCKS;
        let total_blocks = data_index + data_blocks;
        if total_blocks > u16::MAX as usize {
            return Err(FsFormatterError::Invalid("Volume exceeds 65535 blocks"));
        }

        Ok(Self {
            total_blocks: total_blocks as u16,
            fat_blocks: fat_blocks as u8,
            root_index: root_index as u16,
            data_index: data_index as u16,
            data_blocks: data_blocks as u16,
        })
    }

    /// Validates a decoded superblock and derives the geometry from it.
    pub fn from_superblock(sb: &Superblock) -> FsParsingResult<Self> {
        if !sb.has_valid_signature() {
            return Err(FsParsingError::BadSignature);
        }
        let meta = Self {
            total_blocks: sb.total_blocks,
            fat_blocks: sb.fat_blocks,
            root_index: sb.root_index,
            data_index: sb.data_index,
            data_blocks: sb.data_blocks,
        };
        meta.check_geometry().map_err(FsParsingError::Geometry)?;
        Ok(meta)
    }

    /// Checks the layout invariants tying the superblock fields together.
    pub fn check_geometry(&self) -> Result<(), &'static str> {
        if self.fat_blocks == 0 || self.data_blocks == 0 {
            return Err("Empty FAT or data region");
        }
        if self.root_index as usize != FAT_START_INDEX + self.fat_blocks as usize {
            return Err("Root directory index does not follow the FAT");
        }
        if self.data_index as usize != self.root_index as usize + ROOT_DIR_BLOCKS {
            return Err("Data index does not follow the root directory");
        }
        if self.total_blocks as usize != self.data_index as usize + self.data_blocks as usize {
            return Err("Total block count does not match layout");
        }
        if self.fat_entry_capacity() < self.data_blocks as usize {
            return Err("FAT too small for data blocks");
        }
        Ok(())
    }

    /// Number of entries held by the FAT blocks.
    #[inline]
    pub fn fat_entry_capacity(&self) -> usize {
        self.fat_blocks as usize * FAT_ENTRIES_PER_BLOCK
    }

    /// FAT block holding the entry of a given data block.
    #[inline]
    pub fn fat_block_of(&self, unit: u16) -> usize {
        FAT_START_INDEX + unit as usize / FAT_ENTRIES_PER_BLOCK
    }
}

impl FsMeta<u16> for EcsMeta {
    fn unit_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn unit_block(&self, unit: u16) -> usize {
        self.data_index as usize + unit as usize
    }

    fn first_data_unit(&self) -> u16 {
        FAT_FIRST_DATA_BLOCK
    }

    fn last_data_unit(&self) -> u16 {
        self.data_blocks.saturating_sub(1)
    }

    fn total_units(&self) -> usize {
        self.data_blocks as usize
    }

    fn size_blocks(&self) -> usize {
        self.total_blocks as usize
    }
}

/// Splits a device of `total_blocks` between FAT and data blocks.
///
/// The FAT size depends on the data block count which depends on the FAT
/// size, so iterate until both agree.
///
/// # Returns
/// Tuple `(fat_blocks, data_blocks)`
pub fn converge_fat_layout(total_blocks: usize) -> (usize, usize) {
    let overhead = FAT_START_INDEX + ROOT_DIR_BLOCKS;
    let mut fat_blocks = 0usize;
    let mut data_blocks = 0usize;

    for _ in 0..32 {
        data_blocks = total_blocks.saturating_sub(overhead + fat_blocks);
        let fat_blocks_new = data_blocks.div_ceil(FAT_ENTRIES_PER_BLOCK).max(1);
        if fat_blocks_new == fat_blocks {
            break;
        }
        fat_blocks = fat_blocks_new;
    }

    data_blocks = total_blocks.saturating_sub(overhead + fat_blocks);
    while fat_blocks * FAT_ENTRIES_PER_BLOCK < data_blocks {
        fat_blocks += 1;
        data_blocks -= 1;
    }
    (fat_blocks, data_blocks)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_new_layout() {
        let meta = EcsMeta::new(8192).unwrap();
        assert_eq!(meta.fat_blocks, 4);
        assert_eq!(meta.root_index, 5);
        assert_eq!(meta.data_index, 6);
        assert_eq!(meta.total_blocks, 8198);
        assert!(meta.check_geometry().is_ok());

        let meta = EcsMeta::new(2049).unwrap();
        assert_eq!(meta.fat_blocks, 2);
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert!(EcsMeta::new(0).is_err());
        assert!(EcsMeta::new(u16::MAX).is_err());
    }

    #[test]
    fn test_for_total_blocks_converges() {
        for total in [4usize, 100, 2051, 2052, 4100, 8198, 65535] {
            let meta = EcsMeta::for_total_blocks(total).unwrap();
            assert_eq!(meta.total_blocks as usize, total, "total={total}");
            assert!(meta.check_geometry().is_ok(), "total={total}");
        }
        let meta = EcsMeta::for_total_blocks(8198).unwrap();
        assert_eq!((meta.fat_blocks, meta.data_blocks), (4, 8192));
    }

    #[test]
    fn test_for_total_blocks_too_small() {
        assert!(EcsMeta::for_total_blocks(2).is_err());
        assert!(EcsMeta::for_total_blocks(3).is_err());
    }

    #[test]
    fn test_from_superblock_checks_geometry() {
        let meta = EcsMeta::new(100).unwrap();
        let mut sb = Superblock::from_meta(&meta);
        assert_eq!(EcsMeta::from_superblock(&sb), Ok(meta));

        sb.total_blocks += 1;
        assert!(matches!(
            EcsMeta::from_superblock(&sb),
            Err(FsParsingError::Geometry(_))
        ));

        sb.signature = *b"ECS150XX";
        assert_eq!(
            EcsMeta::from_superblock(&sb),
            Err(FsParsingError::BadSignature)
        );
    }

    #[test]
    fn test_unit_mapping() {
        let meta = EcsMeta::new(100).unwrap();
        assert_eq!(meta.unit_block(0), 3);
        assert_eq!(meta.unit_block(99), 102);
        assert_eq!(meta.first_data_unit(), 1);
        assert_eq!(meta.last_data_unit(), 99);
        assert!(meta.is_valid_unit(1));
        assert!(!meta.is_valid_unit(0));
        assert!(!meta.is_valid_unit(100));
        assert_eq!(meta.fat_block_of(2047), 1);
        assert_eq!(meta.fat_block_of(2048), 2);
    }
}
