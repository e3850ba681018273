// SPDX-License-Identifier: MIT

use ecsio::{BLOCK_SIZE, Block, BlockIO};
use log::debug;

pub use crate::core::formatter::*;

use crate::fs::ecs::{
    constant::*, directory::RootDirectory, fat::FatTable, meta::*, types::Superblock,
};

/// EcsFormatter:
/// - Writes the superblock, a FAT with only the reserved entry taken and an empty root directory.
/// - Zeroes the data region on a full format.
pub struct EcsFormatter<'a, IO: BlockIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a EcsMeta,
}

impl<'a, IO: BlockIO + ?Sized> EcsFormatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a EcsMeta) -> Self {
        Self { io, meta }
    }

    fn write_superblock(&mut self) -> FsFormatterResult {
        let mut block: Block = [0u8; BLOCK_SIZE];
        Superblock::from_meta(self.meta).encode(&mut block);
        self.io.write_block(SUPERBLOCK_INDEX, &block)?;
        Ok(())
    }

    fn write_fat_region(&mut self) -> FsFormatterResult {
        let mut fat = FatTable::blank(self.meta);
        fat.flush(&mut *self.io)?;
        Ok(())
    }

    fn write_root_dir(&mut self) -> FsFormatterResult {
        RootDirectory::default().flush(&mut *self.io, self.meta)?;
        Ok(())
    }
}

impl<'a, IO: BlockIO + ?Sized> FsFormatter for EcsFormatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        if self.io.block_count() < self.meta.size_blocks() {
            return Err(FsFormatterError::Invalid("Device smaller than volume layout"));
        }
        self.write_superblock()?;
        self.write_fat_region()?;
        self.write_root_dir()?;
        if full_format {
            zero_data_region(&mut *self.io, self.meta)?;
        }
        self.io.flush()?;
        debug!(
            "formatted volume: {} blocks, {} FAT blocks, {} data blocks",
            self.meta.total_blocks, self.meta.fat_blocks, self.meta.data_blocks
        );
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use ecsio::prelude::*;

    #[test]
    fn test_format_layout() {
        let meta = EcsMeta::new(64).unwrap();
        let mut buf = vec![0xCCu8; meta.total_blocks as usize * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);
        EcsFormatter::new(&mut io, &meta).format(true).unwrap();
        drop(io);

        assert_eq!(&buf[0..8], b"ECS150FS");
        // FAT[0] reserved, FAT[1..] free
        assert_eq!(&buf[BLOCK_SIZE..BLOCK_SIZE + 4], &[0xFF, 0xFF, 0x00, 0x00]);
        assert!(buf[BLOCK_SIZE + 2..2 * BLOCK_SIZE].iter().all(|&b| b == 0));
        // Root directory empty
        assert!(buf[2 * BLOCK_SIZE..3 * BLOCK_SIZE].iter().all(|&b| b == 0));
        // Data region zeroed
        assert!(buf[4 * BLOCK_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_quick_format_keeps_data() {
        let meta = EcsMeta::new(8).unwrap();
        let mut buf = vec![0xCCu8; meta.total_blocks as usize * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);
        EcsFormatter::new(&mut io, &meta).format(false).unwrap();
        drop(io);

        assert!(buf[3 * BLOCK_SIZE..].iter().all(|&b| b == 0xCC));
    }

    #[test]
    fn test_device_too_small() {
        let meta = EcsMeta::new(8).unwrap();
        let mut buf = vec![0u8; 4 * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);
        let res = EcsFormatter::new(&mut io, &meta).format(false);
        assert!(matches!(res, Err(FsFormatterError::Invalid(_))));
    }
}
