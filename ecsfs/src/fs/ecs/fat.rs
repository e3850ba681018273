// SPDX-License-Identifier: MIT

//! In-memory mirror of the File Allocation Table.
//!
//! Every FAT block is mirrored. Mutations mark their block dirty and are
//! journaled until [`FatTable::commit`], so a failed multi-block update can
//! be undone with [`FatTable::rollback`].

use alloc::vec;
use alloc::vec::Vec;

use ecsio::{
    BLOCK_SIZE, Block, BlockIO,
    errors::{BlockIOError, BlockIOResult},
};
use log::trace;
use zerocopy::{FromBytes, byteorder::little_endian::U16};

pub use crate::core::allocator::*;

use crate::{
    core::{errors::*, utils::bitmap::BitmapOps},
    fs::ecs::{constant::*, meta::EcsMeta},
};

#[derive(Debug, Clone)]
pub struct FatTable {
    entries: Vec<u16>,
    /// Addressable entries, one per data block.
    data_blocks: usize,
    /// One bit per FAT block.
    dirty: Vec<u8>,
    /// `(index, previous value)` for every uncommitted change.
    journal: Vec<(u16, u16)>,
}

impl FatTable {
    /// Freshly formatted table: entry 0 reserved, everything else free.
    pub fn blank(meta: &EcsMeta) -> Self {
        let mut fat = Self {
            entries: vec![FAT_FREE; meta.fat_entry_capacity()],
            data_blocks: meta.data_blocks as usize,
            dirty: vec![0u8; (meta.fat_blocks as usize).div_ceil(8)],
            journal: Vec::new(),
        };
        fat.entries[FAT_RESERVED_ENTRY as usize] = FAT_EOC;
        for block in 0..meta.fat_blocks as usize {
            fat.dirty.set_bit(block, true);
        }
        fat
    }

    /// Reads all FAT blocks of the volume.
    pub fn load<IO: BlockIO + ?Sized>(io: &mut IO, meta: &EcsMeta) -> FsResult<Self> {
        let mut entries = Vec::with_capacity(meta.fat_entry_capacity());
        let mut block: Block = [0u8; BLOCK_SIZE];
        for i in 0..meta.fat_blocks as usize {
            io.read_block(FAT_START_INDEX + i, &mut block)?;
            let raw = <[U16]>::ref_from_bytes(&block[..])
                .map_err(|_| FsError::Other("Unaligned FAT block"))?;
            entries.extend(raw.iter().map(|e| e.get()));
        }

        Ok(Self {
            entries,
            data_blocks: meta.data_blocks as usize,
            dirty: vec![0u8; (meta.fat_blocks as usize).div_ceil(8)],
            journal: Vec::new(),
        })
    }

    /// Number of addressable entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data_blocks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data_blocks == 0
    }

    /// Raw entry value, `None` past the addressable range.
    #[inline]
    pub fn get(&self, block: u16) -> Option<u16> {
        if (block as usize) < self.data_blocks {
            Some(self.entries[block as usize])
        } else {
            None
        }
    }

    /// Sets an entry, marking its FAT block dirty. Out-of-range indices are ignored.
    pub fn set(&mut self, block: u16, value: u16) {
        let Some(slot) = self.entries.get_mut(block as usize) else {
            return;
        };
        if *slot == value {
            return;
        }
        self.journal.push((block, *slot));
        *slot = value;
        self.dirty
            .set_bit(block as usize / FAT_ENTRIES_PER_BLOCK, true);
    }

    /// True when `block` may appear in a chain.
    #[inline]
    pub fn is_data_block(&self, block: u16) -> bool {
        block >= FAT_FIRST_DATA_BLOCK && (block as usize) < self.data_blocks
    }

    /// Entries mirrored from disk, addressable or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Free entries across the whole table, including the unaddressable tail.
    pub fn free_entries(&self) -> usize {
        self.entries.iter().filter(|&&e| e == FAT_FREE).count()
    }

    /// Free entries among the addressable ones.
    pub fn free_count(&self) -> usize {
        self.entries[..self.data_blocks]
            .iter()
            .filter(|&&e| e == FAT_FREE)
            .count()
    }

    /// Lowest free data block.
    pub fn find_free(&self) -> Option<u16> {
        (FAT_FIRST_DATA_BLOCK as usize..self.data_blocks)
            .find(|&i| self.entries[i] == FAT_FREE)
            .map(|i| i as u16)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.find_next_one(0).is_some()
    }

    /// Encodes FAT block `index` (0-based inside the FAT region).
    pub fn encode_block(&self, index: usize, out: &mut Block) -> BlockIOResult {
        let start = index * FAT_ENTRIES_PER_BLOCK;
        let src = self
            .entries
            .get(start..start + FAT_ENTRIES_PER_BLOCK)
            .ok_or(BlockIOError::OutOfBounds)?;
        let dst = <[U16]>::mut_from_bytes(&mut out[..])
            .map_err(|_| BlockIOError::BadBufferSize)?;
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = U16::new(s);
        }
        Ok(())
    }

    /// Writes every dirty FAT block. A block stays dirty if its write fails.
    pub fn flush<IO: BlockIO + ?Sized>(&mut self, io: &mut IO) -> BlockIOResult {
        let mut block: Block = [0u8; BLOCK_SIZE];
        let mut next = self.dirty.find_next_one(0);
        while let Some(index) = next {
            self.encode_block(index, &mut block)?;
            io.write_block(FAT_START_INDEX + index, &block)?;
            self.dirty.set_bit(index, false);
            trace!("fat: flushed block {}", FAT_START_INDEX + index);
            next = self.dirty.find_next_one(index + 1);
        }
        Ok(())
    }

    /// Accepts every journaled change.
    #[inline]
    pub fn commit(&mut self) {
        self.journal.clear();
    }

    /// Undoes every change since the last commit.
    ///
    /// Restored entries keep their blocks dirty, so the next flush also
    /// repairs any block that reached the disk before the failure.
    pub fn rollback(&mut self) {
        while let Some((block, previous)) = self.journal.pop() {
            self.entries[block as usize] = previous;
            self.dirty
                .set_bit(block as usize / FAT_ENTRIES_PER_BLOCK, true);
        }
    }

    /// Iterates the chain starting at `first`.
    #[inline]
    pub fn chain(&self, first: u16) -> ChainCursor<'_> {
        ChainCursor::new(self, first)
    }

    /// Collects a whole chain, failing on invalid links or loops.
    pub fn collect_chain(&self, first: u16) -> FsCursorResult<Vec<u16>> {
        self.chain(first).collect()
    }

    /// Allocates a block and links it after `tail` (or starts a new chain).
    pub fn extend_chain(&mut self, tail: Option<u16>) -> FsAllocatorResult<u16> {
        let block = self.allocate_unit()?;
        if let Some(tail) = tail {
            self.set(tail, block);
        }
        Ok(block)
    }

    /// Frees a validated chain. Returns the number of blocks released.
    pub fn free_chain(&mut self, first: u16) -> FsCursorResult<usize> {
        let chain = self.collect_chain(first)?;
        for &block in &chain {
            self.release_unit(block);
        }
        Ok(chain.len())
    }
}

impl FsAllocator for FatTable {
    type Unit = u16;

    fn allocate_unit(&mut self) -> FsAllocatorResult<u16> {
        let block = self.find_free().ok_or(FsAllocatorError::OutOfBlocks)?;
        self.set(block, FAT_EOC);
        trace!("fat: allocated data block {block}");
        Ok(block)
    }

    fn release_unit(&mut self, block: u16) {
        self.set(block, FAT_FREE);
        trace!("fat: released data block {block}");
    }

    fn used_units(&self) -> usize {
        self.data_blocks - self.free_count()
    }

    fn remaining_units(&self) -> usize {
        self.free_count()
    }
}

/// Walks a FAT chain, yielding data block numbers.
///
/// Yields an error and stops on a link that is not a data block, or once more
/// blocks were visited than the FAT holds.
#[derive(Debug, Clone)]
pub struct ChainCursor<'a> {
    fat: &'a FatTable,
    next: u16,
    steps: usize,
    done: bool,
}

impl<'a> ChainCursor<'a> {
    pub fn new(fat: &'a FatTable, first: u16) -> Self {
        Self {
            fat,
            next: first,
            steps: 0,
            done: false,
        }
    }

    /// Next block of a chain that must not end yet.
    pub fn next_required(&mut self) -> FsCursorResult<u16> {
        self.next().unwrap_or(Err(FsCursorError::ShortChain))
    }
}

impl Iterator for ChainCursor<'_> {
    type Item = FsCursorResult<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next == FAT_EOC {
            self.done = true;
            return None;
        }
        let current = self.next;
        if !self.fat.is_data_block(current) {
            self.done = true;
            return Some(Err(FsCursorError::InvalidBlock(current)));
        }
        self.steps += 1;
        if self.steps > self.fat.len() {
            self.done = true;
            return Some(Err(FsCursorError::LoopDetected));
        }
        self.next = self.fat.entries[current as usize];
        Some(Ok(current))
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use ecsio::prelude::*;

    fn table(data_blocks: u16) -> FatTable {
        let meta = EcsMeta::new(data_blocks).unwrap();
        let mut fat = FatTable::blank(&meta);
        fat.commit();
        fat
    }

    #[test]
    fn test_blank_layout() {
        let fat = table(10);
        assert_eq!(fat.get(0), Some(FAT_EOC));
        assert_eq!(fat.get(1), Some(FAT_FREE));
        assert_eq!(fat.get(10), None);
        assert_eq!(fat.free_count(), 9);
        assert!(fat.is_dirty());
    }

    #[test]
    fn test_allocate_lowest_first() {
        let mut fat = table(10);
        let a = fat.extend_chain(None).unwrap();
        let b = fat.extend_chain(Some(a)).unwrap();
        let c = fat.extend_chain(Some(b)).unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(fat.collect_chain(a).unwrap(), vec![1, 2, 3]);
        assert_eq!(fat.get(3), Some(FAT_EOC));
        assert_eq!(fat.used_units(), 4);
        assert_eq!(fat.remaining_units(), 6);

        fat.release_unit(2);
        assert_eq!(fat.find_free(), Some(2));
    }

    #[test]
    fn test_out_of_blocks() {
        let mut fat = table(3);
        let a = fat.extend_chain(None).unwrap();
        fat.extend_chain(Some(a)).unwrap();
        assert_eq!(fat.extend_chain(Some(a)), Err(FsAllocatorError::OutOfBlocks));
    }

    #[test]
    fn test_free_chain() {
        let mut fat = table(10);
        let a = fat.extend_chain(None).unwrap();
        let b = fat.extend_chain(Some(a)).unwrap();
        fat.extend_chain(Some(b)).unwrap();
        assert_eq!(fat.free_chain(a), Ok(3));
        assert_eq!(fat.free_count(), 9);
        assert_eq!(fat.free_chain(FAT_EOC), Ok(0));
    }

    #[test]
    fn test_cursor_detects_loop() {
        let mut fat = table(10);
        fat.set(1, 2);
        fat.set(2, 1);
        let res = fat.collect_chain(1);
        assert_eq!(res, Err(FsCursorError::LoopDetected));
    }

    #[test]
    fn test_cursor_detects_invalid_link() {
        let mut fat = table(10);
        fat.set(1, 2);
        // Entry 2 is still free
        assert_eq!(fat.collect_chain(1), Err(FsCursorError::InvalidBlock(0)));
        assert_eq!(fat.collect_chain(42), Err(FsCursorError::InvalidBlock(42)));
    }

    #[test]
    fn test_next_required() {
        let mut fat = table(10);
        let a = fat.extend_chain(None).unwrap();
        let mut cursor = fat.chain(a);
        assert_eq!(cursor.next_required(), Ok(a));
        assert_eq!(cursor.next_required(), Err(FsCursorError::ShortChain));
    }

    #[test]
    fn test_rollback_restores_entries() {
        let mut fat = table(10);
        let a = fat.extend_chain(None).unwrap();
        fat.commit();

        fat.extend_chain(Some(a)).unwrap();
        fat.extend_chain(Some(2)).unwrap();
        fat.rollback();

        assert_eq!(fat.get(a), Some(FAT_EOC));
        assert_eq!(fat.get(2), Some(FAT_FREE));
        assert_eq!(fat.get(3), Some(FAT_FREE));
    }

    #[test]
    fn test_flush_and_load() {
        let meta = EcsMeta::new(3000).unwrap();
        let mut buf = vec![0u8; meta.total_blocks as usize * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);

        let mut fat = FatTable::blank(&meta);
        fat.set(2500, 7);
        fat.flush(&mut io).unwrap();
        assert!(!fat.is_dirty());

        let loaded = FatTable::load(&mut io, &meta).unwrap();
        assert_eq!(loaded.get(0), Some(FAT_EOC));
        assert_eq!(loaded.get(2500), Some(7));
        assert_eq!(loaded.free_count(), fat.free_count());
        drop(io);

        // Entry 2500 lives in the second FAT block, little-endian
        let off = 2 * BLOCK_SIZE + (2500 - 2048) * 2;
        assert_eq!(&buf[off..off + 2], &[7, 0]);
        assert_eq!(&buf[BLOCK_SIZE..BLOCK_SIZE + 2], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_flush_only_dirty_blocks() {
        let meta = EcsMeta::new(5000).unwrap();
        let mut buf = vec![0u8; meta.total_blocks as usize * BLOCK_SIZE];
        let mut io = IOCounter::new(MemBlockIO::new(&mut buf));

        let mut fat = FatTable::blank(&meta);
        fat.flush(&mut io).unwrap();
        assert_eq!(io.stats.writes, 3);

        io.reset();
        fat.set(4100, FAT_EOC);
        fat.flush(&mut io).unwrap();
        assert_eq!(io.stats.writes, 1);
        assert_eq!(io.stats.max_write_index, Some(3));
    }
}
