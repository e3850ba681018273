// SPDX-License-Identifier: MIT

use ecsio::{BLOCK_SIZE, Block, BlockIO, errors::BlockIOResult};

use crate::{
    core::errors::*,
    fs::ecs::{constant::*, meta::EcsMeta, types::DirEntry},
};

/// In-memory mirror of the root directory block.
#[derive(Debug, Clone)]
pub struct RootDirectory {
    entries: [DirEntry; FS_FILE_MAX_COUNT],
}

impl Default for RootDirectory {
    fn default() -> Self {
        Self {
            entries: [DirEntry::EMPTY; FS_FILE_MAX_COUNT],
        }
    }
}

impl RootDirectory {
    pub fn decode(block: &Block) -> Self {
        let mut dir = Self::default();
        for (entry, raw) in dir
            .entries
            .iter_mut()
            .zip(block.chunks_exact(DIR_ENTRY_SIZE))
        {
            *entry = DirEntry::decode(raw);
        }
        dir
    }

    pub fn encode(&self, block: &mut Block) {
        for (entry, raw) in self
            .entries
            .iter()
            .zip(block.chunks_exact_mut(DIR_ENTRY_SIZE))
        {
            entry.encode(raw);
        }
    }

    pub fn load<IO: BlockIO + ?Sized>(io: &mut IO, meta: &EcsMeta) -> FsResult<Self> {
        let mut block: Block = [0u8; BLOCK_SIZE];
        io.read_block(meta.root_index as usize, &mut block)?;
        Ok(Self::decode(&block))
    }

    /// Writes the whole directory block.
    pub fn flush<IO: BlockIO + ?Sized>(&self, io: &mut IO, meta: &EcsMeta) -> BlockIOResult {
        let mut block: Block = [0u8; BLOCK_SIZE];
        self.encode(&mut block);
        io.write_block(meta.root_index as usize, &block)
    }

    /// Slot of the occupied entry named `name`. Scans every slot.
    pub fn find(&self, name: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.name_eq(name))
    }

    /// Lowest unoccupied slot.
    pub fn first_free(&self) -> Option<usize> {
        self.entries.iter().position(|e| !e.in_use)
    }

    pub fn free_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.in_use).count()
    }

    #[inline]
    pub fn entry(&self, slot: usize) -> &DirEntry {
        &self.entries[slot]
    }

    #[inline]
    pub fn set(&mut self, slot: usize, entry: DirEntry) {
        self.entries[slot] = entry;
    }

    /// Occupied slots in slot order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, &DirEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.in_use)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_find_and_free_slots() {
        let mut dir = RootDirectory::default();
        assert_eq!(dir.free_count(), FS_FILE_MAX_COUNT);
        assert_eq!(dir.first_free(), Some(0));

        dir.set(0, DirEntry::new(b"a"));
        dir.set(2, DirEntry::new(b"c"));
        assert_eq!(dir.first_free(), Some(1));
        assert_eq!(dir.find(b"c"), Some(2));
        assert_eq!(dir.find(b"b"), None);
        assert_eq!(dir.free_count(), FS_FILE_MAX_COUNT - 2);

        let slots: Vec<usize> = dir.iter_occupied().map(|(i, _)| i).collect();
        assert_eq!(slots, vec![0, 2]);
    }

    #[test]
    fn test_block_roundtrip_keeps_slots() {
        let mut dir = RootDirectory::default();
        let mut entry = DirEntry::new(b"last");
        entry.size = 12;
        entry.first_block = 4;
        dir.set(FS_FILE_MAX_COUNT - 1, entry);

        let mut block = [0u8; BLOCK_SIZE];
        dir.encode(&mut block);
        assert_eq!(&block[127 * 32..127 * 32 + 4], b"last");

        let decoded = RootDirectory::decode(&block);
        assert_eq!(decoded.find(b"last"), Some(FS_FILE_MAX_COUNT - 1));
        assert_eq!(*decoded.entry(FS_FILE_MAX_COUNT - 1), entry);
    }
}
