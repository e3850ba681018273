// SPDX-License-Identifier: MIT

use alloc::{collections::BTreeSet, format, vec::Vec};

use ecsio::{BLOCK_SIZE, Block, BlockIO};

pub use crate::core::checker::*;

use crate::fs::ecs::{
    constant::*,
    directory::RootDirectory,
    fat::FatTable,
    meta::*,
    types::{DirEntry, Superblock},
};

/// Findings of one kind reported individually before being summarized.
const REPORT_LIMIT: usize = 8;

/// Checks a mounted volume: the on-disk superblock, the FAT and root
/// directory mirrors, and whether the mirrors match what is persisted.
pub struct EcsChecker<'a, IO: BlockIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a EcsMeta,
    fat: &'a FatTable,
    root: &'a RootDirectory,
    reached: Option<ReachabilityTracker>,
}

impl<'a, IO: BlockIO + ?Sized> EcsChecker<'a, IO> {
    pub fn new(
        io: &'a mut IO,
        meta: &'a EcsMeta,
        fat: &'a FatTable,
        root: &'a RootDirectory,
    ) -> Self {
        Self {
            io,
            meta,
            fat,
            root,
            reached: None,
        }
    }

    /// Walks every file chain, marking the blocks it reaches.
    fn walk_chains(&self, rep: &mut VerifyReport) -> ReachabilityTracker {
        let mut tracker = ReachabilityTracker::new(self.fat.len());
        for (slot, entry) in self.root.iter_occupied() {
            let name = entry.name_lossy();
            let mut blocks = 0usize;
            let mut broken = false;
            for step in self.fat.chain(entry.first_block) {
                match step {
                    Ok(block) => {
                        if !tracker.mark(block as usize) {
                            rep.push(Finding::err(
                                "CHAIN.CROSS",
                                format!("'{name}' (slot {slot}) shares block {block} with another chain"),
                            ));
                            broken = true;
                            break;
                        }
                        blocks += 1;
                    }
                    Err(e) => {
                        rep.push(Finding::err(
                            "CHAIN.BROKEN",
                            format!("'{name}' (slot {slot}): {e}"),
                        ));
                        broken = true;
                        break;
                    }
                }
            }
            if broken {
                continue;
            }

            let expected = (entry.size as usize).div_ceil(BLOCK_SIZE);
            if blocks != expected {
                rep.push(Finding::err(
                    "CHAIN.SIZE",
                    format!(
                        "'{name}' has {blocks} blocks, size {} needs {expected}",
                        entry.size
                    ),
                ));
            }
        }
        tracker
    }

    fn compare_block(
        &mut self,
        index: usize,
        expected: &Block,
        code: &'static str,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<bool> {
        let mut on_disk: Block = [0u8; BLOCK_SIZE];
        self.io.read_block(index, &mut on_disk)?;
        if on_disk[..] != expected[..] {
            rep.push(Finding::err(
                code,
                format!("block {index} differs from the mounted copy"),
            ));
            return Ok(false);
        }
        Ok(true)
    }
}

impl<'a, IO: BlockIO + ?Sized> FsChecker for EcsChecker<'a, IO> {
    type Options = CoreVerifyOptions;

    fn check_superblock(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let mut block: Block = [0u8; BLOCK_SIZE];
        self.io.read_block(SUPERBLOCK_INDEX, &mut block)?;
        let sb = Superblock::decode(&block);

        let meta = match EcsMeta::from_superblock(&sb) {
            Ok(meta) => meta,
            Err(e) => {
                rep.push(Finding::err("SB.INVALID", format!("{e}")));
                return Ok(());
            }
        };
        if meta != *self.meta {
            rep.push(Finding::err(
                "SB.MISMATCH",
                "On-disk superblock differs from the mounted geometry",
            ));
        }
        if self.io.block_count() != meta.size_blocks() {
            rep.push(Finding::err(
                "SB.DEVICE",
                format!(
                    "Device has {} blocks, superblock says {}",
                    self.io.block_count(),
                    meta.total_blocks
                ),
            ));
        }
        if block[SB_FAT_BLOCKS + 1..].iter().any(|&b| b != 0) {
            rep.push(Finding::warn("SB.RESERVED", "Reserved superblock bytes are not zero"));
        }
        rep.push(Finding::info(
            "SB.OK",
            format!(
                "{} blocks: FAT {}..={}, root {}, data {}..{}",
                meta.total_blocks,
                FAT_START_INDEX,
                meta.fat_blocks,
                meta.root_index,
                meta.data_index,
                meta.total_blocks
            ),
        ));
        Ok(())
    }

    fn check_fat(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        if self.fat.get(FAT_RESERVED_ENTRY) != Some(FAT_EOC) {
            rep.push(Finding::err("FAT.RESERVED", "FAT entry 0 is not EOC"));
        }

        let mut bad = 0usize;
        for block in FAT_FIRST_DATA_BLOCK..self.meta.data_blocks {
            let Some(value) = self.fat.get(block) else {
                break;
            };
            if value == FAT_FREE || value == FAT_EOC || self.fat.is_data_block(value) {
                continue;
            }
            bad += 1;
            if bad <= REPORT_LIMIT {
                rep.push(Finding::err(
                    "FAT.RANGE",
                    format!("Entry {block} points outside the data region ({value:#06X})"),
                ));
            }
        }
        if bad > REPORT_LIMIT {
            rep.push(Finding::err(
                "FAT.RANGE",
                format!("{bad} out-of-range entries in total"),
            ));
        }

        rep.push(Finding::info(
            "FAT.USAGE",
            format!("{}/{} entries free", self.fat.free_count(), self.fat.len()),
        ));
        Ok(())
    }

    fn check_root(&mut self, _opt: &Self::Options, rep: &mut VerifyReport) -> FsCheckerResult<()> {
        let mut seen: BTreeSet<&[u8]> = BTreeSet::new();
        for (slot, entry) in self.root.iter_occupied() {
            check_entry(slot, entry, self.fat, rep);
            if !seen.insert(entry.name_bytes()) {
                rep.push(Finding::err(
                    "ROOT.DUP",
                    format!("Duplicate name '{}' in slot {slot}", entry.name_lossy()),
                ));
            }
        }
        rep.push(Finding::info(
            "ROOT.USAGE",
            format!("{}/{} slots free", self.root.free_count(), FS_FILE_MAX_COUNT),
        ));
        Ok(())
    }

    fn check_chains(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let tracker = self.walk_chains(rep);
        rep.push(Finding::info(
            "CHAIN.USAGE",
            format!("{} blocks reachable from files", tracker.marked_count()),
        ));
        self.reached = Some(tracker);
        Ok(())
    }

    fn check_leaks(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let tracker = match self.reached.take() {
            Some(tracker) => tracker,
            None => self.walk_chains(&mut VerifyReport::default()),
        };

        let leaked: Vec<u16> = (FAT_FIRST_DATA_BLOCK..self.meta.data_blocks)
            .filter(|&b| self.fat.get(b).is_some_and(|v| v != FAT_FREE))
            .filter(|&b| !tracker.is_marked(b as usize))
            .collect();
        for block in leaked.iter().take(REPORT_LIMIT) {
            rep.push(Finding::warn(
                "LEAK.BLOCK",
                format!("Block {block} is allocated but unreachable"),
            ));
        }
        if leaked.len() > REPORT_LIMIT {
            rep.push(Finding::warn(
                "LEAK.BLOCK",
                format!("{} unreachable blocks in total", leaked.len()),
            ));
        }
        Ok(())
    }

    fn check_persisted(
        &mut self,
        _opt: &Self::Options,
        rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        let mut expected: Block = [0u8; BLOCK_SIZE];
        let mut clean = true;
        for index in 0..self.meta.fat_blocks as usize {
            self.fat.encode_block(index, &mut expected)?;
            clean &= self.compare_block(FAT_START_INDEX + index, &expected, "DISK.FAT", rep)?;
        }

        self.root.encode(&mut expected);
        clean &= self.compare_block(self.meta.root_index as usize, &expected, "DISK.ROOT", rep)?;

        if clean {
            rep.push(Finding::info("DISK.OK", "FAT and root directory are persisted"));
        }
        Ok(())
    }
}

/// Per-slot invariants of an occupied entry.
fn check_entry(slot: usize, entry: &DirEntry, fat: &FatTable, rep: &mut VerifyReport) {
    let name = entry.name_lossy();
    if !entry.is_name_terminated() {
        rep.push(Finding::err(
            "ROOT.NAME",
            format!("Slot {slot}: name is not NUL-terminated"),
        ));
    }
    if entry.name_bytes().is_empty() {
        rep.push(Finding::err("ROOT.NAME", format!("Slot {slot}: empty name")));
    }
    match (entry.size, entry.first_block) {
        (0, FAT_EOC) => {}
        (0, block) => rep.push(Finding::err(
            "ROOT.EMPTY",
            format!("'{name}' is empty but starts at block {block}"),
        )),
        (size, FAT_EOC) => rep.push(Finding::err(
            "ROOT.EMPTY",
            format!("'{name}' has size {size} but no data block"),
        )),
        (_, block) if !fat.is_data_block(block) => rep.push(Finding::err(
            "ROOT.FIRST",
            format!("'{name}' starts at invalid block {block}"),
        )),
        _ => {}
    }
}
