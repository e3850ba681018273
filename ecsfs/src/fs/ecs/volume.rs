// SPDX-License-Identifier: MIT

use alloc::vec::Vec;

use ecsio::{BLOCK_SIZE, Block, BlockIO};
use log::{debug, warn};

use crate::{
    core::{checker::*, errors::*, meta::FsMeta},
    ensure,
    fs::ecs::{
        checker::EcsChecker,
        constant::*,
        descriptor::DescriptorTable,
        directory::RootDirectory,
        fat::FatTable,
        info::{FileStat, FsInfo},
        meta::EcsMeta,
        types::{DirEntry, Superblock, validate_name},
    },
};

/// A mounted ECS150FS volume.
///
/// Owns the block store, the FAT and root directory mirrors and the open
/// file table. Every mutating operation persists the blocks it changed
/// before returning.
#[derive(Debug)]
pub struct Volume<IO: BlockIO> {
    pub(crate) io: IO,
    pub(crate) meta: EcsMeta,
    pub(crate) fat: FatTable,
    pub(crate) root: RootDirectory,
    pub(crate) fds: DescriptorTable,
}

impl<IO: BlockIO> Volume<IO> {
    /// Reads and validates the superblock, then loads FAT and root directory.
    pub fn mount(mut io: IO) -> FsResult<Self> {
        let mut block: Block = [0u8; BLOCK_SIZE];
        io.read_block(SUPERBLOCK_INDEX, &mut block)?;
        let meta = EcsMeta::from_superblock(&Superblock::decode(&block))?;
        ensure!(
            io.block_count() == meta.size_blocks(),
            FsParsingError::Geometry("Device size does not match superblock")
        );

        let fat = FatTable::load(&mut io, &meta)?;
        let root = RootDirectory::load(&mut io, &meta)?;
        debug!(
            "mounted volume: {} blocks, {} FAT blocks, {} data blocks",
            meta.total_blocks, meta.fat_blocks, meta.data_blocks
        );

        Ok(Self {
            io,
            meta,
            fat,
            root,
            fds: DescriptorTable::default(),
        })
    }

    /// Drops the mirrors and open files, closes the store and hands it back.
    ///
    /// FAT blocks left dirty by a failed write are flushed first. The store
    /// is closed even when that flush fails; the first error is returned.
    pub fn unmount(mut self) -> FsResult<IO> {
        let repaired = if self.fat.is_dirty() {
            warn!("unmount: FAT has unflushed blocks, flushing");
            self.fat.flush(&mut self.io)
        } else {
            Ok(())
        };
        let closed = self.io.close();
        repaired?;
        closed?;
        debug!("unmounted volume");
        Ok(self.io)
    }

    pub fn meta(&self) -> &EcsMeta {
        &self.meta
    }

    /// Underlying block store.
    pub fn device(&self) -> &IO {
        &self.io
    }

    pub fn device_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn info(&self) -> FsInfo {
        FsInfo {
            total_blocks: self.meta.total_blocks,
            fat_blocks: self.meta.fat_blocks,
            root_index: self.meta.root_index,
            data_index: self.meta.data_index,
            data_blocks: self.meta.data_blocks,
            fat_free: self.fat.free_entries(),
            fat_total: self.fat.capacity(),
            dir_free: self.root.free_count(),
            dir_total: FS_FILE_MAX_COUNT,
        }
    }

    /// Creates an empty file in the lowest free directory slot.
    pub fn create(&mut self, name: &str) -> FsResult {
        let raw = validate_name(name)?;
        ensure!(self.root.find(raw).is_none(), FsError::NameExists);
        let slot = self.root.first_free().ok_or(FsError::DirectoryFull)?;

        self.root.set(slot, DirEntry::new(raw));
        if let Err(e) = self.root.flush(&mut self.io, &self.meta) {
            self.root.set(slot, DirEntry::EMPTY);
            return Err(e.into());
        }
        debug!("create '{name}' in slot {slot}");
        Ok(())
    }

    /// Removes a file and frees its chain.
    ///
    /// The directory block is persisted before the FAT, so a failure in
    /// between leaks blocks instead of leaving a dangling entry. A failed FAT
    /// flush still reports `IO` although the file is already gone; the freed
    /// entries stay dirty and are written by the next flush or at unmount.
    pub fn delete(&mut self, name: &str) -> FsResult {
        let raw = validate_name(name)?;
        let slot = self.root.find(raw).ok_or(FsError::NotFound)?;
        ensure!(!self.fds.is_slot_open(slot), FsError::FileOpen);

        let entry = *self.root.entry(slot);
        let freed = self.fat.free_chain(entry.first_block)?;
        self.root.set(slot, DirEntry::EMPTY);

        if let Err(e) = self.root.flush(&mut self.io, &self.meta) {
            self.root.set(slot, entry);
            self.fat.rollback();
            return Err(e.into());
        }
        self.fat.commit();
        self.fat.flush(&mut self.io)?;
        debug!("delete '{name}' from slot {slot}, freed {freed} blocks");
        Ok(())
    }

    /// Occupied entries in slot order.
    pub fn list(&self) -> Vec<FileStat> {
        self.root
            .iter_occupied()
            .map(|(_, e)| FileStat {
                name: e.name_lossy(),
                size: e.size,
                first_block: e.first_block,
            })
            .collect()
    }

    /// Runs every check phase against the mounted volume.
    pub fn check(&mut self) -> FsResult<VerifyReport> {
        self.check_with(&CoreVerifyOptions::default())
    }

    pub fn check_with(&mut self, opts: &CoreVerifyOptions) -> FsResult<VerifyReport> {
        let mut checker = EcsChecker::new(&mut self.io, &self.meta, &self.fat, &self.root);
        let report = checker.check_with(opts)?;
        for finding in report.findings.iter().filter(|f| f.sev == Severity::Error) {
            warn!("check: {} {}", finding.code, finding.msg);
        }
        Ok(report)
    }
}
