// SPDX-License-Identifier: MIT

//! Descriptor operations: open/close/stat/seek and byte-range read/write.
//!
//! A byte range `[offset, offset + len)` maps onto the chain by skipping
//! `offset / BLOCK_SIZE` blocks from the first one, then walking block by
//! block. Only partially covered blocks are read before being written.

use alloc::vec::Vec;

use ecsio::{BLOCK_SIZE, Block, BlockIO};
use log::{debug, warn};

use crate::{
    core::{errors::*, meta::FsMeta},
    ensure,
    fs::ecs::{descriptor::Fd, types::validate_name, volume::Volume},
};

impl<IO: BlockIO> Volume<IO> {
    /// Opens `name` at offset 0 on the lowest free handle.
    pub fn open(&mut self, name: &str) -> FsResult<Fd> {
        let raw = validate_name(name)?;
        let slot = self.root.find(raw).ok_or(FsError::NotFound)?;
        let fd = self.fds.open(slot)?;
        debug!("open '{name}' -> fd {fd}");
        Ok(fd)
    }

    pub fn close(&mut self, fd: Fd) -> FsResult {
        self.fds.close(fd)?;
        debug!("close fd {fd}");
        Ok(())
    }

    /// Current size of the file behind `fd`.
    pub fn stat(&self, fd: Fd) -> FsResult<usize> {
        let of = self.fds.get(fd)?;
        Ok(self.root.entry(of.slot).size as usize)
    }

    /// Moves the offset of `fd`. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, fd: Fd, offset: usize) -> FsResult {
        let size = self.stat(fd)?;
        ensure!(offset <= size, FsError::OffsetOutOfRange);
        self.fds.get_mut(fd)?.offset = offset;
        Ok(())
    }

    pub fn tell(&self, fd: Fd) -> FsResult<usize> {
        Ok(self.fds.get(fd)?.offset)
    }

    /// Reads up to `buf.len()` bytes at the current offset.
    ///
    /// Returns 0 at end of file and never reads past the recorded size.
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> FsResult<usize> {
        let of = *self.fds.get(fd)?;
        let entry = *self.root.entry(of.slot);
        let count = buf.len().min((entry.size as usize).saturating_sub(of.offset));
        if count == 0 {
            return Ok(0);
        }

        let mut chain = self.fat.chain(entry.first_block);
        for _ in 0..of.offset / BLOCK_SIZE {
            chain.next_required()?;
        }

        let mut scratch: Block = [0u8; BLOCK_SIZE];
        let mut done = 0;
        let mut pos = of.offset;
        while done < count {
            let block = chain.next_required()?;
            let start = pos % BLOCK_SIZE;
            let len = (BLOCK_SIZE - start).min(count - done);

            self.io
                .read_block(self.meta.unit_block(block), &mut scratch)?;
            buf[done..done + len].copy_from_slice(&scratch[start..start + len]);

            done += len;
            pos += len;
        }

        self.fds.get_mut(fd)?.offset = pos;
        Ok(done)
    }

    /// Writes `data` at the current offset, growing the chain as needed.
    ///
    /// When the FAT runs out of free blocks the write is short: the bytes
    /// that fit are committed and their count returned, or `DiskFull` when
    /// nothing fit. Persist order is data blocks, FAT blocks, directory.
    pub fn write(&mut self, fd: Fd, data: &[u8]) -> FsResult<usize> {
        let of = *self.fds.get(fd)?;
        if data.is_empty() {
            return Ok(0);
        }
        let slot = of.slot;
        let entry = *self.root.entry(slot);

        let mut chain: Vec<u16> = self.fat.collect_chain(entry.first_block)?;
        let kept = chain.len();
        let needed = (of.offset + data.len()).div_ceil(BLOCK_SIZE);
        while chain.len() < needed {
            match self.fat.extend_chain(chain.last().copied()) {
                Ok(block) => chain.push(block),
                Err(FsAllocatorError::OutOfBlocks) => break,
                Err(e) => {
                    self.fat.rollback();
                    return Err(e.into());
                }
            }
        }

        let capacity = chain.len() * BLOCK_SIZE;
        let count = data.len().min(capacity.saturating_sub(of.offset));
        if count == 0 {
            warn!("write fd {fd}: disk full");
            self.fat.rollback();
            return Err(FsError::DiskFull);
        }
        if count < data.len() {
            warn!("write fd {fd}: disk full, short write {count}/{}", data.len());
        }

        if let Err(e) = self.write_span(&chain, kept, of.offset, &data[..count]) {
            self.fat.rollback();
            return Err(e);
        }
        if let Err(e) = self.fat.flush(&mut self.io) {
            self.fat.rollback();
            self.restore_fat();
            return Err(e.into());
        }

        let end = of.offset + count;
        let mut updated = entry;
        if end > updated.size as usize {
            updated.size = end as u32;
        }
        if let Some(&first) = chain.first() {
            updated.first_block = first;
        }
        if updated != entry {
            self.root.set(slot, updated);
            if let Err(e) = self.root.flush(&mut self.io, &self.meta) {
                self.root.set(slot, entry);
                self.fat.rollback();
                self.restore_fat();
                return Err(e.into());
            }
        }

        self.fat.commit();
        self.fds.get_mut(fd)?.offset = end;
        Ok(count)
    }

    /// Writes `data` at byte `offset` of the file laid out on `chain`.
    ///
    /// Blocks from index `kept` on were allocated by this write and hold
    /// nothing worth reading back.
    fn write_span(&mut self, chain: &[u16], kept: usize, offset: usize, data: &[u8]) -> FsResult {
        let mut scratch: Block = [0u8; BLOCK_SIZE];
        let mut done = 0;
        let mut pos = offset;
        while done < data.len() {
            let index = pos / BLOCK_SIZE;
            let block = chain[index];
            let target = self.meta.unit_block(block);
            let start = pos % BLOCK_SIZE;
            let len = (BLOCK_SIZE - start).min(data.len() - done);

            if len == BLOCK_SIZE {
                let full: &Block = data[done..done + BLOCK_SIZE]
                    .try_into()
                    .map_err(|_| FsError::Other("Unaligned block span"))?;
                self.io.write_block(target, full)?;
            } else {
                if index < kept {
                    self.io.read_block(target, &mut scratch)?;
                } else {
                    scratch.fill(0);
                }
                scratch[start..start + len].copy_from_slice(&data[done..done + len]);
                self.io.write_block(target, &scratch)?;
            }

            done += len;
            pos += len;
        }
        Ok(())
    }

    /// Rewrites the FAT blocks touched by a rolled back update.
    fn restore_fat(&mut self) {
        if let Err(e) = self.fat.flush(&mut self.io) {
            warn!("FAT restore failed: {e}");
        }
    }
}
