// SPDX-License-Identifier: MIT

use alloc::vec::Vec;

use ecsio::BlockIO;

use crate::{
    core::{checker::VerifyReport, errors::*},
    fs::ecs::{
        descriptor::Fd,
        info::{FileStat, FsInfo},
        volume::Volume,
    },
};

/// Mount point holding at most one volume.
///
/// Forwards every operation to the mounted [`Volume`], reporting
/// `NotMounted` when there is none.
#[derive(Debug)]
pub struct FileSystem<IO: BlockIO> {
    volume: Option<Volume<IO>>,
}

impl<IO: BlockIO> Default for FileSystem<IO> {
    fn default() -> Self {
        Self { volume: None }
    }
}

impl<IO: BlockIO> FileSystem<IO> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    /// Mounts `io`. On failure nothing stays mounted.
    pub fn mount(&mut self, io: IO) -> FsResult {
        if self.volume.is_some() {
            return Err(FsError::AlreadyMounted);
        }
        self.volume = Some(Volume::mount(io)?);
        Ok(())
    }

    /// Unmounts and returns the closed block store.
    pub fn unmount(&mut self) -> FsResult<IO> {
        self.volume.take().ok_or(FsError::NotMounted)?.unmount()
    }

    pub fn volume(&self) -> FsResult<&Volume<IO>> {
        self.volume.as_ref().ok_or(FsError::NotMounted)
    }

    pub fn volume_mut(&mut self) -> FsResult<&mut Volume<IO>> {
        self.volume.as_mut().ok_or(FsError::NotMounted)
    }

    pub fn info(&self) -> FsResult<FsInfo> {
        Ok(self.volume()?.info())
    }

    pub fn create(&mut self, name: &str) -> FsResult {
        self.volume_mut()?.create(name)
    }

    pub fn delete(&mut self, name: &str) -> FsResult {
        self.volume_mut()?.delete(name)
    }

    pub fn list(&self) -> FsResult<Vec<FileStat>> {
        Ok(self.volume()?.list())
    }

    pub fn open(&mut self, name: &str) -> FsResult<Fd> {
        self.volume_mut()?.open(name)
    }

    pub fn close(&mut self, fd: Fd) -> FsResult {
        self.volume_mut()?.close(fd)
    }

    pub fn stat(&self, fd: Fd) -> FsResult<usize> {
        self.volume()?.stat(fd)
    }

    pub fn seek(&mut self, fd: Fd, offset: usize) -> FsResult {
        self.volume_mut()?.seek(fd, offset)
    }

    pub fn tell(&self, fd: Fd) -> FsResult<usize> {
        self.volume()?.tell(fd)
    }

    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> FsResult<usize> {
        self.volume_mut()?.read(fd, buf)
    }

    pub fn write(&mut self, fd: Fd, data: &[u8]) -> FsResult<usize> {
        self.volume_mut()?.write(fd, data)
    }

    pub fn check(&mut self) -> FsResult<VerifyReport> {
        self.volume_mut()?.check()
    }
}
