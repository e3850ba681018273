// SPDX-License-Identifier: MIT

use core::fmt;

use crate::{core::errors::*, fs::ecs::constant::FS_OPEN_MAX_COUNT};

/// Handle to an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fd(usize);

impl Fd {
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open file state: bound directory slot and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub slot: usize,
    pub offset: usize,
}

/// Fixed-size table of open files.
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    slots: [Option<OpenFile>; FS_OPEN_MAX_COUNT],
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self {
            slots: [None; FS_OPEN_MAX_COUNT],
        }
    }
}

impl DescriptorTable {
    /// Binds the lowest free handle to `slot` at offset 0.
    pub fn open(&mut self, slot: usize) -> FsResult<Fd> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(FsError::TooManyOpen)?;
        self.slots[index] = Some(OpenFile { slot, offset: 0 });
        Ok(Fd(index))
    }

    pub fn close(&mut self, fd: Fd) -> FsResult<OpenFile> {
        self.slots
            .get_mut(fd.0)
            .and_then(Option::take)
            .ok_or(FsError::BadDescriptor)
    }

    pub fn get(&self, fd: Fd) -> FsResult<&OpenFile> {
        self.slots
            .get(fd.0)
            .and_then(Option::as_ref)
            .ok_or(FsError::BadDescriptor)
    }

    pub fn get_mut(&mut self, fd: Fd) -> FsResult<&mut OpenFile> {
        self.slots
            .get_mut(fd.0)
            .and_then(Option::as_mut)
            .ok_or(FsError::BadDescriptor)
    }

    /// True if any live descriptor references directory slot `slot`.
    pub fn is_slot_open(&self, slot: usize) -> bool {
        self.slots.iter().flatten().any(|of| of.slot == slot)
    }

    pub fn open_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_handle_reused() {
        let mut fds = DescriptorTable::default();
        let a = fds.open(3).unwrap();
        let b = fds.open(3).unwrap();
        let c = fds.open(5).unwrap();
        assert_eq!((a.as_raw(), b.as_raw(), c.as_raw()), (0, 1, 2));

        fds.close(b).unwrap();
        assert_eq!(fds.open(7).unwrap(), b);
        assert_eq!(fds.open_count(), 3);
    }

    #[test]
    fn test_bad_descriptor() {
        let mut fds = DescriptorTable::default();
        let fd = fds.open(0).unwrap();
        fds.close(fd).unwrap();
        assert_eq!(fds.close(fd), Err(FsError::BadDescriptor));
        assert_eq!(fds.get(fd).err(), Some(FsError::BadDescriptor));
        assert_eq!(
            fds.get(Fd::from_raw(FS_OPEN_MAX_COUNT)).err(),
            Some(FsError::BadDescriptor)
        );
    }

    #[test]
    fn test_too_many_open() {
        let mut fds = DescriptorTable::default();
        for _ in 0..FS_OPEN_MAX_COUNT {
            fds.open(1).unwrap();
        }
        assert_eq!(fds.open(1), Err(FsError::TooManyOpen));
        assert!(fds.is_slot_open(1));
        assert!(!fds.is_slot_open(2));

        fds.close(Fd::from_raw(9)).unwrap();
        assert_eq!(fds.open(2), Ok(Fd::from_raw(9)));
    }
}
