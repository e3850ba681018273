// SPDX-License-Identifier: MIT

use alloc::string::String;

use ecsio::bytes::*;

use crate::{core::errors::*, ensure, fs::ecs::constant::*};

/// One 32-byte slot of the root directory.
///
/// Layout: name `[u8; 16]` at `0x00` (NUL-terminated), size `u32` at `0x10`,
/// first data block `u16` at `0x14`, occupancy flag at `0x16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: [u8; FS_FILENAME_LEN],
    pub size: u32,
    pub first_block: u16,
    pub in_use: bool,
}

impl DirEntry {
    pub const EMPTY: Self = Self {
        name: [0u8; FS_FILENAME_LEN],
        size: 0,
        first_block: 0,
        in_use: false,
    };

    /// Fresh occupied entry: size 0, no data block.
    ///
    /// `name` must already have passed [`validate_name`].
    pub fn new(name: &[u8]) -> Self {
        let mut raw = [0u8; FS_FILENAME_LEN];
        raw[..name.len()].copy_from_slice(name);
        Self {
            name: raw,
            size: 0,
            first_block: FAT_EOC,
            in_use: true,
        }
    }

    /// Decodes a slot. `raw` must hold at least `DIR_ENTRY_SIZE` bytes.
    pub fn decode(raw: &[u8]) -> Self {
        let mut name = [0u8; FS_FILENAME_LEN];
        name.copy_from_slice(&raw[DE_NAME..DE_NAME + FS_FILENAME_LEN]);
        Self {
            name,
            size: read_u32_le(raw, DE_SIZE),
            first_block: read_u16_le(raw, DE_FIRST_BLOCK),
            in_use: raw[DE_FLAGS] == DIR_ENTRY_IN_USE,
        }
    }

    /// Encodes the slot into `raw[..DIR_ENTRY_SIZE]`, zeroing reserved bytes.
    pub fn encode(&self, raw: &mut [u8]) {
        let raw = &mut raw[..DIR_ENTRY_SIZE];
        raw.fill(0);
        if !self.in_use {
            return;
        }
        raw[DE_NAME..DE_NAME + FS_FILENAME_LEN].copy_from_slice(&self.name);
        write_u32_le(raw, DE_SIZE, self.size);
        write_u16_le(raw, DE_FIRST_BLOCK, self.first_block);
        raw[DE_FLAGS] = DIR_ENTRY_IN_USE;
    }

    /// Name bytes up to the first NUL.
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FS_FILENAME_LEN);
        &self.name[..len]
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    #[inline]
    pub fn name_eq(&self, name: &[u8]) -> bool {
        self.in_use && self.name_bytes() == name
    }

    /// True when the name field carries its NUL terminator.
    #[inline]
    pub fn is_name_terminated(&self) -> bool {
        self.name.contains(&0)
    }
}

/// Checks a filename and returns its raw bytes.
///
/// A valid name is non-empty, has no NUL byte and fits in
/// `FS_FILENAME_LEN - 1` bytes so the terminator always fits.
pub fn validate_name(name: &str) -> FsResult<&[u8]> {
    let bytes = name.as_bytes();
    ensure!(!bytes.is_empty(), FsError::InvalidName);
    ensure!(bytes.len() < FS_FILENAME_LEN, FsError::InvalidName);
    ensure!(!bytes.contains(&0), FsError::InvalidName);
    Ok(bytes)
}
