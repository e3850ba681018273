// SPDX-License-Identifier: MIT

pub use ecsio::BLOCK_SIZE;

// === Disk Layout Parameters ===

pub const ECS_SIGNATURE: &[u8; 8] = b"ECS150FS";
pub const SUPERBLOCK_INDEX: usize = 0;
pub const FAT_START_INDEX: usize = 1;
pub const ROOT_DIR_BLOCKS: usize = 1;

// === Superblock field offsets ===

pub const SB_SIGNATURE: usize = 0x00; // [u8; 8]
pub const SB_TOTAL_BLOCKS: usize = 0x08; // u16
pub const SB_ROOT_INDEX: usize = 0x0A; // u16
pub const SB_DATA_INDEX: usize = 0x0C; // u16
pub const SB_DATA_BLOCKS: usize = 0x0E; // u16
pub const SB_FAT_BLOCKS: usize = 0x10; // u8

// === FAT Region Parameters ===

pub const FAT_ENTRY_SIZE: usize = 2;
pub const FAT_ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / FAT_ENTRY_SIZE;
pub const FAT_FREE: u16 = 0;
pub const FAT_EOC: u16 = 0xFFFF;
pub const FAT_RESERVED_ENTRY: u16 = 0;
pub const FAT_FIRST_DATA_BLOCK: u16 = 1;
pub const FAT_MAX_BLOCKS: usize = u8::MAX as usize;

// === Root Directory ===

pub const FS_FILENAME_LEN: usize = 16;
pub const FS_FILE_MAX_COUNT: usize = 128;
pub const DIR_ENTRY_SIZE: usize = 32;
pub const DIR_ENTRY_IN_USE: u8 = 1;

pub const DE_NAME: usize = 0x00; // [u8; 16]
pub const DE_SIZE: usize = 0x10; // u32
pub const DE_FIRST_BLOCK: usize = 0x14; // u16
pub const DE_FLAGS: usize = 0x16; // u8

// === Descriptors ===

pub const FS_OPEN_MAX_COUNT: usize = 32;
