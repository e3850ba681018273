// SPDX-License-Identifier: MIT

use ecsio::{Block, bytes::*};

use crate::fs::ecs::{constant::*, meta::EcsMeta};

/// Block 0 of an ECS150FS volume.
///
/// Fields are decoded at fixed offsets; bytes `0x11..0x1000` are reserved
/// and written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    pub signature: [u8; 8],
    pub total_blocks: u16,
    pub root_index: u16,
    pub data_index: u16,
    pub data_blocks: u16,
    pub fat_blocks: u8,
}

impl Superblock {
    pub fn from_meta(meta: &EcsMeta) -> Self {
        Self {
            signature: *ECS_SIGNATURE,
            total_blocks: meta.total_blocks,
            root_index: meta.root_index,
            data_index: meta.data_index,
            data_blocks: meta.data_blocks,
            fat_blocks: meta.fat_blocks,
        }
    }

    pub fn decode(block: &Block) -> Self {
        let mut signature = [0u8; 8];
        signature.copy_from_slice(&block[SB_SIGNATURE..SB_SIGNATURE + 8]);
        Self {
            signature,
            total_blocks: read_u16_le(block, SB_TOTAL_BLOCKS),
            root_index: read_u16_le(block, SB_ROOT_INDEX),
            data_index: read_u16_le(block, SB_DATA_INDEX),
            data_blocks: read_u16_le(block, SB_DATA_BLOCKS),
            fat_blocks: block[SB_FAT_BLOCKS],
        }
    }

    pub fn encode(&self, block: &mut Block) {
        block.fill(0);
        block[SB_SIGNATURE..SB_SIGNATURE + 8].copy_from_slice(&self.signature);
        write_u16_le(block, SB_TOTAL_BLOCKS, self.total_blocks);
        write_u16_le(block, SB_ROOT_INDEX, self.root_index);
        write_u16_le(block, SB_DATA_INDEX, self.data_index);
        write_u16_le(block, SB_DATA_BLOCKS, self.data_blocks);
        block[SB_FAT_BLOCKS] = self.fat_blocks;
    }

    #[inline]
    pub fn has_valid_signature(&self) -> bool {
        &self.signature == ECS_SIGNATURE
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use ecsio::BLOCK_SIZE;

    #[test]
    fn test_encode_layout() {
        let meta = EcsMeta::new(100).unwrap();
        let mut block = [0xAAu8; BLOCK_SIZE];
        Superblock::from_meta(&meta).encode(&mut block);

        assert_eq!(&block[0..8], b"ECS150FS");
        assert_eq!(&block[0x08..0x0A], &103u16.to_le_bytes());
        assert_eq!(&block[0x0A..0x0C], &2u16.to_le_bytes());
        assert_eq!(&block[0x0C..0x0E], &3u16.to_le_bytes());
        assert_eq!(&block[0x0E..0x10], &100u16.to_le_bytes());
        assert_eq!(block[0x10], 1);
        assert!(block[0x11..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_reads_fields() {
        let mut block = [0u8; BLOCK_SIZE];
        block[0..8].copy_from_slice(b"ECS150FS");
        block[0x08..0x0A].copy_from_slice(&8198u16.to_le_bytes());
        block[0x0A..0x0C].copy_from_slice(&5u16.to_le_bytes());
        block[0x0C..0x0E].copy_from_slice(&6u16.to_le_bytes());
        block[0x0E..0x10].copy_from_slice(&8192u16.to_le_bytes());
        block[0x10] = 4;

        let sb = Superblock::decode(&block);
        assert!(sb.has_valid_signature());
        assert_eq!(sb.total_blocks, 8198);
        assert_eq!(sb.root_index, 5);
        assert_eq!(sb.data_index, 6);
        assert_eq!(sb.data_blocks, 8192);
        assert_eq!(sb.fat_blocks, 4);
    }

    #[test]
    fn test_bad_signature() {
        let block = [0u8; BLOCK_SIZE];
        assert!(!Superblock::decode(&block).has_valid_signature());
    }
}
