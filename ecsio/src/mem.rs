// SPDX-License-Identifier: MIT

use crate::{BLOCK_SIZE, Block, BlockIO, BlockIOError, BlockIOResult};

/// In-memory implementation of `BlockIO`.
///
/// Useful for tests, RAM-backed volumes, virtual disks.
/// Trailing bytes that do not fill a whole block are not addressable.
#[derive(Debug)]
pub struct MemBlockIO<'a> {
    buffer: &'a mut [u8],
    block_count: usize,
}

impl<'a> MemBlockIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let block_count = buffer.len() / BLOCK_SIZE;
        Self {
            buffer,
            block_count,
        }
    }

    #[inline]
    fn range(&self, index: usize) -> BlockIOResult<core::ops::Range<usize>> {
        self.check_index(index)?;
        let start = index
            .checked_mul(BLOCK_SIZE)
            .ok_or(BlockIOError::OutOfBounds)?;
        Ok(start..start + BLOCK_SIZE)
    }
}

impl<'a> BlockIO for MemBlockIO<'a> {
    #[inline]
    fn block_count(&self) -> usize {
        self.block_count
    }

    #[inline(always)]
    fn read_block(&mut self, index: usize, buf: &mut Block) -> BlockIOResult {
        let range = self.range(index)?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline(always)]
    fn write_block(&mut self, index: usize, data: &Block) -> BlockIOResult {
        let range = self.range(index)?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> BlockIOResult {
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_rw() {
        let mut buf = vec![0u8; 4 * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);
        assert_eq!(io.block_count(), 4);

        let mut block = [0u8; BLOCK_SIZE];
        block[..4].copy_from_slice(&[1, 2, 3, 4]);
        io.write_block(2, &block).unwrap();

        let mut output = [0u8; BLOCK_SIZE];
        io.read_block(2, &mut output).unwrap();
        assert_eq!(&output[..4], &[1, 2, 3, 4]);
        drop(io);
        assert_eq!(&buf[2 * BLOCK_SIZE..2 * BLOCK_SIZE + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = vec![0u8; 2 * BLOCK_SIZE + 100];
        let mut io = MemBlockIO::new(&mut buf);
        assert_eq!(io.block_count(), 2);

        let mut block = [0u8; BLOCK_SIZE];
        assert_eq!(
            io.read_block(2, &mut block),
            Err(BlockIOError::OutOfBounds)
        );
        assert_eq!(io.write_block(usize::MAX, &block), Err(BlockIOError::OutOfBounds));
    }

    #[test]
    fn test_multi_block_rw() {
        let mut buf = vec![0u8; 8 * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);

        let input: Vec<u8> = (0..3 * BLOCK_SIZE).map(|i| (i % 251) as u8).collect();
        io.write_blocks(1, &input).unwrap();

        let mut output = vec![0u8; 3 * BLOCK_SIZE];
        io.read_blocks(1, &mut output).unwrap();
        assert_eq!(input, output);

        let mut odd = vec![0u8; BLOCK_SIZE + 1];
        assert_eq!(io.read_blocks(0, &mut odd), Err(BlockIOError::BadBufferSize));
    }

    #[test]
    fn test_zero_blocks() {
        let mut buf = vec![0xFFu8; 4 * BLOCK_SIZE];
        let mut io = MemBlockIO::new(&mut buf);

        io.zero_blocks(1, 2).unwrap();

        let mut output = [0xAAu8; BLOCK_SIZE];
        io.read_block(2, &mut output).unwrap();
        assert!(output.iter().all(|&b| b == 0));
        io.read_block(3, &mut output).unwrap();
        assert!(output.iter().all(|&b| b == 0xFF));
    }
}
