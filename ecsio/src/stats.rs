// SPDX-License-Identifier: MIT

use crate::{Block, BlockIO, BlockIOResult};

/// Simple counters, no_std friendly.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IoStats {
    pub reads: u64,
    pub writes: u64,
    pub flushes: u64,

    // Highest block index touched, useful to spot stray accesses
    pub max_read_index: Option<usize>,
    pub max_write_index: Option<usize>,
}

impl IoStats {
    #[inline] pub fn reset(&mut self) { *self = IoStats::default(); }
}

/// Transparent instrumentation wrapper.
pub struct IOCounter<IO: BlockIO> {
    inner: IO,
    pub stats: IoStats,
}

impl<IO: BlockIO> IOCounter<IO> {
    #[inline]
    pub fn new(inner: IO) -> Self {
        Self { inner, stats: IoStats::default() }
    }

    #[inline] pub fn snapshot(&self) -> IoStats { self.stats }
    #[inline] pub fn reset(&mut self) { self.stats.reset() }
    #[inline] pub fn into_inner(self) -> IO { self.inner }
}

impl<IO: BlockIO> BlockIO for IOCounter<IO> {
    #[inline]
    fn block_count(&self) -> usize {
        self.inner.block_count()
    }

    #[inline]
    fn read_block(&mut self, index: usize, buf: &mut Block) -> BlockIOResult {
        self.stats.reads += 1;
        self.stats.max_read_index = self.stats.max_read_index.max(Some(index));
        self.inner.read_block(index, buf)
    }

    #[inline]
    fn write_block(&mut self, index: usize, data: &Block) -> BlockIOResult {
        self.stats.writes += 1;
        self.stats.max_write_index = self.stats.max_write_index.max(Some(index));
        self.inner.write_block(index, data)
    }

    #[inline]
    fn flush(&mut self) -> BlockIOResult {
        self.stats.flushes += 1;
        self.inner.flush()
    }

    #[inline]
    fn close(&mut self) -> BlockIOResult {
        self.inner.close()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_counts_block_transfers() {
        let mut buf = vec![0u8; 4 * BLOCK_SIZE];
        let mut io = IOCounter::new(MemBlockIO::new(&mut buf));

        let mut block = [0u8; BLOCK_SIZE];
        io.read_block(1, &mut block).unwrap();
        io.write_block(3, &block).unwrap();
        io.write_block(0, &block).unwrap();
        io.flush().unwrap();

        let stats = io.snapshot();
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.flushes, 1);
        assert_eq!(stats.max_read_index, Some(1));
        assert_eq!(stats.max_write_index, Some(3));

        io.reset();
        assert_eq!(io.snapshot(), IoStats::default());
    }
}
