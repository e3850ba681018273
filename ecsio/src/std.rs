// SPDX-License-Identifier: MIT

use std::fs::{File, OpenOptions};
use std::io::{Error, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::{BLOCK_SIZE, Block, BlockIO, BlockIOError, BlockIOResult};

/// `BlockIO` over any seekable byte stream (typically a disk image file).
#[derive(Debug)]
pub struct StdBlockIO<T: Read + Write + Seek> {
    io: T,
    block_count: usize,
}

impl StdBlockIO<File> {
    /// Opens an existing image for reading and writing.
    ///
    /// The image length must be a whole number of blocks.
    pub fn open<P: AsRef<Path>>(path: P) -> BlockIOResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::new(file)
    }

    /// Creates (or truncates) an image of `block_count` zeroed blocks.
    pub fn create<P: AsRef<Path>>(path: P, block_count: usize) -> BlockIOResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len((block_count * BLOCK_SIZE) as u64)?;
        Self::new(file)
    }
}

impl<T: Read + Write + Seek> StdBlockIO<T> {
    pub fn new(mut io: T) -> BlockIOResult<Self> {
        let len = io.seek(SeekFrom::End(0))?;
        if !len.is_multiple_of(BLOCK_SIZE as u64) {
            return Err(BlockIOError::Other(
                "Image size is not a multiple of the block size",
            ));
        }
        Ok(Self {
            io,
            block_count: (len / BLOCK_SIZE as u64) as usize,
        })
    }

    /// Flushes and hands back the underlying stream.
    pub fn into_inner(mut self) -> BlockIOResult<T> {
        self.io.flush()?;
        Ok(self.io)
    }

    #[inline]
    fn seek_block(&mut self, index: usize) -> BlockIOResult {
        self.check_index(index)?;
        self.io
            .seek(SeekFrom::Start(index as u64 * BLOCK_SIZE as u64))?;
        Ok(())
    }
}

impl<T: Read + Write + Seek> BlockIO for StdBlockIO<T> {
    #[inline]
    fn block_count(&self) -> usize {
        self.block_count
    }

    fn read_block(&mut self, index: usize, buf: &mut Block) -> BlockIOResult {
        self.seek_block(index)?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&mut self, index: usize, data: &Block) -> BlockIOResult {
        self.seek_block(index)?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> BlockIOResult {
        self.io.flush()?;
        Ok(())
    }
}

impl From<Error> for BlockIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        // Leak the string to produce a 'static str. Acceptable for error mapping.
        let leaked_str: &'static str = Box::leak(e.to_string().into_boxed_str());
        BlockIOError::Other(leaked_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;
    use std::io::Cursor;
    use tempfile::{NamedTempFile, tempfile};

    #[test]
    fn test_rw() {
        let file = tempfile().unwrap();
        file.set_len(4 * BLOCK_SIZE as u64).unwrap();
        let mut io = StdBlockIO::new(file).unwrap();
        assert_eq!(io.block_count(), 4);

        let mut block = [0u8; BLOCK_SIZE];
        block[10..14].copy_from_slice(&[1, 2, 3, 4]);
        io.write_block(3, &block).unwrap();

        let mut output = [0u8; BLOCK_SIZE];
        io.read_block(3, &mut output).unwrap();
        assert_eq!(output, block);
    }

    #[test]
    fn test_rejects_partial_block_image() {
        let cursor = Cursor::new(vec![0u8; BLOCK_SIZE + 1]);
        assert!(StdBlockIO::new(cursor).is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        let cursor = Cursor::new(vec![0u8; 2 * BLOCK_SIZE]);
        let mut io = StdBlockIO::new(cursor).unwrap();
        let block = [0u8; BLOCK_SIZE];
        assert_eq!(io.write_block(2, &block), Err(BlockIOError::OutOfBounds));
        // The stream must not have grown.
        assert_eq!(io.into_inner().unwrap().into_inner().len(), 2 * BLOCK_SIZE);
    }

    #[test]
    fn test_create_then_reopen() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut io = StdBlockIO::create(tmp.path(), 3).unwrap();
            let block = [0x5Au8; BLOCK_SIZE];
            io.write_block(1, &block).unwrap();
            io.close().unwrap();
        }

        let mut io = StdBlockIO::open(tmp.path()).unwrap();
        assert_eq!(io.block_count(), 3);
        let mut output = [0u8; BLOCK_SIZE];
        io.read_block(1, &mut output).unwrap();
        assert!(output.iter().all(|&b| b == 0x5A));
        io.read_block(2, &mut output).unwrap();
        assert!(output.iter().all(|&b| b == 0));
    }
}
