// SPDX-License-Identifier: MIT

use core::fmt;

pub use ecsio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAllocatorError {
    OutOfBlocks,
    Other(&'static str),
}

impl FsAllocatorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsAllocatorError::OutOfBlocks => "Out of blocks",
            FsAllocatorError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for FsAllocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsParsingError {
    IO(BlockIOError),
    BadSignature,
    Geometry(&'static str),
    Other(&'static str),
}

impl FsParsingError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsParsingError::IO(_) => "IO error",
            FsParsingError::BadSignature => "Bad superblock signature",
            FsParsingError::Geometry(msg) => msg,
            FsParsingError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsParsingError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

impl fmt::Display for FsParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCursorError {
    InvalidBlock(u16),
    LoopDetected,
    ShortChain,
    Other(&'static str),
}

impl FsCursorError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCursorError::InvalidBlock(_) => "Invalid block in FAT chain",
            FsCursorError::LoopDetected => "Loop detected in FAT chain",
            FsCursorError::ShortChain => "FAT chain shorter than file size",
            FsCursorError::Other(msg) => msg,
        }
    }
}

impl fmt::Display for FsCursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        if let FsCursorError::InvalidBlock(block) = self {
            write!(f, " (block: {block})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(BlockIOError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(_) => "IO error",
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsFormatterError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

impl fmt::Display for FsFormatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCheckerError {
    IO(BlockIOError),
    Cursor(FsCursorError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsCheckerError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCheckerError::IO(_) => "IO error",
            FsCheckerError::Cursor(_) => "Cursor error",
            FsCheckerError::Invalid(msg) => msg,
            FsCheckerError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsCheckerError::IO(e) => Some(FsError::IO(*e)),
            FsCheckerError::Cursor(e) => Some(FsError::Chain(*e)),
            _ => None,
        }
    }
}

impl fmt::Display for FsCheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

/// Top-level error
///
/// One variant per failure a volume operation can report. Lower layers
/// (`BlockIOError`, `FsParsingError`, `FsCursorError`, ...) convert into it through `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    NotMounted,
    AlreadyMounted,
    InvalidImage(FsParsingError),
    InvalidName,
    NameExists,
    NotFound,
    DirectoryFull,
    FileOpen,
    BadDescriptor,
    TooManyOpen,
    OffsetOutOfRange,
    DiskFull,
    IO(BlockIOError),
    Chain(FsCursorError),
    Formatter(FsFormatterError),
    Checker(FsCheckerError),
    Other(&'static str),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg())?;
        let mut current = self.source();
        while let Some(src) = current {
            write!(f, "\n  caused by: {}", src.msg())?;
            current = src.source();
        }
        Ok(())
    }
}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::NotMounted => "No volume mounted",
            FsError::AlreadyMounted => "A volume is already mounted",
            FsError::InvalidImage(e) => e.msg(),
            FsError::InvalidName => "Invalid filename",
            FsError::NameExists => "Filename already exists",
            FsError::NotFound => "File not found",
            FsError::DirectoryFull => "Root directory is full",
            FsError::FileOpen => "File is open",
            FsError::BadDescriptor => "Bad file descriptor",
            FsError::TooManyOpen => "Too many open files",
            FsError::OffsetOutOfRange => "Offset beyond end of file",
            FsError::DiskFull => "Disk full",
            FsError::IO(e) => e.msg(),
            FsError::Chain(e) => e.msg(),
            FsError::Formatter(e) => e.msg(),
            FsError::Checker(e) => e.msg(),
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::InvalidImage(e) => e.source(),
            FsError::Formatter(e) => e.source(),
            FsError::Checker(e) => e.source(),
            _ => None,
        }
    }

    /// True for failures of the underlying block store.
    pub fn is_io(&self) -> bool {
        matches!(self, FsError::IO(_)) || matches!(self.source(), Some(FsError::IO(_)))
    }
}

impl From<FsAllocatorError> for FsError {
    #[inline]
    fn from(e: FsAllocatorError) -> Self {
        match e {
            FsAllocatorError::OutOfBlocks => FsError::DiskFull,
            FsAllocatorError::Other(msg) => FsError::Other(msg),
        }
    }
}

impl core::error::Error for FsError {}
impl core::error::Error for FsAllocatorError {}
impl core::error::Error for FsParsingError {}
impl core::error::Error for FsCursorError {}
impl core::error::Error for FsFormatterError {}
impl core::error::Error for FsCheckerError {}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsAllocatorResult<T = ()> = Result<T, FsAllocatorError>;
pub type FsParsingResult<T = ()> = Result<T, FsParsingError>;
pub type FsCursorResult<T = ()> = Result<T, FsCursorError>;
pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
pub type FsCheckerResult<T = ()> = Result<T, FsCheckerError>;

crate::fs_error_wiring! {
    top => FsError {
        BlockIOError     : IO,
        FsParsingError   : InvalidImage,
        FsCursorError    : Chain,
        FsFormatterError : Formatter,
        FsCheckerError   : Checker,
    },
    str_into => [
        FsAllocatorError,
        FsParsingError,
        FsCursorError,
        FsFormatterError,
        FsCheckerError,
    ],
    sub => {
        BlockIOError  => [ FsParsingError::IO, FsFormatterError::IO, FsCheckerError::IO ],
        FsCursorError => [ FsCheckerError::Cursor ],
    },
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_display() {
        let low = BlockIOError::OutOfBounds;
        let top: FsError = FsParsingError::from(low).into();

        assert!(matches!(top, FsError::InvalidImage(FsParsingError::IO(_))));
        assert!(top.is_io());
        let text = format!("{top}");
        assert!(text.contains("caused by: Block index out of bounds"));
    }

    #[test]
    fn test_allocator_maps_to_disk_full() {
        let e: FsError = FsAllocatorError::OutOfBlocks.into();
        assert_eq!(e, FsError::DiskFull);
    }

    #[test]
    fn test_str_into_other() {
        let e: FsCursorError = "boom".into();
        assert_eq!(e, FsCursorError::Other("boom"));
        let top: FsError = "boom".into();
        assert_eq!(top, FsError::Other("boom"));
    }
}
