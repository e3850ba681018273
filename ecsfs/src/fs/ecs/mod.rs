// SPDX-License-Identifier: MIT

pub mod checker;
pub mod constant;
pub mod descriptor;
pub mod directory;
pub mod fat;
pub mod file_ops;
pub mod formatter;
pub mod info;
pub mod meta;
pub mod mount;
pub mod types;
pub mod volume;

// === Public Interface ===
pub mod traits {
    pub use super::checker::EcsChecker;
    pub use super::fat::FatTable;
    pub use super::formatter::EcsFormatter;
    pub use super::meta::EcsMeta;
}

pub mod prelude {
    pub use super::constant::{
        FS_FILE_MAX_COUNT, FS_FILENAME_LEN, FS_OPEN_MAX_COUNT,
    };
    pub use super::descriptor::Fd;
    pub use super::info::{FileStat, FsInfo};
    pub use super::mount::FileSystem;
    pub use super::traits::*;
    pub use super::volume::Volume;
    pub use crate::core::checker::{
        CheckPhases, CoreVerifyOptions, Finding, Severity, VerifyReport,
    };
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use ecsio::prelude::*;
}
