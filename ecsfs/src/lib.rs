// SPDX-License-Identifier: MIT

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use crate::core::traits::*;

/// ECS150FS volume implementation.
///
/// See [`ecs::FileSystem`], [`ecs::Volume`], [`ecs::EcsFormatter`] and [`ecs::EcsChecker`].
pub mod ecs {
    pub use super::fs::ecs::prelude::*;
}
