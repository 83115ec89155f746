//! Core data structures for Rope.
//!
//! This module contains the foundational types used throughout Rope:
//! - Package metadata and package operations reported by the host
//! - Recipe manifests, recipes and their origins
//! - The installed-packages registry

pub mod bundle;
pub mod installed;
pub mod manifest;
pub mod operation;
pub mod origin;
pub mod package;
pub mod recipe;

pub use installed::InstalledPackages;
pub use manifest::Manifest;
pub use operation::{Job, Operation};
pub use origin::{format_origin, OriginParts};
pub use package::PackageInfo;
pub use recipe::{LockEntry, LockedRecipe, Recipe, RecipeFile, RecipeFiles};
