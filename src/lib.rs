//! Rope - recipe repositories for PHP dependency-manager installs
//!
//! This crate provides the core library functionality for Rope: finding
//! the recipe of an installed package (inline or in a recipe catalog),
//! deciding between Rope recipes and the fallback recipe system for a batch
//! of package operations, and handing the chosen recipes to a configurator.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Rope unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides recipe catalog fixtures and recording
/// implementations of the host collaborators.
#[cfg(test)]
pub mod test_support;

pub use core::{
    manifest::Manifest, operation::Job, operation::Operation, package::PackageInfo,
    recipe::Recipe,
};

pub use ops::RecipeEngine;
pub use resolver::RecipeError;
pub use sources::RepositoryManager;
pub use util::context::GlobalContext;
