//! Collaborators provided by the host dependency manager.
//!
//! The engine never reaches into the host: it only sees these narrow
//! capabilities, handed to it for one run.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::core::{Manifest, Operation, Recipe, RecipeFiles};
use crate::ops::lock::RecipeLock;

/// A recipe of the fallback recipe system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackRecipe {
    pub manifest: Manifest,
    pub files: Option<RecipeFiles>,
}

/// The fallback recipe system.
pub trait FallbackRecipes {
    /// Fetch the fallback recipes of a batch of operations, keyed by
    /// package name. Packages without a fallback recipe are left out.
    fn fetch(&mut self, operations: &[Operation]) -> Result<BTreeMap<String, FallbackRecipe>>;
}

/// Options of the install step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// The run is a forced update
    pub force: bool,
}

/// The configurator applying recipes to the project.
pub trait Configurator {
    /// Apply a recipe.
    fn install(
        &mut self,
        recipe: &Recipe,
        lock: &mut dyn RecipeLock,
        options: &InstallOptions,
    ) -> Result<()>;

    /// Revert a recipe.
    fn unconfigure(&mut self, recipe: &Recipe, lock: &mut dyn RecipeLock) -> Result<()>;
}
