//! Custom configurators contributed for additional manifest keys.
//!
//! Each extension owns one top-level manifest key. When a recipe carrying
//! that key is applied, the extension receives the key's value.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::Recipe;
use crate::ops::host::InstallOptions;
use crate::ops::lock::RecipeLock;
use crate::resolver::errors::RecipeError;

/// Manifest keys handled by the host configurator.
pub const BUILTIN_KEYS: &[&str] = &[
    "bundles",
    "env",
    "container",
    "copy-from-recipe",
    "copy-from-package",
    "makefile",
    "composer-scripts",
    "gitignore",
    "dockerfile",
    "docker-compose",
];

/// A configurator for one manifest key.
pub trait ConfiguratorExtension {
    /// Apply the key's configuration for an installed recipe.
    fn configure(
        &mut self,
        recipe: &Recipe,
        config: &Value,
        lock: &mut dyn RecipeLock,
        options: &InstallOptions,
    ) -> Result<()>;

    /// Revert the key's configuration for an uninstalled recipe.
    fn unconfigure(&mut self, recipe: &Recipe, config: &Value, lock: &mut dyn RecipeLock)
        -> Result<()>;
}

/// Registered extensions, in registration order.
#[derive(Default)]
pub struct ConfiguratorRegistry {
    extensions: Vec<(String, Box<dyn ConfiguratorExtension>)>,
}

impl ConfiguratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ConfiguratorRegistry::default()
    }

    /// Register an extension for a manifest key.
    ///
    /// A key can only be registered once and built-in keys cannot be
    /// taken over.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        extension: Box<dyn ConfiguratorExtension>,
    ) -> Result<(), RecipeError> {
        let key = key.into();

        if BUILTIN_KEYS.contains(&key.as_str()) || self.contains(&key) {
            return Err(RecipeError::DuplicateConfigurator { name: key });
        }

        tracing::debug!("registered configurator for `{}`", key);
        self.extensions.push((key, extension));
        Ok(())
    }

    /// Check if a key has an extension.
    pub fn contains(&self, key: &str) -> bool {
        self.extensions.iter().any(|(k, _)| k == key)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|(k, _)| k.as_str())
    }

    /// Run every extension whose key the recipe manifest carries.
    pub fn configure(
        &mut self,
        recipe: &Recipe,
        lock: &mut dyn RecipeLock,
        options: &InstallOptions,
    ) -> Result<()> {
        for (key, extension) in self.extensions.iter_mut() {
            let Some(config) = recipe.manifest().get(key) else {
                continue;
            };

            extension
                .configure(recipe, config, lock, options)
                .with_context(|| format!("failed to configure `{}` for {}", key, recipe.name()))?;
        }

        Ok(())
    }

    /// Revert every extension whose key the recipe manifest carries.
    pub fn unconfigure(&mut self, recipe: &Recipe, lock: &mut dyn RecipeLock) -> Result<()> {
        for (key, extension) in self.extensions.iter_mut() {
            let Some(config) = recipe.manifest().get(key) else {
                continue;
            };

            extension
                .unconfigure(recipe, config, lock)
                .with_context(|| format!("failed to unconfigure `{}` for {}", key, recipe.name()))?;
        }

        Ok(())
    }
}
