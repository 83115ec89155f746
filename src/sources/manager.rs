//! Repository manager - ordered set of recipe sources.

use std::rc::Rc;

use anyhow::{Context, Result};

use crate::core::{InstalledPackages, Job, PackageInfo, Recipe};
use crate::sources::{CatalogSource, InlineSource, RecipeSource, SourceContext};

/// Manages the recipe sources of one run.
///
/// Sources are consulted in registration order and the first source that
/// claims a package owns it, even if loading then yields nothing.
#[derive(Default)]
pub struct RepositoryManager {
    sources: Vec<Box<dyn RecipeSource>>,
}

impl RepositoryManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        RepositoryManager {
            sources: Vec::new(),
        }
    }

    /// Register the inline source and a catalog source for every installed
    /// package that opted in as a recipe catalog.
    pub fn import(installed: &InstalledPackages, ctx: Rc<SourceContext>) -> Result<Self> {
        let mut manager = RepositoryManager::new();
        manager.add(Box::new(InlineSource::new(Rc::clone(&ctx))));

        for package in installed.packages() {
            if !package.is_recipe_catalog() {
                continue;
            }

            let catalog = CatalogSource::new(package, Rc::clone(&ctx))?;
            tracing::debug!(
                "registered recipe catalog {} at {}",
                package.name,
                catalog.base_path().display()
            );
            manager.add(Box::new(catalog));
        }

        Ok(manager)
    }

    /// Register a source. A source whose name is already registered is
    /// ignored.
    pub fn add(&mut self, source: Box<dyn RecipeSource>) {
        if self.has(source.name()) {
            tracing::debug!("recipe source {} is already registered", source.name());
            return;
        }

        self.sources.push(source);
    }

    /// Check if a source with this name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.name() == name)
    }

    /// Names of the registered sources, in lookup order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Name of the first source claiming a package.
    pub fn claiming_source(&mut self, package: &PackageInfo) -> Result<Option<&str>> {
        for source in self.sources.iter_mut() {
            if source.has_recipe(package)? {
                return Ok(Some(source.name()));
            }
        }

        Ok(None)
    }

    /// Resolve the recipe of a package.
    pub fn resolve(&mut self, package: &PackageInfo, job: Job) -> Result<Option<Recipe>> {
        for source in self.sources.iter_mut() {
            if !source.has_recipe(package)? {
                continue;
            }

            let name = source.name().to_string();
            return source
                .load_recipe(package, job)
                .with_context(|| format!("failed to load recipe of {} from {}", package.name, name));
        }

        Ok(None)
    }
}
