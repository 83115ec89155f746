//! RecipeSource trait - common interface for all recipe sources.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::core::bundle::bundle_classes;
use crate::core::{Job, Manifest, PackageInfo, Recipe};
use crate::util::config::{Config, TargetDirs};

/// A source of recipes.
pub trait RecipeSource {
    /// Get the source name for display and de-duplication.
    fn name(&self) -> &str;

    /// Check if this source has a recipe for the package.
    fn has_recipe(&mut self, package: &PackageInfo) -> Result<bool>;

    /// Load the recipe for the package, if this source has one.
    fn load_recipe(&mut self, package: &PackageInfo, job: Job) -> Result<Option<Recipe>>;
}

/// Settings shared by every source of one run.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// File name of recipe manifests
    pub manifest_name: String,

    /// Default recipe directory of catalogs
    pub catalog_path: String,

    /// Target directories for path placeholders
    pub target_dirs: TargetDirs,

    /// Packages installed as development dependencies
    pub dev_packages: BTreeSet<String>,
}

impl SourceContext {
    /// Create a context from the configuration.
    pub fn new(config: &Config, target_dirs: TargetDirs, dev_packages: BTreeSet<String>) -> Self {
        SourceContext {
            manifest_name: config.recipes.manifest.clone(),
            catalog_path: config.recipes.catalog_path.clone(),
            target_dirs,
            dev_packages,
        }
    }

    /// Environments a bundle of this package is enabled in.
    pub fn bundle_envs(&self, package: &PackageInfo) -> &'static [&'static str] {
        if self.dev_packages.contains(&package.name) {
            &["dev", "test"]
        } else {
            &["all"]
        }
    }

    /// Inject the package's bundle classes into a manifest.
    pub fn register_bundles(
        &self,
        package: &PackageInfo,
        job: Job,
        manifest: &mut Manifest,
    ) -> Result<()> {
        if !package.is_bundle() {
            return Ok(());
        }

        let envs = self.bundle_envs(package);
        for class in bundle_classes(package, job) {
            manifest.add_bundle(&class, envs)?;
        }

        Ok(())
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        SourceContext::new(&Config::default(), TargetDirs::default(), BTreeSet::new())
    }
}
