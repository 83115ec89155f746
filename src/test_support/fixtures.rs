//! Test fixtures for common test scenarios.
//!
//! `CatalogFixture` lays out a project with one recipe catalog package in a
//! temporary directory:
//!
//! ```text
//! <tmp>/vendor/acme/recipes/<recipe path>/<package>/<folder>/rope.json
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::core::{InstalledPackages, PackageInfo};
use crate::ops::RecipeEngine;
use crate::sources::{CatalogSource, RepositoryManager, SourceContext};

/// Name of the catalog package.
pub const CATALOG_NAME: &str = "acme/recipes";

/// A recipe catalog on disk.
pub struct CatalogFixture {
    tmp: TempDir,
    recipe_path: Option<String>,
}

impl CatalogFixture {
    /// Create a catalog using the default recipe directory.
    pub fn new() -> Self {
        CatalogFixture {
            tmp: TempDir::new().expect("failed to create temp dir"),
            recipe_path: None,
        }
    }

    /// Create a catalog declaring its own recipe directory.
    pub fn with_path(path: &str) -> Self {
        CatalogFixture {
            recipe_path: Some(path.to_string()),
            ..CatalogFixture::new()
        }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Install path of the catalog package.
    pub fn catalog_dir(&self) -> PathBuf {
        self.root().join("vendor").join(CATALOG_NAME)
    }

    /// Directory holding the per-package recipe folders.
    pub fn recipes_dir(&self) -> PathBuf {
        let path = self.recipe_path.as_deref().unwrap_or("recipes");
        self.catalog_dir().join(path.trim_matches('/'))
    }

    /// Add a recipe folder with a manifest.
    pub fn recipe(self, package: &str, folder: &str, manifest: Value) -> Self {
        let text = serde_json::to_string_pretty(&manifest).expect("manifest serializes");
        self.raw_recipe(package, folder, &text)
    }

    /// Add a recipe folder with raw manifest text.
    pub fn raw_recipe(self, package: &str, folder: &str, text: &str) -> Self {
        let dir = self.recipes_dir().join(package).join(folder);
        std::fs::create_dir_all(&dir).expect("failed to create recipe folder");
        std::fs::write(dir.join("rope.json"), text).expect("failed to write manifest");
        self
    }

    /// Add a file to a recipe folder.
    pub fn file(self, package: &str, folder: &str, path: &str, contents: &str) -> Self {
        let file = self.recipes_dir().join(package).join(folder).join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("failed to create recipe file dir");
        }
        std::fs::write(file, contents).expect("failed to write recipe file");
        self
    }

    /// The catalog package.
    pub fn catalog_package(&self) -> PackageInfo {
        let mut package = PackageInfo::new(CATALOG_NAME, "dev-main", self.catalog_dir())
            .with_source("https://github.com/acme/recipes.git", "catalog-ref")
            .with_extra("klipper-rope-recipes", json!(true));

        if let Some(path) = &self.recipe_path {
            package = package.with_extra("klipper-rope-path-recipes", json!(path));
        }

        package
    }

    /// A package installed under the project's vendor directory.
    pub fn package(&self, name: &str, version: &str) -> PackageInfo {
        PackageInfo::new(name, version, self.root().join("vendor").join(name))
    }

    /// Installed packages: the catalog only.
    pub fn installed(&self) -> InstalledPackages {
        InstalledPackages::new(vec![self.catalog_package()], BTreeSet::new())
    }

    /// A catalog source over this fixture.
    pub fn source(&self) -> CatalogSource {
        CatalogSource::new(&self.catalog_package(), Rc::default()).expect("catalog opted in")
    }

    /// An engine with the inline source and this catalog.
    pub fn engine(&self) -> RecipeEngine {
        let ctx = Rc::new(SourceContext::default());
        let manager = RepositoryManager::import(&self.installed(), ctx).expect("import sources");
        RecipeEngine::new(manager)
    }
}

impl Default for CatalogFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_fixture_layout() {
        let fixture = CatalogFixture::new()
            .recipe("acme/widget", "1.0", json!({"env": {}}))
            .file("acme/widget", "1.0", "config/widget.yaml", "widget: ~");

        let folder = fixture.root().join("vendor/acme/recipes/recipes/acme/widget/1.0");
        assert!(folder.join("rope.json").is_file());
        assert!(folder.join("config/widget.yaml").is_file());
        assert!(fixture.catalog_package().is_recipe_catalog());
    }
}
