//! Catalog source - recipes hosted by another installed package.
//!
//! A catalog is a package that opted in with `extra.klipper-rope-recipes`
//! and ships recipes for other packages:
//!
//! ```text
//! vendor/acme/recipes/
//! └── recipes/                      # or extra.klipper-rope-path-recipes
//!     └── acme/
//!         └── widget/
//!             ├── 1.0/
//!             │   └── rope.json
//!             └── 2.0/
//!                 ├── rope.json
//!                 └── config/
//!                     └── packages/
//!                         └── widget.yaml
//! ```
//!
//! A version folder applies to every package version at or above it. When
//! several folders apply, the one with the greatest version wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::origin::build_origin;
use crate::core::package::EXTRA_RECIPE_PATH;
use crate::core::{Job, Manifest, PackageInfo, Recipe};
use crate::resolver::errors::RecipeError;
use crate::sources::constraints::{FolderConstraint, VersionConstraintIndex};
use crate::sources::files::inline_recipe_files;
use crate::sources::{RecipeSource, SourceContext};

/// A recipe source backed by a catalog package.
pub struct CatalogSource {
    /// The catalog package name
    name: String,

    /// Recipe repo locator of the catalog
    repo: String,

    /// Recipe branch of the catalog
    branch: String,

    /// Reference of the installed catalog
    reference: String,

    /// Version folder constraints, per package
    index: VersionConstraintIndex,

    /// Resolved recipe path by (package name, package version)
    paths: HashMap<(String, String), Option<PathBuf>>,

    ctx: Rc<SourceContext>,
}

impl CatalogSource {
    /// Create a catalog source for an installed package.
    ///
    /// Fails when the package has not opted in as a recipe catalog.
    pub fn new(catalog: &PackageInfo, ctx: Rc<SourceContext>) -> Result<Self> {
        if !catalog.is_recipe_catalog() {
            return Err(RecipeError::NotARecipeCatalog {
                package: catalog.name.clone(),
            }
            .into());
        }

        let base = catalog
            .extra
            .get(EXTRA_RECIPE_PATH)
            .and_then(Value::as_str)
            .unwrap_or(&ctx.catalog_path)
            .trim_matches('/');

        let base_path = catalog.install_path().join(base);

        Ok(CatalogSource {
            name: catalog.name.clone(),
            repo: catalog.recipe_repo(),
            branch: catalog.recipe_branch(),
            reference: catalog.reference(),
            index: VersionConstraintIndex::new(base_path),
            paths: HashMap::new(),
            ctx,
        })
    }

    /// The directory holding per-package recipe folders.
    pub fn base_path(&self) -> &Path {
        self.index.base_path()
    }

    /// Find the manifest of the recipe that applies to a package.
    pub fn find_recipe_path(&mut self, package: &PackageInfo) -> Result<Option<PathBuf>> {
        let key = (package.name.clone(), package.pretty_version.clone());

        if let Some(cached) = self.paths.get(&key) {
            return Ok(cached.clone());
        }

        let found = self.locate(package)?;
        self.paths.insert(key, found.clone());

        Ok(found)
    }

    fn locate(&mut self, package: &PackageInfo) -> Result<Option<PathBuf>> {
        let constraints = self.index.constraints_for(&package.name)?;
        if constraints.is_empty() {
            return Ok(None);
        }

        let Some(version) = package.parsed_version() else {
            tracing::debug!(
                "{}: version `{}` of {} cannot be matched against recipe folders",
                self.name,
                package.effective_version(),
                package.name
            );
            return Ok(None);
        };

        let package_dir = self.index.base_path().join(&package.name);
        let manifest_name = &self.ctx.manifest_name;

        let best = constraints
            .iter()
            .filter(|c| c.constraint.allows(&version))
            .filter(|c| package_dir.join(&c.folder).join(manifest_name).is_file())
            .max_by(|a, b| compare_folders(a, b));

        Ok(best.map(|c| {
            tracing::debug!(
                "{}: recipe folder {} ({}) selected for {} {}",
                self.name,
                c.folder,
                c.constraint,
                package.name,
                package.pretty_version
            );
            package_dir.join(&c.folder).join(manifest_name)
        }))
    }
}

/// Order folders by version, then by name so equal versions are stable.
fn compare_folders(a: &FolderConstraint, b: &FolderConstraint) -> std::cmp::Ordering {
    a.constraint
        .lower()
        .cmp(b.constraint.lower())
        .then_with(|| a.folder.cmp(&b.folder))
}

impl RecipeSource for CatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_recipe(&mut self, package: &PackageInfo) -> Result<bool> {
        Ok(self.find_recipe_path(package)?.is_some())
    }

    fn load_recipe(&mut self, package: &PackageInfo, job: Job) -> Result<Option<Recipe>> {
        let Some(manifest_path) = self.find_recipe_path(package)? else {
            return Ok(None);
        };

        let recipe_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let folder = recipe_dir
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut manifest = Manifest::load(&manifest_path)?;
        self.ctx.register_bundles(package, job, &mut manifest)?;

        let files = inline_recipe_files(&recipe_dir, &manifest, &self.ctx.target_dirs)
            .map_err(|e| match e.downcast::<RecipeError>() {
                Ok(recipe_err) => recipe_err.at_path(&manifest_path).into(),
                Err(other) => other,
            })
            .with_context(|| format!("failed to load recipe files for {}", package.name))?;

        let origin = build_origin(&package.name, &folder, &self.repo, &self.branch);

        Ok(Some(
            Recipe::new(&package.name, job, manifest, origin)
                .with_files(files)
                .with_reference(&self.reference)
                .with_package_version(&package.pretty_version),
        ))
    }
}
