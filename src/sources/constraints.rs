//! Version folder constraints of a recipe catalog.
//!
//! A catalog keeps recipes under `<base>/<package-name>/<version-folder>/`.
//! Each folder name is the lowest package version the recipe applies to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::resolver::errors::RecipeError;
use crate::resolver::version::VersionConstraint;

/// A version folder and the constraint parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderConstraint {
    pub folder: String,
    pub constraint: VersionConstraint,
}

/// Per-package cache of version folder constraints.
#[derive(Debug)]
pub struct VersionConstraintIndex {
    base_path: PathBuf,
    cache: HashMap<String, Rc<[FolderConstraint]>>,
}

impl VersionConstraintIndex {
    /// Create an index over a catalog base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        VersionConstraintIndex {
            base_path: base_path.into(),
            cache: HashMap::new(),
        }
    }

    /// The catalog base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the folder constraints for a package.
    ///
    /// Results are in directory enumeration order and cached for the
    /// lifetime of the index. A folder whose name is not a version is an
    /// error.
    pub fn constraints_for(&mut self, package_name: &str) -> Result<Rc<[FolderConstraint]>> {
        if let Some(cached) = self.cache.get(package_name) {
            return Ok(Rc::clone(cached));
        }

        let constraints: Rc<[FolderConstraint]> =
            scan_folders(&self.base_path.join(package_name), package_name)?.into();

        tracing::debug!(
            "found {} recipe folder(s) for {} in {}",
            constraints.len(),
            package_name,
            self.base_path.display()
        );

        self.cache
            .insert(package_name.to_string(), Rc::clone(&constraints));

        Ok(constraints)
    }
}

fn scan_folders(dir: &Path, package_name: &str) -> Result<Vec<FolderConstraint>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut constraints = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read recipe directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }

        let folder = entry.file_name().to_string_lossy().into_owned();
        let constraint = VersionConstraint::parse_lower_bound(&folder).ok_or_else(|| {
            RecipeError::InvalidVersionFolder {
                package: package_name.to_string(),
                folder: folder.clone(),
            }
        })?;

        constraints.push(FolderConstraint { folder, constraint });
    }

    Ok(constraints)
}
