//! Recipes: a manifest plus the files it ships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::manifest::Manifest;
use crate::core::operation::Job;
use crate::core::origin::{OriginParts, UNSTRUCTURED_REPO};

/// A file shipped by a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFile {
    /// Raw file contents
    pub contents: Vec<u8>,

    /// Whether the file is written executable
    pub executable: bool,
}

impl RecipeFile {
    /// A non-executable file.
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        RecipeFile {
            contents: contents.into(),
            executable: false,
        }
    }
}

/// Recipe files keyed by target path (forward slashes).
pub type RecipeFiles = BTreeMap<String, RecipeFile>;

/// A recipe resolved for one package operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    name: String,
    job: Job,
    manifest: Manifest,
    origin: String,
    files: RecipeFiles,
    reference: String,
    package_version: String,
}

impl Recipe {
    /// Create a recipe.
    pub fn new(
        name: impl Into<String>,
        job: Job,
        manifest: Manifest,
        origin: impl Into<String>,
    ) -> Self {
        Recipe {
            name: name.into(),
            job,
            manifest,
            origin: origin.into(),
            files: RecipeFiles::new(),
            reference: String::new(),
            package_version: String::new(),
        }
    }

    /// Set the recipe files.
    pub fn with_files(mut self, files: RecipeFiles) -> Self {
        self.files = files;
        self
    }

    /// Set the reference (commit) the recipe was read from.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Set the pretty version of the package the recipe applies to.
    pub fn with_package_version(mut self, version: impl Into<String>) -> Self {
        self.package_version = version.into();
        self
    }

    /// The same recipe, for another job.
    pub fn with_job(mut self, job: Job) -> Self {
        self.job = job;
        self
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Job of the operation this recipe was resolved for.
    pub fn job(&self) -> Job {
        self.job
    }

    /// The recipe manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The origin string.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The recipe files.
    pub fn files(&self) -> &RecipeFiles {
        &self.files
    }

    /// The reference the recipe was read from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Pretty version of the package.
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Merge fallback data under this recipe; this recipe wins on conflicts.
    pub fn merge_fallback(&mut self, manifest: Manifest, files: Option<RecipeFiles>) {
        self.manifest.merge_over(manifest);

        if let Some(mut fallback_files) = files {
            fallback_files.append(&mut self.files);
            self.files = fallback_files;
        }
    }

    /// The lock entry recorded when this recipe is installed.
    pub fn lock_entry(&self) -> LockEntry {
        let parts = OriginParts::parse(&self.origin);

        let version = parts
            .as_ref()
            .map(|p| p.version.clone())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.package_version.clone());

        LockEntry {
            version: version.clone(),
            recipe: LockedRecipe {
                repo: parts
                    .as_ref()
                    .map(|p| p.repo.clone())
                    .unwrap_or_else(|| UNSTRUCTURED_REPO.to_string()),
                branch: parts
                    .and_then(|p| p.branch)
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| "master".to_string()),
                version,
                reference: self.reference.clone(),
            },
        }
    }
}

/// A lock entry for a package whose recipe was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub version: String,
    pub recipe: LockedRecipe,
}

/// The recipe part of a lock entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedRecipe {
    pub repo: String,
    pub branch: String,
    pub version: String,
    #[serde(rename = "ref")]
    pub reference: String,
}
