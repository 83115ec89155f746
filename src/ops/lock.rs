//! Recipe lock (`symfony.lock`) access.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::core::LockEntry;

/// The lock the engine reads and records applied recipes in.
///
/// Persisting the lock is up to the host once the run is over.
pub trait RecipeLock {
    /// Check if the lock has an entry for a package.
    fn has(&self, name: &str) -> bool;

    /// Record the recipe applied for a package.
    fn add(&mut self, name: &str, entry: LockEntry) -> Result<()>;

    /// Forget a package.
    fn remove(&mut self, name: &str);

    /// Packages installed as development dependencies.
    fn dev_package_names(&self) -> BTreeSet<String>;
}

/// A JSON lock file keyed by package name.
///
/// Entries this crate does not write (other plugins, the host itself) are
/// kept as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockFile {
    entries: Map<String, Value>,
    dev_packages: BTreeSet<String>,
}

impl LockFile {
    /// Create an empty lock.
    pub fn new() -> Self {
        LockFile::default()
    }

    /// Load a lock file. A missing file is an empty lock.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(LockFile::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lock file: {}", path.display()))?;

        let entries = match serde_json::from_str::<Value>(&content)
            .with_context(|| format!("failed to parse lock file: {}", path.display()))?
        {
            Value::Object(map) => map,
            Value::Array(list) if list.is_empty() => Map::new(),
            _ => bail!("lock file {} is not a JSON object", path.display()),
        };

        Ok(LockFile {
            entries,
            dev_packages: BTreeSet::new(),
        })
    }

    /// Save the lock file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.entries)?;
        content.push('\n');

        std::fs::write(path, content)
            .with_context(|| format!("failed to write lock file: {}", path.display()))?;

        Ok(())
    }

    /// Set the development package names.
    pub fn with_dev_packages(mut self, names: BTreeSet<String>) -> Self {
        self.dev_packages = names;
        self
    }

    /// Get the recipe entry of a package, if it has one.
    pub fn get(&self, name: &str) -> Option<LockEntry> {
        self.entries
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Package names in the lock.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lock is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecipeLock for LockFile {
    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn add(&mut self, name: &str, entry: LockEntry) -> Result<()> {
        let value = serde_json::to_value(&entry)
            .with_context(|| format!("failed to encode lock entry of {}", name))?;

        self.entries.insert(name.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    fn dev_package_names(&self) -> BTreeSet<String> {
        self.dev_packages.clone()
    }
}
