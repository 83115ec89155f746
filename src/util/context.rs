//! Global context for Rope operations.
//!
//! Provides centralized access to the project, its configuration and the
//! paths the host dependency manager keeps its state in.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::core::InstalledPackages;
use crate::ops::{LockFile, RecipeLock};
use crate::sources::{RepositoryManager, SourceContext};
use crate::util::config::{global_config_path, load_config, project_config_path, Config, TargetDirs};
use crate::util::fs::{find_upward, read_json};

/// The host project manifest.
pub const PROJECT_MANIFEST: &str = "composer.json";

/// The recipe lock file, next to the project manifest.
pub const LOCK_FILE: &str = "symfony.lock";

/// Vendor directory used when the project does not configure one.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global configuration file, if the platform has a config directory
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: global_config_path(),
            verbose: false,
            color: true,
        }
    }

    /// Use another global configuration file (or none).
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find the project manifest, starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf> {
        match find_upward(&self.cwd, PROJECT_MANIFEST) {
            Some(path) => Ok(path),
            None => bail!(
                "could not find `{}` in `{}` or any parent directory",
                PROJECT_MANIFEST,
                self.cwd.display()
            ),
        }
    }

    /// Load the project around the working directory.
    pub fn load_project(&self) -> Result<Project> {
        let manifest_path = self.find_manifest()?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone());

        let composer = match read_json::<Value>(&manifest_path)? {
            Value::Object(map) => map,
            _ => bail!("`{}` is not a JSON object", manifest_path.display()),
        };

        let config = load_config(self.global_config.as_deref(), &project_config_path(&root));

        tracing::debug!("project root: {}", root.display());

        Ok(Project {
            root,
            composer,
            config,
        })
    }
}

/// A host project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    composer: Map<String, Value>,
    config: Config,
}

impl Project {
    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The `extra` section of the project manifest.
    pub fn extra(&self) -> Map<String, Value> {
        match self.composer.get("extra") {
            Some(Value::Object(extra)) => extra.clone(),
            _ => Map::new(),
        }
    }

    /// The vendor directory (`config.vendor-dir`, else `vendor`).
    pub fn vendor_dir(&self) -> PathBuf {
        let vendor = self
            .composer
            .get("config")
            .and_then(|c| c.get("vendor-dir"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_VENDOR_DIR);

        self.root.join(vendor)
    }

    /// The installed-packages registry.
    pub fn installed_path(&self) -> PathBuf {
        self.vendor_dir().join("composer").join("installed.json")
    }

    /// The recipe lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Target directories: defaults, then the manifest's `extra`, then
    /// the `[dirs]` configuration.
    pub fn target_dirs(&self) -> TargetDirs {
        TargetDirs::default()
            .with_extra(&self.extra())
            .with_overrides(&self.config.dirs)
    }

    /// Load the installed packages.
    pub fn load_installed(&self) -> Result<InstalledPackages> {
        let path = self.installed_path();
        if !path.is_file() {
            bail!("no installed packages found at `{}`", path.display());
        }

        InstalledPackages::load(&path, &self.vendor_dir())
    }

    /// Load the recipe lock with the development package names.
    pub fn load_lock(&self, installed: &InstalledPackages) -> Result<LockFile> {
        Ok(LockFile::load(&self.lock_path())?
            .with_dev_packages(installed.dev_package_names().clone()))
    }

    /// Source settings shared by all recipe sources.
    ///
    /// Bundle environments follow the lock's development packages.
    pub fn source_context(&self, lock: &dyn RecipeLock) -> SourceContext {
        SourceContext::new(&self.config, self.target_dirs(), lock.dev_package_names())
    }

    /// The recipe sources of this project.
    pub fn repository_manager(
        &self,
        installed: &InstalledPackages,
        lock: &dyn RecipeLock,
    ) -> Result<RepositoryManager> {
        RepositoryManager::import(installed, Rc::new(self.source_context(lock)))
    }
}
