//! Configuration file support for Rope.
//!
//! Rope reads two optional configuration files:
//! - Global: `<config dir>/rope/config.toml` - User-wide defaults
//! - Project: `.rope/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ## Example config.toml
//!
//! ```toml
//! [recipes]
//! manifest = "rope.json"
//! catalog-path = "recipes"
//!
//! [dirs]
//! config-dir = "app/config"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Default recipe manifest file name.
pub const DEFAULT_MANIFEST: &str = "rope.json";

/// Default recipe directory inside a catalog package.
pub const DEFAULT_CATALOG_PATH: &str = "recipes";

/// Rope configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recipe lookup settings
    pub recipes: RecipesConfig,

    /// Target-directory placeholder overrides (e.g. `config-dir`)
    pub dirs: BTreeMap<String, String>,
}

/// Recipe lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RecipesConfig {
    /// File name of a recipe manifest, inline or in a catalog
    pub manifest: String,

    /// Base directory of recipes when a catalog does not declare one
    pub catalog_path: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        RecipesConfig {
            manifest: DEFAULT_MANIFEST.to_string(),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Recipe settings left at their defaults in `other` do not override.
    pub fn merge(&mut self, other: Config) {
        let defaults = RecipesConfig::default();

        if other.recipes.manifest != defaults.manifest {
            self.recipes.manifest = other.recipes.manifest;
        }
        if other.recipes.catalog_path != defaults.catalog_path {
            self.recipes.catalog_path = other.recipes.catalog_path;
        }

        self.dirs.extend(other.dirs);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.rope/config.toml)
/// 2. Global config (<config dir>/rope/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config path (`<config dir>/rope/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "klipper", "rope")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path (.rope/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".rope").join("config.toml")
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(.+?)%").expect("placeholder pattern is valid"));

/// Target directories substituted into recipe paths and messages.
///
/// Placeholders look like `%CONFIG_DIR%`: the name is lowercased and
/// underscores become dashes to find the option (`config-dir`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirs {
    options: BTreeMap<String, String>,
}

impl Default for TargetDirs {
    fn default() -> Self {
        let options = [
            ("bin-dir", "bin"),
            ("conf-dir", "conf"),
            ("config-dir", "config"),
            ("src-dir", "src"),
            ("var-dir", "var"),
            ("public-dir", "public"),
            ("root-dir", "."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        TargetDirs { options }
    }
}

impl TargetDirs {
    /// Set or replace an option.
    pub fn set(&mut self, option: impl Into<String>, value: impl Into<String>) {
        self.options.insert(option.into(), value.into());
    }

    /// Apply string-valued options from a project manifest's `extra` section.
    pub fn with_extra(mut self, extra: &serde_json::Map<String, serde_json::Value>) -> Self {
        for (key, value) in extra {
            if let Some(value) = value.as_str() {
                self.options.insert(key.clone(), value.to_string());
            }
        }
        self
    }

    /// Apply the `[dirs]` overrides from a [`Config`].
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        self.options
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Get an option value.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// Expand every known `%NAME%` placeholder in `text`.
    ///
    /// Unknown placeholders are left verbatim.
    pub fn expand(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                let option = caps[1].to_lowercase().replace('_', "-");
                match self.options.get(&option) {
                    Some(value) => value.trim_end_matches('/').to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
