//! Package metadata reported by the host dependency manager.
//!
//! A `PackageInfo` is everything recipe lookup needs to know about an
//! installed (or about to be removed) package: its identity, where it lives
//! on disk, where it came from, and its `extra` metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::{Map, Value};

use crate::resolver::version::parse_version_lenient;

/// Package type whose bundles are registered through the recipe manifest.
pub const BUNDLE_PACKAGE_TYPE: &str = "symfony-bundle";

/// `extra` flag marking a package as a recipe catalog.
pub const EXTRA_RECIPE_CATALOG: &str = "klipper-rope-recipes";

/// `extra` key overriding the recipe directory of a catalog.
pub const EXTRA_RECIPE_PATH: &str = "klipper-rope-path-recipes";

/// `extra` key holding branch aliases (`dev-master` => `1.2.x-dev`).
pub const EXTRA_BRANCH_ALIAS: &str = "branch-alias";

/// A package known to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    /// Package name (`vendor/name`)
    pub name: String,

    /// Version as the user sees it (`v1.2.0`, `dev-master`)
    pub pretty_version: String,

    /// Package type (`library`, `symfony-bundle`, ...)
    pub package_type: String,

    /// Installation directory
    pub install_path: PathBuf,

    /// Source repository URL
    pub source_url: Option<String>,

    /// Source reference (commit)
    pub source_reference: Option<String>,

    /// Distribution archive URL
    pub dist_url: Option<String>,

    /// Distribution reference
    pub dist_reference: Option<String>,

    /// The `extra` metadata map
    pub extra: Map<String, Value>,

    /// PSR-4 autoload namespaces and their paths
    pub psr4: BTreeMap<String, Vec<String>>,
}

impl PackageInfo {
    /// Create a package with the minimum metadata.
    pub fn new(
        name: impl Into<String>,
        pretty_version: impl Into<String>,
        install_path: impl Into<PathBuf>,
    ) -> Self {
        PackageInfo {
            name: name.into(),
            pretty_version: pretty_version.into(),
            package_type: "library".to_string(),
            install_path: install_path.into(),
            source_url: None,
            source_reference: None,
            dist_url: None,
            dist_reference: None,
            extra: Map::new(),
            psr4: BTreeMap::new(),
        }
    }

    /// Set the package type.
    pub fn with_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = package_type.into();
        self
    }

    /// Set the source URL and reference.
    pub fn with_source(mut self, url: impl Into<String>, reference: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self.source_reference = Some(reference.into());
        self
    }

    /// Set the dist URL and reference.
    pub fn with_dist(mut self, url: impl Into<String>, reference: impl Into<String>) -> Self {
        self.dist_url = Some(url.into());
        self.dist_reference = Some(reference.into());
        self
    }

    /// Set an `extra` value.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Add a PSR-4 namespace mapping.
    pub fn with_psr4(mut self, namespace: impl Into<String>, path: impl Into<String>) -> Self {
        self.psr4
            .entry(namespace.into())
            .or_default()
            .push(path.into());
        self
    }

    /// Installation directory of the package.
    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    /// Whether this package bundles a framework bundle.
    pub fn is_bundle(&self) -> bool {
        self.package_type == BUNDLE_PACKAGE_TYPE
    }

    /// Whether the package opted in as a recipe catalog.
    pub fn is_recipe_catalog(&self) -> bool {
        self.extra.get(EXTRA_RECIPE_CATALOG) == Some(&Value::Bool(true))
    }

    /// The version used to pick a recipe.
    ///
    /// Development versions (`dev-*`) use their branch alias when one is
    /// configured for that exact branch or for `dev-master`.
    pub fn effective_version(&self) -> &str {
        let version = self.pretty_version.as_str();

        if !version.starts_with("dev-") {
            return version;
        }

        let Some(aliases) = self.extra.get(EXTRA_BRANCH_ALIAS).and_then(Value::as_object) else {
            return version;
        };

        [version, "dev-master"]
            .iter()
            .filter_map(|branch| aliases.get(*branch).and_then(Value::as_str))
            .find(|alias| !alias.is_empty())
            .unwrap_or(version)
    }

    /// Parse the effective version for constraint matching.
    pub fn parsed_version(&self) -> Option<Version> {
        parse_version_lenient(self.effective_version())
    }

    /// The recipe repository locator: `<host>/<package name>`.
    ///
    /// The host comes from the source URL, else the dist URL; packages
    /// without a parseable URL use `packages`.
    pub fn recipe_repo(&self) -> String {
        let host = self
            .source_url
            .as_deref()
            .or(self.dist_url.as_deref())
            .and_then(|u| url::Url::parse(u).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "packages".to_string());

        format!("{}/{}", host, self.name)
    }

    /// The recipe branch: the pretty version without any `dev-` marker.
    pub fn recipe_branch(&self) -> String {
        self.pretty_version.replace("dev-", "")
    }

    /// The recipe reference: source reference, else dist reference.
    pub fn reference(&self) -> String {
        self.source_reference
            .as_deref()
            .filter(|r| !r.is_empty())
            .or(self.dist_reference.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}
