//! The host's installed-packages registry (`vendor/composer/installed.json`).
//!
//! Two layouts exist in the wild: a bare array of packages, and an object
//! with `packages` and `dev-package-names`. Install paths in the object
//! layout are relative to the directory holding the registry file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::package::PackageInfo;

/// Installed packages known to the host.
#[derive(Debug, Clone, Default)]
pub struct InstalledPackages {
    packages: Vec<PackageInfo>,
    dev_package_names: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InstalledFile {
    Current {
        packages: Vec<InstalledPackage>,
        #[serde(default, rename = "dev-package-names")]
        dev_package_names: Vec<String>,
    },
    Legacy(Vec<InstalledPackage>),
}

#[derive(Deserialize)]
struct InstalledPackage {
    name: String,
    version: String,
    #[serde(rename = "type", default = "default_type")]
    package_type: String,
    #[serde(default)]
    source: Option<Location>,
    #[serde(default)]
    dist: Option<Location>,
    #[serde(default)]
    extra: Value,
    #[serde(default)]
    autoload: Value,
    #[serde(default, rename = "install-path")]
    install_path: Option<String>,
}

#[derive(Deserialize)]
struct Location {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

fn default_type() -> String {
    "library".to_string()
}

impl InstalledPackages {
    /// Create a registry from packages.
    pub fn new(packages: Vec<PackageInfo>, dev_package_names: BTreeSet<String>) -> Self {
        InstalledPackages {
            packages,
            dev_package_names,
        }
    }

    /// Load the registry file.
    ///
    /// `vendor_dir` is used for packages that do not record an install path.
    pub fn load(path: &Path, vendor_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read installed packages: {}", path.display()))?;

        let file: InstalledFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse installed packages: {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));

        let (raw, dev_names) = match file {
            InstalledFile::Current {
                packages,
                dev_package_names,
            } => (packages, dev_package_names),
            InstalledFile::Legacy(packages) => (packages, Vec::new()),
        };

        let packages = raw
            .into_iter()
            .map(|pkg| pkg.into_package_info(base, vendor_dir))
            .collect();

        Ok(InstalledPackages {
            packages,
            dev_package_names: dev_names.into_iter().collect(),
        })
    }

    /// All installed packages, in registry order.
    pub fn packages(&self) -> &[PackageInfo] {
        &self.packages
    }

    /// Find a package by name.
    pub fn get(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Names of packages installed as development dependencies.
    pub fn dev_package_names(&self) -> &BTreeSet<String> {
        &self.dev_package_names
    }
}

impl InstalledPackage {
    fn into_package_info(self, base: &Path, vendor_dir: &Path) -> PackageInfo {
        let install_path = match &self.install_path {
            Some(relative) => normalize(&base.join(relative)),
            None => vendor_dir.join(&self.name),
        };

        let extra = match self.extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let psr4 = self
            .autoload
            .get("psr-4")
            .and_then(Value::as_object)
            .map(parse_psr4)
            .unwrap_or_default();

        PackageInfo {
            name: self.name,
            pretty_version: self.version,
            package_type: self.package_type,
            install_path,
            source_url: self.source.as_ref().and_then(|s| s.url.clone()),
            source_reference: self.source.and_then(|s| s.reference),
            dist_url: self.dist.as_ref().and_then(|d| d.url.clone()),
            dist_reference: self.dist.and_then(|d| d.reference),
            extra,
            psr4,
        }
    }
}

fn parse_psr4(map: &Map<String, Value>) -> BTreeMap<String, Vec<String>> {
    map.iter()
        .map(|(namespace, paths)| {
            let paths = match paths {
                Value::String(path) => vec![path.clone()],
                Value::Array(list) => list
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            (namespace.clone(), paths)
        })
        .collect()
}

/// Resolve `..` and `.` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_current_layout() {
        let tmp = TempDir::new().unwrap();
        let composer_dir = tmp.path().join("vendor/composer");
        std::fs::create_dir_all(&composer_dir).unwrap();
        std::fs::write(
            composer_dir.join("installed.json"),
            r#"{
                "packages": [
                    {
                        "name": "acme/widget-bundle",
                        "version": "v2.3.0",
                        "type": "symfony-bundle",
                        "source": {"type": "git", "url": "https://github.com/acme/widget-bundle.git", "reference": "abc123"},
                        "extra": {"branch-alias": {"dev-main": "2.x-dev"}},
                        "autoload": {"psr-4": {"Acme\\WidgetBundle\\": "src/"}},
                        "install-path": "../acme/widget-bundle"
                    },
                    {
                        "name": "acme/debug",
                        "version": "1.0.0",
                        "extra": [],
                        "autoload": [],
                        "install-path": "../acme/debug"
                    }
                ],
                "dev": true,
                "dev-package-names": ["acme/debug"]
            }"#,
        )
        .unwrap();

        let installed = InstalledPackages::load(
            &composer_dir.join("installed.json"),
            &tmp.path().join("vendor"),
        )
        .unwrap();

        assert_eq!(installed.packages().len(), 2);

        let widget = installed.get("acme/widget-bundle").unwrap();
        assert!(widget.is_bundle());
        assert_eq!(widget.install_path(), tmp.path().join("vendor/acme/widget-bundle"));
        assert_eq!(widget.source_reference.as_deref(), Some("abc123"));
        assert_eq!(widget.psr4["Acme\\WidgetBundle\\"], vec!["src/".to_string()]);

        let debug = installed.get("acme/debug").unwrap();
        assert_eq!(debug.package_type, "library");
        assert!(debug.extra.is_empty());
        assert!(installed.dev_package_names().contains("acme/debug"));
    }

    #[test]
    fn test_load_legacy_layout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("installed.json");
        std::fs::write(
            &path,
            r#"[{"name": "acme/widget", "version": "1.0.0", "dist": {"url": "https://example.org/w.zip", "reference": "d1"}}]"#,
        )
        .unwrap();

        let vendor = tmp.path().join("vendor");
        let installed = InstalledPackages::load(&path, &vendor).unwrap();

        let widget = installed.get("acme/widget").unwrap();
        assert_eq!(widget.install_path(), vendor.join("acme/widget"));
        assert_eq!(widget.reference(), "d1");
        assert!(installed.dev_package_names().is_empty());
    }

    #[test]
    fn test_load_invalid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("installed.json");
        std::fs::write(&path, "{\"packages\": 3}").unwrap();

        assert!(InstalledPackages::load(&path, tmp.path()).is_err());
    }
}
