//! Recipe version handling.
//!
//! Package versions reported by the host and version folder names in a
//! recipe catalog are both looser than semver: `v1.2`, `2.0`, `1.0.0.0`,
//! `2.x-dev` and `1.0-beta1` all occur in practice. This module parses them
//! into `semver::Version` so folder constraints can be compared.

use std::fmt;

use semver::{BuildMetadata, Prerelease, Version};

/// Upper value used for `x`/`*` components and `-dev` branch versions.
const BRANCH_TOP: u64 = 9_999_999;

/// A "version >= folder" constraint produced from a catalog version folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    lower: Version,
}

impl VersionConstraint {
    /// Create a lower-bound constraint.
    pub fn at_least(lower: Version) -> Self {
        VersionConstraint { lower }
    }

    /// Parse a folder name into a lower-bound constraint.
    pub fn parse_lower_bound(folder: &str) -> Option<Self> {
        parse_version_lenient(folder).map(Self::at_least)
    }

    /// The lower bound of this constraint.
    pub fn lower(&self) -> &Version {
        &self.lower
    }

    /// Whether `version` satisfies this constraint.
    ///
    /// A bound without a pre-release covers every pre-release of its own
    /// release, so folder `2.0` applies to `2.0.0-beta1` as well.
    pub fn allows(&self, version: &Version) -> bool {
        if self.lower.pre.is_empty() {
            release(version) >= release(&self.lower)
        } else {
            *version >= self.lower
        }
    }
}

fn release(version: &Version) -> (u64, u64, u64) {
    (version.major, version.minor, version.patch)
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">={}", self.lower)
    }
}

/// Parse a version string, allowing for incomplete and branch versions.
///
/// Accepts an optional leading `v`, one to four numeric components (only
/// the first three are kept), `x`/`*` wildcard components, a `-dev`
/// suffix and a pre-release suffix such as `-beta1` or `-RC2`.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let lowered = s.trim().to_ascii_lowercase();
    let s = lowered.strip_prefix('v').unwrap_or(&lowered);

    // Try exact parse first; `-dev` branches are handled below
    if !s.ends_with("-dev") {
        if let Ok(v) = s.parse::<Version>() {
            return Some(v);
        }
    }

    let (numbers, suffix) = match s.split_once('-') {
        Some((numbers, suffix)) => (numbers, Some(suffix)),
        None => (s, None),
    };

    let is_dev = suffix == Some("dev");
    let parts: Vec<&str> = numbers.split('.').collect();
    if parts.is_empty() || parts.len() > 4 {
        return None;
    }

    let mut components = [0u64; 3];
    let mut wildcard = false;
    for (i, part) in parts.iter().enumerate() {
        let value = if wildcard || matches!(*part, "x" | "*") {
            wildcard = true;
            BRANCH_TOP
        } else {
            part.parse().ok()?
        };

        if i < 3 {
            components[i] = value;
        }
    }

    // A `-dev` branch such as `2.1-dev` covers everything on that branch.
    if is_dev || wildcard {
        for component in components.iter_mut().skip(parts.len().min(3)) {
            *component = BRANCH_TOP;
        }
    }

    let mut version = Version::new(components[0], components[1], components[2]);

    if let Some(suffix) = suffix.filter(|_| !is_dev) {
        let pre = suffix.replace(['_', '+'], ".");
        version.pre = Prerelease::new(&pre).ok()?;
        version.build = BuildMetadata::EMPTY;
    }

    Some(version)
}
