//! Recipe origin strings.
//!
//! An origin records where a recipe came from:
//! `<package-name>:<version>@<repo-locator>[:<branch>]`, for example
//! `acme/widget:1.2@github.com/acme/widget:main`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Repo name recorded in the lock when the origin has no structured parts.
pub const UNSTRUCTURED_REPO: &str = "klipper-rope recipe";

static ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+?):([^@]+)@(.+)$").expect("origin pattern is valid"));

/// Build an origin string.
pub fn build_origin(package: &str, version: &str, repo: &str, branch: &str) -> String {
    format!("{}:{}@{}:{}", package, version, repo, branch)
}

/// The structured parts of an origin string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginParts {
    pub package: String,
    pub version: String,
    pub repo: String,
    pub branch: Option<String>,
}

impl OriginParts {
    /// Parse an origin string.
    ///
    /// Returns `None` when the string does not follow the origin format.
    pub fn parse(origin: &str) -> Option<Self> {
        let caps = ORIGIN.captures(origin)?;
        let locator = &caps[3];

        let (repo, branch) = match locator.split_once(':') {
            Some((repo, branch)) => (repo.to_string(), Some(branch.to_string())),
            None => (locator.to_string(), None),
        };

        Some(OriginParts {
            package: caps[1].to_string(),
            version: caps[2].to_string(),
            repo,
            branch,
        })
    }
}

impl fmt::Display for OriginParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => {
                f.write_str(&build_origin(&self.package, &self.version, &self.repo, branch))
            }
            None => write!(f, "{}:{}@{}", self.package, self.version, self.repo),
        }
    }
}

/// Format an origin for display: `acme/widget (>=1.2): From github.com/acme/widget:main`.
///
/// Unparseable origins are returned unchanged.
pub fn format_origin(origin: &str) -> String {
    match ORIGIN.captures(origin) {
        Some(caps) => format!("{} (>={}): From {}", &caps[1], &caps[2], &caps[3]),
        None => origin.to_string(),
    }
}
