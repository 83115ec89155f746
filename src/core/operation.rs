//! Package operations of one install/update/uninstall run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::package::PackageInfo;

/// The job type of an operation, which is also the job of its recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Job {
    Install,
    Update,
    Uninstall,
}

impl Job {
    /// Lowercase name of the job.
    pub fn as_str(&self) -> &'static str {
        match self {
            Job::Install => "install",
            Job::Update => "update",
            Job::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending package operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Install(PackageInfo),
    Update {
        initial: PackageInfo,
        target: PackageInfo,
    },
    Uninstall(PackageInfo),
}

impl Operation {
    /// The job type of the operation.
    pub fn job(&self) -> Job {
        match self {
            Operation::Install(_) => Job::Install,
            Operation::Update { .. } => Job::Update,
            Operation::Uninstall(_) => Job::Uninstall,
        }
    }

    /// The affected package; updates use their target package.
    pub fn package(&self) -> &PackageInfo {
        match self {
            Operation::Install(package) | Operation::Uninstall(package) => package,
            Operation::Update { target, .. } => target,
        }
    }

    /// Name of the affected package.
    pub fn package_name(&self) -> &str {
        &self.package().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update { initial, target } => write!(
                f,
                "update {} ({} => {})",
                target.name, initial.pretty_version, target.pretty_version
            ),
            other => write!(
                f,
                "{} {} ({})",
                other.job(),
                other.package().name,
                other.package().pretty_version
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_uses_target_package() {
        let initial = PackageInfo::new("acme/widget", "1.0.0", "/v/acme/widget");
        let target = PackageInfo::new("acme/widget", "2.0.0", "/v/acme/widget");
        let op = Operation::Update { initial, target };

        assert_eq!(op.job(), Job::Update);
        assert_eq!(op.package().pretty_version, "2.0.0");
        assert_eq!(op.to_string(), "update acme/widget (1.0.0 => 2.0.0)");
    }

    #[test]
    fn test_job_names() {
        let op = Operation::Uninstall(PackageInfo::new("acme/widget", "1.0.0", "/v"));
        assert_eq!(op.job().as_str(), "uninstall");
        assert_eq!(op.to_string(), "uninstall acme/widget (1.0.0)");
        assert_eq!(serde_json::to_string(&Job::Install).unwrap(), "\"install\"");
    }
}
