//! Bundle class discovery for bundle packages.
//!
//! Bundle packages register their bundle class in the recipe manifest. The
//! class name is derived from the package's PSR-4 namespaces the same way
//! the framework's own recipe system does: `Acme\WidgetBundle` yields the
//! candidates `Acme\WidgetBundle\WidgetBundle` and
//! `Acme\WidgetBundle\AcmeWidgetBundle`.

use regex::Regex;

use crate::core::operation::Job;
use crate::core::package::PackageInfo;

/// Find the bundle classes declared by a package.
///
/// On install the candidate must exist as a class file in the package; on
/// uninstall the code may already be gone, so every candidate is returned.
pub fn bundle_classes(package: &PackageInfo, job: Job) -> Vec<String> {
    let mut classes = Vec::new();

    for (namespace, paths) in &package.psr4 {
        for path in paths {
            for class in candidate_classes(namespace) {
                if job != Job::Uninstall && !declares_class(package, path, &class) {
                    continue;
                }
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
        }
    }

    classes
}

/// Candidate bundle class names for a namespace.
pub fn candidate_classes(namespace: &str) -> Vec<String> {
    let namespace = namespace.trim_matches('\\');
    if namespace.is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = namespace.split('\\').collect();
    let mut suffix = parts[parts.len() - 1].to_string();
    if !suffix.ends_with("Bundle") {
        suffix.push_str("Bundle");
    }

    let mut classes = vec![format!("{}\\{}", namespace, suffix)];
    let mut acc = String::new();

    for part in &parts[..parts.len() - 1] {
        if *part == "Bundle" {
            continue;
        }
        classes.push(format!("{}\\{}{}", namespace, part, suffix));
        acc.push_str(part);
        classes.push(format!("{}\\{}{}", namespace, acc, suffix));
    }

    let mut unique = Vec::with_capacity(classes.len());
    for class in classes {
        if !unique.contains(&class) {
            unique.push(class);
        }
    }
    unique
}

/// Whether `<install path>/<psr-4 path>/<Short>.php` declares the class.
fn declares_class(package: &PackageInfo, psr4_path: &str, class: &str) -> bool {
    let short = class.rsplit('\\').next().unwrap_or(class);
    let file = package
        .install_path()
        .join(psr4_path.trim_matches('/'))
        .join(format!("{}.php", short));

    let Ok(code) = std::fs::read_to_string(&file) else {
        return false;
    };

    Regex::new(&format!(r"\bclass\s+{}\b", regex::escape(short)))
        .map(|re| re.is_match(&code))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_classes() {
        assert_eq!(
            candidate_classes("Acme\\WidgetBundle\\"),
            vec![
                "Acme\\WidgetBundle\\WidgetBundle".to_string(),
                "Acme\\WidgetBundle\\AcmeWidgetBundle".to_string(),
            ]
        );

        assert_eq!(
            candidate_classes("Acme\\Widget"),
            vec![
                "Acme\\Widget\\WidgetBundle".to_string(),
                "Acme\\Widget\\AcmeWidgetBundle".to_string(),
            ]
        );

        assert!(candidate_classes("\\").is_empty());
    }

    #[test]
    fn test_bundle_classes_on_install_require_class_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        std::fs::write(
            tmp.path().join("src/AcmeWidgetBundle.php"),
            "<?php\nnamespace Acme\\WidgetBundle;\n\nclass AcmeWidgetBundle extends Bundle {}\n",
        )
        .unwrap();

        let package = PackageInfo::new("acme/widget-bundle", "1.0.0", tmp.path())
            .with_type("symfony-bundle")
            .with_psr4("Acme\\WidgetBundle\\", "src/");

        assert_eq!(
            bundle_classes(&package, Job::Install),
            vec!["Acme\\WidgetBundle\\AcmeWidgetBundle".to_string()]
        );
        assert_eq!(bundle_classes(&package, Job::Uninstall).len(), 2);
    }
}
