//! CLI integration tests for Rope.
//!
//! These tests lay out a PHP project with installed packages and a recipe
//! catalog, then inspect it through the `rope` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the rope binary command.
fn rope() -> Command {
    Command::cargo_bin("rope").unwrap()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with a recipe catalog, a package it has a recipe for, a
/// package with an inline recipe and a package without any recipe.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(&root.join("composer.json"), r#"{"name": "acme/app"}"#);
    write(
        &root.join("vendor/composer/installed.json"),
        r#"{
            "packages": [
                {
                    "name": "acme/recipes",
                    "version": "dev-main",
                    "source": {"url": "https://github.com/acme/recipes.git", "reference": "abc123"},
                    "extra": {"klipper-rope-recipes": true},
                    "install-path": "../acme/recipes"
                },
                {
                    "name": "acme/widget",
                    "version": "v2.3.0",
                    "install-path": "../acme/widget"
                },
                {
                    "name": "acme/inline",
                    "version": "1.0.0",
                    "source": {"url": "https://gitlab.example.org/acme/inline.git", "reference": "def456"},
                    "install-path": "../acme/inline"
                },
                {
                    "name": "acme/plain",
                    "version": "1.0.0",
                    "install-path": "../acme/plain"
                }
            ],
            "dev-package-names": []
        }"#,
    );

    let widget = root.join("vendor/acme/recipes/recipes/acme/widget");
    write(&widget.join("1.0/rope.json"), r#"{"env": {"V": "1"}}"#);
    write(
        &widget.join("2.0/rope.json"),
        r#"{"env": {"V": "2"}, "copy-from-recipe": {"config/": "%CONFIG_DIR%/"}}"#,
    );
    write(&widget.join("2.0/config/packages/widget.yaml"), "widget: ~\n");
    write(&widget.join("3.0/rope.json"), r#"{"env": {"V": "3"}}"#);

    write(
        &root.join("vendor/acme/inline/rope.json"),
        r#"{"env": {"INLINE": "1"}}"#,
    );
    fs::create_dir_all(root.join("vendor/acme/plain")).unwrap();

    tmp
}

// ============================================================================
// rope recipes
// ============================================================================

#[test]
fn test_recipes_lists_winning_origins() {
    let tmp = project();

    rope()
        .arg("recipes")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "acme/widget v2.3.0: acme/widget (>=2.0): From github.com/acme/recipes:main [acme/recipes]",
        ))
        .stdout(predicate::str::contains(
            "acme/inline 1.0.0: acme/inline (>=1.0.0): From gitlab.example.org/acme/inline:1.0.0 [rope/inline]",
        ))
        .stdout(predicate::str::contains("acme/plain 1.0.0: no recipe"));
}

#[test]
fn test_recipes_for_named_package_with_files() {
    let tmp = project();

    rope()
        .args(["recipes", "acme/widget", "--files"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config/packages/widget.yaml (10 bytes)"))
        .stdout(predicate::str::contains("acme/plain").not());
}

#[test]
fn test_recipes_only_found() {
    let tmp = project();

    rope()
        .args(["recipes", "--only-found"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no recipe").not());
}

#[test]
fn test_recipes_shows_locked_packages() {
    let tmp = project();
    write(
        &tmp.path().join("symfony.lock"),
        r#"{"acme/widget": {"version": "2.0", "recipe": {"repo": "github.com/acme/recipes", "branch": "main", "version": "2.0", "ref": "abc123"}}}"#,
    );

    rope()
        .args(["recipes", "acme/widget"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[locked]"));
}

#[test]
fn test_recipes_unknown_package() {
    let tmp = project();

    rope()
        .args(["recipes", "acme/missing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("acme/missing"));
}

#[test]
fn test_recipes_invalid_version_folder() {
    let tmp = project();
    fs::create_dir_all(
        tmp.path()
            .join("vendor/acme/recipes/recipes/acme/widget/latest"),
    )
    .unwrap();

    rope()
        .args(["recipes", "acme/widget"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("acme/widget/latest"));
}

#[test]
fn test_recipes_with_project_dir() {
    let tmp = project();
    let elsewhere = TempDir::new().unwrap();

    rope()
        .args(["recipes", "acme/plain", "--project-dir"])
        .arg(tmp.path())
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("acme/plain 1.0.0: no recipe"));
}

#[test]
fn test_recipes_outside_project() {
    let tmp = TempDir::new().unwrap();

    rope()
        .arg("recipes")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("composer.json"));
}

#[test]
fn test_recipes_not_installed() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("composer.json"), "{}");

    rope()
        .arg("recipes")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("composer install"));
}

// ============================================================================
// rope sources
// ============================================================================

#[test]
fn test_sources_in_lookup_order() {
    let tmp = project();

    rope()
        .arg("sources")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("1. rope/inline\n2. acme/recipes\n"));
}

// ============================================================================
// rope origin
// ============================================================================

#[test]
fn test_origin_parts() {
    rope()
        .args(["origin", "acme/widget:1.2@github.com/acme/widget:main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package: acme/widget"))
        .stdout(predicate::str::contains("version: 1.2"))
        .stdout(predicate::str::contains("repo:    github.com/acme/widget"))
        .stdout(predicate::str::contains("branch:  main"))
        .stdout(predicate::str::contains(
            "acme/widget (>=1.2): From github.com/acme/widget:main",
        ));
}

#[test]
fn test_origin_unstructured() {
    rope()
        .args(["origin", "local recipe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a structured recipe origin"));
}
