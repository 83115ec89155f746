//! Inline source - recipes shipped at the root of the package itself.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;

use crate::core::origin::build_origin;
use crate::core::{Job, Manifest, PackageInfo, Recipe};
use crate::sources::{RecipeSource, SourceContext};

/// Name under which the inline source is registered.
pub const INLINE_SOURCE_NAME: &str = "rope/inline";

/// A source reading `<install path>/<manifest>` of each package.
pub struct InlineSource {
    ctx: Rc<SourceContext>,
}

impl InlineSource {
    /// Create a new inline source.
    pub fn new(ctx: Rc<SourceContext>) -> Self {
        InlineSource { ctx }
    }

    fn manifest_path(&self, package: &PackageInfo) -> PathBuf {
        package.install_path().join(&self.ctx.manifest_name)
    }
}

impl RecipeSource for InlineSource {
    fn name(&self) -> &str {
        INLINE_SOURCE_NAME
    }

    fn has_recipe(&mut self, package: &PackageInfo) -> Result<bool> {
        Ok(self.manifest_path(package).is_file())
    }

    fn load_recipe(&mut self, package: &PackageInfo, job: Job) -> Result<Option<Recipe>> {
        let path = self.manifest_path(package);
        if !path.is_file() {
            return Ok(None);
        }

        let mut manifest = Manifest::load(&path)?;
        self.ctx.register_bundles(package, job, &mut manifest)?;

        let version = package.pretty_version.trim_start_matches('v');
        let origin = build_origin(
            &package.name,
            version,
            &package.recipe_repo(),
            &package.recipe_branch(),
        );

        tracing::debug!("inline recipe found for {} at {}", package.name, path.display());

        Ok(Some(
            Recipe::new(&package.name, job, manifest, origin)
                .with_reference(package.reference())
                .with_package_version(&package.pretty_version),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn package(dir: &TempDir) -> PackageInfo {
        PackageInfo::new("acme/widget", "v1.4.0", dir.path())
            .with_source("https://github.com/acme/widget.git", "abc123")
    }

    #[test]
    fn test_no_manifest() {
        let tmp = TempDir::new().unwrap();
        let mut source = InlineSource::new(Rc::default());

        assert!(!source.has_recipe(&package(&tmp)).unwrap());
        assert!(source
            .load_recipe(&package(&tmp), Job::Install)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_inline_recipe() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("rope.json"),
            r#"{"env": {"WIDGET_DSN": "null://"}}"#,
        )
        .unwrap();

        let mut source = InlineSource::new(Rc::default());
        let pkg = package(&tmp);

        assert!(source.has_recipe(&pkg).unwrap());

        let recipe = source.load_recipe(&pkg, Job::Update).unwrap().unwrap();
        assert_eq!(recipe.job(), Job::Update);
        assert_eq!(
            recipe.origin(),
            "acme/widget:1.4.0@github.com/acme/widget:v1.4.0"
        );
        assert_eq!(recipe.reference(), "abc123");
        assert_eq!(
            recipe.manifest().get("env"),
            Some(&json!({"WIDGET_DSN": "null://"}))
        );
        assert!(recipe.files().is_empty());
    }

    #[test]
    fn test_custom_manifest_name() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("recipe.json"), "{}").unwrap();

        let ctx = SourceContext {
            manifest_name: "recipe.json".to_string(),
            ..SourceContext::default()
        };
        let mut source = InlineSource::new(Rc::new(ctx));

        assert!(source.has_recipe(&package(&tmp)).unwrap());
    }

    #[test]
    fn test_inline_manifest_is_not_inlined() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("config")).unwrap();
        std::fs::write(tmp.path().join("config/widget.yaml"), "widget: ~").unwrap();
        std::fs::write(
            tmp.path().join("rope.json"),
            r#"{"copy-from-recipe": {"config/": "%CONFIG_DIR%/"}}"#,
        )
        .unwrap();

        let mut source = InlineSource::new(Rc::default());
        let recipe = source
            .load_recipe(&package(&tmp), Job::Install)
            .unwrap()
            .unwrap();

        assert!(recipe.manifest().contains_key("copy-from-recipe"));
        assert!(recipe.files().is_empty());
    }
}
