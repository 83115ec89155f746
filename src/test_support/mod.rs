//! Test utilities and mocks for Rope unit tests.
//!
//! Fixtures lay out recipe catalogs on disk; the mocks below stand in for
//! the collaborators the host normally provides to the engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use rope::test_support::{CatalogFixture, MockConfigurator, MockFallback};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = CatalogFixture::new().recipe("acme/widget", "1.0", json!({"env": {}}));
//!     let mut engine = fixture.engine();
//!     // Run the engine with MockFallback and MockConfigurator...
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use serde_json::Value;

use crate::core::{Operation, Recipe};
use crate::ops::{
    Configurator, ConfiguratorExtension, FallbackRecipe, FallbackRecipes, InstallOptions,
    RecipeLock,
};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Fallback recipe system serving canned recipes.
///
/// Records the package names of every batch it is asked for.
#[derive(Debug, Default)]
pub struct MockFallback {
    recipes: BTreeMap<String, FallbackRecipe>,
    pub requests: Vec<Vec<String>>,
}

impl MockFallback {
    /// Serve a fallback recipe for a package.
    pub fn with_recipe(mut self, name: &str, recipe: FallbackRecipe) -> Self {
        self.recipes.insert(name.to_string(), recipe);
        self
    }
}

impl FallbackRecipes for MockFallback {
    fn fetch(&mut self, operations: &[Operation]) -> Result<BTreeMap<String, FallbackRecipe>> {
        let names: Vec<String> = operations
            .iter()
            .map(|op| op.package_name().to_string())
            .collect();

        let found = names
            .iter()
            .filter_map(|name| self.recipes.get(name).map(|r| (name.clone(), r.clone())))
            .collect();

        self.requests.push(names);
        Ok(found)
    }
}

/// Call log shared between mocks, to check their relative order.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Configurator recording what it was asked to do.
#[derive(Debug, Default)]
pub struct MockConfigurator {
    /// `install <name>` / `unconfigure <name>`, in call order
    pub calls: Vec<String>,

    /// The force flag of every install call
    pub forced: Vec<bool>,

    journal: Option<Journal>,
}

impl MockConfigurator {
    /// Also write every call to a shared journal.
    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(Rc::clone(journal));
        self
    }

    fn record(&mut self, call: String) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(call.clone());
        }
        self.calls.push(call);
    }
}

impl Configurator for MockConfigurator {
    fn install(
        &mut self,
        recipe: &Recipe,
        _lock: &mut dyn RecipeLock,
        options: &InstallOptions,
    ) -> Result<()> {
        self.record(format!("install {}", recipe.name()));
        self.forced.push(options.force);
        Ok(())
    }

    fn unconfigure(&mut self, recipe: &Recipe, _lock: &mut dyn RecipeLock) -> Result<()> {
        self.record(format!("unconfigure {}", recipe.name()));
        Ok(())
    }
}

/// Configurator extension writing `<key> configure <name>` and
/// `<key> unconfigure <name>` to a journal.
pub struct RecordingExtension {
    key: String,
    journal: Journal,
}

impl RecordingExtension {
    pub fn boxed(key: &str, journal: &Journal) -> Box<Self> {
        Box::new(RecordingExtension {
            key: key.to_string(),
            journal: Rc::clone(journal),
        })
    }
}

impl ConfiguratorExtension for RecordingExtension {
    fn configure(
        &mut self,
        recipe: &Recipe,
        _config: &Value,
        _lock: &mut dyn RecipeLock,
        _options: &InstallOptions,
    ) -> Result<()> {
        self.journal
            .borrow_mut()
            .push(format!("{} configure {}", self.key, recipe.name()));
        Ok(())
    }

    fn unconfigure(
        &mut self,
        recipe: &Recipe,
        _config: &Value,
        _lock: &mut dyn RecipeLock,
    ) -> Result<()> {
        self.journal
            .borrow_mut()
            .push(format!("{} unconfigure {}", self.key, recipe.name()));
        Ok(())
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(
        result: anyhow::Result<T>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Manifest, PackageInfo};

    #[test]
    fn test_mock_fallback_serves_requested_only() {
        let mut fallback = MockFallback::default()
            .with_recipe("acme/widget", FallbackRecipe::default())
            .with_recipe("acme/other", FallbackRecipe::default());

        let ops = vec![Operation::Install(PackageInfo::new("acme/widget", "1.0.0", "/v"))];
        let found = fallback.fetch(&ops).unwrap();

        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["acme/widget"]);
        assert_eq!(fallback.requests, vec![vec!["acme/widget".to_string()]]);
    }

    #[test]
    fn test_mock_configurator_records_calls() {
        let mut configurator = MockConfigurator::default();
        let mut lock = crate::ops::LockFile::new();
        let recipe = Recipe::new("acme/widget", crate::core::Job::Install, Manifest::new(), "o");

        configurator
            .install(&recipe, &mut lock, &InstallOptions::default())
            .unwrap();
        configurator.unconfigure(&recipe, &mut lock).unwrap();

        assert_eq!(
            configurator.calls,
            vec!["install acme/widget", "unconfigure acme/widget"]
        );
        assert_eq!(configurator.forced, vec![false]);
    }
}
