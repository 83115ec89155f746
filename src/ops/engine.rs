//! Recipe resolution engine.
//!
//! One run of the engine covers the whole operation list of a single
//! install, update or uninstall invocation:
//!
//! 1. capture the recipes of packages about to be uninstalled,
//! 2. decide per operation between a Rope recipe and the fallback system,
//! 3. merge fallback recipes under the recipes that asked for it,
//! 4. apply the recipes through the configurator.
//!
//! Operations not claimed by a Rope recipe are handed back to the host for
//! the fallback system.

use std::collections::HashMap;

use anyhow::Result;

use crate::core::manifest::KEY_POST_INSTALL_OUTPUT;
use crate::core::{format_origin, Job, Operation, Recipe};
use crate::ops::configurators::{ConfiguratorExtension, ConfiguratorRegistry};
use crate::ops::host::{Configurator, FallbackRecipes, InstallOptions};
use crate::ops::lock::RecipeLock;
use crate::resolver::errors::RecipeError;
use crate::sources::RepositoryManager;
use crate::util::config::TargetDirs;

/// The recipes chosen for a batch of operations.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Recipes to apply, in operation order
    pub recipes: Vec<Recipe>,

    /// Operations left to the fallback system
    pub fallback_operations: Vec<Operation>,
}

/// Collaborators of one run.
pub struct RunContext<'a> {
    pub lock: &'a mut dyn RecipeLock,
    pub fallback: &'a mut dyn FallbackRecipes,
    pub configurator: &'a mut dyn Configurator,
    pub target_dirs: &'a TargetDirs,
    pub options: InstallOptions,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Applied recipes
    pub recipes: Vec<Recipe>,

    /// Operations left to the fallback system
    pub fallback_operations: Vec<Operation>,

    /// Lines to show once the host is done
    pub post_install_output: Vec<String>,
}

/// Decision for one operation.
struct Fetch {
    use_fallback: bool,
    recipe: Option<Recipe>,
}

/// Resolves and applies recipes for batches of package operations.
pub struct RecipeEngine {
    manager: RepositoryManager,
    configurators: ConfiguratorRegistry,

    /// Recipes of uninstalled packages, captured before their files go away
    pending_uninstalls: HashMap<String, Vec<Recipe>>,
}

impl RecipeEngine {
    /// Create an engine over a set of recipe sources.
    pub fn new(manager: RepositoryManager) -> Self {
        RecipeEngine {
            manager,
            configurators: ConfiguratorRegistry::new(),
            pending_uninstalls: HashMap::new(),
        }
    }

    /// The recipe sources.
    pub fn manager(&self) -> &RepositoryManager {
        &self.manager
    }

    /// The recipe sources, mutably.
    pub fn manager_mut(&mut self) -> &mut RepositoryManager {
        &mut self.manager
    }

    /// Register a configurator for a custom manifest key.
    pub fn register_configurator(
        &mut self,
        key: impl Into<String>,
        extension: Box<dyn ConfiguratorExtension>,
    ) -> Result<(), RecipeError> {
        self.configurators.register(key, extension)
    }

    /// Number of captured uninstall recipes.
    pub fn pending_uninstalls(&self) -> usize {
        self.pending_uninstalls.values().map(Vec::len).sum()
    }

    /// Capture the recipe of an uninstall operation.
    ///
    /// Call this while the package is still on disk; other operations are
    /// ignored.
    pub fn capture_uninstall(&mut self, operation: &Operation) -> Result<()> {
        let Operation::Uninstall(package) = operation else {
            return Ok(());
        };

        if let Some(recipe) = self.manager.resolve(package, Job::Uninstall)? {
            tracing::debug!("captured recipe of {} before uninstall", package.name);
            self.pending_uninstalls
                .entry(package.name.clone())
                .or_default()
                .push(recipe);
        }

        Ok(())
    }

    /// Pick the recipes of a batch of operations and record them in the
    /// lock. Captured uninstall recipes are dropped afterwards.
    pub fn fetch_recipes(
        &mut self,
        operations: &[Operation],
        lock: &mut dyn RecipeLock,
        fallback: &mut dyn FallbackRecipes,
    ) -> Result<Resolution> {
        let resolution = self.resolve_batch(operations, lock, fallback);
        self.pending_uninstalls.clear();
        resolution
    }

    fn resolve_batch(
        &mut self,
        operations: &[Operation],
        lock: &mut dyn RecipeLock,
        fallback: &mut dyn FallbackRecipes,
    ) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        let mut merge_operations = Vec::new();
        let mut merge_targets: HashMap<String, usize> = HashMap::new();

        for operation in operations {
            let fetch = self.fetch_recipe(operation, lock)?;

            if fetch.use_fallback {
                resolution.fallback_operations.push(operation.clone());
                continue;
            }

            let Some(recipe) = fetch.recipe else {
                continue;
            };

            // An empty manifest only disables the fallback recipe
            if recipe.manifest().is_empty() {
                tracing::debug!("empty recipe for {}, fallback recipe disabled", recipe.name());
                continue;
            }

            if recipe.manifest().merges_fallback() {
                merge_targets.insert(recipe.name().to_string(), resolution.recipes.len());
                merge_operations.push(operation.clone());
            }

            resolution.recipes.push(recipe);
        }

        if merge_operations.is_empty() {
            return Ok(resolution);
        }

        for (name, data) in fallback.fetch(&merge_operations)? {
            let Some(&index) = merge_targets.get(&name) else {
                tracing::debug!("ignoring fallback recipe of unrequested package {}", name);
                continue;
            };

            tracing::debug!("merging fallback recipe into {}", name);
            resolution.recipes[index].merge_fallback(data.manifest, data.files);
        }

        Ok(resolution)
    }

    fn fetch_recipe(&mut self, operation: &Operation, lock: &mut dyn RecipeLock) -> Result<Fetch> {
        let package = operation.package();
        let name = package.name.as_str();

        if matches!(operation, Operation::Install(_)) && lock.has(name) {
            tracing::debug!("{} is already locked, using the fallback recipe", name);
            return Ok(Fetch {
                use_fallback: true,
                recipe: None,
            });
        }

        let mut recipe = self.manager.resolve(package, operation.job())?;

        if recipe.is_none() {
            recipe = self
                .pending_uninstalls
                .get(name)
                .and_then(|captured| captured.last())
                .map(|captured| captured.clone().with_job(operation.job()));
        }

        let Some(recipe) = recipe else {
            return Ok(Fetch {
                use_fallback: true,
                recipe: None,
            });
        };

        if !recipe.manifest().is_empty() {
            match operation {
                Operation::Install(_) => lock.add(name, recipe.lock_entry())?,
                Operation::Uninstall(_) => lock.remove(name),
                Operation::Update { .. } => {}
            }
        }

        Ok(Fetch {
            use_fallback: false,
            recipe: Some(recipe),
        })
    }

    /// Apply resolved recipes and collect their post-install output.
    pub fn apply(
        &mut self,
        recipes: &[Recipe],
        lock: &mut dyn RecipeLock,
        configurator: &mut dyn Configurator,
        target_dirs: &TargetDirs,
        options: &InstallOptions,
    ) -> Result<Vec<String>> {
        let mut output = Vec::new();

        if recipes.is_empty() {
            return Ok(output);
        }

        tracing::info!(
            "Rope operations: {} recipe{}",
            recipes.len(),
            if recipes.len() > 1 { "s" } else { "" }
        );

        for recipe in recipes {
            match recipe.job() {
                Job::Install => {
                    tracing::info!("  - Configuring {}", format_origin(recipe.origin()));
                    configurator.install(recipe, lock, options)?;
                    self.configurators.configure(recipe, lock, options)?;

                    let manifest = recipe.manifest();
                    let lines = manifest.post_install_output()?;
                    if manifest
                        .get(KEY_POST_INSTALL_OUTPUT)
                        .is_some_and(|v| !v.is_null())
                    {
                        output.extend(lines.iter().map(|line| target_dirs.expand(line)));
                        output.push(String::new());
                    }
                }
                Job::Update => {}
                Job::Uninstall => {
                    tracing::info!("  - Unconfiguring {}", format_origin(recipe.origin()));
                    self.configurators.unconfigure(recipe, lock)?;
                    configurator.unconfigure(recipe, lock)?;
                }
            }
        }

        Ok(output)
    }

    /// Run the engine over the operations of one invocation.
    pub fn run(&mut self, operations: &[Operation], cx: RunContext<'_>) -> Result<RunReport> {
        for operation in operations {
            self.capture_uninstall(operation)?;
        }

        let Resolution {
            recipes,
            fallback_operations,
        } = self.fetch_recipes(operations, cx.lock, cx.fallback)?;

        let post_install_output =
            self.apply(&recipes, cx.lock, cx.configurator, cx.target_dirs, &cx.options)?;

        Ok(RunReport {
            recipes,
            fallback_operations,
            post_install_output,
        })
    }
}
