//! High-level operations.
//!
//! The recipe engine and the collaborators it is run with.

pub mod configurators;
pub mod engine;
pub mod host;
pub mod lock;

pub use configurators::{ConfiguratorExtension, ConfiguratorRegistry};
pub use engine::{RecipeEngine, Resolution, RunContext, RunReport};
pub use host::{Configurator, FallbackRecipe, FallbackRecipes, InstallOptions};
pub use lock::{LockFile, RecipeLock};
