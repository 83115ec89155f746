//! Recipe sources.
//!
//! Sources find the recipe of a package: next to the package itself
//! (inline) or in a recipe catalog shipped by another installed package.

pub mod catalog;
pub mod constraints;
pub mod files;
pub mod inline;
pub mod manager;
pub mod source;

pub use catalog::CatalogSource;
pub use constraints::VersionConstraintIndex;
pub use inline::InlineSource;
pub use manager::RepositoryManager;
pub use source::{RecipeSource, SourceContext};
