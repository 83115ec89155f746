//! Recipe version resolution.
//!
//! Version parsing and lower-bound constraints used to match catalog
//! version folders, plus the recipe error taxonomy.

pub mod errors;
pub mod version;

pub use errors::RecipeError;
pub use version::{parse_version_lenient, VersionConstraint};
