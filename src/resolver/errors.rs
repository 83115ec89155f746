//! Recipe error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Errors raised while locating, loading or applying recipes.
///
/// Configuration errors and data errors abort the run. A missing recipe is
/// never represented here.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("the `{package}` package is not a Rope recipe repository")]
    NotARecipeCatalog { package: String },

    #[error("a configurator named `{name}` is already registered")]
    DuplicateConfigurator { name: String },

    #[error("invalid recipe version folder `{folder}` for `{package}`")]
    InvalidVersionFolder { package: String, folder: String },

    #[error("failed to read recipe manifest: {}", path.display())]
    UnreadableManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed recipe manifest{}: {message}", location(path, key))]
    MalformedManifest {
        path: Option<PathBuf>,
        key: Option<String>,
        message: String,
    },
}

fn location(path: &Option<PathBuf>, key: &Option<String>) -> String {
    match (path, key) {
        (Some(path), Some(key)) => format!(" {} (`{}`)", path.display(), key),
        (Some(path), None) => format!(" {}", path.display()),
        (None, Some(key)) => format!(" (`{}`)", key),
        (None, None) => String::new(),
    }
}

impl RecipeError {
    /// A malformed value under a recognised manifest key.
    pub fn malformed_key(key: &str, message: impl Into<String>) -> Self {
        RecipeError::MalformedManifest {
            path: None,
            key: Some(key.to_string()),
            message: message.into(),
        }
    }

    /// Attach the manifest path to a malformed-manifest error.
    pub fn at_path(self, manifest_path: impl Into<PathBuf>) -> Self {
        match self {
            RecipeError::MalformedManifest { key, message, .. } => {
                RecipeError::MalformedManifest {
                    path: Some(manifest_path.into()),
                    key,
                    message,
                }
            }
            other => other,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RecipeError::NotARecipeCatalog { package } => Diagnostic::error(format!(
                "`{}` was registered as a recipe catalog",
                package
            ))
            .with_context("the package does not set `extra.klipper-rope-recipes` to `true`")
            .with_suggestion(format!(
                "Add `\"klipper-rope-recipes\": true` to the `extra` section of `{}`",
                package
            )),

            RecipeError::DuplicateConfigurator { name } => {
                Diagnostic::error(format!("configurator `{}` is registered twice", name))
                    .with_context("configurator names must be unique and must not shadow built-in manifest keys")
                    .with_suggestion("Prefix custom configurator names with your vendor name")
            }

            RecipeError::InvalidVersionFolder { package, folder } => Diagnostic::error(format!(
                "recipe folder `{}/{}` is not a version",
                package, folder
            ))
            .with_suggestion("Rename the folder to the lowest package version the recipe supports (e.g. `1.0`)"),

            RecipeError::UnreadableManifest { path, source } => {
                Diagnostic::error(format!("could not read recipe manifest: {}", source))
                    .with_location(path.clone())
            }

            RecipeError::MalformedManifest { path, key, message } => {
                let mut diag = Diagnostic::error(format!("malformed recipe manifest: {}", message));

                if let Some(key) = key {
                    diag = diag.with_context(format!("while reading `{}`", key));
                }
                if let Some(path) = path {
                    diag = diag.with_location(path.clone());
                }

                diag.with_suggestion("Recipe manifests must be JSON objects; check the recipe catalog")
            }
        }
    }
}
