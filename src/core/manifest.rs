//! Recipe manifest (`rope.json`) parsing and merging.
//!
//! A manifest is a JSON object of declarative instructions. The keys Rope
//! itself acts on have typed accessors below; every other key is kept as an
//! opaque value and handed to the configurator untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolver::errors::RecipeError;

/// Bundle class => environments, injected for bundle packages.
pub const KEY_BUNDLES: &str = "bundles";

/// Map of recipe-relative source path => target path.
pub const KEY_COPY_FROM_RECIPE: &str = "copy-from-recipe";

/// Opt-in to merging with the fallback recipe of the same package.
pub const KEY_MERGE_FALLBACK: &str = "merge-symfony-recipe";

/// Lines shown to the user once the run finishes.
pub const KEY_POST_INSTALL_OUTPUT: &str = "post-install-output";

/// A recipe manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Manifest(Map::new())
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RecipeError> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(Manifest(map)),
            // PHP-encoded empty manifests come out as `[]`
            Ok(Value::Array(list)) if list.is_empty() => Ok(Manifest::new()),
            Ok(_) => Err(RecipeError::MalformedManifest {
                path: None,
                key: None,
                message: "the manifest must be a JSON object".to_string(),
            }),
            Err(e) => Err(RecipeError::MalformedManifest {
                path: None,
                key: None,
                message: e.to_string(),
            }),
        }
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            RecipeError::UnreadableManifest {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_json(&text).map_err(|e| e.at_path(path))
    }

    /// Whether the manifest has no keys.
    ///
    /// An empty manifest only disables the fallback recipe of a package.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a raw value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Whether the manifest has a key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over the manifest keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Register a bundle class for the given environments.
    pub fn add_bundle(&mut self, class: &str, envs: &[&str]) -> Result<(), RecipeError> {
        let bundles = self
            .0
            .entry(KEY_BUNDLES)
            .or_insert_with(|| Value::Object(Map::new()));

        // PHP-encoded empty maps come out as `[]`
        if matches!(bundles, Value::Array(list) if list.is_empty()) {
            *bundles = Value::Object(Map::new());
        }

        let Value::Object(bundles) = bundles else {
            return Err(RecipeError::malformed_key(
                KEY_BUNDLES,
                "expected an object of bundle class => environments",
            ));
        };

        bundles.insert(
            class.to_string(),
            Value::Array(envs.iter().map(|e| Value::String(e.to_string())).collect()),
        );

        Ok(())
    }

    /// The `copy-from-recipe` entries, in document order.
    pub fn copy_from_recipe(&self) -> Result<Vec<(String, String)>, RecipeError> {
        match self.0.get(KEY_COPY_FROM_RECIPE) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(list)) if list.is_empty() => Ok(Vec::new()),
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(source, target)| match target {
                    Value::String(target) => Ok((source.clone(), target.clone())),
                    _ => Err(RecipeError::malformed_key(
                        KEY_COPY_FROM_RECIPE,
                        format!("target of `{}` must be a string", source),
                    )),
                })
                .collect(),
            Some(_) => Err(RecipeError::malformed_key(
                KEY_COPY_FROM_RECIPE,
                "expected an object of source => target paths",
            )),
        }
    }

    /// Whether the recipe merges with the fallback recipe.
    ///
    /// Only a literal `true` opts in.
    pub fn merges_fallback(&self) -> bool {
        self.0.get(KEY_MERGE_FALLBACK) == Some(&Value::Bool(true))
    }

    /// The `post-install-output` lines.
    pub fn post_install_output(&self) -> Result<Vec<String>, RecipeError> {
        match self.0.get(KEY_POST_INSTALL_OUTPUT) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(lines)) => lines
                .iter()
                .map(|line| {
                    line.as_str().map(str::to_string).ok_or_else(|| {
                        RecipeError::malformed_key(
                            KEY_POST_INSTALL_OUTPUT,
                            "expected a list of strings",
                        )
                    })
                })
                .collect(),
            Some(_) => Err(RecipeError::malformed_key(
                KEY_POST_INSTALL_OUTPUT,
                "expected a list of strings",
            )),
        }
    }

    /// Merge `base` under this manifest: keys of `self` win on conflicts.
    pub fn merge_over(&mut self, base: Manifest) {
        let overlay = Value::Object(std::mem::take(&mut self.0));
        let merged = replace_recursive(Value::Object(base.0), overlay);
        if let Value::Object(map) = merged {
            self.0 = map;
        }
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Manifest {
    fn from(map: Map<String, Value>) -> Self {
        Manifest(map)
    }
}

/// Recursively replace values of `base` with those of `overlay`.
///
/// Objects merge key by key and lists merge index by index; any other
/// combination takes the overlay value. Keys only present in `base` survive.
pub fn replace_recursive(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => {
                        let previous = std::mem::take(existing);
                        *existing = replace_recursive(previous, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            for (i, value) in overlay.into_iter().enumerate() {
                if i < base.len() {
                    let existing = std::mem::take(&mut base[i]);
                    base[i] = replace_recursive(existing, value);
                } else {
                    base.push(value);
                }
            }
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}
