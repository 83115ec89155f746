//! `copy-from-recipe` file inlining.
//!
//! Each entry maps a path relative to the recipe folder onto a target path.
//! Directories are walked recursively and every file below them lands at
//! `target + relative path`. Sources that do not exist produce no files.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::{Manifest, RecipeFile, RecipeFiles};
use crate::util::config::TargetDirs;

/// Collect the files declared by a manifest's `copy-from-recipe` map.
pub fn inline_recipe_files(
    recipe_dir: &Path,
    manifest: &Manifest,
    target_dirs: &TargetDirs,
) -> Result<RecipeFiles> {
    let mut files = RecipeFiles::new();

    for (source, target) in manifest.copy_from_recipe()? {
        let target = target_dirs.expand(&target);

        // Missing sources are skipped, like an empty glob
        let Ok(source_path) = recipe_dir.join(&source).canonicalize() else {
            tracing::debug!("recipe source `{}` not found in {}", source, recipe_dir.display());
            continue;
        };

        if source_path.is_dir() {
            collect_dir(&source_path, &target, &mut files)?;
        } else {
            add_file(&source_path, target, &mut files)?;
        }
    }

    Ok(files)
}

fn collect_dir(source: &Path, target: &str, files: &mut RecipeFiles) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry
            .with_context(|| format!("failed to walk recipe directory: {}", source.display()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} is outside {}", entry.path().display(), source.display()))?;

        let target_path = format!("{}{}", target, relative.to_string_lossy()).replace('\\', "/");
        add_file(entry.path(), target_path, files)?;
    }

    Ok(())
}

fn add_file(source: &Path, target: String, files: &mut RecipeFiles) -> Result<()> {
    let contents = std::fs::read(source)
        .with_context(|| format!("failed to read recipe file: {}", source.display()))?;

    files.insert(target, RecipeFile::new(contents));
    Ok(())
}
