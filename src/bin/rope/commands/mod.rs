//! Command implementations

pub mod origin;
pub mod recipes;
pub mod sources;

use anyhow::Result;

use crate::cli::ProjectArgs;
use rope::core::InstalledPackages;
use rope::util::diagnostic::suggestions;
use rope::util::{GlobalContext, Project};

/// Load the project and its installed packages.
pub fn load_project(args: &ProjectArgs) -> Result<(Project, InstalledPackages)> {
    let ctx = match &args.project_dir {
        Some(dir) => GlobalContext::with_cwd(dir.clone()),
        None => GlobalContext::new()?,
    };

    let project = ctx
        .load_project()
        .map_err(|e| anyhow::anyhow!("{:#}\n{}", e, suggestions::NO_PROJECT))?;

    let installed = project
        .load_installed()
        .map_err(|e| anyhow::anyhow!("{:#}\n{}", e, suggestions::NOT_INSTALLED))?;

    Ok((project, installed))
}
