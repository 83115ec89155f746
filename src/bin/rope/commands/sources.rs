//! `rope sources` command

use anyhow::Result;

use crate::cli::SourcesArgs;

pub fn execute(args: SourcesArgs) -> Result<()> {
    let (project, installed) = super::load_project(&args.project)?;
    let lock = project.load_lock(&installed)?;
    let manager = project.repository_manager(&installed, &lock)?;

    for (i, name) in manager.names().iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }

    Ok(())
}
