//! `rope recipes` command

use anyhow::{bail, Result};

use crate::cli::RecipesArgs;
use rope::core::{format_origin, Job, PackageInfo};
use rope::ops::RecipeLock;

pub fn execute(args: RecipesArgs) -> Result<()> {
    let (project, installed) = super::load_project(&args.project)?;
    let lock = project.load_lock(&installed)?;
    let mut manager = project.repository_manager(&installed, &lock)?;
    let job = Job::from(args.job);

    let packages: Vec<&PackageInfo> = if args.packages.is_empty() {
        installed.packages().iter().collect()
    } else {
        args.packages
            .iter()
            .map(|name| match installed.get(name) {
                Some(package) => Ok(package),
                None => bail!("package `{}` is not installed", name),
            })
            .collect::<Result<_>>()?
    };

    for package in packages {
        let source = manager.claiming_source(package)?.map(str::to_string);
        let recipe = manager.resolve(package, job)?;

        let Some(recipe) = recipe else {
            if !args.only_found {
                println!("{} {}: no recipe", package.name, package.pretty_version);
            }
            continue;
        };

        let locked = if lock.has(&package.name) { " [locked]" } else { "" };
        let source = source.unwrap_or_default();

        if recipe.manifest().is_empty() {
            println!(
                "{} {}: fallback recipe disabled by {}{}",
                package.name, package.pretty_version, source, locked
            );
            continue;
        }

        println!(
            "{} {}: {} [{}]{}",
            package.name,
            package.pretty_version,
            format_origin(recipe.origin()),
            source,
            locked
        );

        if args.files {
            for (path, file) in recipe.files() {
                println!("    {} ({} bytes)", path, file.contents.len());
            }
        }
    }

    Ok(())
}
