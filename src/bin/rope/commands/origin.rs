//! `rope origin` command

use anyhow::{bail, Result};

use crate::cli::OriginArgs;
use rope::core::{format_origin, OriginParts};

pub fn execute(args: OriginArgs) -> Result<()> {
    let Some(parts) = OriginParts::parse(&args.origin) else {
        bail!("`{}` is not a structured recipe origin", args.origin);
    };

    println!("package: {}", parts.package);
    println!("version: {}", parts.version);
    println!("repo:    {}", parts.repo);
    println!("branch:  {}", parts.branch.as_deref().unwrap_or("-"));
    println!();
    println!("{}", format_origin(&args.origin));

    Ok(())
}
