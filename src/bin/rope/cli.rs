//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rope::Job;

/// Rope - recipe repositories for PHP dependency-manager installs
#[derive(Parser)]
#[command(name = "rope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the recipe each installed package resolves to
    Recipes(RecipesArgs),

    /// List the recipe sources in lookup order
    Sources(SourcesArgs),

    /// Parse an origin string
    Origin(OriginArgs),
}

/// Options shared by commands reading a project.
#[derive(Args)]
pub struct ProjectArgs {
    /// Project directory (defaults to the current directory)
    #[arg(long, env = "ROPE_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecipesArgs {
    /// Packages to inspect (defaults to every installed package)
    pub packages: Vec<String>,

    /// Job to resolve recipes for
    #[arg(long, value_enum, default_value_t = JobArg::Install)]
    pub job: JobArg,

    /// List the files each recipe ships
    #[arg(long)]
    pub files: bool,

    /// Only show packages that have a recipe
    #[arg(long)]
    pub only_found: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct SourcesArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct OriginArgs {
    /// Origin string (`<package>:<version>@<repo>[:<branch>]`)
    pub origin: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JobArg {
    Install,
    Update,
    Uninstall,
}

impl From<JobArg> for Job {
    fn from(job: JobArg) -> Self {
        match job {
            JobArg::Install => Job::Install,
            JobArg::Update => Job::Update,
            JobArg::Uninstall => Job::Uninstall,
        }
    }
}
