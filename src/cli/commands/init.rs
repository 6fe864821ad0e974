//! `flock init` command - create a new project

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::core::identity::EntityPrefix;
use crate::core::Project;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let project = Project::init(&path).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized Flock project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    for prefix in EntityPrefix::all() {
        println!("  {} {}/", style("+").dim(), prefix.collection_dir());
    }
    println!(
        "  {} .flock/config.yaml",
        style("+").dim()
    );

    Ok(())
}
