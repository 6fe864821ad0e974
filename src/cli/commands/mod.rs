//! Command implementations

pub mod convert;
pub mod export;
pub mod feed;
pub mod import;
pub mod init;
pub mod member;
pub mod report;
pub mod status;
pub mod visitor;

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::Project;

/// Open the project from --project or by discovery
pub(crate) fn open_project(global: &GlobalOpts) -> Result<Project> {
    match &global.project {
        Some(path) => Project::discover_from(path).map_err(|e| miette::miette!("{}", e)),
        None => Project::discover().map_err(|e| miette::miette!("{}", e)),
    }
}
