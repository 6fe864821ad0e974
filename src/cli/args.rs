//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    convert::ConvertCommands,
    export::ExportArgs,
    feed::FeedCommands,
    import::ImportArgs,
    init::InitArgs,
    member::MemberCommands,
    report::ReportArgs,
    status::StatusArgs,
    visitor::VisitorCommands,
};

#[derive(Parser)]
#[command(name = "flock")]
#[command(author, version, about = "Flock church membership toolkit")]
#[command(
    long_about = "A Unix-style toolkit for managing church membership records (members, visitors, new converts) as plain text files, with CSV import/export and growth reporting."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "tsv")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Project root (default: auto-detect by finding .flock/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new Flock project
    Init(InitArgs),

    /// Member management
    #[command(subcommand)]
    Member(MemberCommands),

    /// Visitor management
    #[command(subcommand)]
    Visitor(VisitorCommands),

    /// New convert management
    #[command(subcommand)]
    Convert(ConvertCommands),

    /// Import records from a CSV file
    Import(ImportArgs),

    /// Export collections as CSV or a JSON bundle
    Export(ExportArgs),

    /// Monthly growth trend report
    Report(ReportArgs),

    /// Show the dashboard stats
    Status(StatusArgs),

    /// Notification feed
    #[command(subcommand)]
    Feed(FeedCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned columns for terminals
    #[default]
    Tsv,
    /// CSV rows (for spreadsheets)
    Csv,
    /// Just IDs, one per line
    Id,
}
