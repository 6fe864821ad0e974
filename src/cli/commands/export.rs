//! `flock export` command - CSV exports and the JSON bundle

use chrono::Utc;
use console::style;
use csv::WriterBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::{store, Project};
use crate::entities::{Convert, Member, Visitor};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// What to export: members, visitors, converts, or all (default)
    #[arg(value_parser = parse_target, default_value = "all")]
    pub target: ExportTarget,

    /// Write a single JSON bundle instead of CSV files (only with "all")
    #[arg(long)]
    pub json: bool,

    /// Directory to write export files into (default: current directory)
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    One(EntityPrefix),
    All,
}

fn parse_target(s: &str) -> std::result::Result<ExportTarget, String> {
    match s.to_lowercase().as_str() {
        "all" => Ok(ExportTarget::All),
        "members" | "member" => Ok(ExportTarget::One(EntityPrefix::Mbr)),
        "visitors" | "visitor" => Ok(ExportTarget::One(EntityPrefix::Vis)),
        "converts" | "convert" => Ok(ExportTarget::One(EntityPrefix::Cvt)),
        _ => Err(format!(
            "Unsupported target: '{}'. Supported: members, visitors, converts, all",
            s
        )),
    }
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = super::open_project(global)?;
    let date = Utc::now().date_naive().format("%Y-%m-%d");

    if args.json {
        if args.target != ExportTarget::All {
            return Err(miette::miette!("--json exports the full bundle; use it with 'all'"));
        }
        let path = args.output.join(format!("church-data-export-{}.json", date));
        export_json(&project, &path)?;
        if !global.quiet {
            println!(
                "{} Export written: {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        return Ok(());
    }

    let targets: Vec<EntityPrefix> = match args.target {
        ExportTarget::One(prefix) => vec![prefix],
        ExportTarget::All => EntityPrefix::all().to_vec(),
    };

    for prefix in targets {
        let path = args
            .output
            .join(format!("church-{}-{}.csv", prefix.collection_dir(), date));
        let count = match prefix {
            EntityPrefix::Mbr => export_members(&project, &path)?,
            EntityPrefix::Vis => export_visitors(&project, &path)?,
            EntityPrefix::Cvt => export_converts(&project, &path)?,
        };
        if !global.quiet {
            println!(
                "{} Exported {} {} record(s) to {}",
                style("✓").green(),
                style(count).cyan(),
                prefix.display_name(),
                style(path.display()).cyan()
            );
        }
    }

    Ok(())
}

/// Writer that quotes every field, matching the header contract for
/// round-tripping exports back through import
fn csv_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)
        .into_diagnostic()
}

fn export_members(project: &Project, path: &Path) -> Result<usize> {
    let members: Vec<Member> = store::load_all(&project.collection_dir(EntityPrefix::Mbr))
        .map_err(|e| miette::miette!("{}", e))?;

    let mut wtr = csv_writer(path)?;
    wtr.write_record([
        "Full Name",
        "Gender",
        "Date of Birth",
        "Phone",
        "Parent/Guardian",
        "Service Category",
        "Care Group",
        "Created At",
        "Updated At",
    ])
    .into_diagnostic()?;

    for m in &members {
        let record = [
            m.full_name.clone(),
            m.gender.map(|g| g.to_string()).unwrap_or_default(),
            m.date_of_birth.map(|d| d.mm_dd()).unwrap_or_default(),
            m.phone_number.clone().unwrap_or_default(),
            m.parent_guardian.clone().unwrap_or_default(),
            m.service_category.export_label().to_string(),
            m.care_group.clone().unwrap_or_default(),
            m.created_at.to_rfc3339(),
            m.updated_at.to_rfc3339(),
        ];
        wtr.write_record(&record).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(members.len())
}

fn export_visitors(project: &Project, path: &Path) -> Result<usize> {
    let visitors: Vec<Visitor> = store::load_all(&project.collection_dir(EntityPrefix::Vis))
        .map_err(|e| miette::miette!("{}", e))?;

    let mut wtr = csv_writer(path)?;
    wtr.write_record([
        "Full Name",
        "Phone",
        "Email",
        "Service Attended",
        "First Visit Date",
        "How Heard",
        "Areas of Interest",
        "Follow-up",
        "Created At",
        "Updated At",
    ])
    .into_diagnostic()?;

    for v in &visitors {
        let record = [
            v.full_name.clone(),
            v.phone_number.clone().unwrap_or_default(),
            v.email.clone().unwrap_or_default(),
            v.service_attended.export_label().to_string(),
            v.first_visit_date.format("%Y-%m-%d").to_string(),
            v.how_heard.clone().unwrap_or_default(),
            v.areas_of_interest.join("; "),
            v.follow_up.to_string(),
            v.created_at.to_rfc3339(),
            v.updated_at.to_rfc3339(),
        ];
        wtr.write_record(&record).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(visitors.len())
}

fn export_converts(project: &Project, path: &Path) -> Result<usize> {
    let converts: Vec<Convert> = store::load_all(&project.collection_dir(EntityPrefix::Cvt))
        .map_err(|e| miette::miette!("{}", e))?;

    let mut wtr = csv_writer(path)?;
    wtr.write_record([
        "Full Name",
        "Phone",
        "Email",
        "Service",
        "Date of Conversion",
        "Follow-up Status",
        "Assigned Leader",
        "Created At",
        "Updated At",
    ])
    .into_diagnostic()?;

    for c in &converts {
        let record = [
            c.full_name.clone(),
            c.phone_number.clone().unwrap_or_default(),
            c.email.clone().unwrap_or_default(),
            c.service_attended.export_label().to_string(),
            c.date_of_conversion.format("%Y-%m-%d").to_string(),
            c.follow_up.to_string(),
            c.assigned_leader.clone().unwrap_or_default(),
            c.created_at.to_rfc3339(),
            c.updated_at.to_rfc3339(),
        ];
        wtr.write_record(&record).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(converts.len())
}

fn export_json(project: &Project, path: &Path) -> Result<()> {
    let members: Vec<Member> = store::load_all(&project.collection_dir(EntityPrefix::Mbr))
        .map_err(|e| miette::miette!("{}", e))?;
    let visitors: Vec<Visitor> = store::load_all(&project.collection_dir(EntityPrefix::Vis))
        .map_err(|e| miette::miette!("{}", e))?;
    let converts: Vec<Convert> = store::load_all(&project.collection_dir(EntityPrefix::Cvt))
        .map_err(|e| miette::miette!("{}", e))?;

    let payload = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "members": members,
        "visitors": visitors,
        "converts": converts,
    });

    let body = serde_json::to_string_pretty(&payload).into_diagnostic()?;
    std::fs::write(path, body).into_diagnostic()?;
    Ok(())
}
