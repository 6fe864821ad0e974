//! `flock convert` commands - new convert record management

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::truncate_str;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::entity::{Record, ServiceGroup};
use crate::core::identity::EntityPrefix;
use crate::core::{store, Project};
use crate::entities::{Convert, ConvertFollowUp};

use super::open_project;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 18),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("service", "SERVICE", 10),
    ColumnDef::new("conversion", "CONVERSION", 13),
    ColumnDef::new("follow_up", "FOLLOW-UP", 11),
    ColumnDef::new("leader", "LEADER", 20),
];

#[derive(Subcommand, Debug)]
pub enum ConvertCommands {
    /// Add a new convert
    Add(AddArgs),

    /// List converts
    List(ListArgs),

    /// Show one convert record as YAML
    Show(ShowArgs),

    /// Update fields on a convert record
    Set(SetArgs),

    /// Remove a convert record
    Rm(RmArgs),

    /// Promote a convert to member.
    ///
    /// Note: promotion removes the convert record; no member record is
    /// created. See the README for details.
    Promote(PromoteArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Service attended (children, teens, youth, adults)
    #[arg(long, default_value = "adults")]
    pub service: ServiceGroup,

    /// Date of conversion (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Leader assigned for follow-up
    #[arg(long)]
    pub leader: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only converts with this follow-up status
    #[arg(long)]
    pub follow_up: Option<ConvertFollowUp>,

    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Convert ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Convert ID (full or unique prefix)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub service: Option<ServiceGroup>,

    /// Date of conversion (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Follow-up status (pending, contacted, discipled)
    #[arg(long)]
    pub follow_up: Option<ConvertFollowUp>,

    #[arg(long)]
    pub leader: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Convert ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct PromoteArgs {
    /// Convert ID (full or unique prefix)
    pub id: String,
}

pub fn run(cmd: ConvertCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConvertCommands::Add(args) => run_add(args, global),
        ConvertCommands::List(args) => run_list(args, global),
        ConvertCommands::Show(args) => run_show(args, global),
        ConvertCommands::Set(args) => run_set(args, global),
        ConvertCommands::Rm(args) => run_rm(args, global),
        ConvertCommands::Promote(args) => run_promote(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let mut convert = Convert::new(args.name, args.service);
    convert.phone_number = args.phone;
    convert.email = args.email;
    if let Some(date) = args.date {
        convert.date_of_conversion = date;
    }
    convert.assigned_leader = args.leader;
    convert.notes = args.notes;

    let dir = project.collection_dir(EntityPrefix::Cvt);
    store::save(&dir, &convert).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Created convert {} - {}",
            style("✓").green(),
            style(convert.id.to_string()).cyan(),
            truncate_str(&convert.full_name, 40)
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let dir = project.collection_dir(EntityPrefix::Cvt);
    let mut converts: Vec<Convert> =
        store::load_all(&dir).map_err(|e| miette::miette!("{}", e))?;

    if let Some(status) = args.follow_up {
        converts.retain(|c| c.follow_up == status);
    }
    if let Some(ref needle) = args.search {
        let needle = needle.to_lowercase();
        converts.retain(|c| c.full_name.to_lowercase().contains(&needle));
    }

    let rows: Vec<TableRow> = converts
        .iter()
        .map(|c| {
            TableRow::new(c.id.to_string())
                .cell("id", CellValue::Id(c.id.to_string()))
                .cell("name", CellValue::Text(c.full_name.clone()))
                .cell("service", CellValue::Service(c.service_attended))
                .cell("conversion", CellValue::Date(c.date_of_conversion))
                .cell("follow_up", CellValue::ConvertStatus(c.follow_up))
                .cell(
                    "leader",
                    c.assigned_leader
                        .clone()
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Empty),
                )
        })
        .collect();

    let formatter = TableFormatter::new(COLUMNS, "convert");
    let formatter = if global.quiet {
        formatter.without_summary()
    } else {
        formatter
    };
    formatter.output(rows, global.format);
    Ok(())
}

fn find_convert(project: &Project, id: &str) -> Result<(std::path::PathBuf, Convert)> {
    let dir = project.collection_dir(EntityPrefix::Cvt);
    store::load::<Convert>(&dir, id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("no convert found matching '{}'", id))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, convert) = find_convert(&project, &args.id)?;
    let yaml = serde_yml::to_string(&convert).map_err(|e| miette::miette!("{}", e))?;
    print!("{}", yaml);
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (path, mut convert) = find_convert(&project, &args.id)?;

    if let Some(name) = args.name {
        convert.full_name = name;
    }
    if let Some(phone) = args.phone {
        convert.phone_number = Some(phone);
    }
    if let Some(email) = args.email {
        convert.email = Some(email);
    }
    if let Some(service) = args.service {
        convert.service_attended = service;
    }
    if let Some(date) = args.date {
        convert.date_of_conversion = date;
    }
    if let Some(status) = args.follow_up {
        convert.follow_up = status;
    }
    if let Some(leader) = args.leader {
        convert.assigned_leader = Some(leader);
    }
    if let Some(notes) = args.notes {
        convert.notes = Some(notes);
    }
    convert.updated_at = Utc::now();

    let yaml = serde_yml::to_string(&convert).map_err(|e| miette::miette!("{}", e))?;
    std::fs::write(&path, yaml).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Updated convert {}",
            style("✓").green(),
            style(convert.id.to_string()).cyan()
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, convert) = find_convert(&project, &args.id)?;
    let dir = project.collection_dir(EntityPrefix::Cvt);
    store::remove(&dir, &convert.id().to_string()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Convert record removed: {}",
            style("✓").green(),
            truncate_str(&convert.full_name, 40)
        );
    }
    Ok(())
}

// Same caveat as visitor promotion: delete-only, nothing is created in the
// members collection.
fn run_promote(args: PromoteArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, convert) = find_convert(&project, &args.id)?;
    let dir = project.collection_dir(EntityPrefix::Cvt);
    store::remove(&dir, &convert.id().to_string()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} {} has been promoted to member!",
            style("✓").green(),
            style(&convert.full_name).cyan()
        );
    }
    Ok(())
}
