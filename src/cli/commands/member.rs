//! `flock member` commands - member record management

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::truncate_str;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::entity::{Gender, Record, ServiceGroup};
use crate::core::identity::EntityPrefix;
use crate::core::{store, Project};
use crate::entities::Member;
use crate::import::canon;

use super::open_project;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 18),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("group", "GROUP", 10),
    ColumnDef::new("phone", "PHONE", 16),
    ColumnDef::new("care_group", "CARE GROUP", 20),
    ColumnDef::new("added", "ADDED", 12),
];

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a new member
    Add(AddArgs),

    /// List members
    List(ListArgs),

    /// Show one member record as YAML
    Show(ShowArgs),

    /// Update fields on a member record
    Set(SetArgs),

    /// Remove a member record
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Gender (male, female)
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Birth date as MM-DD, --MM-DD, or a full date (year is discarded)
    #[arg(long)]
    pub dob: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Parent or guardian (required for children/teens)
    #[arg(long)]
    pub guardian: Option<String>,

    /// Service category (children, teens, youth, adults)
    #[arg(long, default_value = "adults")]
    pub category: ServiceGroup,

    /// Care group label
    #[arg(long)]
    pub care_group: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only members of this service category
    #[arg(long)]
    pub category: Option<ServiceGroup>,

    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Member ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Member ID (full or unique prefix)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub gender: Option<Gender>,

    /// Birth date as MM-DD, --MM-DD, or a full date (year is discarded)
    #[arg(long)]
    pub dob: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub guardian: Option<String>,

    #[arg(long)]
    pub category: Option<ServiceGroup>,

    #[arg(long)]
    pub care_group: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Member ID (full or unique prefix)
    pub id: String,
}

pub fn run(cmd: MemberCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MemberCommands::Add(args) => run_add(args, global),
        MemberCommands::List(args) => run_list(args, global),
        MemberCommands::Show(args) => run_show(args, global),
        MemberCommands::Set(args) => run_set(args, global),
        MemberCommands::Rm(args) => run_rm(args, global),
    }
}

/// Parse a birth-date flag value, rejecting input the canonicalizer cannot
/// read. Import is lenient here; manual entry is not.
fn parse_dob(input: &str) -> Result<crate::entities::PartialDate> {
    canon::birth_date(input).ok_or_else(|| {
        miette::miette!(
            "could not read birth date '{}' (expected MM-DD, --MM-DD, or a full date)",
            input
        )
    })
}

fn guardian_gate(member: &Member) -> Result<()> {
    if member.guardian_rule_satisfied() {
        Ok(())
    } else {
        Err(miette::miette!(
            "members in the {} category require a parent/guardian (use --guardian)",
            member.service_category
        ))
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let mut member = Member::new(args.name, args.category);
    member.gender = args.gender;
    member.date_of_birth = match args.dob.as_deref() {
        Some(raw) => Some(parse_dob(raw)?),
        None => None,
    };
    member.phone_number = args.phone;
    member.parent_guardian = args.guardian;
    member.care_group = args.care_group;
    member.notes = args.notes;

    // Entry-time invariant; CSV import intentionally skips this gate
    guardian_gate(&member)?;

    let dir = project.collection_dir(EntityPrefix::Mbr);
    store::save(&dir, &member).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Created member {} - {}",
            style("✓").green(),
            style(member.id.to_string()).cyan(),
            truncate_str(&member.full_name, 40)
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let dir = project.collection_dir(EntityPrefix::Mbr);
    let mut members: Vec<Member> = store::load_all(&dir).map_err(|e| miette::miette!("{}", e))?;

    if let Some(category) = args.category {
        members.retain(|m| m.service_category == category);
    }
    if let Some(ref needle) = args.search {
        let needle = needle.to_lowercase();
        members.retain(|m| m.full_name.to_lowercase().contains(&needle));
    }

    let rows: Vec<TableRow> = members
        .iter()
        .map(|m| {
            TableRow::new(m.id.to_string())
                .cell("id", CellValue::Id(m.id.to_string()))
                .cell("name", CellValue::Text(m.full_name.clone()))
                .cell("group", CellValue::Service(m.service_category))
                .cell(
                    "phone",
                    m.phone_number
                        .clone()
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Empty),
                )
                .cell(
                    "care_group",
                    m.care_group
                        .clone()
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Empty),
                )
                .cell("added", CellValue::Timestamp(m.created_at))
        })
        .collect();

    let formatter = TableFormatter::new(COLUMNS, "member");
    let formatter = if global.quiet {
        formatter.without_summary()
    } else {
        formatter
    };
    formatter.output(rows, global.format);
    Ok(())
}

fn find_member(project: &Project, id: &str) -> Result<(std::path::PathBuf, Member)> {
    let dir = project.collection_dir(EntityPrefix::Mbr);
    store::load::<Member>(&dir, id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("no member found matching '{}'", id))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, member) = find_member(&project, &args.id)?;
    let yaml = serde_yml::to_string(&member).map_err(|e| miette::miette!("{}", e))?;
    print!("{}", yaml);
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (path, mut member) = find_member(&project, &args.id)?;

    if let Some(name) = args.name {
        member.full_name = name;
    }
    if let Some(gender) = args.gender {
        member.gender = Some(gender);
    }
    if let Some(ref raw) = args.dob {
        member.date_of_birth = Some(parse_dob(raw)?);
    }
    if let Some(phone) = args.phone {
        member.phone_number = Some(phone);
    }
    if let Some(guardian) = args.guardian {
        member.parent_guardian = Some(guardian);
    }
    if let Some(category) = args.category {
        member.service_category = category;
    }
    if let Some(care_group) = args.care_group {
        member.care_group = Some(care_group);
    }
    if let Some(notes) = args.notes {
        member.notes = Some(notes);
    }
    member.updated_at = Utc::now();

    guardian_gate(&member)?;

    let yaml = serde_yml::to_string(&member).map_err(|e| miette::miette!("{}", e))?;
    std::fs::write(&path, yaml).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Updated member {}",
            style("✓").green(),
            style(member.id.to_string()).cyan()
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, member) = find_member(&project, &args.id)?;
    let dir = project.collection_dir(EntityPrefix::Mbr);
    store::remove(&dir, &member.id().to_string()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Member record removed: {}",
            style("✓").green(),
            truncate_str(&member.full_name, 40)
        );
    }
    Ok(())
}
