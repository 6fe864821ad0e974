//! `flock visitor` commands - visitor record management and promotion

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::truncate_str;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::entity::{Record, ServiceGroup};
use crate::core::identity::EntityPrefix;
use crate::core::{store, Config, Feed, Notice, Project};
use crate::entities::{Visitor, VisitorFollowUp};

use super::open_project;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 18),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("service", "SERVICE", 10),
    ColumnDef::new("first_visit", "FIRST VISIT", 13),
    ColumnDef::new("follow_up", "FOLLOW-UP", 11),
    ColumnDef::new("interests", "INTERESTS", 24),
];

#[derive(Subcommand, Debug)]
pub enum VisitorCommands {
    /// Add a new visitor
    Add(AddArgs),

    /// List visitors
    List(ListArgs),

    /// Show one visitor record as YAML
    Show(ShowArgs),

    /// Update fields on a visitor record
    Set(SetArgs),

    /// Remove a visitor record
    Rm(RmArgs),

    /// Promote a visitor along the pipeline.
    ///
    /// Note: promotion removes the visitor record; no convert or member
    /// record is created. See the README for details.
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

    /// First visit date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub first_visit: Option<NaiveDate>,

    /// How they heard about the church
    #[arg(long)]
    pub how_heard: Option<String>,

    /// Interest tags, semicolon separated
    #[arg(long)]
    pub interests: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only visitors with this follow-up status
    #[arg(long)]
    pub follow_up: Option<VisitorFollowUp>,

    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Visitor ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Visitor ID (full or unique prefix)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub service: Option<ServiceGroup>,

    /// First visit date (YYYY-MM-DD)
    #[arg(long)]
    pub first_visit: Option<NaiveDate>,

    #[arg(long)]
    pub how_heard: Option<String>,

    /// Interest tags, semicolon separated (replaces the list)
    #[arg(long)]
    pub interests: Option<String>,

    /// Follow-up status (pending, contacted, converted, member)
    #[arg(long)]
    pub follow_up: Option<VisitorFollowUp>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Visitor ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct PromoteArgs {
    /// Visitor ID (full or unique prefix)
    pub id: String,

    /// Target state
    #[arg(long, value_enum)]
    pub to: PromoteTarget,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum PromoteTarget {
    Convert,
    Member,
}

pub fn run(cmd: VisitorCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        VisitorCommands::Add(args) => run_add(args, global),
        VisitorCommands::List(args) => run_list(args, global),
        VisitorCommands::Show(args) => run_show(args, global),
        VisitorCommands::Set(args) => run_set(args, global),
        VisitorCommands::Rm(args) => run_rm(args, global),
        VisitorCommands::Promote(args) => run_promote(args, global),
    }
}

fn split_interests(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let mut visitor = Visitor::new(args.name, args.service);
    visitor.phone_number = args.phone;
    visitor.email = args.email;
    if let Some(date) = args.first_visit {
        visitor.first_visit_date = date;
    }
    visitor.how_heard = args.how_heard;
    visitor.areas_of_interest = args
        .interests
        .as_deref()
        .map(split_interests)
        .unwrap_or_default();
    visitor.notes = args.notes;

    let dir = project.collection_dir(EntityPrefix::Vis);
    store::save(&dir, &visitor).map_err(|e| miette::miette!("{}", e))?;

    // Feed notice, gated by the visitor-alerts preference
    if Config::load().notifications().visitor_alerts {
        let mut feed = Feed::load(&project.feed_path());
        feed.push(Notice::visitor_added(
            &visitor.full_name,
            &visitor.service_attended.to_string(),
        ));
        feed.save().map_err(|e| miette::miette!("{}", e))?;
    }

    if !global.quiet {
        println!(
            "{} Created visitor {} - {}",
            style("✓").green(),
            style(visitor.id.to_string()).cyan(),
            truncate_str(&visitor.full_name, 40)
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let dir = project.collection_dir(EntityPrefix::Vis);
    let mut visitors: Vec<Visitor> =
        store::load_all(&dir).map_err(|e| miette::miette!("{}", e))?;

    if let Some(status) = args.follow_up {
        visitors.retain(|v| v.follow_up == status);
    }
    if let Some(ref needle) = args.search {
        let needle = needle.to_lowercase();
        visitors.retain(|v| v.full_name.to_lowercase().contains(&needle));
    }

    let rows: Vec<TableRow> = visitors
        .iter()
        .map(|v| {
            TableRow::new(v.id.to_string())
                .cell("id", CellValue::Id(v.id.to_string()))
                .cell("name", CellValue::Text(v.full_name.clone()))
                .cell("service", CellValue::Service(v.service_attended))
                .cell("first_visit", CellValue::Date(v.first_visit_date))
                .cell("follow_up", CellValue::VisitorStatus(v.follow_up))
                .cell(
                    "interests",
                    if v.areas_of_interest.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Tags(v.areas_of_interest.clone())
                    },
                )
        })
        .collect();

    let formatter = TableFormatter::new(COLUMNS, "visitor");
    let formatter = if global.quiet {
        formatter.without_summary()
    } else {
        formatter
    };
    formatter.output(rows, global.format);
    Ok(())
}

fn find_visitor(project: &Project, id: &str) -> Result<(std::path::PathBuf, Visitor)> {
    let dir = project.collection_dir(EntityPrefix::Vis);
    store::load::<Visitor>(&dir, id)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("no visitor found matching '{}'", id))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, visitor) = find_visitor(&project, &args.id)?;
    let yaml = serde_yml::to_string(&visitor).map_err(|e| miette::miette!("{}", e))?;
    print!("{}", yaml);
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (path, mut visitor) = find_visitor(&project, &args.id)?;

    if let Some(name) = args.name {
        visitor.full_name = name;
    }
    if let Some(phone) = args.phone {
        visitor.phone_number = Some(phone);
    }
    if let Some(email) = args.email {
        visitor.email = Some(email);
    }
    if let Some(service) = args.service {
        visitor.service_attended = service;
    }
    if let Some(date) = args.first_visit {
        visitor.first_visit_date = date;
    }
    if let Some(how_heard) = args.how_heard {
        visitor.how_heard = Some(how_heard);
    }
    if let Some(ref raw) = args.interests {
        visitor.areas_of_interest = split_interests(raw);
    }
    if let Some(status) = args.follow_up {
        visitor.follow_up = status;
    }
    if let Some(notes) = args.notes {
        visitor.notes = Some(notes);
    }
    visitor.updated_at = Utc::now();

    let yaml = serde_yml::to_string(&visitor).map_err(|e| miette::miette!("{}", e))?;
    std::fs::write(&path, yaml).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Updated visitor {}",
            style("✓").green(),
            style(visitor.id.to_string()).cyan()
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, visitor) = find_visitor(&project, &args.id)?;
    let dir = project.collection_dir(EntityPrefix::Vis);
    store::remove(&dir, &visitor.id().to_string()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Visitor record removed: {}",
            style("✓").green(),
            truncate_str(&visitor.full_name, 40)
        );
    }
    Ok(())
}

// Promotion deletes the source record and reports the new state; it does
// not create a record in the destination collection. Preserved from the
// system this replaces - see README "Promotion caveat".
fn run_promote(args: PromoteArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, visitor) = find_visitor(&project, &args.id)?;
    let dir = project.collection_dir(EntityPrefix::Vis);
    store::remove(&dir, &visitor.id().to_string()).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        match args.to {
            PromoteTarget::Member => println!(
                "{} {} has been promoted to member!",
                style("✓").green(),
                style(&visitor.full_name).cyan()
            ),
            PromoteTarget::Convert => println!(
                "{} {} has been recorded as a new convert!",
                style("✓").green(),
                style(&visitor.full_name).cyan()
            ),
        }
    }
    Ok(())
}
