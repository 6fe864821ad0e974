//! `flock status` command - dashboard stats

use chrono::Utc;
use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::{store, Config};
use crate::entities::{Convert, Member, Visitor};
use crate::report::DashboardStats;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let project = super::open_project(global)?;

    let members: Vec<Member> = store::load_all(&project.collection_dir(EntityPrefix::Mbr))
        .map_err(|e| miette::miette!("{}", e))?;
    let visitors: Vec<Visitor> = store::load_all(&project.collection_dir(EntityPrefix::Vis))
        .map_err(|e| miette::miette!("{}", e))?;
    let converts: Vec<Convert> = store::load_all(&project.collection_dir(EntityPrefix::Cvt))
        .map_err(|e| miette::miette!("{}", e))?;

    let stats = DashboardStats::build(&members, &visitors, &converts, Utc::now().date_naive());

    let growth = match stats.members_growth_pct {
        None => style("—".to_string()).dim().to_string(),
        Some(p) if p >= 0 => style(format!("+{}%", p)).green().to_string(),
        Some(p) => style(format!("{}%", p)).red().to_string(),
    };

    println!("{}", style("Church Dashboard").bold());
    println!("{}", style("-".repeat(40)).dim());
    println!(
        "  Total members:     {} ({} vs last month)",
        style(stats.total_members).cyan(),
        growth
    );
    println!(
        "    children {}  teens {}  youth {}  adults {}",
        style(stats.children_count).magenta(),
        style(stats.teens_count).cyan(),
        style(stats.youth_count).blue(),
        style(stats.adults_count).white()
    );
    println!(
        "  New visitors:      {} this month",
        style(stats.new_visitors_this_month).cyan()
    );
    println!(
        "  New converts:      {} this month",
        style(stats.new_converts_this_month).cyan()
    );

    let prefs = Config::load().notifications();
    if prefs.followup_reminders && stats.pending_follow_ups > 0 {
        println!();
        println!(
            "{} {} visitor(s) pending follow-up. See: flock visitor list --follow-up pending",
            style("!").yellow(),
            style(stats.pending_follow_ups).yellow()
        );
    }
    if prefs.monthly_reports {
        println!();
        println!(
            "{} Monthly trend available: flock report",
            style("→").blue()
        );
    }

    Ok(())
}
