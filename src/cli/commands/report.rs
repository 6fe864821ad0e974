//! `flock report` command - monthly growth trend

use chrono::Utc;
use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::store;
use crate::entities::{Convert, Member, Visitor};
use crate::report::TrendReport;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Number of trailing calendar months (including the current one)
    #[arg(long, default_value_t = 6)]
    pub months: usize,
}

fn pct_label(pct: Option<f64>) -> String {
    match pct {
        // "unavailable" rather than a division blow-up when the previous
        // month had nothing to compare against
        None => "—".to_string(),
        Some(p) => format!("{}{:.1}%", if p >= 0.0 { "+" } else { "" }, p),
    }
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let project = super::open_project(global)?;

    let members: Vec<Member> = store::load_all(&project.collection_dir(EntityPrefix::Mbr))
        .map_err(|e| miette::miette!("{}", e))?;
    let visitors: Vec<Visitor> = store::load_all(&project.collection_dir(EntityPrefix::Vis))
        .map_err(|e| miette::miette!("{}", e))?;
    let converts: Vec<Convert> = store::load_all(&project.collection_dir(EntityPrefix::Cvt))
        .map_err(|e| miette::miette!("{}", e))?;

    let report = TrendReport::build(
        &members,
        &visitors,
        &converts,
        Utc::now().date_naive(),
        args.months,
    );

    if global.format == OutputFormat::Csv {
        // Spreadsheet form, same columns as the in-app analytics export
        println!("Month,Total Members,New Converts,Visitors");
        for row in &report.rows {
            println!(
                "{},{},{},{}",
                row.window.label(),
                row.members,
                row.converts,
                row.visitors
            );
        }
        return Ok(());
    }

    println!("{}", style(format!("{}-Month Trend", args.months)).bold());
    println!();
    println!(
        "{:<10} {:>14} {:>13} {:>10} {:>12}",
        style("MONTH").bold(),
        style("TOTAL MEMBERS").bold(),
        style("NEW CONVERTS").bold(),
        style("VISITORS").bold(),
        style("NET GROWTH").bold()
    );
    println!("{}", style("-".repeat(64)).dim());

    for (index, row) in report.rows.iter().enumerate() {
        let net = match report.net_growth(index) {
            None => style("—".to_string()).dim().to_string(),
            Some(delta) if delta >= 0 => style(format!("+{}", delta)).green().to_string(),
            Some(delta) => style(delta.to_string()).red().to_string(),
        };
        println!(
            "{:<10} {:>14} {:>13} {:>10} {:>12}",
            row.window.label(),
            row.members,
            row.converts,
            row.visitors,
            net
        );
    }

    if !global.quiet {
        println!();
        println!(
            "Member growth: {}   Convert growth: {}   Visitor growth: {}",
            style(pct_label(report.member_growth())).cyan(),
            style(pct_label(report.convert_growth())).cyan(),
            style(pct_label(report.visitor_growth())).cyan()
        );
    }

    Ok(())
}
