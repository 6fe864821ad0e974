//! `flock feed` commands - notification feed

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::Feed;

#[derive(Subcommand, Debug)]
pub enum FeedCommands {
    /// List notices, newest first
    List,

    /// Mark every notice as read
    MarkRead,

    /// Delete all notices
    Clear,
}

pub fn run(cmd: FeedCommands, global: &GlobalOpts) -> Result<()> {
    let project = super::open_project(global)?;
    let mut feed = Feed::load(&project.feed_path());

    match cmd {
        FeedCommands::List => {
            if feed.notices().is_empty() {
                println!("{}", style("No notifications.").dim());
                return Ok(());
            }
            for notice in feed.notices() {
                let marker = if notice.read {
                    style("·").dim()
                } else {
                    style("●").cyan()
                };
                let when = notice.ts.format("%Y-%m-%d %H:%M");
                match &notice.message {
                    Some(message) => println!(
                        "{} {} {} - {}",
                        marker,
                        style(when).dim(),
                        style(&notice.title).bold(),
                        message
                    ),
                    None => println!(
                        "{} {} {}",
                        marker,
                        style(when).dim(),
                        style(&notice.title).bold()
                    ),
                }
            }
            if !global.quiet {
                println!();
                println!(
                    "{} unread notification(s).",
                    style(feed.unread_count()).cyan()
                );
            }
        }
        FeedCommands::MarkRead => {
            feed.mark_all_read();
            feed.save().map_err(|e| miette::miette!("{}", e))?;
            if !global.quiet {
                println!("{} All notifications marked read.", style("✓").green());
            }
        }
        FeedCommands::Clear => {
            feed.clear();
            feed.save().map_err(|e| miette::miette!("{}", e))?;
            if !global.quiet {
                println!("{} Notification feed cleared.", style("✓").green());
            }
        }
    }

    Ok(())
}
