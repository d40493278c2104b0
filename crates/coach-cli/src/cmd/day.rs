use crate::cmd::block::resolve;
use crate::cmd::show::short_id;
use crate::output::print_json;
use crate::session;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum DaySubcommand {
    /// Schedule one or more blocks on a day
    Assign {
        day: u32,
        #[arg(required = true)]
        blocks: Vec<String>,
    },
    /// Remove a block from a day
    Unassign { day: u32, block: String },
    /// Remove every block from a day
    Clear { day: u32 },
    /// Show the schedule
    List,
}

pub fn run(
    root: &Path,
    selected: Option<&str>,
    subcmd: DaySubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;

    match subcmd {
        DaySubcommand::Assign { day, blocks } => {
            for needle in &blocks {
                let id = resolve(session.wizard.draft(), needle)?;
                session.wizard.assign_day(day, &id)?;
            }
            session::save(root, &mut session)?;
        }
        DaySubcommand::Unassign { day, block } => {
            let id = resolve(session.wizard.draft(), &block)?;
            if !session.wizard.unassign_day(day, &id)? {
                anyhow::bail!("block {} is not scheduled on day {day}", short_id(id.as_str()));
            }
            session::save(root, &mut session)?;
        }
        DaySubcommand::Clear { day } => {
            if session.wizard.clear_day(day)? {
                session::save(root, &mut session)?;
            }
        }
        DaySubcommand::List => {}
    }

    let days = session.wizard.draft().days();
    if json {
        let schedule: Vec<_> = days
            .iter()
            .map(|(day, ids)| serde_json::json!({ "day": day, "blockIds": ids }))
            .collect();
        return print_json(&schedule);
    }
    if days.is_empty() {
        println!("Nothing scheduled.");
    }
    for (day, ids) in days {
        let ids: Vec<String> = ids.iter().map(|b| short_id(b.as_str())).collect();
        println!("day {day:>3}: {}", ids.join(", "));
    }
    Ok(())
}
