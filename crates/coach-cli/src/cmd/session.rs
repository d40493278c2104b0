use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use clap::Subcommand;
use coach_core::{session::WizardSession, state::State};
use std::path::Path;

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// List wizard sessions, most recent first
    List,
    /// Make a session the active one
    Use { id: String },
    /// Discard a session (its saved record is kept)
    Drop { id: String },
}

pub fn run(root: &Path, subcmd: SessionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SessionSubcommand::List => list(root, json),
        SessionSubcommand::Use { id } => {
            WizardSession::load(root, &id)?;
            let mut state = State::load(root).context("failed to load state")?;
            state.set_active(&id);
            state.save(root).context("failed to save state")?;
            if json {
                print_json(&serde_json::json!({ "active": id }))
            } else {
                println!("Active session: {id}");
                Ok(())
            }
        }
        SessionSubcommand::Drop { id } => {
            WizardSession::delete(root, &id)?;
            let mut state = State::load(root).context("failed to load state")?;
            state.clear_active(&id);
            state.save(root).context("failed to save state")?;
            if json {
                print_json(&serde_json::json!({ "dropped": id }))
            } else {
                println!("Dropped session {id}");
                Ok(())
            }
        }
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let sessions = WizardSession::list(root).context("failed to list sessions")?;
    let active = State::load(root).ok().and_then(|s| s.active_session);

    if json {
        let items: Vec<_> = sessions
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id,
                    "active": active.as_deref() == Some(s.id.as_str()),
                    "step": s.wizard.step(),
                    "title": s.wizard.draft().title(),
                    "record": s.wizard.draft().record_id(),
                    "updatedAt": s.updated_at,
                })
            })
            .collect();
        return print_json(&items);
    }

    if sessions.is_empty() {
        println!("No sessions.");
        return Ok(());
    }
    let rows = sessions
        .iter()
        .map(|s| {
            let marker = if active.as_deref() == Some(s.id.as_str()) { "*" } else { "" };
            vec![
                marker.to_string(),
                s.id.clone(),
                s.wizard.step().to_string(),
                truncate(s.wizard.draft().title(), 32),
                s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["", "ID", "STEP", "TITLE", "UPDATED"], rows);
    Ok(())
}
