use crate::cmd::show::{print_blocks, short_id};
use crate::output::print_json;
use crate::session;
use clap::Subcommand;
use coach_core::{
    block::{BlockId, BlockPatch},
    draft::ProgramDraft,
    types::BlockKind,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum BlockSubcommand {
    /// Append a block
    Add {
        /// text, steps, ingredients or image
        kind: String,
        #[arg(long)]
        content: Option<String>,
    },

    /// Remove a block (also drops it from the schedule)
    Rm {
        /// Block id or unique id prefix
        id: String,
    },

    /// Move a block to a 1-based position
    Mv { id: String, position: usize },

    /// Edit a block's content, items or image
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        /// Replace the item list (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
        #[arg(long)]
        image_url: Option<String>,
    },

    /// List blocks in order
    List,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    selected: Option<&str>,
    subcmd: BlockSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;

    match subcmd {
        BlockSubcommand::Add { kind, content } => {
            let kind: BlockKind = kind.parse()?;
            let id = session.wizard.add_block(kind)?;
            if let Some(text) = content {
                session.wizard.update_block(&id, &BlockPatch::content(text))?;
            }
            session::save(root, &mut session)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "type": kind }))?;
            } else {
                println!("Added {kind} block {}", short_id(id.as_str()));
            }
        }

        BlockSubcommand::Rm { id } => {
            let id = resolve(session.wizard.draft(), &id)?;
            session.wizard.remove_block(&id)?;
            session::save(root, &mut session)?;
            if json {
                print_json(&serde_json::json!({ "removed": id }))?;
            } else {
                println!("Removed block {}", short_id(id.as_str()));
            }
        }

        BlockSubcommand::Mv { id, position } => {
            if position == 0 {
                anyhow::bail!("positions start at 1");
            }
            let id = resolve(session.wizard.draft(), &id)?;
            session.wizard.reorder_block(&id, position - 1)?;
            session::save(root, &mut session)?;
            list(session.wizard.draft(), json)?;
        }

        BlockSubcommand::Edit {
            id,
            content,
            items,
            image_url,
        } => {
            let id = resolve(session.wizard.draft(), &id)?;
            let patch = BlockPatch {
                content,
                items: (!items.is_empty()).then_some(items),
                image_url,
            };
            if patch == BlockPatch::default() {
                anyhow::bail!("nothing to edit: pass --content, --item or --image-url");
            }
            let ignored = session.wizard.update_block(&id, &patch)?;
            session::save(root, &mut session)?;
            if json {
                print_json(&serde_json::json!({ "id": id, "ignored": ignored }))?;
            } else {
                println!("Updated block {}", short_id(id.as_str()));
                if !ignored.is_empty() {
                    eprintln!(
                        "warning: {} does not apply to this block type",
                        ignored.join(", ")
                    );
                }
            }
        }

        BlockSubcommand::List => list(session.wizard.draft(), json)?,
    }
    Ok(())
}

fn list(draft: &ProgramDraft, json: bool) -> anyhow::Result<()> {
    let blocks = draft.blocks();
    if json {
        return print_json(blocks);
    }
    if blocks.is_empty() {
        println!("No blocks.");
    } else {
        print_blocks(blocks.as_slice());
    }
    Ok(())
}

/// Match a full block id or a unique prefix of one.
pub fn resolve(draft: &ProgramDraft, needle: &str) -> anyhow::Result<BlockId> {
    let matches: Vec<&BlockId> = draft
        .blocks()
        .iter()
        .map(|b| &b.id)
        .filter(|id| id.as_str().starts_with(needle))
        .collect();
    match matches.as_slice() {
        [] => anyhow::bail!("block not found: {needle}"),
        [one] => Ok((*one).clone()),
        _ if draft.blocks().iter().any(|b| b.id.as_str() == needle) => {
            Ok(BlockId::from(needle))
        }
        many => anyhow::bail!("block id '{needle}' is ambiguous ({} matches)", many.len()),
    }
}
