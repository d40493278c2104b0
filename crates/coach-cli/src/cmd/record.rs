use crate::cmd::show::print_blocks;
use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use clap::Subcommand;
use coach_core::{payload::RecordId, store::FileGateway};
use std::path::Path;

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// List stored records, newest first
    List {
        /// Only published records
        #[arg(long, conflicts_with = "drafts")]
        published: bool,
        /// Only drafts
        #[arg(long)]
        drafts: bool,
    },
    /// Show one record
    Show { id: String },
}

pub fn run(root: &Path, subcmd: RecordSubcommand, json: bool) -> anyhow::Result<()> {
    let gateway = FileGateway::new(root);
    match subcmd {
        RecordSubcommand::List { published, drafts } => {
            let records: Vec<_> = gateway
                .list()
                .context("failed to list records")?
                .into_iter()
                .filter(|r| !published || !r.payload.is_draft)
                .filter(|r| !drafts || r.payload.is_draft)
                .collect();

            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No records.");
                return Ok(());
            }
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        truncate(&r.payload.title, 32),
                        r.payload
                            .category
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "-".into()),
                        if r.payload.is_draft { "draft" } else { "published" }.to_string(),
                        r.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "TITLE", "CATEGORY", "STATUS", "UPDATED"], rows);
        }

        RecordSubcommand::Show { id } => {
            let id = RecordId::parse(&id)?;
            let record = gateway
                .load(&id)
                .with_context(|| format!("failed to load record {id}"))?;
            if json {
                return print_json(&record);
            }
            let p = &record.payload;
            println!("Record:   {}", record.id);
            println!("Title:    {}", p.title);
            println!(
                "Category: {}",
                p.category.map(|c| c.to_string()).unwrap_or_else(|| "-".into())
            );
            println!("Status:   {}", if p.is_draft { "draft" } else { "published" });
            println!("Tags:     {}", p.tags.join(", "));
            println!("Created:  {}", record.created_at.to_rfc3339());
            println!("Updated:  {}", record.updated_at.to_rfc3339());
            if !p.blocks.is_empty() {
                println!();
                print_blocks(p.blocks.as_slice());
            }
            for d in &p.days {
                println!("day {:>3}: {} block(s)", d.day, d.block_ids.len());
            }
        }
    }
    Ok(())
}
