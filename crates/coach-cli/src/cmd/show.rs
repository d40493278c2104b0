use crate::output::{print_json, print_table, truncate};
use crate::session;
use coach_core::{block::ContentBlock, session::WizardSession, view::WizardView};
use std::path::Path;

pub fn run(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = session::load(root, selected)?;
    print_view(&session, json)
}

/// Print the session's wizard as JSON or as a text summary.
pub fn print_view(session: &WizardSession, json: bool) -> anyhow::Result<()> {
    let view = WizardView::of(&session.wizard);
    if json {
        let mut value = serde_json::to_value(&view)?;
        value["session"] = serde_json::json!(session.id);
        return print_json(&value);
    }

    let draft = &view.draft;
    let trail: Vec<String> = view
        .plan
        .iter()
        .map(|s| {
            if *s == view.step {
                format!("[{s}]")
            } else {
                s.to_string()
            }
        })
        .collect();

    println!("Session:  {}", session.id);
    println!("Step:     {}  ({})", view.step, trail.join(" > "));
    match &view.record_id {
        Some(id) if draft.is_draft => println!("Record:   {id} (draft)"),
        Some(id) => println!("Record:   {id} (published)"),
        None => println!("Record:   unsaved"),
    }
    println!("Title:    {}", or_dash(&draft.title));
    if !draft.description.is_empty() {
        println!("About:    {}", truncate(&draft.description, 72));
    }
    println!(
        "Category: {}",
        draft.category.map(|c| c.to_string()).unwrap_or_else(|| "-".into())
    );
    println!("Tags:     {}", or_dash(&draft.tags.join(", ")));
    if let Some(url) = &draft.header_image_url {
        println!("Header:   {url}");
    }
    if let Some(url) = &view.header_preview {
        println!("Preview:  {url} (unconfirmed)");
    }

    if !draft.blocks.is_empty() {
        println!();
        print_blocks(draft.blocks.as_slice());
    }

    if !draft.days.is_empty() {
        println!("\nSchedule:");
        for d in &draft.days {
            let ids: Vec<String> = d.block_ids.iter().map(|b| short_id(b.as_str())).collect();
            println!("  day {:>3}: {}", d.day, ids.join(", "));
        }
    }

    if !view.blockers.is_empty() {
        println!("\nBefore continuing:");
        for issue in &view.blockers {
            println!("  - {}: {}", issue.field, issue.message);
        }
    }

    if let Some(notice) = &view.notice {
        println!("\nNotice: {} (coach dismiss to clear)", notice.message);
    }
    Ok(())
}

pub fn print_blocks(blocks: &[ContentBlock]) {
    let rows = blocks
        .iter()
        .map(|b| {
            let detail = match (b.items(), b.image_url()) {
                (Some(items), _) => format!("{} item(s)", items.len()),
                (None, Some(url)) => truncate(url, 32),
                (None, None) => String::new(),
            };
            vec![
                (b.order + 1).to_string(),
                short_id(b.id.as_str()),
                b.kind().to_string(),
                truncate(&b.content, 40),
                detail,
            ]
        })
        .collect();
    print_table(&["#", "ID", "TYPE", "CONTENT", "DETAIL"], rows);
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
