use crate::cmd::show::print_view;
use crate::output::print_json;
use crate::session;
use clap::Subcommand;
use coach_core::{
    draft::{DraftUpdate, TagToggle},
    types::Category,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum HeaderSubcommand {
    /// Stage a header image without applying it
    Preview { url: String },
    /// Apply the staged header image
    Confirm,
    /// Drop the staged header image
    Discard,
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

pub fn set(
    root: &Path,
    selected: Option<&str>,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    header_image: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let category = category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    let update = DraftUpdate {
        title,
        description,
        category,
        header_image_url: header_image,
    };
    let fields = update.into_fields();
    if fields.is_empty() {
        anyhow::bail!("nothing to set: pass --title, --description, --category or --header-image");
    }

    let mut session = session::load(root, selected)?;
    for field in fields {
        session.wizard.set_field(field)?;
    }
    session::save(root, &mut session)?;
    print_view(&session, json)
}

// ---------------------------------------------------------------------------
// tag
// ---------------------------------------------------------------------------

pub fn tag(root: &Path, selected: Option<&str>, tag: &str, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    let toggle = session.wizard.toggle_tag(tag)?;
    session::save(root, &mut session)?;

    let tags = session.wizard.draft().tags();
    if json {
        print_json(&serde_json::json!({
            "tag": tag.trim(),
            "action": toggle,
            "tags": tags,
        }))?;
    } else {
        let verb = match toggle {
            TagToggle::Added => "Added",
            TagToggle::Removed => "Removed",
        };
        println!("{verb} tag '{}' ({} total)", tag.trim(), tags.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// header
// ---------------------------------------------------------------------------

pub fn header(
    root: &Path,
    selected: Option<&str>,
    subcmd: HeaderSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    let wizard = &mut session.wizard;

    let message = match subcmd {
        HeaderSubcommand::Preview { url } => {
            wizard.preview_header_image(url.trim())?;
            "Header image staged; run 'coach header confirm' to apply".to_string()
        }
        HeaderSubcommand::Confirm => {
            if wizard.confirm_header_image()? {
                "Header image applied".to_string()
            } else {
                anyhow::bail!("no staged header image to confirm");
            }
        }
        HeaderSubcommand::Discard => {
            if wizard.discard_header_preview()? {
                "Staged header image discarded".to_string()
            } else {
                "Nothing staged".to_string()
            }
        }
    };
    session::save(root, &mut session)?;

    if json {
        let draft = session.wizard.draft();
        print_json(&serde_json::json!({
            "headerImageUrl": draft.header_image_url(),
            "headerPreview": draft.header_preview(),
        }))
    } else {
        println!("{message}");
        Ok(())
    }
}
