use crate::output::print_json;
use crate::session;
use anyhow::Context;
use coach_core::{state::State, store::FileGateway, types::SaveMode};
use std::path::Path;

pub fn save_draft(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    run(root, selected, SaveMode::Draft, json)
}

pub fn publish(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    run(root, selected, SaveMode::Publish, json)
}

fn run(root: &Path, selected: Option<&str>, mode: SaveMode, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    let gateway = FileGateway::new(root);

    let request = session.wizard.begin_save(mode)?;
    let outcome = session.wizard.finish_save(request.send(&gateway));

    // The notice left by a failed call must survive this invocation.
    session::save(root, &mut session)?;

    let mut state = State::load(root).context("failed to load state")?;
    match &outcome {
        Ok(id) => state.record_save(&session.id, mode, Some(id.as_str()), "ok"),
        Err(e) => state.record_save(&session.id, mode, None, &e.to_string()),
    }
    state.save(root).context("failed to save state")?;

    let id = outcome.with_context(|| format!("{mode} failed; the draft is unchanged, retry when ready"))?;
    if json {
        print_json(&serde_json::json!({
            "session": session.id,
            "record": id,
            "mode": mode,
            "step": session.wizard.step(),
        }))
    } else {
        match mode {
            SaveMode::Draft => println!("Saved draft {id}"),
            SaveMode::Publish => {
                println!("Published {id}");
                println!("Run 'coach reset' to start another.");
            }
        }
        Ok(())
    }
}
