use crate::cmd::show::print_view;
use crate::session;
use std::path::Path;

pub fn next(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    session.wizard.next()?;
    session::save(root, &mut session)?;
    print_view(&session, json)
}

pub fn prev(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    session.wizard.previous()?;
    session::save(root, &mut session)?;
    print_view(&session, json)
}

/// Leave the success screen for a fresh draft in the same category.
pub fn reset(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    session.wizard.start_new()?;
    session::save(root, &mut session)?;
    print_view(&session, json)
}

pub fn dismiss(root: &Path, selected: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut session = session::load(root, selected)?;
    if session.wizard.dismiss_notice().is_some() {
        session::save(root, &mut session)?;
    }
    print_view(&session, json)
}
