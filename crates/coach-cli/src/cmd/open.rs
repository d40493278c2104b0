use crate::cmd::show::print_view;
use crate::session;
use anyhow::Context;
use coach_core::{
    config::Config,
    payload::RecordId,
    session::WizardSession,
    store::FileGateway,
    types::{Category, Step},
    wizard::{NoticeKind, Wizard},
};
use std::path::Path;

pub fn new(root: &Path, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let category: Option<Category> = category.map(str::parse::<Category>).transpose()?;

    let gateway = FileGateway::new(root);
    let wizard = Wizard::open(&gateway, None, None, category, config.authoring);
    let mut session = WizardSession::new(wizard);
    session::activate(root, &mut session)?;

    if !json {
        println!("Started session {}", session.id);
    }
    print_view(&session, json)
}

pub fn resume(root: &Path, record: &str, step: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let id = RecordId::parse(record)?;
    let step: Option<Step> = step.map(str::parse::<Step>).transpose()?;

    let gateway = FileGateway::new(root);
    let wizard = Wizard::open(&gateway, Some(&id), step, None, config.authoring);
    if let Some(notice) = wizard.notice() {
        if notice.kind == NoticeKind::ResumeFailed {
            eprintln!("warning: {}; starting a new draft", notice.message);
        }
    }
    let mut session = WizardSession::new(wizard);
    session::activate(root, &mut session)?;

    if !json {
        println!("Started session {}", session.id);
    }
    print_view(&session, json)
}
