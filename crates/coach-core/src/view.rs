use crate::error::Issue;
use crate::payload::{DraftPayload, RecordId};
use crate::types::{SaveMode, Step};
use crate::wizard::{Notice, Wizard};
use serde::Serialize;

/// Read-only projection of a wizard for display: where it is, what blocks
/// the next step, and the draft as it would be saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: Step,
    pub plan: Vec<Step>,
    pub can_proceed: bool,
    pub blockers: Vec<Issue>,
    pub saving: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_preview: Option<String>,
    pub draft: DraftPayload,
}

impl WizardView {
    pub fn of(wizard: &Wizard) -> Self {
        let draft = wizard.draft();
        let mode = if draft.is_draft() {
            SaveMode::Draft
        } else {
            SaveMode::Publish
        };
        Self {
            step: wizard.step(),
            plan: wizard.plan().steps().to_vec(),
            can_proceed: wizard.can_proceed(),
            blockers: wizard.blockers(),
            saving: wizard.is_saving(),
            notice: wizard.notice().cloned(),
            record_id: draft.record_id().cloned(),
            header_preview: draft.header_preview().map(str::to_string),
            draft: draft.to_payload(mode),
        }
    }
}
