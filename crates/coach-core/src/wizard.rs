use crate::block::{BlockId, BlockPatch, ContentBlock};
use crate::config::AuthoringConfig;
use crate::draft::{DraftField, ProgramDraft, TagToggle};
use crate::error::{CoachError, Issue, PersistenceError, Result, ValidationError};
use crate::gateway::PersistenceGateway;
use crate::payload::{DraftPayload, RecordId, RecordSnapshot};
use crate::types::{BlockKind, Category, SaveMode, Step, StepPlan};
use crate::validation;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    SaveFailed,
    PublishFailed,
    ResumeFailed,
}

/// Dismissible message for a failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// SaveRequest
// ---------------------------------------------------------------------------

/// Work order for one gateway call, produced by [`Wizard::begin_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub mode: SaveMode,
    pub target: Option<RecordId>,
    pub payload: DraftPayload,
}

impl SaveRequest {
    pub fn send(&self, gateway: &dyn PersistenceGateway) -> std::result::Result<RecordId, PersistenceError> {
        match self.mode {
            SaveMode::Draft => gateway.save_draft(self.target.as_ref(), &self.payload),
            SaveMode::Publish => gateway.publish(self.target.as_ref(), &self.payload),
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Step controller over one draft.
///
/// Forward moves are gated on the current step's predicate; backward moves
/// never are. At most one gateway call may be outstanding: while it is,
/// `next`, `publish` and further saves are refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    draft: ProgramDraft,
    step: Step,
    #[serde(default)]
    config: AuthoringConfig,
    #[serde(skip)]
    pending: Option<SaveMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

impl Wizard {
    pub fn new(config: AuthoringConfig) -> Self {
        Self::from_draft(ProgramDraft::new(), config)
    }

    pub fn with_category(category: Category, config: AuthoringConfig) -> Self {
        Self::from_draft(ProgramDraft::with_category(category), config)
    }

    pub fn from_draft(draft: ProgramDraft, config: AuthoringConfig) -> Self {
        let step = StepPlan::for_category(draft.category()).first();
        Self {
            draft,
            step,
            config,
            pending: None,
            notice: None,
        }
    }

    pub fn from_snapshot(snapshot: RecordSnapshot, config: AuthoringConfig) -> Self {
        Self::from_draft(ProgramDraft::from_snapshot(snapshot), config)
    }

    /// Entry point for new, edit and resume sessions.
    ///
    /// A missing resume target falls back to a fresh draft and leaves a
    /// notice. A requested step is honoured only as far as every earlier
    /// step's predicate holds.
    pub fn open(
        gateway: &dyn PersistenceGateway,
        resume: Option<&RecordId>,
        step: Option<Step>,
        category: Option<Category>,
        config: AuthoringConfig,
    ) -> Self {
        let mut wizard = match resume {
            Some(id) => match gateway.load_by_id(id) {
                Ok(snapshot) => {
                    tracing::info!(record = %id, "resuming record");
                    Self::from_snapshot(snapshot, config)
                }
                Err(e) => {
                    tracing::info!(record = %id, "resume target missing, starting fresh");
                    let mut fresh = Self::new(config);
                    fresh.notice = Some(Notice {
                        kind: NoticeKind::ResumeFailed,
                        message: e.to_string(),
                    });
                    fresh
                }
            },
            None => Self::new(config),
        };

        if wizard.draft.category().is_none() {
            if let Some(c) = category {
                wizard.draft.set_field(DraftField::Category(Some(c)));
            }
        }
        if let Some(target) = step {
            wizard.advance_to(target);
        }
        wizard
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn draft(&self) -> &ProgramDraft {
        &self.draft
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn config(&self) -> &AuthoringConfig {
        &self.config
    }

    pub fn plan(&self) -> StepPlan {
        StepPlan::for_category(self.draft.category())
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<SaveMode> {
        self.pending
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// What still blocks `next()` from the current step.
    pub fn blockers(&self) -> Vec<Issue> {
        validation::step_issues(self.step, &self.draft, &self.config)
    }

    pub fn can_proceed(&self) -> bool {
        !self.step.is_terminal()
            && self.pending.is_none()
            && self.plan().next(self.step).is_some()
            && validation::can_proceed(self.step, &self.draft, &self.config)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn next(&mut self) -> Result<Step> {
        if self.pending.is_some() {
            return Err(CoachError::SaveInFlight);
        }
        let Some(target) = self.plan().next(self.step) else {
            return Err(self.invalid("no step after this one; publish instead"));
        };
        let issues = self.blockers();
        if !issues.is_empty() {
            tracing::debug!(step = %self.step, count = issues.len(), "step incomplete");
            return Err(ValidationError::new(Some(self.step), issues).into());
        }
        self.step = target;
        Ok(target)
    }

    pub fn previous(&mut self) -> Result<Step> {
        if self.pending == Some(SaveMode::Publish) {
            return Err(CoachError::SaveInFlight);
        }
        if self.step.is_terminal() {
            return Err(self.invalid("record is saved; start a new one instead"));
        }
        let Some(target) = self.plan().previous(self.step) else {
            return Err(self.invalid("already at the first step"));
        };
        self.step = target;
        Ok(target)
    }

    /// Move forward until `target` or the first step whose predicate fails.
    /// Returns the step reached.
    pub fn advance_to(&mut self, target: Step) -> Step {
        let target = self.plan().normalize(target);
        while self.step < target {
            if self.next().is_err() {
                break;
            }
        }
        self.step
    }

    /// Leave `success` with an empty draft of the same category.
    pub fn start_new(&mut self) -> Result<()> {
        if !self.step.is_terminal() {
            return Err(self.invalid("only a saved record can be followed by a new one"));
        }
        self.draft = match self.draft.category() {
            Some(c) => ProgramDraft::with_category(c),
            None => ProgramDraft::new(),
        };
        self.step = self.plan().first();
        self.notice = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Draft mutations
    // -----------------------------------------------------------------------

    pub fn set_field(&mut self, field: DraftField) -> Result<()> {
        self.ensure_editable()?;
        let category_changed = matches!(field, DraftField::Category(_));
        self.draft.set_field(field);
        if category_changed {
            self.step = self.plan().normalize(self.step);
        }
        Ok(())
    }

    pub fn toggle_tag(&mut self, tag: &str) -> Result<TagToggle> {
        self.ensure_editable()?;
        if !self.draft.has_tag(tag) && self.draft.tags().len() >= self.config.max_tags {
            return Err(CoachError::TagLimit(self.config.max_tags));
        }
        self.draft.toggle_tag(tag)
    }

    pub fn add_block(&mut self, kind: BlockKind) -> Result<BlockId> {
        self.ensure_editable()?;
        Ok(self.draft.add_block(kind))
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Result<Option<ContentBlock>> {
        self.ensure_editable()?;
        Ok(self.draft.remove_block(id))
    }

    pub fn reorder_block(&mut self, id: &BlockId, new_index: usize) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.draft.reorder_block(id, new_index))
    }

    pub fn update_block(&mut self, id: &BlockId, patch: &BlockPatch) -> Result<Vec<&'static str>> {
        self.ensure_editable()?;
        self.draft.update_block(id, patch)
    }

    pub fn assign_day(&mut self, day: u32, block: &BlockId) -> Result<()> {
        self.ensure_editable()?;
        self.draft.assign_day(day, block)
    }

    pub fn unassign_day(&mut self, day: u32, block: &BlockId) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.draft.unassign_day(day, block))
    }

    pub fn clear_day(&mut self, day: u32) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.draft.clear_day(day))
    }

    pub fn preview_header_image(&mut self, url: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.draft.preview_header_image(url);
        Ok(())
    }

    pub fn confirm_header_image(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.draft.confirm_header_image())
    }

    pub fn discard_header_preview(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.draft.discard_header_preview())
    }

    // -----------------------------------------------------------------------
    // Saving
    // -----------------------------------------------------------------------

    /// Reserve the single gateway slot and snapshot the draft.
    ///
    /// Draft saves are allowed from any non-terminal step and skip required
    /// fields. Publish validates the whole draft first, then requires the
    /// review step.
    pub fn begin_save(&mut self, mode: SaveMode) -> Result<SaveRequest> {
        if self.pending.is_some() {
            return Err(CoachError::SaveInFlight);
        }
        if self.step.is_terminal() {
            return Err(self.invalid("record is already saved"));
        }
        let payload = self.draft.serialize(mode, &self.config)?;
        if mode == SaveMode::Publish && self.step != self.plan().last() {
            return Err(self.invalid("publish is only available from the review step"));
        }
        self.pending = Some(mode);
        Ok(SaveRequest {
            mode,
            target: self.draft.record_id().cloned(),
            payload,
        })
    }

    /// Release the gateway slot with the call's outcome.
    ///
    /// Success records the id (and, for publish, moves to `success`).
    /// Failure leaves step and draft untouched, keeps a notice and hands the
    /// error back so the same action can be retried.
    pub fn finish_save(
        &mut self,
        outcome: std::result::Result<RecordId, PersistenceError>,
    ) -> Result<RecordId> {
        let mode = self.pending.take().ok_or(CoachError::NoSaveInFlight)?;
        match outcome {
            Ok(id) => {
                tracing::info!(record = %id, %mode, step = %self.step, "save succeeded");
                self.draft.mark_saved(id.clone(), mode);
                self.notice = None;
                if mode == SaveMode::Publish {
                    self.step = Step::Success;
                }
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(%mode, error = %e, "save failed");
                let kind = match mode {
                    SaveMode::Draft => NoticeKind::SaveFailed,
                    SaveMode::Publish => NoticeKind::PublishFailed,
                };
                self.notice = Some(Notice {
                    kind,
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    pub fn save_draft(&mut self, gateway: &dyn PersistenceGateway) -> Result<RecordId> {
        let request = self.begin_save(SaveMode::Draft)?;
        self.finish_save(request.send(gateway))
    }

    pub fn publish(&mut self, gateway: &dyn PersistenceGateway) -> Result<RecordId> {
        let request = self.begin_save(SaveMode::Publish)?;
        self.finish_save(request.send(gateway))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Edits are refused at `success` and while a publish is outstanding:
    /// the published record must match the draft that was sent.
    fn ensure_editable(&self) -> Result<()> {
        if self.pending == Some(SaveMode::Publish) {
            return Err(CoachError::SaveInFlight);
        }
        if self.step.is_terminal() {
            return Err(self.invalid("record is saved; start a new one to edit"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CoachError {
        CoachError::InvalidTransition {
            from: self.step.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
