use crate::block::{BlockId, BlockList, BlockPatch, ContentBlock};
use crate::config::AuthoringConfig;
use crate::error::{CoachError, Result, ValidationError};
use crate::payload::{DayAssignment, DraftPayload, RecordId, RecordSnapshot};
use crate::types::{BlockKind, Category, SaveMode};
use crate::validation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// DraftField / DraftUpdate
// ---------------------------------------------------------------------------

/// One metadata write. Applied as-is; validation waits for step transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Description(String),
    Category(Option<Category>),
    HeaderImageUrl(Option<String>),
}

/// Sparse metadata update as received from the CLI or HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    /// An empty string clears the header image.
    #[serde(default)]
    pub header_image_url: Option<String>,
}

impl DraftUpdate {
    pub fn into_fields(self) -> Vec<DraftField> {
        let mut fields = Vec::new();
        if let Some(t) = self.title {
            fields.push(DraftField::Title(t));
        }
        if let Some(d) = self.description {
            fields.push(DraftField::Description(d));
        }
        if let Some(c) = self.category {
            fields.push(DraftField::Category(Some(c)));
        }
        if let Some(url) = self.header_image_url {
            let url = url.trim().to_string();
            fields.push(DraftField::HeaderImageUrl((!url.is_empty()).then_some(url)));
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagToggle {
    Added,
    Removed,
}

// ---------------------------------------------------------------------------
// ProgramDraft
// ---------------------------------------------------------------------------

/// In-memory aggregate for one authoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDraft {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    blocks: BlockList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_image_url: Option<String>,
    /// Locally staged header image, not yet confirmed for upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_preview: Option<String>,
    #[serde(default)]
    days: BTreeMap<u32, Vec<BlockId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record_id: Option<RecordId>,
    #[serde(default = "default_is_draft")]
    is_draft: bool,
}

fn default_is_draft() -> bool {
    true
}

impl Default for ProgramDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: None,
            tags: Vec::new(),
            blocks: BlockList::new(),
            header_image_url: None,
            header_preview: None,
            days: BTreeMap::new(),
            record_id: None,
            is_draft: true,
        }
    }
}

impl ProgramDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Editing copy of a stored record.
    ///
    /// Stored tags get the same normalization `toggle_tag` applies, and
    /// repeated entries for one day are merged in order of appearance.
    pub fn from_snapshot(snapshot: RecordSnapshot) -> Self {
        let p = snapshot.payload;
        let mut seen = HashSet::new();
        let tags = p
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && seen.insert(*t))
            .map(str::to_string)
            .collect();
        let mut days: BTreeMap<u32, Vec<BlockId>> = BTreeMap::new();
        for d in p.days {
            let entry = days.entry(d.day).or_default();
            for id in d.block_ids {
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }
        days.retain(|_, blocks| !blocks.is_empty());
        Self {
            title: p.title,
            description: p.description,
            category: p.category,
            tags,
            blocks: p.blocks,
            header_image_url: p.header_image_url,
            header_preview: None,
            days,
            record_id: Some(snapshot.id),
            is_draft: p.is_draft,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    pub fn header_image_url(&self) -> Option<&str> {
        self.header_image_url.as_deref()
    }

    pub fn header_preview(&self) -> Option<&str> {
        self.header_preview.as_deref()
    }

    pub fn days(&self) -> &BTreeMap<u32, Vec<BlockId>> {
        &self.days
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    pub fn set_field(&mut self, field: DraftField) {
        match field {
            DraftField::Title(t) => self.title = t,
            DraftField::Description(d) => self.description = d,
            DraftField::Category(c) => self.category = c,
            DraftField::HeaderImageUrl(url) => self.header_image_url = url,
        }
    }

    /// Add `tag` if absent, remove it if present. Tags are trimmed and
    /// compared case-sensitively; an empty tag is rejected untouched.
    pub fn toggle_tag(&mut self, tag: &str) -> Result<TagToggle> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CoachError::InvalidTag(String::new()));
        }
        if let Some(i) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(i);
            Ok(TagToggle::Removed)
        } else {
            self.tags.push(tag.to_string());
            Ok(TagToggle::Added)
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag.trim())
    }

    // -----------------------------------------------------------------------
    // Header image
    // -----------------------------------------------------------------------

    pub fn preview_header_image(&mut self, url: impl Into<String>) {
        self.header_preview = Some(url.into());
    }

    /// Promote the staged preview to the header image. Returns false when
    /// nothing was staged.
    pub fn confirm_header_image(&mut self) -> bool {
        match self.header_preview.take() {
            Some(url) => {
                self.header_image_url = Some(url);
                true
            }
            None => false,
        }
    }

    pub fn discard_header_preview(&mut self) -> bool {
        self.header_preview.take().is_some()
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        self.blocks.add(kind)
    }

    /// Remove a block and drop it from every calendar day.
    pub fn remove_block(&mut self, id: &BlockId) -> Option<ContentBlock> {
        let removed = self.blocks.remove(id)?;
        for blocks in self.days.values_mut() {
            blocks.retain(|b| b != id);
        }
        self.days.retain(|_, blocks| !blocks.is_empty());
        Some(removed)
    }

    pub fn reorder_block(&mut self, id: &BlockId, new_index: usize) -> bool {
        self.blocks.reorder(id, new_index)
    }

    pub fn update_block(&mut self, id: &BlockId, patch: &BlockPatch) -> Result<Vec<&'static str>> {
        self.blocks.update(id, patch)
    }

    // -----------------------------------------------------------------------
    // Calendar
    // -----------------------------------------------------------------------

    pub fn assign_day(&mut self, day: u32, block: &BlockId) -> Result<()> {
        if day == 0 {
            return Err(CoachError::InvalidDay(day));
        }
        if !self.blocks.contains(block) {
            return Err(CoachError::BlockNotFound(block.to_string()));
        }
        let entry = self.days.entry(day).or_default();
        if !entry.contains(block) {
            entry.push(block.clone());
        }
        Ok(())
    }

    /// Returns false when the block was not scheduled on `day`.
    pub fn unassign_day(&mut self, day: u32, block: &BlockId) -> bool {
        let Some(entry) = self.days.get_mut(&day) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|b| b != block);
        let changed = entry.len() != before;
        if entry.is_empty() {
            self.days.remove(&day);
        }
        changed
    }

    pub fn clear_day(&mut self, day: u32) -> bool {
        self.days.remove(&day).is_some()
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Snapshot payload without any required-field checks.
    pub fn to_payload(&self, mode: SaveMode) -> DraftPayload {
        DraftPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            tags: self.tags.clone(),
            blocks: self.blocks.clone(),
            header_image_url: self.header_image_url.clone(),
            days: self
                .days
                .iter()
                .map(|(day, block_ids)| DayAssignment {
                    day: *day,
                    block_ids: block_ids.clone(),
                })
                .collect(),
            is_draft: mode.is_draft(),
        }
    }

    /// Snapshot payload for the gateway. Drafts may be incomplete; publish
    /// requires every step of the category's plan to be satisfied.
    pub fn serialize(
        &self,
        mode: SaveMode,
        cfg: &AuthoringConfig,
    ) -> std::result::Result<DraftPayload, ValidationError> {
        if mode == SaveMode::Publish {
            let issues = validation::publish_issues(self, cfg);
            if !issues.is_empty() {
                return Err(ValidationError::new(None, issues));
            }
        }
        Ok(self.to_payload(mode))
    }

    pub(crate) fn mark_saved(&mut self, id: RecordId, mode: SaveMode) {
        self.record_id = Some(id);
        self.is_draft = mode.is_draft();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
