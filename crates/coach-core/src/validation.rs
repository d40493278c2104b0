//! Step predicates. Every check here is a pure function of the draft and
//! the authoring limits: no I/O, no mutation.

use crate::block::BlockBody;
use crate::config::AuthoringConfig;
use crate::draft::ProgramDraft;
use crate::error::Issue;
use crate::types::{Step, StepPlan};

/// Issues blocking forward progress from `step`.
pub fn step_issues(step: Step, draft: &ProgramDraft, cfg: &AuthoringConfig) -> Vec<Issue> {
    match step {
        Step::Overview => overview_issues(draft, cfg),
        Step::Content => content_issues(draft),
        Step::Calendar => calendar_issues(draft, cfg),
        Step::Review | Step::Success => Vec::new(),
    }
}

pub fn can_proceed(step: Step, draft: &ProgramDraft, cfg: &AuthoringConfig) -> bool {
    step_issues(step, draft, cfg).is_empty()
}

/// Union of the predicates of every step in the draft's plan.
pub fn publish_issues(draft: &ProgramDraft, cfg: &AuthoringConfig) -> Vec<Issue> {
    StepPlan::for_category(draft.category())
        .steps()
        .iter()
        .flat_map(|&step| step_issues(step, draft, cfg))
        .collect()
}

fn overview_issues(draft: &ProgramDraft, cfg: &AuthoringConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    let title = draft.title().trim();
    if title.is_empty() {
        issues.push(Issue::new("title", "title required"));
    } else if title.chars().count() > cfg.max_title_len {
        issues.push(Issue::new(
            "title",
            format!("title longer than {} characters", cfg.max_title_len),
        ));
    }
    if draft.category().is_none() {
        issues.push(Issue::new("category", "category required"));
    }
    issues
}

fn content_issues(draft: &ProgramDraft) -> Vec<Issue> {
    let blocks = draft.blocks();
    if blocks.is_empty() {
        return vec![Issue::new("blocks", "at least one block required")];
    }

    let mut issues = Vec::new();
    for block in blocks {
        let n = block.order + 1;
        match &block.body {
            BlockBody::Steps { items } | BlockBody::Ingredients { items } => {
                if items.iter().all(|i| i.trim().is_empty()) {
                    issues.push(Issue::new(
                        "blocks",
                        format!("block {n} ({}) needs at least one item", block.kind()),
                    ));
                }
            }
            BlockBody::Image { image_url: None } => {
                issues.push(Issue::new("blocks", format!("block {n} (image) needs an image")));
            }
            BlockBody::Image { image_url: Some(_) } | BlockBody::Text => {}
        }
    }
    issues
}

fn calendar_issues(draft: &ProgramDraft, cfg: &AuthoringConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (&day, block_ids) in draft.days() {
        if day == 0 || day > cfg.max_program_days {
            issues.push(Issue::new(
                "days",
                format!("day {day} outside 1..={}", cfg.max_program_days),
            ));
        }
        if block_ids.is_empty() {
            issues.push(Issue::new("days", format!("day {day} has no blocks")));
        }
        if block_ids.iter().any(|id| !draft.blocks().contains(id)) {
            issues.push(Issue::new(
                "days",
                format!("day {day} references a missing block"),
            ));
        }
    }
    issues
}
