use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fitness,
    Nutrition,
    Mental,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fitness => "fitness",
            Category::Nutrition => "nutrition",
            Category::Mental => "mental",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fitness" => Ok(Category::Fitness),
            "nutrition" => Ok(Category::Nutrition),
            "mental" | "mental_health" | "mental-health" => Ok(Category::Mental),
            _ => Err(crate::error::CoachError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// Wizard steps in their global order. Each category's plan is a
/// subsequence of this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Overview,
    Content,
    Calendar,
    Review,
    Success,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Overview => "overview",
            Step::Content => "content",
            Step::Calendar => "calendar",
            Step::Review => "review",
            Step::Success => "success",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Step::Success
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Step {
    type Err = crate::error::CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Step::Overview),
            "content" | "content_builder" | "blocks" => Ok(Step::Content),
            "calendar" => Ok(Step::Calendar),
            "review" => Ok(Step::Review),
            "success" => Ok(Step::Success),
            _ => Err(crate::error::CoachError::InvalidStep(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// StepPlan
// ---------------------------------------------------------------------------

/// Fixed step order for one category. `Success` is terminal and not part of
/// any plan; it is reached only through publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPlan {
    /// Multi-day programs get a calendar between content and review.
    Program,
    Single,
}

impl StepPlan {
    pub fn for_category(category: Option<Category>) -> Self {
        match category {
            Some(Category::Fitness) => StepPlan::Program,
            Some(Category::Nutrition) | Some(Category::Mental) | None => StepPlan::Single,
        }
    }

    pub fn steps(self) -> &'static [Step] {
        match self {
            StepPlan::Program => &[Step::Overview, Step::Content, Step::Calendar, Step::Review],
            StepPlan::Single => &[Step::Overview, Step::Content, Step::Review],
        }
    }

    pub fn contains(self, step: Step) -> bool {
        self.steps().contains(&step)
    }

    pub fn first(self) -> Step {
        Step::Overview
    }

    pub fn last(self) -> Step {
        Step::Review
    }

    pub fn next(self, step: Step) -> Option<Step> {
        let steps = self.steps();
        let i = steps.iter().position(|s| *s == step)?;
        steps.get(i + 1).copied()
    }

    pub fn previous(self, step: Step) -> Option<Step> {
        let steps = self.steps();
        let i = steps.iter().position(|s| *s == step)?;
        i.checked_sub(1).map(|j| steps[j])
    }

    /// The plan step a possibly-foreign step maps onto: itself when present,
    /// otherwise the nearest earlier step of the plan.
    pub fn normalize(self, step: Step) -> Step {
        if step.is_terminal() || self.contains(step) {
            return step;
        }
        self.steps()
            .iter()
            .rev()
            .find(|s| **s < step)
            .copied()
            .unwrap_or(Step::Overview)
    }
}

// ---------------------------------------------------------------------------
// BlockKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Steps,
    Ingredients,
    Image,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Steps => "steps",
            BlockKind::Ingredients => "ingredients",
            BlockKind::Image => "image",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockKind {
    type Err = crate::error::CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(BlockKind::Text),
            "steps" => Ok(BlockKind::Steps),
            "ingredients" => Ok(BlockKind::Ingredients),
            "image" => Ok(BlockKind::Image),
            _ => Err(crate::error::CoachError::InvalidBlockKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SaveMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    Draft,
    Publish,
}

impl SaveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveMode::Draft => "draft",
            SaveMode::Publish => "publish",
        }
    }

    pub fn is_draft(self) -> bool {
        self == SaveMode::Draft
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_round_trip() {
        for step in [
            Step::Overview,
            Step::Content,
            Step::Calendar,
            Step::Review,
            Step::Success,
        ] {
            let parsed: Step = step.as_str().parse().unwrap();
            assert_eq!(parsed, step);
        }
        assert!("payment".parse::<Step>().is_err());
    }

    #[test]
    fn fitness_plan_has_calendar() {
        let plan = StepPlan::for_category(Some(Category::Fitness));
        assert_eq!(plan.next(Step::Content), Some(Step::Calendar));
        assert_eq!(plan.previous(Step::Review), Some(Step::Calendar));
        assert_eq!(plan.next(Step::Review), None);
        assert_eq!(plan.previous(Step::Overview), None);
    }

    #[test]
    fn single_plan_skips_calendar() {
        let plan = StepPlan::for_category(Some(Category::Nutrition));
        assert_eq!(plan.next(Step::Content), Some(Step::Review));
        assert!(!plan.contains(Step::Calendar));
        assert_eq!(StepPlan::for_category(None), StepPlan::Single);
    }

    #[test]
    fn normalize_falls_back_to_earlier_step() {
        let plan = StepPlan::Single;
        assert_eq!(plan.normalize(Step::Calendar), Step::Content);
        assert_eq!(plan.normalize(Step::Review), Step::Review);
        assert_eq!(plan.normalize(Step::Success), Step::Success);
    }

    #[test]
    fn category_accepts_aliases() {
        assert_eq!("mental-health".parse::<Category>().unwrap(), Category::Mental);
        assert!("yoga".parse::<Category>().is_err());
    }
}
