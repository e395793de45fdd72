use crate::artifacts::classify::classifier::{ChangeType, RelevanceVerdict};
use serde::Serialize;

/// Above this many changed lines a plain modification is worth a porting task
pub const SIGNIFICANT_CHANGE_LINES: usize = 50;

/// Whether a change deserves a porting task, judged from its verdict alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecommendation {
    pub create_task: bool,
    pub reason: String,
}

impl PortRecommendation {
    fn new(create_task: bool, reason: impl Into<String>) -> Self {
        PortRecommendation {
            create_task,
            reason: reason.into(),
        }
    }

    pub fn recommend(verdict: &RelevanceVerdict) -> Self {
        if !verdict.relevant {
            return Self::new(false, verdict.reason.clone());
        }

        let has_keywords = !verdict.relevant_keywords.is_empty();
        match verdict.change_type {
            Some(
                change_type @ (ChangeType::ApiChange
                | ChangeType::FunctionalityAdded
                | ChangeType::ModelAdded
                | ChangeType::FeatureAdded),
            ) => Self::new(true, format!("{change_type} needs porting")),
            Some(ChangeType::Refactor) if has_keywords => {
                Self::new(true, "refactor touching the public surface")
            }
            Some(ChangeType::Refactor) => Self::new(false, "internal refactor"),
            Some(ChangeType::Modification) if verdict.changed_lines() > SIGNIFICANT_CHANGE_LINES => {
                Self::new(
                    true,
                    format!("significant change (>{SIGNIFICANT_CHANGE_LINES} lines)"),
                )
            }
            Some(ChangeType::Modification) if has_keywords => {
                Self::new(true, "modification with portable keywords")
            }
            Some(ChangeType::Modification) => Self::new(false, "minor change, review manually"),
            None => Self::new(false, "change was not classified"),
        }
    }
}
