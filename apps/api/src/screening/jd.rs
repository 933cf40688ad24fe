//! JD summary model: the structured view of a job description that candidates are matched against.

use serde::{Deserialize, Serialize};

/// Detected tone of a job description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JdTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// A single requirement extracted from the JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub text: String,
    pub is_required: bool,
}

/// High-level signals about the role shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSignals {
    pub is_startup: bool,
    pub is_ic_focused: bool,
    pub is_research: bool,
    pub seniority: String,
}

/// A single keyword from the JD, weighted by position and frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, frequency: u32, position_weight: f32) -> Self {
        Self {
            keyword: keyword.into(),
            frequency,
            position_weight,
            weighted_score: frequency as f32 * position_weight,
        }
    }
}

/// Full structured summary of a job description. Returned to clients as `jd_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdSummary {
    pub hard_requirements: Vec<Requirement>,
    pub soft_signals: Vec<String>,
    pub role_signals: RoleSignals,
    pub keyword_inventory: Vec<KeywordEntry>,
    pub detected_tone: JdTone,
}
