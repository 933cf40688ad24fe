//! JD summarization: pluggable and trait-based. Turns normalized JD text into a `JdSummary`.
//!
//! Default: `KeywordJdSummarizer`, which runs locally without network access.
//! Optional: `LlmJdSummarizer` (Claude), selected with `SUMMARIZER_BACKEND=llm`.
//!
//! `AppState` holds an `Arc<dyn JdSummarizer>`, chosen at startup from config.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::screening::jd::{JdSummary, JdTone, KeywordEntry, Requirement, RoleSignals};
use crate::screening::keywords::{padded_token_stream, significant_tokens, tokenize};
use crate::screening::prompts::{JD_SUMMARY_PROMPT_TEMPLATE, JD_SUMMARY_SYSTEM};

const MAX_KEYWORDS: usize = 25;

#[async_trait]
pub trait JdSummarizer: Send + Sync {
    async fn summarize(&self, jd_text: &str) -> Result<JdSummary, AppError>;

    /// "keyword" | "llm", logged at startup.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJdSummarizer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJdSummarizer {
    llm: LlmClient,
}

impl LlmJdSummarizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JdSummarizer for LlmJdSummarizer {
    async fn summarize(&self, jd_text: &str) -> Result<JdSummary, AppError> {
        let prompt = JD_SUMMARY_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
        let mut summary: JdSummary = self
            .llm
            .call_json(&prompt, JD_SUMMARY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("JD summarization failed: {e}")))?;

        // The model's arithmetic is not trusted.
        for entry in &mut summary.keyword_inventory {
            entry.weighted_score = entry.frequency as f32 * entry.position_weight;
        }
        Ok(summary)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordJdSummarizer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic summarizer driven by section headings and cue words.
///
/// 1. The first non-empty line is the title (weight 1.0).
/// 2. Headings such as `Requirements:` or `About us` switch the current section and
///    its position weight for the lines that follow.
/// 3. Significant tokens are counted; each keeps the highest weight it was seen under.
/// 4. Requirement-section lines become hard requirements, nice-to-have lines soft signals.
pub struct KeywordJdSummarizer;

#[async_trait]
impl JdSummarizer for KeywordJdSummarizer {
    async fn summarize(&self, jd_text: &str) -> Result<JdSummary, AppError> {
        Ok(summarize_keywords(jd_text))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Requirements,
    Preferred,
    Responsibilities,
    About,
}

impl Section {
    fn position_weight(self) -> f32 {
        match self {
            Section::Title => 1.0,
            Section::Requirements => 0.8,
            Section::Preferred | Section::Responsibilities => 0.6,
            Section::About => 0.3,
        }
    }

    fn from_heading(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("about") || label.contains("who we are") || label.contains("company") {
            Some(Section::About)
        } else if ["nice to have", "preferred", "bonus", "desirable"]
            .iter()
            .any(|cue| label.contains(cue))
        {
            Some(Section::Preferred)
        } else if [
            "requirement",
            "required",
            "qualification",
            "must have",
            "what you bring",
            "you need",
            "you have",
        ]
        .iter()
        .any(|cue| label.contains(cue))
        {
            Some(Section::Requirements)
        } else if [
            "responsibilit",
            "you will",
            "you'll",
            "what you do",
            "the role",
            "duties",
        ]
        .iter()
        .any(|cue| label.contains(cue))
        {
            Some(Section::Responsibilities)
        } else {
            None
        }
    }
}

const HARD_CUES: &[&str] = &["required", "must have", "must be", "minimum", "you need", "you will need"];
const SOFT_CUES: &[&str] = &["preferred", "nice to have", "bonus", "a plus", "desirable"];

const STARTUP_CUES: &[&str] = &[
    "startup", "start-up", "series a", "series b", "series c", "seed stage", "early-stage",
    "fast-paced",
];
const RESEARCH_CUES: &[&str] = &["research", "phd", "publish", "publications", "neurips", "icml"];
const MANAGER_CUES: &[&str] = &[
    "manage a team", "people management", "direct reports", "managing engineers", "lead a team of",
];

/// (token phrase, seniority label), most senior first.
const SENIORITY_CUES: &[(&str, &str)] = &[
    ("principal", "principal"),
    ("staff", "staff"),
    ("director", "director"),
    ("head of", "director"),
    ("senior", "senior"),
    ("sr", "senior"),
    ("lead", "senior"),
    ("mid level", "mid"),
    ("intermediate", "mid"),
    ("junior", "junior"),
    ("graduate", "junior"),
    ("intern", "junior"),
];

/// Token prefixes per tone.
const TONE_CUES: &[(JdTone, &[&str])] = &[
    (JdTone::CollaborativeEnterprise, &["partner", "collaborat", "contribut", "support"]),
    (JdTone::AggressiveStartup, &["own", "driv", "spearhead", "disrupt", "fast"]),
    (JdTone::ResearchOriented, &["investigat", "publish", "publication", "evaluat", "propos", "research"]),
    (JdTone::ProductOriented, &["ship", "launch", "deliver", "customer", "user"]),
];

pub(crate) fn summarize_keywords(jd_text: &str) -> JdSummary {
    let mut counts: HashMap<String, (u32, f32)> = HashMap::new();
    let mut hard_requirements = Vec::new();
    let mut soft_signals = Vec::new();
    let mut title = "";
    let mut section = Section::Title;

    for line in jd_text.lines() {
        let line = strip_bullet(line);
        if line.is_empty() {
            continue;
        }

        let content = if section == Section::Title && title.is_empty() {
            title = line;
            line
        } else {
            match split_heading(line) {
                Some((next, rest)) => {
                    section = next;
                    rest
                }
                None => {
                    if section == Section::Title {
                        section = Section::Responsibilities;
                    }
                    line
                }
            }
        };
        if content.is_empty() {
            continue;
        }

        let weight = section.position_weight();
        for token in significant_tokens(content) {
            let slot = counts.entry(token).or_insert((0, weight));
            slot.0 += 1;
            slot.1 = slot.1.max(weight);
        }

        if section == Section::Title {
            continue;
        }
        let lower = content.to_lowercase();
        if section == Section::Preferred || SOFT_CUES.iter().any(|cue| lower.contains(cue)) {
            soft_signals.push(content.to_string());
        } else if section == Section::Requirements || HARD_CUES.iter().any(|cue| lower.contains(cue)) {
            hard_requirements.push(Requirement {
                text: content.to_string(),
                is_required: true,
            });
        }
    }

    let mut keyword_inventory: Vec<KeywordEntry> = counts
        .into_iter()
        .map(|(keyword, (frequency, weight))| KeywordEntry::new(keyword, frequency, weight))
        .collect();
    keyword_inventory.sort_by(|a, b| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keyword_inventory.truncate(MAX_KEYWORDS);

    JdSummary {
        hard_requirements,
        soft_signals,
        role_signals: detect_role_signals(jd_text, title),
        keyword_inventory,
        detected_tone: detect_tone(jd_text),
    }
}

/// Strips list markers (`-`, `*`, `•`, `1.`) and surrounding whitespace.
fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(['-', '*', '•', '·', '–']);
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let numbered = digits > 0
        && line[digits..].starts_with(['.', ')'])
        && line[digits + 1..].starts_with(char::is_whitespace);
    let line = if numbered {
        &line[digits + 1..]
    } else {
        line
    };
    line.trim()
}

/// Recognizes `Heading` and `Heading: inline content` lines. Labels longer than five
/// words are treated as prose.
fn split_heading(line: &str) -> Option<(Section, &str)> {
    let (label, rest) = match line.split_once(':') {
        Some((label, rest)) => (label, rest.trim()),
        None => (line, ""),
    };
    if label.split_whitespace().count() > 5 {
        return None;
    }
    // Without a colon only short lines qualify, otherwise "You will need Rust" is a heading.
    if rest.is_empty() && !line.ends_with(':') && label.split_whitespace().count() > 3 {
        return None;
    }
    Section::from_heading(label).map(|section| (section, rest))
}

fn detect_role_signals(jd_text: &str, title: &str) -> RoleSignals {
    let lower = jd_text.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| lower.contains(cue));

    RoleSignals {
        is_startup: has_any(STARTUP_CUES),
        is_ic_focused: !has_any(MANAGER_CUES),
        is_research: has_any(RESEARCH_CUES),
        seniority: detect_seniority(title)
            .or_else(|| detect_seniority(jd_text))
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn detect_seniority(text: &str) -> Option<&'static str> {
    let stream = padded_token_stream(text);
    SENIORITY_CUES
        .iter()
        .find(|(phrase, _)| stream.contains(&format!(" {phrase} ")))
        .map(|(_, label)| *label)
}

/// Highest cue count wins; ties and zero fall back to `CollaborativeEnterprise`.
fn detect_tone(jd_text: &str) -> JdTone {
    let tokens = tokenize(jd_text);
    let mut best = (JdTone::default(), 0usize);
    for (tone, prefixes) in TONE_CUES {
        let count = tokens
            .iter()
            .filter(|token| prefixes.iter().any(|p| token.starts_with(p)))
            .count();
        if count > best.1 {
            best = (*tone, count);
        }
    }
    best.0
}
