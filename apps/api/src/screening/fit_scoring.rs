//! Candidate fit scoring: a pluggable, trait-based matcher that compares normalized CV text
//! against a JD summary and ranks the candidates.
//!
//! Default: `KeywordCandidateMatcher` (pure-Rust, fast, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn CandidateMatcher>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::screening::jd::{JdSummary, Requirement};
use crate::screening::keywords::{padded_token_stream, significant_tokens, tokenize};

const EVIDENCE_MAX_CHARS: usize = 160;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A CV that passed normalization.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub filename: String,
    pub text: String,
}

/// A JD keyword found in the CV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitMatch {
    pub keyword: String,
    /// The CV line the keyword was found on.
    pub evidence: String,
    pub strength: f32, // 0.0 – 1.0
}

/// A JD keyword the CV does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub keyword: String,
    pub jd_frequency: u32,
    /// A related CV term (shared stem), if any.
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementCheck {
    pub requirement: String,
    pub satisfied: bool,
    pub matched_terms: Vec<String>,
}

/// Fit of one candidate against one JD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub overall_score: u32,             // 0 – 100
    pub strong_matches: Vec<FitMatch>,  // strength ≥ 0.8
    pub partial_matches: Vec<FitMatch>, // 0.4 – 0.79
    pub gaps: Vec<Gap>,                 // strength < 0.4
    pub requirements: Vec<RequirementCheck>,
    pub recommendation: String,
    pub scorer_backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFit {
    /// 1-based position after ranking.
    pub rank: usize,
    pub filename: String,
    pub fit_report: FitReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Swap matcher backends without touching the handler.
#[async_trait]
pub trait CandidateMatcher: Send + Sync {
    /// Scores every candidate and returns them best first.
    async fn rank(
        &self,
        jd: &JdSummary,
        candidates: &[Candidate],
    ) -> Result<Vec<CandidateFit>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordCandidateMatcher
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. For each keyword in `JdSummary.keyword_inventory`:
///    - whole token / whole phrase in the CV → strength 1.0
///    - substring of the CV text → strength 0.6
///    - no match → strength 0.0
/// 2. overall_score = Σ(strength × weighted_score) / Σ(weighted_score) × 100
/// 3. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)
/// 4. Rank by overall_score, ties keep upload order.
pub struct KeywordCandidateMatcher;

#[async_trait]
impl CandidateMatcher for KeywordCandidateMatcher {
    async fn rank(
        &self,
        jd: &JdSummary,
        candidates: &[Candidate],
    ) -> Result<Vec<CandidateFit>, AppError> {
        Ok(rank_candidates(jd, candidates))
    }
}

fn rank_candidates(jd: &JdSummary, candidates: &[Candidate]) -> Vec<CandidateFit> {
    let mut scored: Vec<(String, FitReport)> = candidates
        .iter()
        .map(|c| (c.filename.clone(), compute_keyword_fit(&c.text, jd)))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.1.overall_score.cmp(&a.1.overall_score));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (filename, fit_report))| CandidateFit {
            rank: i + 1,
            filename,
            fit_report,
        })
        .collect()
}

fn compute_keyword_fit(cv_text: &str, jd: &JdSummary) -> FitReport {
    let stream = padded_token_stream(cv_text);
    let cv_lower = cv_text.to_lowercase();
    let requirements = check_requirements(&stream, &jd.hard_requirements);

    let keywords = &jd.keyword_inventory;
    if keywords.is_empty() {
        return FitReport {
            overall_score: 0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            requirements,
            recommendation: "No keywords found in JD — cannot score fit.".to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;

    for kw_entry in keywords {
        let phrase = tokenize(&kw_entry.keyword).join(" ");
        if phrase.is_empty() {
            continue;
        }
        total_weighted += kw_entry.weighted_score;

        let keyword_lower = kw_entry.keyword.to_lowercase();
        let strength = if stream.contains(&format!(" {phrase} ")) {
            1.0
        } else if cv_lower.contains(&keyword_lower) || cv_lower.contains(&phrase) {
            0.6
        } else {
            0.0
        };

        total_score += strength * kw_entry.weighted_score;

        if strength >= 0.4 {
            let fit_match = FitMatch {
                keyword: kw_entry.keyword.clone(),
                evidence: find_evidence(cv_text, &phrase),
                strength,
            };
            if strength >= 0.8 {
                strong_matches.push(fit_match);
            } else {
                partial_matches.push(fit_match);
            }
        } else {
            gaps.push(Gap {
                keyword: kw_entry.keyword.clone(),
                jd_frequency: kw_entry.frequency,
                suggestion: find_related_term(&stream, &phrase),
            });
        }
    }

    let overall_score = if total_weighted > 0.0 {
        ((total_score / total_weighted) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    let recommendation = build_recommendation(overall_score, &gaps);

    FitReport {
        overall_score,
        strong_matches,
        partial_matches,
        gaps,
        requirements,
        recommendation,
        scorer_backend: "keyword".to_string(),
    }
}

/// A requirement is satisfied when at least half of its significant terms appear in the CV.
fn check_requirements(stream: &str, requirements: &[Requirement]) -> Vec<RequirementCheck> {
    requirements
        .iter()
        .filter_map(|req| {
            let mut terms = significant_tokens(&req.text);
            terms.sort();
            terms.dedup();
            if terms.is_empty() {
                return None;
            }
            let matched_terms: Vec<String> = terms
                .iter()
                .filter(|t| stream.contains(&format!(" {t} ")))
                .cloned()
                .collect();
            Some(RequirementCheck {
                requirement: req.text.clone(),
                satisfied: matched_terms.len() * 2 >= terms.len(),
                matched_terms,
            })
        })
        .collect()
}

/// First CV line mentioning the phrase's first token, trimmed and shortened.
fn find_evidence(cv_text: &str, phrase: &str) -> String {
    let needle = phrase.split(' ').next().unwrap_or(phrase);
    cv_text
        .lines()
        .map(str::trim)
        .find(|line| line.to_lowercase().contains(needle))
        .map(|line| line.chars().take(EVIDENCE_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// A CV token sharing a four-character stem with the keyword (`kubectl` for `kubernetes`).
fn find_related_term(stream: &str, phrase: &str) -> Option<String> {
    let stem: String = phrase.chars().take(4).collect();
    if stem.chars().count() < 4 {
        return None;
    }
    stream
        .split(' ')
        .find(|token| token.starts_with(&stem))
        .map(str::to_string)
}

/// Builds a human-readable recommendation string from score and gaps.
fn build_recommendation(score: u32, gaps: &[Gap]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        "Strong fit. The candidate directly covers the key JD requirements.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate fit ({score}/100). Probe in interview for: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::jd::{JdTone, KeywordEntry, RoleSignals};

    fn make_jd(keywords: Vec<(&str, u32, f32)>, requirements: Vec<&str>) -> JdSummary {
        JdSummary {
            hard_requirements: requirements
                .into_iter()
                .map(|text| Requirement {
                    text: text.to_string(),
                    is_required: true,
                })
                .collect(),
            soft_signals: vec![],
            role_signals: RoleSignals {
                is_startup: false,
                is_ic_focused: true,
                is_research: false,
                seniority: "senior".to_string(),
            },
            keyword_inventory: keywords
                .into_iter()
                .map(|(kw, freq, pw)| KeywordEntry::new(kw, freq, pw))
                .collect(),
            detected_tone: JdTone::CollaborativeEnterprise,
        }
    }

    fn candidate(filename: &str, text: &str) -> Candidate {
        Candidate {
            filename: filename.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_whole_token_match_scores_strong() {
        let jd = make_jd(vec![("Rust", 5, 0.8), ("distributed systems", 3, 0.6)], vec![]);
        let report = compute_keyword_fit(
            "Jane Doe\nBuilt distributed systems in Rust for 6 years",
            &jd,
        );
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.strong_matches.len(), 2);
        assert!(report.gaps.is_empty());
        assert_eq!(
            report.strong_matches[0].evidence,
            "Built distributed systems in Rust for 6 years"
        );
    }

    #[test]
    fn test_substring_match_scores_partial() {
        let jd = make_jd(vec![("kubernetes", 3, 0.8)], vec![]);
        let report = compute_keyword_fit("Operated KubernetesOperators in production", &jd);
        assert_eq!(report.partial_matches.len(), 1);
        assert_eq!(report.strong_matches.len(), 0);
        assert!((report.partial_matches[0].strength - 0.6).abs() < f32::EPSILON);
        assert_eq!(report.overall_score, 60);
    }

    #[test]
    fn test_no_match_creates_gap_with_suggestion() {
        let jd = make_jd(vec![("kubernetes", 5, 0.8)], vec![]);
        let report = compute_keyword_fit("Daily kubectl and helm usage", &jd);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].jd_frequency, 5);
        assert_eq!(report.gaps[0].suggestion.as_deref(), Some("kubectl"));
    }

    #[test]
    fn test_empty_keywords_returns_zero_score() {
        let report = compute_keyword_fit("Anything", &make_jd(vec![], vec![]));
        assert_eq!(report.overall_score, 0);
        assert!(report.strong_matches.is_empty());
        assert!(report.gaps.is_empty());
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[test]
    fn test_overall_score_is_weighted() {
        // rust: 10 * 1.0 matched, java: 10 * 1.0 missing → 50
        let jd = make_jd(vec![("rust", 10, 1.0), ("java", 10, 1.0)], vec![]);
        let report = compute_keyword_fit("Rust developer", &jd);
        assert_eq!(report.overall_score, 50);
    }

    #[test]
    fn test_token_match_does_not_fire_inside_words() {
        // "go" must not count as a whole token inside "google"
        let jd = make_jd(vec![("go", 1, 1.0)], vec![]);
        let report = compute_keyword_fit("Worked at Google", &jd);
        assert!(report.strong_matches.is_empty());
    }

    #[test]
    fn test_requirement_coverage() {
        let jd = make_jd(
            vec![("rust", 1, 1.0)],
            vec!["5+ years Rust required", "Kafka and Flink streaming"],
        );
        let report = compute_keyword_fit("Rust engineer, some Kafka", &jd);
        assert_eq!(report.requirements.len(), 2);
        assert!(report.requirements[0].satisfied);
        assert_eq!(report.requirements[0].matched_terms, vec!["rust"]);
        // kafka 1 of 3 terms (flink, kafka, streaming)
        assert!(!report.requirements[1].satisfied);
    }

    #[test]
    fn test_candidates_ranked_by_score_stable_on_ties() {
        let jd = make_jd(vec![("rust", 1, 1.0), ("sql", 1, 1.0)], vec![]);
        let ranked = rank_candidates(
            &jd,
            &[
                candidate("a.txt", "Python"),
                candidate("b.txt", "Rust and SQL"),
                candidate("c.txt", "Python too"),
                candidate("d.txt", "Rust only"),
            ],
        );
        let order: Vec<_> = ranked.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(order, vec!["b.txt", "d.txt", "a.txt", "c.txt"]);
        let ranks: Vec<_> = ranked.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_evidence_is_truncated() {
        let long_line = format!("Rust {}", "x".repeat(500));
        let evidence = find_evidence(&long_line, "rust");
        assert_eq!(evidence.chars().count(), EVIDENCE_MAX_CHARS);
    }

    #[test]
    fn test_recommendation_high_score() {
        assert!(build_recommendation(85, &[]).contains("Strong fit"));
    }

    #[test]
    fn test_recommendation_moderate_score_lists_gaps() {
        let gaps = vec![Gap {
            keyword: "Kafka".to_string(),
            jd_frequency: 3,
            suggestion: None,
        }];
        let rec = build_recommendation(65, &gaps);
        assert!(rec.contains("Kafka"));
        assert!(rec.contains("65"));
    }

    #[test]
    fn test_recommendation_low_score() {
        let gaps = vec![Gap {
            keyword: "Rust".to_string(),
            jd_frequency: 5,
            suggestion: None,
        }];
        let rec = build_recommendation(30, &gaps);
        assert!(rec.contains("30"));
        assert!(rec.contains("Rust"));
    }

    #[tokio::test]
    async fn test_keyword_matcher_via_trait() {
        let matcher: Box<dyn CandidateMatcher> = Box::new(KeywordCandidateMatcher);
        let jd = make_jd(vec![("rust", 1, 1.0)], vec![]);
        let ranked = matcher
            .rank(&jd, &[candidate("cv.txt", "Rust")])
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].fit_report.overall_score, 100);
    }
}
