use std::sync::Arc;

use crate::config::Config;
use crate::normalizer::ExtractionPool;
use crate::screening::fit_scoring::CandidateMatcher;
use crate::screening::registry::JdRegistry;
use crate::screening::summarizer::JdSummarizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Bounded blocking pool for PDF/Word/text extraction.
    pub extraction: ExtractionPool,
    /// Pluggable JD summarizer. Default: KeywordJdSummarizer. Swap via SUMMARIZER_BACKEND.
    pub summarizer: Arc<dyn JdSummarizer>,
    /// Pluggable candidate matcher. Default: KeywordCandidateMatcher.
    pub matcher: Arc<dyn CandidateMatcher>,
    pub registry: JdRegistry,
}
