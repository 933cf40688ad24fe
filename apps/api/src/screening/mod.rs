// JD summarization and CV screening.
// Normalized text comes in from `normalizer`; summaries and fit reports go out.

pub mod fit_scoring;
pub mod handlers;
pub mod jd;
pub mod keywords;
pub mod prompts;
pub mod registry;
pub mod summarizer;
pub mod upload;
