use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which `JdSummarizer` backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerBackend {
    Keyword,
    Llm,
}

impl FromStr for SummarizerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(SummarizerBackend::Keyword),
            "llm" => Ok(SummarizerBackend::Llm),
            other => bail!("SUMMARIZER_BACKEND must be 'keyword' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub summarizer_backend: SummarizerBackend,
    pub anthropic_api_key: Option<String>,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
    pub extraction_timeout: Duration,
    pub extraction_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            summarizer_backend: parse_env("SUMMARIZER_BACKEND", SummarizerBackend::Keyword)?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            extraction_timeout: Duration::from_secs(parse_env("EXTRACTION_TIMEOUT_SECS", 30)?),
            extraction_concurrency: parse_env("EXTRACTION_CONCURRENCY", 4)?,
        };

        if config.summarizer_backend == SummarizerBackend::Llm && config.anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when SUMMARIZER_BACKEND=llm");
        }
        if config.extraction_concurrency == 0 {
            bail!("EXTRACTION_CONCURRENCY must be at least 1");
        }

        Ok(config)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("keyword".parse::<SummarizerBackend>().unwrap(), SummarizerBackend::Keyword);
        assert_eq!(" LLM ".parse::<SummarizerBackend>().unwrap(), SummarizerBackend::Llm);
        assert!("gpt".parse::<SummarizerBackend>().is_err());
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u16 = parse_env("SHORTLIST_TEST_UNSET_VARIABLE", 8000).unwrap();
        assert_eq!(value, 8000);
    }
}
