mod config;
mod errors;
mod llm_client;
mod normalizer;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SummarizerBackend};
use crate::llm_client::LlmClient;
use crate::normalizer::ExtractionPool;
use crate::routes::build_router;
use crate::screening::fit_scoring::KeywordCandidateMatcher;
use crate::screening::registry::JdRegistry;
use crate::screening::summarizer::{JdSummarizer, KeywordJdSummarizer, LlmJdSummarizer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    let summarizer = build_summarizer(&config)?;
    info!("JD summarizer backend: {}", summarizer.backend());

    let extraction = ExtractionPool::new(config.extraction_concurrency, config.extraction_timeout);
    info!(
        "Extraction pool: {} concurrent parse(s), {}s timeout, {} byte upload limit",
        config.extraction_concurrency,
        config.extraction_timeout.as_secs(),
        config.max_upload_bytes
    );

    let state = AppState {
        config: config.clone(),
        extraction,
        summarizer,
        matcher: Arc::new(KeywordCandidateMatcher),
        registry: JdRegistry::default(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict allowed origins once the frontend host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_summarizer(config: &Config) -> Result<Arc<dyn JdSummarizer>> {
    match config.summarizer_backend {
        SummarizerBackend::Keyword => Ok(Arc::new(KeywordJdSummarizer)),
        SummarizerBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))?;
            let llm = LlmClient::new(api_key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmJdSummarizer::new(llm)))
        }
    }
}
