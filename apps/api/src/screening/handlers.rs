//! Axum route handlers for JD processing and CV screening.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::normalizer::FailureKind;
use crate::screening::fit_scoring::{Candidate, CandidateFit};
use crate::screening::jd::JdSummary;
use crate::screening::registry::StoredJd;
use crate::screening::upload::read_uploads;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProcessJdResponse {
    pub jd_data: JdSummary,
    pub jd_id: i64,
}

/// A CV that could not be normalized. The batch carries on without it.
#[derive(Debug, Serialize)]
pub struct RejectedUpload {
    pub filename: String,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessCvsResponse {
    pub jd_id: i64,
    pub candidates: Vec<CandidateFit>,
    pub rejected: Vec<RejectedUpload>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /process-jd/
///
/// Multipart field `file`: one JD document. Normalize → summarize → register.
pub async fn handle_process_jd(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessJdResponse>, AppError> {
    let mut uploads = read_uploads(&mut multipart, "file").await?;
    let document = match uploads.len() {
        0 => return Err(AppError::Validation("No file uploaded in field 'file'".to_string())),
        1 => uploads.remove(0),
        n => {
            return Err(AppError::Validation(format!(
                "Expected one job description file, got {n}"
            )))
        }
    };

    let text = state.extraction.normalize(document).await?;
    let jd_data = state.summarizer.summarize(text.as_str()).await?;
    let jd_id = state.registry.insert(jd_data.clone()).await;

    info!("Processed JD ID: {jd_id}");
    Ok(Json(ProcessJdResponse { jd_data, jd_id }))
}

/// POST /process-cvs/:jd_id
///
/// Multipart field `files`: one or more CVs. Each CV is normalized independently;
/// failures are reported per file and the rest are ranked against the JD.
pub async fn handle_process_cvs(
    State(state): State<AppState>,
    Path(jd_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ProcessCvsResponse>, AppError> {
    let stored = state
        .registry
        .get(jd_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job description {jd_id} not found")))?;

    let uploads = read_uploads(&mut multipart, "files").await?;
    if uploads.is_empty() {
        return Err(AppError::Validation(
            "No files uploaded in field 'files'".to_string(),
        ));
    }
    info!("Processing {} CV(s) for JD ID: {jd_id}", uploads.len());

    // Spawned in upload order and awaited in the same order.
    let tasks: Vec<_> = uploads
        .into_iter()
        .map(|document| {
            let pool = state.extraction.clone();
            let filename = document.filename.clone();
            (filename, tokio::spawn(async move { pool.normalize(document).await }))
        })
        .collect();

    let mut candidates = Vec::new();
    let mut rejected = Vec::new();
    for (filename, task) in tasks {
        let outcome = task
            .await
            .map_err(|e| AppError::Internal(anyhow!("CV extraction task failed: {e}")))?;
        match outcome {
            Ok(text) => candidates.push(Candidate {
                filename,
                text: text.into_string(),
            }),
            Err(failure) => rejected.push(RejectedUpload {
                filename,
                kind: failure.kind(),
                message: failure.user_message(),
            }),
        }
    }

    let ranked = if candidates.is_empty() {
        Vec::new()
    } else {
        state.matcher.rank(&stored.summary, &candidates).await?
    };

    info!(
        "Ranked {} CV(s) for JD ID: {jd_id}, {} rejected",
        ranked.len(),
        rejected.len()
    );
    Ok(Json(ProcessCvsResponse {
        jd_id,
        candidates: ranked,
        rejected,
    }))
}

/// GET /jd/:jd_id
pub async fn handle_get_jd(
    State(state): State<AppState>,
    Path(jd_id): Path<i64>,
) -> Result<Json<StoredJd>, AppError> {
    state
        .registry
        .get(jd_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job description {jd_id} not found")))
}
