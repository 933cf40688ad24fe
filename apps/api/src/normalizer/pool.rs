use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tracing::{error, warn};

use super::{normalize, ExtractError, ExtractionFailure, MediaType, NormalizedText, UploadedDocument};

/// Runs normalization off the async runtime: parses go to the blocking pool, at most
/// `max_concurrent` at a time. `timeout` covers the wait for a slot plus the parse.
#[derive(Clone)]
pub struct ExtractionPool {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl ExtractionPool {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub async fn normalize(
        &self,
        document: UploadedDocument,
    ) -> Result<NormalizedText, ExtractionFailure> {
        // Fast-reject path: no permit, no blocking task, content untouched.
        if MediaType::from_declared(&document.declared_media_type).is_none() {
            return normalize(&document);
        }

        let filename = document.filename.clone();
        self.run(&filename, move || normalize(&document)).await
    }

    async fn run<F>(&self, filename: &str, work: F) -> Result<NormalizedText, ExtractionFailure>
    where
        F: FnOnce() -> Result<NormalizedText, ExtractionFailure> + Send + 'static,
    {
        let deadline = Instant::now() + self.timeout;

        let permit = match timeout_at(deadline, self.permits.clone().acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(closed)) => return Err(ExtractError::Worker(closed.to_string()).into()),
            Err(_) => {
                warn!(
                    filename = %filename,
                    timeout_secs = self.timeout.as_secs_f32(),
                    "No extraction slot freed up before the deadline"
                );
                return Err(ExtractError::TimedOut(self.timeout).into());
            }
        };

        // The permit moves into the task: a parse that outlives its deadline keeps its slot.
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        });

        match timeout_at(deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!(filename = %filename, error = %join_error, "Extraction worker failed");
                Err(ExtractError::Worker(join_error.to_string()).into())
            }
            Err(_) => {
                warn!(
                    filename = %filename,
                    timeout_secs = self.timeout.as_secs_f32(),
                    "Extraction timed out"
                );
                Err(ExtractError::TimedOut(self.timeout).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::errors::document_status;
    use crate::normalizer::FailureKind;

    fn pool() -> ExtractionPool {
        ExtractionPool::new(2, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_pool_normalizes_plain_text() {
        let doc = UploadedDocument::new("jd.txt", "text/plain", "  Staff Engineer  ");
        let text = pool().normalize(doc).await.unwrap();
        assert_eq!(text.as_str(), "Staff Engineer");
    }

    #[tokio::test]
    async fn test_pool_rejects_unsupported_type() {
        let doc = UploadedDocument::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let err = pool().normalize(doc).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnsupportedType);
    }

    #[tokio::test]
    async fn test_pool_classifies_corrupt_pdf() {
        let doc = UploadedDocument::new("cv.pdf", "application/pdf", "%PDF-1.4 not really");
        let err = pool().normalize(doc).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ExtractionError);
    }

    #[tokio::test]
    async fn test_pool_handles_concurrent_documents() {
        let pool = ExtractionPool::new(1, Duration::from_secs(10));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let doc =
                        UploadedDocument::new(format!("cv-{i}.txt"), "text/plain", format!("cv {i}"));
                    pool.normalize(doc).await
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let text = handle.await.unwrap().unwrap();
            assert_eq!(text.as_str(), format!("cv {i}"));
        }
    }

    #[tokio::test]
    async fn test_slow_parse_times_out_as_unavailable() {
        let pool = ExtractionPool::new(1, Duration::from_millis(50));
        let err = pool
            .run("slow.pdf", || {
                std::thread::sleep(Duration::from_millis(300));
                Ok(NormalizedText::new("too late").unwrap())
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExtractionFailure::Extraction(ExtractError::TimedOut(Duration::from_millis(50)))
        );
        assert_eq!(err.kind(), FailureKind::ExtractionError);
        assert_eq!(
            document_status(&err),
            (StatusCode::SERVICE_UNAVAILABLE, "EXTRACTION_UNAVAILABLE")
        );
        // The abandoned parse still holds its slot.
        assert_eq!(pool.permits.available_permits(), 0);
    }

    #[tokio::test]
    async fn test_wait_for_slot_is_bounded_by_timeout() {
        let pool = ExtractionPool::new(1, Duration::from_millis(100));
        let _held = pool.permits.clone().acquire_owned().await.unwrap();

        let doc = UploadedDocument::new("cv.txt", "text/plain", "Rust");
        let outcome = tokio::time::timeout(Duration::from_secs(2), pool.normalize(doc))
            .await
            .expect("normalize must give up once the deadline passes");

        let err = outcome.unwrap_err();
        assert!(matches!(
            err,
            ExtractionFailure::Extraction(ExtractError::TimedOut(_))
        ));
        assert_eq!(document_status(&err).0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_slot_frees_up_within_deadline() {
        let pool = ExtractionPool::new(1, Duration::from_secs(5));
        let held = pool.permits.clone().acquire_owned().await.unwrap();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(held);
        });

        let doc = UploadedDocument::new("cv.txt", "text/plain", "Rust");
        assert_eq!(pool.normalize(doc).await.unwrap().as_str(), "Rust");
    }

    #[tokio::test]
    async fn test_worker_panic_is_unavailable() {
        let pool = pool();
        let err = pool
            .run("cv.docx", || panic!("worker blew up"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExtractionFailure::Extraction(ExtractError::Worker(_))
        ));
        assert_eq!(document_status(&err).0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(pool.permits.available_permits(), 2);
    }
}
