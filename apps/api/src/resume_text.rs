//! Résumé text extraction: the PDF-to-text collaborator.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Invalid PDF file: {0}")]
    Unreadable(String),

    #[error("PDF extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait ResumeTextExtractor: Send + Sync {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, PdfError>;
}

/// `pdf-extract` over in-memory bytes. Parsing is CPU-bound, so it runs on the blocking pool.
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ResumeTextExtractor for PdfTextExtractor {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, PdfError> {
        run_bounded(self.timeout, move || {
            pdf_extract::extract_text_from_mem(&pdf)
                .map_err(|e| PdfError::Unreadable(e.to_string()))
        })
        .await
    }
}

/// Runs `extract` on the blocking pool and gives up after `timeout`.
/// A stalled parse keeps its blocking thread until it finishes, but the caller is released.
async fn run_bounded<F>(timeout: Duration, extract: F) -> Result<String, PdfError>
where
    F: FnOnce() -> Result<String, PdfError> + Send + 'static,
{
    tokio::time::timeout(timeout, tokio::task::spawn_blocking(extract))
        .await
        .map_err(|_| PdfError::Timeout(timeout))??
}
