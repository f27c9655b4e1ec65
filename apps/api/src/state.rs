use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::ingestion::extract::TextExtractor;
use crate::ingestion::progress::UploadTracker;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable text extraction. Default: PDF in-process, Word via the
    /// external extraction service.
    pub extractor: Arc<dyn TextExtractor>,
    /// Per-user upload progress and processing sets, reset per batch.
    pub uploads: Arc<UploadTracker>,
}
