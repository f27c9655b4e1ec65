//! Text extraction behind a trait so backends can be swapped without touching
//! the ingestion pipeline. PDFs are extracted in-process; Word documents are
//! delegated to the external extraction service.
//!
//! `AppState` carries an `Arc<dyn TextExtractor>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::ingestion::validate::UploadFile;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts plain text from an uploaded document. `file_url` is the
    /// already-public blob URL, for backends that fetch rather than read
    /// the buffered bytes.
    async fn extract(&self, file: &UploadFile, file_url: &str) -> Result<String, AppError>;
}

/// In-process PDF extraction over the upload buffer.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, file: &UploadFile, _file_url: &str) -> Result<String, AppError> {
        let text = pdf_extract::extract_text_from_mem(&file.bytes)
            .map_err(|e| AppError::Extraction(format!("{}: {e}", file.file_name)))?;
        debug!("Extracted {} chars from {}", text.len(), file.file_name);
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ExtractionRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    text: String,
}

/// Extraction via the external service: POST {url} -> {text}.
pub struct RemoteTextExtractor {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteTextExtractor {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl TextExtractor for RemoteTextExtractor {
    async fn extract(&self, file: &UploadFile, file_url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExtractionRequest { url: file_url })
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("{}: {e}", file.file_name)))?;

        if !response.status().is_success() {
            return Err(AppError::Extraction(format!(
                "{}: extraction service returned {}",
                file.file_name,
                response.status()
            )));
        }

        let body: ExtractionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Extraction(format!("{}: {e}", file.file_name)))?;
        debug!("Remote-extracted {} chars from {}", body.text.len(), file.file_name);
        Ok(body.text)
    }
}

/// Default extractor: routes by document type.
pub struct DocumentExtractor {
    pdf: PdfTextExtractor,
    remote: RemoteTextExtractor,
}

impl DocumentExtractor {
    pub fn new(extraction_api_url: String) -> Self {
        Self {
            pdf: PdfTextExtractor,
            remote: RemoteTextExtractor::new(extraction_api_url),
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, file: &UploadFile, file_url: &str) -> Result<String, AppError> {
        if file.is_pdf() {
            self.pdf.extract(file, file_url).await
        } else {
            self.remote.extract(file, file_url).await
        }
    }
}
