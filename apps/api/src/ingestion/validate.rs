use bytes::Bytes;

use crate::errors::AppError;

/// 10MB per file.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Accepted resume document types: PDF, DOC, DOCX.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// One file received in an upload batch, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn is_acceptable(&self) -> bool {
        ACCEPTED_MIME_TYPES.contains(&self.content_type.as_str())
            && self.bytes.len() <= MAX_FILE_SIZE
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }
}

/// All-or-nothing batch validation: if any single file has a bad type or
/// size, the whole batch is rejected before anything is uploaded.
pub fn validate_batch(files: &[UploadFile]) -> Result<(), AppError> {
    if files.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }
    if files.iter().all(UploadFile::is_acceptable) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Please upload only PDF or Word documents under 10MB".to_string(),
        ))
    }
}
