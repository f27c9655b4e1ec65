use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::ingestion::parser::parse_resume_text;
use crate::ingestion::progress::UploadSnapshot;
use crate::ingestion::storage::{object_key, public_url, upload_with_progress};
use crate::ingestion::validate::{validate_batch, UploadFile};
use crate::models::resume::{Resume, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IngestBatchResponse {
    pub uploaded: Vec<Resume>,
    pub failed: Vec<FailedUpload>,
}

#[derive(Debug, Serialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

/// POST /api/v1/resumes
///
/// Multipart batch upload. The batch is validated all-or-nothing, then files
/// are processed one at a time in arrival order: upload -> extract -> parse
/// -> persist. A failing file is reported and skipped; it never produces a
/// partial record. Progress state is cleared when the batch ends.
pub async fn handle_upload_batch(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<IngestBatchResponse>, AppError> {
    let files = collect_files(&mut multipart).await?;
    validate_batch(&files)?;

    info!("User {} uploading {} resume file(s)", user.id, files.len());

    let mut uploaded = Vec::new();
    let mut failed = Vec::new();
    for file in &files {
        match process_file(&state, &user, file).await {
            Ok(resume) => uploaded.push(resume),
            Err(e) => {
                warn!("Failed to ingest {}: {e}", file.file_name);
                state.uploads.end_processing(user.id, &file.file_name);
                failed.push(FailedUpload {
                    file_name: file.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    state.uploads.clear(user.id);
    Ok(Json(IngestBatchResponse { uploaded, failed }))
}

async fn collect_files(multipart: &mut Multipart) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue; // non-file form fields are ignored
        };
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {file_name}: {e}")))?;
        files.push(UploadFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

/// One file through the whole pipeline. Upload and record-insert are separate
/// calls with no transactional guarantee; an insert failure after a completed
/// upload leaves an orphaned blob, which is logged for manual reconciliation.
async fn process_file(
    state: &AppState,
    user: &CurrentUser,
    file: &UploadFile,
) -> Result<Resume, AppError> {
    let key = object_key(user.id, &file.file_name);
    let file_url = public_url(&state.config.s3_endpoint, &state.config.s3_bucket, &key);

    state.uploads.set_progress(user.id, &file.file_name, 0);
    upload_with_progress(
        &state.s3,
        &state.config.s3_bucket,
        &key,
        &file.content_type,
        file.bytes.clone(),
        |percent| state.uploads.set_progress(user.id, &file.file_name, percent),
    )
    .await?;

    state.uploads.begin_processing(user.id, &file.file_name);

    let extracted = state.extractor.extract(file, &file_url).await?;
    let parsed = parse_resume_text(&state.llm, &extracted).await?;
    let parsed_json = serde_json::to_value(&parsed)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing parsed resume: {e}")))?;

    let row: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, file_name, file_url, file_size, parsed_data, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, 1)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&file.file_name)
    .bind(&file_url)
    .bind(file.bytes.len() as i64)
    .bind(&parsed_json)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        warn!("Resume insert failed after completed upload; orphaned blob at {key}");
        AppError::Database(e)
    })?;

    state.uploads.end_processing(user.id, &file.file_name);
    info!("Ingested resume {} for user {}", row.id, user.id);
    Ok(Resume::from(row))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    let rows: Vec<ResumeRow> = sqlx::query_as(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(Resume::from).collect()))
}

/// GET /api/v1/resumes/uploads
pub async fn handle_upload_progress(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<UploadSnapshot> {
    Json(state.uploads.snapshot(user.id))
}

/// DELETE /api/v1/resumes/:id
///
/// Irreversible, scoped to the owner. Confirmation is the client's concern.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!("Deleted resume {id} for user {}", user.id);
    Ok(StatusCode::NO_CONTENT)
}
