use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::optimization::JobOptimizationRow;
use crate::models::resume::ResumeRow;
use crate::optimizer::pipeline::{self, OptimizationResult};
use crate::optimizer::prompts::{EXPORT_PROMPT_TEMPLATE, EXPORT_SYSTEM};
use crate::slug::export_filename;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_id: Uuid,
    pub job_title: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub id: Uuid,
    pub result: OptimizationResult,
}

/// POST /api/v1/optimizations
///
/// Runs the pipeline as a saga: the record is inserted with the phase-1
/// analysis before phase 2 runs, then updated once with the combined result.
/// A phase-2 failure therefore leaves the analysis on disk instead of
/// discarding it.
pub async fn handle_optimize(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if req.job_title.trim().is_empty() {
        return Err(AppError::Validation("Job title must not be empty".into()));
    }
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description must not be empty".into(),
        ));
    }

    let row: Option<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(req.resume_id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;
    let resume = crate::models::resume::Resume::from(
        row.ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?,
    );
    let parsed = resume.parsed_data.ok_or_else(|| {
        AppError::Validation("Resume has no parsed content to optimize".into())
    })?;

    // Phase 1
    let analysis =
        pipeline::analyze(&state.llm, &parsed, &req.job_title, &req.job_description).await?;

    let analysis_notes = serde_json::to_value(&analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing analysis: {e}")))?;
    let optimization_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO job_optimizations
            (id, user_id, resume_id, job_title, job_description, optimized_resume_url, optimization_notes)
        VALUES ($1, $2, $3, $4, $5, '', $6)
        "#,
    )
    .bind(optimization_id)
    .bind(user.id)
    .bind(req.resume_id)
    .bind(&req.job_title)
    .bind(&req.job_description)
    .bind(&analysis_notes)
    .execute(&state.db)
    .await?;
    info!("Optimization {optimization_id}: analysis committed");

    // Phase 2 — depends on phase 1's output, never reordered.
    let content = pipeline::rewrite(&state.llm, &parsed, &analysis, &req.job_description).await?;
    let result = pipeline::combine(analysis, content);

    let result_notes = serde_json::to_value(&result)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing result: {e}")))?;
    sqlx::query("UPDATE job_optimizations SET optimization_notes = $1 WHERE id = $2")
        .bind(&result_notes)
        .bind(optimization_id)
        .execute(&state.db)
        .await?;
    info!(
        "Optimization {optimization_id}: complete, score {}",
        result.score
    );

    Ok(Json(OptimizeResponse {
        id: optimization_id,
        result,
    }))
}

/// GET /api/v1/optimizations
pub async fn handle_list_optimizations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<JobOptimizationRow>>, AppError> {
    let rows: Vec<JobOptimizationRow> = sqlx::query_as(
        "SELECT * FROM job_optimizations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/optimizations/:id/export
///
/// Renders the combined result as plain text via one more AI call and returns
/// it as a downloadable attachment. Nothing is stored; repeating the export
/// regenerates the text and may differ between calls.
pub async fn handle_export(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row: Option<JobOptimizationRow> =
        sqlx::query_as("SELECT * FROM job_optimizations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;
    let row = row.ok_or_else(|| AppError::NotFound(format!("Optimization {id} not found")))?;

    // Records whose rewrite phase never completed hold analysis-only notes.
    if row.optimization_notes.get("optimized_content").is_none() {
        return Err(AppError::Validation(
            "Optimization has no rewritten content to export".into(),
        ));
    }
    let result: OptimizationResult = serde_json::from_value(row.optimization_notes.clone())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed optimization notes: {e}")))?;

    let content_json = serde_json::to_string_pretty(&result.optimized_content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing export content: {e}")))?;
    let prompt = EXPORT_PROMPT_TEMPLATE.replace("{content_json}", &content_json);
    let text = state
        .llm
        .generate_text(&prompt, EXPORT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Export rendering failed: {e}")))?;

    let filename = export_filename(&row.job_title);
    info!("Optimization {id}: exported as {filename}");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        text,
    ))
}
