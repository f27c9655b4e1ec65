use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::builder::wizard::{Wizard, WizardError};
use crate::errors::AppError;
use crate::models::portfolio::{Portfolio, PortfolioContent, PortfolioRow};
use crate::models::resume::{Resume, ResumeRow};
use crate::models::template::{Template, TemplateRow};
use crate::state::AppState;

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplateFilter {
    pub category: Option<String>,
}

/// GET /api/v1/templates?category=
///
/// Public, read-only catalog.
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Result<Json<Vec<Template>>, AppError> {
    let rows: Vec<TemplateRow> = match filter.category {
        Some(category) => {
            sqlx::query_as("SELECT * FROM templates WHERE category = $1 ORDER BY name")
                .bind(category)
                .fetch_all(&state.db)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM templates ORDER BY name")
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(Json(rows.into_iter().map(Template::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub resume_id: Uuid,
    pub template_id: Uuid,
    /// Customized draft. Absent means "save the pre-seeded draft as-is";
    /// present replaces the draft wholesale (shallow-merge semantics: the
    /// client sends the complete object, arrays included).
    #[serde(default)]
    pub draft: Option<PortfolioContent>,
}

/// POST /api/v1/portfolios
///
/// Drives the wizard end to end: the referenced resume enters via the
/// deep-link transition, the template seeds the draft, the optional body
/// draft replaces it, and finish() validates before anything is written.
pub async fn handle_create_portfolio(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreatePortfolioRequest>,
) -> Result<Json<Portfolio>, AppError> {
    let resume_row: Option<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(req.resume_id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;
    let resume = Resume::from(
        resume_row.ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?,
    );

    let template_row: Option<TemplateRow> =
        sqlx::query_as("SELECT * FROM templates WHERE id = $1")
            .bind(req.template_id)
            .fetch_optional(&state.db)
            .await?;
    let template = Template::from(template_row.ok_or_else(|| {
        AppError::NotFound(format!("Template {} not found", req.template_id))
    })?);

    let mut wizard = Wizard::with_resume(resume.id, resume.parsed_data)?;
    wizard.select_template(template)?;
    if let Some(draft) = req.draft {
        wizard.replace_draft(draft)?;
    }
    let plan = wizard.finish()?;

    // Advisory collision check so a taken subdomain surfaces as 409; the
    // unique index still backstops the race between check and insert.
    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM portfolios WHERE subdomain = $1")
        .bind(&plan.content.subdomain)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!(
            "Subdomain '{}' is already in use",
            plan.content.subdomain
        )));
    }

    let content_data = serde_json::to_value(&plan.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing portfolio content: {e}")))?;

    let insert = sqlx::query_as::<_, PortfolioRow>(
        r#"
        INSERT INTO portfolios
            (id, user_id, title, subdomain, template_id, theme_config, content_data, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&plan.content.title)
    .bind(&plan.content.subdomain)
    .bind(plan.template_id)
    .bind(&plan.theme_config)
    .bind(&content_data)
    .fetch_one(&state.db)
    .await;

    let row = match insert {
        Ok(row) => row,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(format!(
                "Subdomain '{}' is already in use",
                plan.content.subdomain
            )));
        }
        Err(e) => return Err(AppError::Database(e)),
    };

    info!(
        "Created portfolio {} ({}) for user {}",
        row.id, row.subdomain, user.id
    );
    Ok(Json(Portfolio::from(row)))
}

/// GET /api/v1/portfolios
pub async fn handle_list_portfolios(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    let rows: Vec<PortfolioRow> = sqlx::query_as(
        "SELECT * FROM portfolios WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows.into_iter().map(Portfolio::from).collect()))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
