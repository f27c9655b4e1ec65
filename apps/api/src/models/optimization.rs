use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A `job_optimizations` row. `optimization_notes` holds the JSON-serialized
/// pipeline output: the phase-1 analysis right after phase 1 commits, the
/// combined result once phase 2 completes. `optimized_resume_url` stays empty;
/// exports are generated on demand and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOptimizationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub optimized_resume_url: String,
    pub optimization_notes: Value,
    pub created_at: DateTime<Utc>,
}
