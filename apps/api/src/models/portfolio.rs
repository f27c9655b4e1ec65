use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::flag_set;
use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo};

/// A `portfolios` row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub subdomain: String,
    pub template_id: Uuid,
    pub theme_config: Value,
    pub content_data: Value,
    pub is_published: i16,
    pub created_at: DateTime<Utc>,
}

/// Domain view returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub subdomain: String,
    pub template_id: Uuid,
    pub theme_config: Value,
    pub content_data: Value,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Portfolio {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            subdomain: row.subdomain,
            template_id: row.template_id,
            theme_config: row.theme_config,
            content_data: row.content_data,
            is_published: flag_set(row.is_published),
            created_at: row.created_at,
        }
    }
}

/// The customizable content of a portfolio — the wizard's draft object.
///
/// `content_data` is exactly the serialization of this struct, title and
/// subdomain included. A portfolio snapshots this at creation; later resume
/// edits never propagate into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioContent {
    pub title: String,
    pub subdomain: String,
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
}
