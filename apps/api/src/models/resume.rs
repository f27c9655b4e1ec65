use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::models::flag_set;

/// A `resumes` row as stored: integer flag, opaque JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub parsed_data: Option<Value>,
    pub is_active: i16,
    pub created_at: DateTime<Utc>,
}

/// Domain view of a resume: flag converted to bool, parsed data validated
/// into its typed shape.
#[derive(Debug, Clone, Serialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub parsed_data: Option<ParsedResume>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        let parsed_data = row.parsed_data.and_then(|v| parse_resume_blob(row.id, v));
        Resume {
            id: row.id,
            user_id: row.user_id,
            file_name: row.file_name,
            file_url: row.file_url,
            file_size: row.file_size,
            parsed_data,
            is_active: flag_set(row.is_active),
            created_at: row.created_at,
        }
    }
}

/// A blob that does not deserialize is treated as never parsed rather than
/// taking down the listing that touched it.
fn parse_resume_blob(resume_id: Uuid, value: Value) -> Option<ParsedResume> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Resume {resume_id} has malformed parsed_data, ignoring: {e}");
            None
        }
    }
}

/// The structured representation the AI extracts from an uploaded resume.
/// Every field is optional in the wire sense: absent fields become empty
/// defaults so downstream code never reaches through missing JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
    /// Only present on AI-rewritten resumes; parsing leaves it empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}
