use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::flag_set;

/// A `templates` row. The catalog is read-only: this code never creates or
/// mutates templates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_premium: i16,
    pub template_config: Value,
}

/// Domain view of a template. `template_config` stays an untyped `Value`
/// because save-time semantics require copying it verbatim into the
/// portfolio's `theme_config`; `config()` gives a validated, defaulted view
/// for anything that wants to read it.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_premium: bool,
    pub template_config: Value,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Template {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            is_premium: flag_set(row.is_premium),
            template_config: row.template_config,
        }
    }
}

impl Template {
    pub fn config(&self) -> TemplateConfig {
        serde_json::from_value(self.template_config.clone()).unwrap_or_default()
    }
}

/// Conventional inner shape of `template_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub colors: BTreeMap<String, String>,
    pub sections: Vec<String>,
}
