//! The two AI phases and the result assembly. Phase 2 depends on phase 1's
//! output; they are never reordered or parallelized. Persistence ordering
//! (analysis committed between the phases) lives in the handler.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::{EducationEntry, ExperienceEntry, ParsedResume, PersonalInfo};
use crate::optimizer::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM,
};

/// Used only when phase 1 omits `score` entirely. A present out-of-range
/// score passes through unmodified — no clamping.
const DEFAULT_SCORE: f64 = 75.0;

/// Phase-1 output. Every field defaults so a sparse model response still
/// deserializes; `score: None` means "the model did not score at all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationAnalysis {
    pub score: Option<f64>,
    pub improvements: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub keywords_to_add: Vec<String>,
    pub sections_to_enhance: Vec<String>,
    pub optimized_summary: Option<String>,
    pub skill_recommendations: Vec<String>,
    pub experience_enhancements: Vec<ExperienceEnhancement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEnhancement {
    pub position: String,
    pub enhancement: String,
}

/// Phase-2 output: a full alternate resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizedResume {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
}

/// What gets shown, stored, and exported once both phases are done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub score: f64,
    pub improvements: Vec<String>,
    pub optimized_content: OptimizedResume,
    pub keywords_added: Vec<String>,
    pub sections_enhanced: Vec<String>,
}

/// Phase 1: score the resume against the job and collect recommendations.
pub async fn analyze(
    llm: &LlmClient,
    parsed: &ParsedResume,
    job_title: &str,
    job_description: &str,
) -> Result<OptimizationAnalysis, AppError> {
    let resume_json = pretty(parsed)?;
    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_json}", &resume_json)
        .replace("{job_description}", job_description)
        .replace("{job_title}", job_title);

    let analysis: OptimizationAnalysis = llm
        .generate_object(&prompt, ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Optimization analysis failed: {e}")))?;
    info!(
        "Analysis complete: score={:?}, {} improvement(s)",
        analysis.score,
        analysis.improvements.len()
    );
    Ok(analysis)
}

/// Phase 2: rewrite the resume content around the analysis.
pub async fn rewrite(
    llm: &LlmClient,
    parsed: &ParsedResume,
    analysis: &OptimizationAnalysis,
    job_description: &str,
) -> Result<OptimizedResume, AppError> {
    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{resume_json}", &pretty(parsed)?)
        .replace("{analysis_json}", &pretty(analysis)?)
        .replace("{job_description}", job_description);

    llm.generate_object(&prompt, REWRITE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Optimization rewrite failed: {e}")))
}

/// Assembles the combined result. The score is carried forward verbatim from
/// phase 1, defaulting only when the field was entirely absent.
pub fn combine(analysis: OptimizationAnalysis, content: OptimizedResume) -> OptimizationResult {
    OptimizationResult {
        score: analysis.score.unwrap_or(DEFAULT_SCORE),
        improvements: analysis.improvements,
        keywords_added: analysis.keywords_to_add,
        sections_enhanced: analysis.sections_to_enhance,
        optimized_content: content,
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing prompt input: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis_from(value: serde_json::Value) -> OptimizationAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_combine_defaults_score_only_when_absent() {
        let combined = combine(analysis_from(json!({})), OptimizedResume::default());
        assert_eq!(combined.score, 75.0);
    }

    #[test]
    fn test_combine_carries_present_score_verbatim() {
        let combined = combine(
            analysis_from(json!({"score": 42})),
            OptimizedResume::default(),
        );
        assert_eq!(combined.score, 42.0);
    }

    #[test]
    fn test_combine_does_not_clamp_out_of_range_score() {
        let combined = combine(
            analysis_from(json!({"score": 150})),
            OptimizedResume::default(),
        );
        assert_eq!(combined.score, 150.0);
    }

    #[test]
    fn test_combine_maps_analysis_fields() {
        let combined = combine(
            analysis_from(json!({
                "score": 60,
                "improvements": ["Quantify outcomes"],
                "keywords_missing": ["Kubernetes"],
                "keywords_to_add": ["Rust", "Postgres"],
                "sections_to_enhance": ["summary"]
            })),
            OptimizedResume::default(),
        );
        assert_eq!(combined.improvements, vec!["Quantify outcomes"]);
        assert_eq!(combined.keywords_added, vec!["Rust", "Postgres"]);
        assert_eq!(combined.sections_enhanced, vec!["summary"]);
    }

    #[test]
    fn test_sparse_analysis_deserializes_with_defaults() {
        let analysis = analysis_from(json!({"improvements": ["x"]}));
        assert!(analysis.score.is_none());
        assert!(analysis.keywords_to_add.is_empty());
        assert!(analysis.experience_enhancements.is_empty());
    }

    #[test]
    fn test_optimized_resume_accepts_achievements() {
        let content: OptimizedResume = serde_json::from_value(json!({
            "summary": "Better summary",
            "experience": [{
                "title": "Engineer",
                "company": "Acme",
                "duration": "2020",
                "description": "Shipped",
                "achievements": ["Cut latency 40%"]
            }]
        }))
        .unwrap();
        assert_eq!(content.experience[0].achievements, vec!["Cut latency 40%"]);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = combine(
            analysis_from(json!({"score": 81, "improvements": ["a"]})),
            OptimizedResume::default(),
        );
        let value = serde_json::to_value(&result).unwrap();
        let back: OptimizationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.score, 81.0);
        assert_eq!(back.improvements, vec!["a"]);
    }
}
