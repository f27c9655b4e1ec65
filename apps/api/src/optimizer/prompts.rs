// Prompt constants for the optimization pipeline.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as ANALYSIS_SYSTEM;
pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as REWRITE_SYSTEM;

/// Phase 1: analysis. Replace `{resume_json}`, `{job_description}`,
/// `{job_title}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job description and provide optimization recommendations.

Return a JSON object with this EXACT schema:
{
  "score": 72,
  "improvements": ["Specific improvement suggestions"],
  "keywords_missing": ["Important keywords missing from the resume"],
  "keywords_to_add": ["Keywords that should be added"],
  "sections_to_enhance": ["Resume sections that need enhancement"],
  "optimized_summary": "Optimized professional summary",
  "skill_recommendations": ["Skills to highlight or add"],
  "experience_enhancements": [
    {"position": "Senior Engineer at Acme", "enhancement": "How to strengthen this entry"}
  ]
}

"score" is the resume-to-job match score out of 100.

RESUME DATA:
{resume_json}

JOB DESCRIPTION:
{job_description}

JOB TITLE: {job_title}"#;

/// Phase 2: rewrite. Replace `{resume_json}`, `{analysis_json}`,
/// `{job_description}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Based on the analysis, create an optimized version of the resume content that incorporates the recommendations.

Return a JSON object with this EXACT schema:
{
  "personal_info": {"name": "", "email": "", "phone": "", "location": ""},
  "summary": "",
  "experience": [
    {
      "title": "",
      "company": "",
      "duration": "",
      "description": "",
      "achievements": ["Quantified achievement"]
    }
  ],
  "skills": [""],
  "education": [
    {"degree": "", "institution": "", "year": ""}
  ]
}

ORIGINAL RESUME:
{resume_json}

OPTIMIZATION ANALYSIS:
{analysis_json}

JOB DESCRIPTION:
{job_description}"#;

/// System prompt for the plain-text export rendering.
pub const EXPORT_SYSTEM: &str = "You are an expert resume writer. \
    Produce clean plain text only: no markdown, no code fences, no commentary.";

/// Export prompt. Replace `{content_json}` before sending.
pub const EXPORT_PROMPT_TEMPLATE: &str = r#"Create a professionally formatted plain text resume based on this optimized content:

{content_json}

Format it as a clean, professional resume that can be easily copied and pasted.
Use proper spacing and formatting for readability."#;
