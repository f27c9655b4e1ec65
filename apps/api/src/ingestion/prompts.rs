// Prompt constants for resume parsing.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as RESUME_PARSE_SYSTEM;

/// Resume parsing prompt template. Replace `{resume_text}` before sending;
/// callers truncate the text to the excerpt limit first.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse this resume text and extract structured information.

Return a JSON object with this EXACT schema (omit fields you cannot find, never invent values):
{
  "personal_info": {
    "name": "Jane Doe",
    "email": "jane@example.com",
    "phone": "+1 555 0100",
    "location": "Portland, OR"
  },
  "summary": "One-paragraph professional summary",
  "experience": [
    {
      "title": "Senior Engineer",
      "company": "Acme Corp",
      "duration": "2020 - 2024",
      "description": "What the role involved and delivered"
    }
  ],
  "skills": ["Rust", "PostgreSQL"],
  "education": [
    {
      "degree": "BSc Computer Science",
      "institution": "State University",
      "year": "2016"
    }
  ]
}

RESUME TEXT:
{resume_text}"#;
