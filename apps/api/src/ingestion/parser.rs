use tracing::debug;

use crate::errors::AppError;
use crate::ingestion::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::resume::ParsedResume;

/// Only the head of the extracted text goes into the prompt.
const EXCERPT_CHARS: usize = 4000;

/// Structures extracted resume text via one LLM object call.
pub async fn parse_resume_text(
    llm: &LlmClient,
    extracted_text: &str,
) -> Result<ParsedResume, AppError> {
    let excerpt = truncate_chars(extracted_text, EXCERPT_CHARS);
    debug!(
        "Parsing resume excerpt of {} chars (of {} extracted)",
        excerpt.chars().count(),
        extracted_text.chars().count()
    );

    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", excerpt);
    llm.generate_object::<ParsedResume>(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume parsing failed: {e}")))
}

/// First `max_chars` characters, never splitting a multi-byte character.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_shorter_input_is_untouched() {
        assert_eq!(truncate_chars("short resume", 4000), "short resume");
    }

    #[test]
    fn test_truncate_chars_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        let cut = truncate_chars(&text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert_eq!(cut, "éééé");
    }

    #[test]
    fn test_truncate_chars_exact_boundary() {
        let text = "abcd";
        assert_eq!(truncate_chars(text, 4), "abcd");
        assert_eq!(truncate_chars(text, 3), "abc");
    }

    #[test]
    fn test_prompt_template_embeds_text() {
        let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", "JANE DOE RESUME");
        assert!(prompt.contains("JANE DOE RESUME"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
