// Cross-cutting prompt fragments. Each workflow that calls the LLM keeps its
// own prompts.rs next to it; only what is shared across workflows lives here.

/// System prompt fragment that enforces JSON-only output for
/// `generate_object` calls.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
