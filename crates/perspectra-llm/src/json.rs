//! Pull a JSON object out of model output.

use crate::backend::LlmError;

/// Parse model output as JSON, tolerating Markdown code fences and prose
/// around the object.
pub fn extract_json(text: &str) -> Result<serde_json::Value, LlmError> {
    let trimmed = strip_fences(text.trim());
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    // Outermost {...} slice.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(LlmError::InvalidJson(trimmed.chars().take(200).collect()))
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
