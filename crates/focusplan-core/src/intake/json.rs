use crate::error::IntakeError;

/// Pull the first JSON object out of a translator response.
///
/// Markdown code fences around the payload are stripped. When the content
/// holds prose or several objects, the first balanced `{...}` wins; braces
/// inside string literals are ignored.
pub fn extract_json_object(content: &str) -> Result<&str, IntakeError> {
    let content = strip_fences(content);

    let start = content
        .find('{')
        .ok_or_else(|| IntakeError::NoJson(preview(content)))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in content[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&content[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(IntakeError::Malformed(format!("unbalanced braces in: {}", preview(content))))
}

fn strip_fences(content: &str) -> &str {
    let mut content = content.trim();
    if let Some(rest) = content.strip_prefix("```json") {
        content = rest;
    } else if let Some(rest) = content.strip_prefix("```") {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}

fn preview(content: &str) -> String {
    const MAX: usize = 200;
    if content.chars().count() <= MAX {
        return content.to_string();
    }
    let cut: String = content.chars().take(MAX).collect();
    format!("{cut}...")
}
