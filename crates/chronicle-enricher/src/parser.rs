//! Parse LLM output into tags and facet selections

use crate::error::EnricherError;
use crate::prompt::json_key;
use chronicle_domain::{FacetCategory, FacetSelection};
use serde_json::{Map, Value};
use tracing::warn;

/// Split a comma-separated answer into tags
///
/// Tags are trimmed and lowercased; empty ones and ones of `max_len` characters
/// or more are dropped; at most `max_tags` are kept.
pub fn parse_tags(response: &str, max_tags: usize, max_len: usize) -> Vec<String> {
    response
        .trim()
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| {
            let len = tag.chars().count();
            len > 0 && len < max_len
        })
        .take(max_tags)
        .collect()
}

/// Parse a facet suggestion answer
///
/// Accepts a bare JSON object, one wrapped in markdown fences, or one embedded
/// in surrounding prose. Single strings are accepted where lists are expected
/// and vice versa. Keys outside the taxonomy land in `additional`.
pub fn parse_facet_response(response: &str) -> Result<FacetSelection, EnricherError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| EnricherError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| EnricherError::InvalidFormat("Expected JSON object".to_string()))?;

    Ok(selection_from_object(obj))
}

fn selection_from_object(obj: &Map<String, Value>) -> FacetSelection {
    let mut selection = FacetSelection::default();

    for (key, value) in obj {
        let category = FacetCategory::parse(key);
        match category {
            Some(FacetCategory::Era) => selection.era = string_list(value),
            Some(FacetCategory::Location) => selection.location = string_list(value),
            Some(FacetCategory::Subject) => selection.subject = string_list(value),
            Some(FacetCategory::SourceType) => selection.source_type = single_string(value),
            Some(FacetCategory::Language) => selection.language = single_string(value),
            Some(FacetCategory::Sensitivity) => selection.sensitivity = single_string(value),
            None => {
                selection.additional.insert(key.clone(), value.clone());
            }
        }

        if let Some(category) = category {
            if !matches!(value, Value::String(_) | Value::Array(_) | Value::Null) {
                warn!(key = json_key(category), "ignoring facet value of unexpected type");
            }
        }
    }

    selection
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => clean(s).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(clean)
            .collect(),
        _ => Vec::new(),
    }
}

fn single_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean(s),
        Value::Array(items) => items.iter().filter_map(Value::as_str).find_map(clean),
        _ => None,
    }
}

fn clean(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, EnricherError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(EnricherError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence line and the closing fence, if present
        let end = if lines[lines.len() - 1].trim().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    // Object embedded in prose
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(EnricherError::InvalidFormat(
            "No JSON object in response".to_string(),
        )),
    }
}
