//! Narrative normalization.
//!
//! The narrative generator is asked for JSON but does not always comply: the
//! payload can be an object, a JSON string, a fenced JSON string, or prose.
//! [`normalize`] never fails; it tries, in order:
//!
//! 1. an object that already carries `executive_summary`
//! 2. a string whose fence-stripped text starts with `{` and decodes to an object
//! 3. the fence-stripped (or raw) string itself as the summary

use crate::model::{AiInsights, AnalysisResult, Creditworthiness};
use serde_json::{Map, Value};

/// Shown when a decoded narrative has no summary of its own.
pub const SUMMARY_ELSEWHERE: &str = "See analysis below.";
/// Shown when the service returned no narrative at all.
pub const NO_ANALYSIS: &str = "No analysis was returned.";

const CREDIT_KEYS: [&str; 3] = ["creditworthiness", "Creditworthiness", "credit_worthiness"];

pub fn normalize(result: &AnalysisResult) -> AiInsights {
  normalize_narrative(&result.ai_analysis)
}

pub fn normalize_narrative(narrative: &Value) -> AiInsights {
  match narrative {
    Value::Object(map) => from_object(map),
    Value::String(text) => from_text(text),
    Value::Null => AiInsights::summary_only(NO_ANALYSIS),
    other => AiInsights::summary_only(other.to_string()),
  }
}

const FENCE: &str = "```";

/// Remove every code-fence marker, with any language tag after it (`json`,
/// `JSON`, `javascript`, ...), and the surrounding whitespace.
pub fn strip_fences(text: &str) -> String {
  let mut cleaned = String::with_capacity(text.len());
  let mut rest = text;

  while let Some(pos) = rest.find(FENCE) {
    cleaned.push_str(&rest[..pos]);
    let after = &rest[pos + FENCE.len()..];
    let tag_len = after.find(|c: char| !is_tag_char(c)).unwrap_or(after.len());
    let (tag, tail) = after.split_at(tag_len);
    let tagged = !tag.is_empty() && tail.chars().next().map_or(true, char::is_whitespace);
    rest = if tagged { tail } else { after };
  }

  cleaned.push_str(rest);
  cleaned.trim().to_string()
}

fn is_tag_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')
}

fn from_text(raw: &str) -> AiInsights {
  let cleaned = strip_fences(raw);

  if cleaned.starts_with('{') {
    match serde_json::from_str::<Value>(&cleaned) {
      Ok(Value::Object(map)) => return from_object(&map),
      Ok(_) => tracing::debug!("narrative decoded to a non-object, using text"),
      Err(e) => tracing::debug!(error = %e, "narrative is not valid JSON, using text"),
    }
  }

  if !cleaned.is_empty() {
    AiInsights::summary_only(cleaned)
  } else if !raw.trim().is_empty() {
    AiInsights::summary_only(raw.trim())
  } else {
    AiInsights::summary_only(NO_ANALYSIS)
  }
}

fn from_object(map: &Map<String, Value>) -> AiInsights {
  let executive_summary = map
    .get("executive_summary")
    .and_then(text_of)
    .filter(|summary| !summary.trim().is_empty())
    .unwrap_or_else(|| SUMMARY_ELSEWHERE.to_string());

  let creditworthiness = CREDIT_KEYS
    .iter()
    .find_map(|key| map.get(*key).and_then(Value::as_str))
    .and_then(Creditworthiness::parse);

  AiInsights {
    executive_summary,
    creditworthiness,
    cost_optimization: map.get("cost_optimization").and_then(list_of),
    risk_assessment: map.get("risk_assessment").and_then(text_of),
    recommended_products: map.get("recommended_products").and_then(list_of),
  }
}

fn text_of(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(text) => Some(text.clone()),
    other => Some(other.to_string()),
  }
}

fn list_of(value: &Value) -> Option<Vec<String>> {
  match value {
    Value::Array(items) => Some(items.iter().filter_map(text_of).collect()),
    Value::String(text) if !text.trim().is_empty() => Some(vec![text.clone()]),
    _ => None,
  }
}
