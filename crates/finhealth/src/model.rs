//! Value objects passed between the client components.

use crate::config::{CompanyProfile, Industry};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const CSV_MIME: &str = "text/csv";

/// A named binary upload, either picked from disk or synthesized from a bank feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
  pub file_name: String,
  pub mime_type: String,
  pub bytes: Vec<u8>,
}

impl SourceDocument {
  pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
    Self { file_name: file_name.into(), mime_type: mime_type.into(), bytes }
  }

  /// Load an upload from disk, guessing the MIME type from its extension.
  pub fn from_path(path: &Path) -> Result<Self> {
    let bytes =
      std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_for(path).to_string();
    Ok(Self { file_name, mime_type, bytes })
  }
}

/// MIME types for the kinds of statement the service accepts.
pub fn mime_for(path: &Path) -> &'static str {
  let extension =
    path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_ascii_lowercase());
  match extension.as_deref() {
    Some("csv") => CSV_MIME,
    Some("pdf") => "application/pdf",
    Some("json") => "application/json",
    _ => "application/octet-stream",
  }
}

/// The one payload shape `/analyze` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
  pub source_file: SourceDocument,
  pub company_name: String,
  pub industry: Industry,
  pub language: String,
}

impl AnalysisRequest {
  pub fn new(source_file: SourceDocument, profile: &CompanyProfile) -> Self {
    Self {
      source_file,
      company_name: profile.trimmed_company_name().to_string(),
      industry: profile.industry,
      language: profile.language.clone(),
    }
  }
}

/// Amounts arrive as JSON numbers; the text form is kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
  pub date: String,
  pub description: String,
  pub amount: serde_json::Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankFeed {
  pub transactions: Vec<BankTransaction>,
}

/// A figure in the metrics map. Most are numbers, a few are preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
  Number(f64),
  Text(String),
}

impl MetricValue {
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      MetricValue::Number(n) => Some(*n),
      MetricValue::Text(text) => text.trim().trim_end_matches('%').trim().parse().ok(),
    }
  }
}

impl fmt::Display for MetricValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetricValue::Number(n) => write!(f, "{n}"),
      MetricValue::Text(text) => f.write_str(text),
    }
  }
}

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const TOTAL_EXPENSES: &str = "Total Expenses";
pub const NET_PROFIT: &str = "Net Profit";
pub const PROFIT_MARGIN: &str = "Profit Margin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
  pub date: String,
  pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
  #[serde(default)]
  pub revenue_forecast: Vec<ForecastPoint>,
  #[serde(default)]
  pub expense_forecast: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
  #[serde(rename = "name", alias = "category")]
  pub category: String,
  pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub description: String,
  pub amount: f64,
  #[serde(default)]
  pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookkeeping {
  #[serde(default)]
  pub breakdown: Vec<CategoryTotal>,
  #[serde(default)]
  pub recent_transactions: Vec<ClassifiedTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
  pub estimated_tax: f64,
  pub total_deductible_expenses: f64,
  #[serde(default)]
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tax_rate: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deduction_breakdown: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingCapital {
  pub burn_rate: f64,
  pub marketing_efficiency: f64,
  #[serde(default)]
  pub recommendations: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operational_spend: Option<f64>,
}

/// What `/analyze` returns. Unknown fields survive a round trip so the
/// report request can send the full result back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
  pub metrics: BTreeMap<String, MetricValue>,
  pub health_score: i64,
  #[serde(default)]
  pub forecast: Option<Forecast>,
  #[serde(default)]
  pub bookkeeping: Option<Bookkeeping>,
  #[serde(default)]
  pub tax: Option<TaxSummary>,
  #[serde(default)]
  pub working_capital: Option<WorkingCapital>,
  #[serde(default)]
  pub ai_analysis: Value,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl AnalysisResult {
  pub fn metric(&self, name: &str) -> Option<f64> {
    self.metrics.get(name).and_then(MetricValue::as_f64)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Creditworthiness {
  High,
  Medium,
  Low,
}

impl Creditworthiness {
  /// Case-insensitive; anything else (e.g. "Unknown") is `None`.
  pub fn parse(text: &str) -> Option<Self> {
    match text.trim().to_ascii_lowercase().as_str() {
      "high" => Some(Self::High),
      "medium" => Some(Self::Medium),
      "low" => Some(Self::Low),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::High => "High",
      Self::Medium => "Medium",
      Self::Low => "Low",
    }
  }
}

/// Normalized narrative. Always has a displayable summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsights {
  pub executive_summary: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub creditworthiness: Option<Creditworthiness>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cost_optimization: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub risk_assessment: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recommended_products: Option<Vec<String>>,
}

impl AiInsights {
  pub fn summary_only(executive_summary: impl Into<String>) -> Self {
    Self {
      executive_summary: executive_summary.into(),
      creditworthiness: None,
      cost_optimization: None,
      risk_assessment: None,
      recommended_products: None,
    }
  }
}

/// One row of the compliance trail. Every column is nullable on the service
/// side; a null or missing column decodes as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
  #[serde(default)]
  pub id: Value,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub timestamp: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub company_name: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub action_type: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub ai_model: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub decision_summary: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
