//! Client configuration and the company profile sent with every analysis.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str = "English";

/// Banks offered by the simulated feed.
pub const KNOWN_BANKS: [&str; 4] = ["HDFC Bank", "ICICI Bank", "SBI", "Chase"];

/// Configuration for the analysis service client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Base URL of the analysis service (e.g., "http://127.0.0.1:8000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
  }
}

impl ClientConfig {
  /// Read `FINHEALTH_API_URL` and `FINHEALTH_TIMEOUT_SECS`, defaulting what is unset or invalid.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let base_url = lookup("FINHEALTH_API_URL")
      .map(|url| url.trim().to_string())
      .filter(|url| !url.is_empty())
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout_secs = lookup("FINHEALTH_TIMEOUT_SECS")
      .and_then(|secs| secs.trim().parse().ok())
      .filter(|secs| *secs > 0)
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self { base_url, timeout_secs }
  }

  /// Apply command-line values on top. Blank URLs and zero timeouts are ignored.
  pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
    if let Some(url) = base_url.map(|url| url.trim().to_string()).filter(|url| !url.is_empty()) {
      self.base_url = url;
    }
    if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
      self.timeout_secs = secs;
    }
    self
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Industry {
  #[default]
  Retail,
  Manufacturing,
  #[serde(rename = "Agri-Tech")]
  #[value(name = "agri-tech")]
  AgriTech,
  Services,
  Logistics,
}

impl Industry {
  pub fn as_str(&self) -> &'static str {
    match self {
      Industry::Retail => "Retail",
      Industry::Manufacturing => "Manufacturing",
      Industry::AgriTech => "Agri-Tech",
      Industry::Services => "Services",
      Industry::Logistics => "Logistics",
    }
  }
}

impl fmt::Display for Industry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Who the analysis is for. Filled in on the input screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
  pub company_name: String,
  pub industry: Industry,
  pub language: String,
}

impl Default for CompanyProfile {
  fn default() -> Self {
    Self {
      company_name: String::new(),
      industry: Industry::default(),
      language: DEFAULT_LANGUAGE.to_string(),
    }
  }
}

impl CompanyProfile {
  pub fn new(company_name: impl Into<String>, industry: Industry) -> Self {
    Self { company_name: company_name.into(), industry, ..Self::default() }
  }

  pub fn with_language(mut self, language: impl Into<String>) -> Self {
    self.language = language.into();
    self
  }

  /// The company name as sent to the service, without surrounding whitespace.
  pub fn trimmed_company_name(&self) -> &str {
    self.company_name.trim()
  }

  pub fn has_company_name(&self) -> bool {
    !self.trimmed_company_name().is_empty()
  }
}
