//! Turns whichever input the user chose into the canonical analysis request.

use crate::config::CompanyProfile;
use crate::error::{ClientError, ValidationError};
use crate::model::{AnalysisRequest, BankFeed, BankTransaction, SourceDocument, CSV_MIME};
use crate::service::AnalysisService;
use serde_json::Value;
use std::sync::Arc;

pub const CSV_HEADER: &str = "Date,Description,Amount";

/// The two ways a statement can reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
  /// A document picked by the user, if one has been picked yet
  File(Option<SourceDocument>),
  /// A simulated bank connection
  Bank(String),
}

impl SourceSelection {
  pub fn mode(&self) -> &'static str {
    match self {
      SourceSelection::File(_) => "file",
      SourceSelection::Bank(_) => "bank",
    }
  }
}

pub struct SourceAdapter {
  service: Arc<dyn AnalysisService>,
}

impl SourceAdapter {
  pub fn new(service: Arc<dyn AnalysisService>) -> Self {
    Self { service }
  }

  /// Check everything that can be checked without the network.
  pub fn validate(
    selection: &SourceSelection,
    profile: &CompanyProfile,
  ) -> Result<(), ValidationError> {
    match selection {
      SourceSelection::File(None) => Err(ValidationError::MissingDocument),
      SourceSelection::Bank(bank) if bank.trim().is_empty() => Err(ValidationError::BlankBankName),
      _ if !profile.has_company_name() => Err(ValidationError::BlankCompanyName),
      _ => Ok(()),
    }
  }

  /// Produce the request `/analyze` expects. Uploads pass through untouched;
  /// bank mode fetches the feed and synthesizes a CSV statement from it.
  pub async fn to_canonical_request(
    &self,
    selection: SourceSelection,
    profile: &CompanyProfile,
  ) -> Result<AnalysisRequest, ClientError> {
    Self::validate(&selection, profile)?;

    match selection {
      SourceSelection::File(Some(document)) => Ok(AnalysisRequest::new(document, profile)),
      SourceSelection::File(None) => Err(ValidationError::MissingDocument.into()),
      SourceSelection::Bank(bank) => {
        let bank = bank.trim();
        tracing::debug!(bank, "fetching simulated bank feed");
        let payload = self.service.connect_bank(bank).await?;
        let feed = parse_feed(&payload)?;
        tracing::debug!(bank, transactions = feed.transactions.len(), "bank feed received");
        Ok(AnalysisRequest::new(statement_document(bank, &feed.transactions), profile))
      }
    }
  }
}

/// Decode a bank feed, rejecting payloads without a usable `transactions` list.
pub fn parse_feed(payload: &Value) -> Result<BankFeed, ClientError> {
  match payload.get("transactions") {
    Some(Value::Array(_)) => {
      serde_json::from_value(payload.clone()).map_err(|e| {
        tracing::warn!(error = %e, "bank feed transactions are malformed");
        ClientError::invalid_upstream(payload)
      })
    }
    _ => Err(ClientError::invalid_upstream(payload)),
  }
}

/// Header row plus one `date,description,amount` row per transaction, in feed order.
pub fn to_csv(transactions: &[BankTransaction]) -> String {
  let mut lines = Vec::with_capacity(transactions.len() + 1);
  lines.push(CSV_HEADER.to_string());
  lines.extend(
    transactions.iter().map(|t| format!("{},{},{}", t.date, t.description, t.amount)),
  );
  lines.join("\n")
}

pub fn statement_document(bank: &str, transactions: &[BankTransaction]) -> SourceDocument {
  SourceDocument::new(
    format!("{bank}_Statement.csv"),
    CSV_MIME,
    to_csv(transactions).into_bytes(),
  )
}
