use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Input problems caught before any request leaves the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Please select a file to upload.")]
  MissingDocument,

  #[error("Please enter a Company Name first.")]
  BlankCompanyName,

  #[error("Please choose a bank to connect.")]
  BlankBankName,
}

#[derive(Error, Debug)]
pub enum ClientError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Received invalid data from bank: {payload}")]
  InvalidUpstreamData { payload: String },

  #[error("Request to {endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },

  #[error("Service returned {status}: {detail}")]
  Service { status: StatusCode, detail: String },

  #[error("Failed to generate report: {message}")]
  Export { message: String },

  #[error("An analysis is already in progress")]
  SubmissionInProgress,

  #[error("A result is already loaded; start over before submitting again")]
  ResultAlreadyLoaded,

  #[error("The workflow was reset before this request completed")]
  Abandoned,
}

impl ClientError {
  pub fn invalid_upstream(payload: &Value) -> Self {
    Self::InvalidUpstreamData { payload: payload.to_string() }
  }

  pub fn transport(endpoint: impl Into<String>, error: impl std::fmt::Display) -> Self {
    Self::Transport { endpoint: endpoint.into(), message: error.to_string() }
  }

  /// Build a service error from a non-success status and its raw body.
  pub fn service(status: StatusCode, body: &str) -> Self {
    Self::Service { status, detail: extract_detail(status, body) }
  }

  pub fn export(message: impl Into<String>) -> Self {
    Self::Export { message: message.into() }
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_))
  }

  /// The single line shown to the user for this failure.
  pub fn user_message(&self) -> String {
    match self {
      Self::Service { detail, .. } => detail.clone(),
      Self::Transport { message, .. } => message.clone(),
      other => other.to_string(),
    }
  }
}

/// Pull a displayable message out of an error body.
///
/// A string `detail` is used verbatim, any other `detail` value is rendered
/// as compact JSON. Bodies without `detail` fall back to the raw text, and
/// empty bodies to the status line.
pub fn extract_detail(status: StatusCode, body: &str) -> String {
  let trimmed = body.trim();
  if trimmed.is_empty() {
    return status.to_string();
  }

  match serde_json::from_str::<Value>(trimmed) {
    Ok(Value::Object(map)) => match map.get("detail") {
      Some(Value::String(detail)) => detail.clone(),
      Some(Value::Null) | None => trimmed.to_string(),
      Some(detail) => detail.to_string(),
    },
    _ => trimmed.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_string_detail_is_used_verbatim() {
    let body = r#"{"detail": "CSV must contain an 'Amount' or 'Value' column"}"#;
    assert_eq!(
      extract_detail(StatusCode::BAD_REQUEST, body),
      "CSV must contain an 'Amount' or 'Value' column"
    );
  }

  #[test]
  fn test_structured_detail_is_serialized() {
    let body = r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#;
    assert_eq!(
      extract_detail(StatusCode::UNPROCESSABLE_ENTITY, body),
      r#"[{"loc":["body","file"],"msg":"field required"}]"#
    );
  }

  #[test]
  fn test_body_without_detail_falls_back_to_text() {
    assert_eq!(extract_detail(StatusCode::BAD_GATEWAY, "upstream timed out"), "upstream timed out");
    assert_eq!(extract_detail(StatusCode::BAD_GATEWAY, r#"{"error":"x"}"#), r#"{"error":"x"}"#);
  }

  #[test]
  fn test_empty_body_uses_status() {
    assert_eq!(extract_detail(StatusCode::NOT_FOUND, "  "), "404 Not Found");
  }

  #[test]
  fn test_user_message_and_validation_flag() {
    let err = ClientError::service(StatusCode::BAD_REQUEST, r#"{"detail":"bad file"}"#);
    assert_eq!(err.user_message(), "bad file");
    assert!(!err.is_validation());

    let err = ClientError::from(ValidationError::MissingDocument);
    assert!(err.is_validation());
    assert_eq!(err.user_message(), "Please select a file to upload.");
  }
}
