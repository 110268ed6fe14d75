//! HTTP access to the analysis service.
//!
//! Every network round-trip the client makes goes through [`AnalysisService`],
//! so the workflow can be driven against a stand-in in tests.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{AnalysisRequest, AnalysisResult, AuditLogEntry};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

pub type ServiceResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait AnalysisService: Send + Sync {
  /// POST `/analyze` with the canonical multipart payload
  async fn analyze(&self, request: &AnalysisRequest) -> ServiceResult<AnalysisResult>;

  /// GET `/connect_bank/{bank}`; the body is returned undecoded
  async fn connect_bank(&self, bank_name: &str) -> ServiceResult<Value>;

  /// POST `/generate_report`, returning the document bytes
  async fn generate_report(
    &self,
    company_name: &str,
    result: &AnalysisResult,
  ) -> ServiceResult<Vec<u8>>;

  /// GET `/compliance_logs`
  async fn compliance_logs(&self) -> ServiceResult<Vec<AuditLogEntry>>;
}

pub struct HttpAnalysisService {
  client: Client,
  base_url: Url,
  timeout: Duration,
}

impl HttpAnalysisService {
  pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
    let mut base = config.base_url.trim_end_matches('/').to_string();
    base.push('/');
    let base_url = Url::parse(&base)
      .map_err(|e| anyhow::anyhow!("Invalid service URL '{}': {}", config.base_url, e))?;

    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Client::builder().timeout(timeout).build()?;

    Ok(Self { client, base_url, timeout })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  fn endpoint(&self, segments: &[&str]) -> ServiceResult<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| ClientError::transport(self.base_url.as_str(), "URL cannot be a base"))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  async fn send(&self, builder: reqwest::RequestBuilder, url: &Url) -> ServiceResult<Response> {
    let response = builder
      .timeout(self.timeout)
      .send()
      .await
      .map_err(|e| ClientError::transport(url.as_str(), e))?;

    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, url = %url, "service returned an error response");
    Err(ClientError::service(status, &body))
  }

  async fn read_json<T: DeserializeOwned>(response: Response, url: &Url) -> ServiceResult<T> {
    response
      .json::<T>()
      .await
      .map_err(|e| ClientError::transport(url.as_str(), format!("unreadable response: {e}")))
  }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
  async fn analyze(&self, request: &AnalysisRequest) -> ServiceResult<AnalysisResult> {
    let url = self.endpoint(&["analyze"])?;
    let document = &request.source_file;

    let part = Part::bytes(document.bytes.clone())
      .file_name(document.file_name.clone())
      .mime_str(&document.mime_type)
      .map_err(|e| ClientError::transport(url.as_str(), e))?;

    let form = Form::new()
      .part("file", part)
      .text("company_name", request.company_name.clone())
      .text("industry", request.industry.as_str())
      .text("language", request.language.clone());

    tracing::debug!(
      file = %document.file_name,
      bytes = document.bytes.len(),
      "submitting analysis"
    );
    let response = self.send(self.client.post(url.clone()).multipart(form), &url).await?;
    Self::read_json(response, &url).await
  }

  async fn connect_bank(&self, bank_name: &str) -> ServiceResult<Value> {
    let url = self.endpoint(&["connect_bank", bank_name])?;
    let response = self.send(self.client.get(url.clone()), &url).await?;
    Self::read_json(response, &url).await
  }

  async fn generate_report(
    &self,
    company_name: &str,
    result: &AnalysisResult,
  ) -> ServiceResult<Vec<u8>> {
    let url = self.endpoint(&["generate_report"])?;
    let body = json!({ "company_name": company_name, "result": result });

    let response = self.send(self.client.post(url.clone()).json(&body), &url).await?;
    let bytes = response
      .bytes()
      .await
      .map_err(|e| {
        ClientError::transport(url.as_str(), format!("report download interrupted: {e}"))
      })?;
    Ok(bytes.to_vec())
  }

  async fn compliance_logs(&self) -> ServiceResult<Vec<AuditLogEntry>> {
    let url = self.endpoint(&["compliance_logs"])?;
    let response = self.send(self.client.get(url.clone()), &url).await?;
    Self::read_json(response, &url).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_joins_and_encodes_segments() {
    let config = ClientConfig { base_url: "http://127.0.0.1:8000/api/".to_string(), timeout_secs: 5 };
    let service = HttpAnalysisService::new(&config).unwrap();

    let url = service.endpoint(&["connect_bank", "HDFC Bank"]).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/connect_bank/HDFC%20Bank");

    let url = service.endpoint(&["analyze"]).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/analyze");
  }

  #[test]
  fn test_root_base_url() {
    let service = HttpAnalysisService::new(&ClientConfig::default()).unwrap();
    assert_eq!(service.base_url().as_str(), "http://127.0.0.1:8000/");
    assert_eq!(
      service.endpoint(&["compliance_logs"]).unwrap().as_str(),
      "http://127.0.0.1:8000/compliance_logs"
    );
  }

  #[test]
  fn test_invalid_base_url() {
    let config = ClientConfig { base_url: "not a url".to_string(), timeout_secs: 5 };
    assert!(HttpAnalysisService::new(&config).is_err());
  }
}
