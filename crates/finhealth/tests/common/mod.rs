#![allow(dead_code)]

use async_trait::async_trait;
use finhealth::error::ClientError;
use finhealth::model::{AnalysisRequest, AnalysisResult, AuditLogEntry};
use finhealth::service::{AnalysisService, ServiceResult};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What a mocked endpoint answers with.
#[derive(Debug, Clone)]
pub enum Reply {
  Json(Value),
  Status(u16, String),
  Unreachable(String),
}

impl Reply {
  fn into_result(self, endpoint: &str) -> ServiceResult<Value> {
    match self {
      Reply::Json(value) => Ok(value),
      Reply::Status(code, body) => {
        Err(ClientError::service(StatusCode::from_u16(code).unwrap(), &body))
      }
      Reply::Unreachable(message) => Err(ClientError::transport(endpoint, message)),
    }
  }
}

/// Mock analysis service for testing
pub struct MockService {
  pub analyze_reply: Mutex<Reply>,
  pub bank_reply: Mutex<Reply>,
  pub report_reply: Mutex<Result<Vec<u8>, Reply>>,
  pub logs_reply: Mutex<Reply>,
  pub analyze_calls: AtomicUsize,
  pub bank_calls: AtomicUsize,
  pub report_calls: AtomicUsize,
  pub log_calls: AtomicUsize,
  pub last_request: Mutex<Option<AnalysisRequest>>,
  pub last_report: Mutex<Option<(String, AnalysisResult)>>,
  /// When set, `analyze` waits for a permit before answering
  pub gate: Option<Arc<Notify>>,
  /// When set, `connect_bank` waits for a permit before answering
  pub bank_gate: Option<Arc<Notify>>,
}

impl Default for MockService {
  fn default() -> Self {
    Self::new()
  }
}

impl MockService {
  pub fn new() -> Self {
    Self {
      analyze_reply: Mutex::new(Reply::Json(acme_result())),
      bank_reply: Mutex::new(Reply::Json(sbi_feed())),
      report_reply: Mutex::new(Ok(b"%PDF-1.4 investor report".to_vec())),
      logs_reply: Mutex::new(Reply::Json(json!([audit_entry(1, "Acme")]))),
      analyze_calls: AtomicUsize::new(0),
      bank_calls: AtomicUsize::new(0),
      report_calls: AtomicUsize::new(0),
      log_calls: AtomicUsize::new(0),
      last_request: Mutex::new(None),
      last_report: Mutex::new(None),
      gate: None,
      bank_gate: None,
    }
  }

  pub fn gated(gate: Arc<Notify>) -> Self {
    Self { gate: Some(gate), ..Self::new() }
  }

  pub fn bank_gated(gate: Arc<Notify>) -> Self {
    Self { bank_gate: Some(gate), ..Self::new() }
  }

  pub fn set_analyze(&self, reply: Reply) {
    *self.analyze_reply.lock().unwrap() = reply;
  }

  pub fn set_bank(&self, reply: Reply) {
    *self.bank_reply.lock().unwrap() = reply;
  }

  pub fn set_report(&self, reply: Result<Vec<u8>, Reply>) {
    *self.report_reply.lock().unwrap() = reply;
  }

  pub fn set_logs(&self, reply: Reply) {
    *self.logs_reply.lock().unwrap() = reply;
  }

  pub fn analyze_count(&self) -> usize {
    self.analyze_calls.load(Ordering::SeqCst)
  }

  pub fn bank_count(&self) -> usize {
    self.bank_calls.load(Ordering::SeqCst)
  }

  pub fn report_count(&self) -> usize {
    self.report_calls.load(Ordering::SeqCst)
  }

  pub fn log_count(&self) -> usize {
    self.log_calls.load(Ordering::SeqCst)
  }

  pub fn sent_csv(&self) -> Option<String> {
    self
      .last_request
      .lock()
      .unwrap()
      .as_ref()
      .map(|request| String::from_utf8(request.source_file.bytes.clone()).unwrap())
  }
}

#[async_trait]
impl AnalysisService for MockService {
  async fn analyze(&self, request: &AnalysisRequest) -> ServiceResult<AnalysisResult> {
    self.analyze_calls.fetch_add(1, Ordering::SeqCst);
    *self.last_request.lock().unwrap() = Some(request.clone());

    if let Some(gate) = &self.gate {
      gate.notified().await;
    }

    let reply = self.analyze_reply.lock().unwrap().clone();
    let value = reply.into_result("/analyze")?;
    Ok(serde_json::from_value(value).unwrap())
  }

  async fn connect_bank(&self, _bank_name: &str) -> ServiceResult<Value> {
    self.bank_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(gate) = &self.bank_gate {
      gate.notified().await;
    }

    let reply = self.bank_reply.lock().unwrap().clone();
    reply.into_result("/connect_bank")
  }

  async fn generate_report(
    &self,
    company_name: &str,
    result: &AnalysisResult,
  ) -> ServiceResult<Vec<u8>> {
    self.report_calls.fetch_add(1, Ordering::SeqCst);
    *self.last_report.lock().unwrap() = Some((company_name.to_string(), result.clone()));
    let reply = self.report_reply.lock().unwrap().clone();
    match reply {
      Ok(bytes) => Ok(bytes),
      Err(reply) => reply.into_result("/generate_report").map(|_| Vec::new()),
    }
  }

  async fn compliance_logs(&self) -> ServiceResult<Vec<AuditLogEntry>> {
    self.log_calls.fetch_add(1, Ordering::SeqCst);
    let reply = self.logs_reply.lock().unwrap().clone();
    let value = reply.into_result("/compliance_logs")?;
    Ok(serde_json::from_value(value).unwrap())
  }
}

pub fn acme_result() -> Value {
  json!({
    "metrics": {
      "Total Revenue": 1000,
      "Total Expenses": 600,
      "Net Profit": 400,
      "Profit Margin": "40%"
    },
    "health_score": 72,
    "ai_analysis": "```json\n{\"executive_summary\":\"Healthy\"}\n```"
  })
}

pub fn sbi_feed() -> Value {
  json!({
    "bank_name": "SBI",
    "account_id": "XX-4821",
    "current_balance": 182000,
    "currency": "USD",
    "transactions": [
      {"date": "2024-05-20", "description": "Client Payment - inv#2023", "amount": 15400, "category": "Revenue"},
      {"date": "2024-05-14", "description": "Staff Payroll", "amount": -9200, "category": "Payroll"},
      {"date": "2024-05-02", "description": "Office Rent", "amount": -2500, "category": "Operational"}
    ]
  })
}

pub fn audit_entry(id: u64, company: &str) -> Value {
  json!({
    "id": id,
    "timestamp": "2024-05-21T09:30:00.000123",
    "company_name": company,
    "action_type": "AI Risk Assessment",
    "ai_model": "GPT-5",
    "decision_summary": "Credit: High"
  })
}
