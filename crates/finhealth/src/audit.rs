//! Client for the compliance audit trail.

use crate::model::AuditLogEntry;
use crate::service::AnalysisService;
use chrono::{DateTime, Local, NaiveDateTime};
use std::sync::{Arc, Mutex, MutexGuard};

pub const EMPTY_AUDIT_MESSAGE: &str = "No audit records found. Run an analysis to generate logs.";

#[derive(Debug, Default)]
struct AuditSnapshot {
  entries: Vec<AuditLogEntry>,
  populated: bool,
}

/// Holds the last-known audit trail and replaces it wholesale on refresh.
///
/// Cloning shares the same snapshot, so a refresh spawned in the background
/// is visible to every holder.
#[derive(Clone)]
pub struct AuditLogClient {
  service: Arc<dyn AnalysisService>,
  snapshot: Arc<Mutex<AuditSnapshot>>,
}

impl AuditLogClient {
  pub fn new(service: Arc<dyn AnalysisService>) -> Self {
    Self { service, snapshot: Arc::new(Mutex::new(AuditSnapshot::default())) }
  }

  fn lock(&self) -> MutexGuard<'_, AuditSnapshot> {
    self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Fetch the trail. Failures are logged and the previous entries are kept.
  pub async fn refresh(&self) -> Vec<AuditLogEntry> {
    match self.service.compliance_logs().await {
      Ok(entries) => {
        tracing::debug!(count = entries.len(), "audit log refreshed");
        let mut snapshot = self.lock();
        snapshot.entries = entries;
        snapshot.populated = true;
        snapshot.entries.clone()
      }
      Err(e) => {
        tracing::warn!(error = %e, "audit log refresh failed, keeping last-known entries");
        self.entries()
      }
    }
  }

  pub fn entries(&self) -> Vec<AuditLogEntry> {
    self.lock().entries.clone()
  }

  /// Whether any refresh has ever succeeded.
  pub fn is_populated(&self) -> bool {
    self.lock().populated
  }
}

/// Render a service timestamp in local time, or as sent when unparseable.
///
/// The service emits naive UTC timestamps (`2024-05-01T10:15:00.123456`);
/// RFC 3339 is accepted too.
pub fn display_timestamp(raw: &str) -> String {
  const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

  if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
    return parsed.with_timezone(&Local).format(FORMAT).to_string();
  }

  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
    .map(|naive| naive.and_utc().with_timezone(&Local).format(FORMAT).to_string())
    .unwrap_or_else(|_| raw.to_string())
}
