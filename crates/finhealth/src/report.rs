//! Investor report export.

use crate::error::ClientError;
use crate::model::AnalysisResult;
use crate::service::AnalysisService;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A generated report, ready to be written where the user asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

impl ReportDocument {
  pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let path = dir.join(&self.file_name);
    std::fs::write(&path, &self.bytes)
      .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
  }
}

/// `Report_<company>.pdf`, with path separators replaced so the name stays a file name.
pub fn report_file_name(company_name: &str) -> String {
  let safe: String = company_name
    .trim()
    .chars()
    .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
    .collect();
  format!("Report_{safe}.pdf")
}

pub struct ReportExporter {
  service: Arc<dyn AnalysisService>,
}

impl ReportExporter {
  pub fn new(service: Arc<dyn AnalysisService>) -> Self {
    Self { service }
  }

  /// Request a report for the current result. No retry: one failure, one error.
  pub async fn export_report(
    &self,
    company_name: &str,
    result: Option<&AnalysisResult>,
  ) -> Result<ReportDocument, ClientError> {
    let result =
      result.ok_or_else(|| ClientError::export("there is no analysis result to report on"))?;

    let bytes = self.service.generate_report(company_name, result).await.map_err(|e| {
      tracing::warn!(error = %e, "report generation failed");
      ClientError::export(e.user_message())
    })?;

    tracing::debug!(bytes = bytes.len(), "report received");
    Ok(ReportDocument { file_name: report_file_name(company_name), bytes })
  }
}
