pub mod analyze;
pub mod connect_bank;
pub mod logs;

use crate::audit::AuditLogClient;
use crate::config::{ClientConfig, CompanyProfile};
use crate::dashboard::DashboardView;
use crate::display;
use crate::error::ClientError;
use crate::logging;
use crate::orchestrator::{Analysis, RequestOrchestrator};
use crate::report::ReportExporter;
use crate::service::{AnalysisService, HttpAnalysisService};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// How a finished analysis is shown.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
  /// Print the dashboard as JSON on stdout instead of the text rendering
  pub json: bool,
  /// Export the investor report into this directory once the result is ready
  pub report_dir: Option<PathBuf>,
}

/// The wired-up client components for one process.
pub struct Dashboard {
  pub orchestrator: RequestOrchestrator,
  pub exporter: ReportExporter,
}

impl Dashboard {
  pub fn connect(config: &ClientConfig) -> Result<Self> {
    let service = HttpAnalysisService::new(config)?;
    logging::info(&format!("Analysis service: {}", service.base_url()));
    Ok(Self::with_service(Arc::new(service)))
  }

  pub fn with_service(service: Arc<dyn AnalysisService>) -> Self {
    let audit = AuditLogClient::new(service.clone());
    Self {
      orchestrator: RequestOrchestrator::new(service.clone(), audit),
      exporter: ReportExporter::new(service),
    }
  }

  pub fn audit(&self) -> &AuditLogClient {
    self.orchestrator.audit()
  }

  /// Startup refresh of the audit trail.
  pub async fn start(&self) {
    let entries = self.audit().refresh().await;
    if !self.audit().is_populated() {
      logging::warn("Audit log is unavailable right now");
    } else {
      logging::debug(&format!("Loaded {} audit records", entries.len()));
    }
  }

  /// Show the outcome of an analysis and run the follow-ups the user asked for.
  pub async fn present(
    &self,
    outcome: Result<Analysis, ClientError>,
    profile: &CompanyProfile,
    options: &OutputOptions,
    failure_prefix: &str,
  ) -> Result<()> {
    let (result, insights) = match outcome {
      Ok(analysis) => analysis,
      Err(e) if e.is_validation() => return Err(anyhow!(e.user_message())),
      Err(e) => {
        let state = self.orchestrator.state();
        logging::event(logging::Level::Error, &format!("workflow {}", state.name()));
        return Err(anyhow!("{failure_prefix}: {}", e.user_message()));
      }
    };

    logging::event(logging::Level::Success, "analysis ready");
    self.orchestrator.settle().await;

    let view = DashboardView::build(&result, &insights, &self.audit().entries());
    if options.json {
      println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
      display::render_dashboard(&view);
    }

    if let Some(dir) = &options.report_dir {
      self.export_report(profile, dir).await;
    }

    Ok(())
  }

  async fn export_report(&self, profile: &CompanyProfile, dir: &std::path::Path) {
    let current = self.orchestrator.current_result();
    let company_name = profile.trimmed_company_name();
    let exported = self.exporter.export_report(company_name, current.as_ref()).await;

    match exported.map_err(anyhow::Error::from).and_then(|report| report.save_to(dir)) {
      Ok(path) => logging::success(&format!("Investor report saved to {}", path.display())),
      Err(e) => logging::error(&format!("Failed to generate report. Try again. ({e})")),
    }
  }
}
