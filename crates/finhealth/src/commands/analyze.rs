use super::{Dashboard, OutputOptions};
use crate::config::CompanyProfile;
use crate::logging;
use crate::model::SourceDocument;
use crate::source::SourceSelection;
use anyhow::Result;
use std::path::PathBuf;

pub async fn handle(
  dashboard: &Dashboard,
  profile: &CompanyProfile,
  file: Option<PathBuf>,
  options: &OutputOptions,
) -> Result<()> {
  let document = match file {
    Some(path) => Some(SourceDocument::from_path(&path)?),
    None => None,
  };

  if let Some(document) = &document {
    logging::info(&format!(
      "Analyzing {} for {} ({})",
      document.file_name, profile.company_name, profile.industry
    ));
  }

  let outcome = dashboard.orchestrator.run(SourceSelection::File(document), profile).await;
  dashboard.present(outcome, profile, options, "Analysis failed").await
}
