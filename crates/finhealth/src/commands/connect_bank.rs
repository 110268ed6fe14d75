use super::{Dashboard, OutputOptions};
use crate::config::{CompanyProfile, KNOWN_BANKS};
use crate::logging;
use crate::source::SourceSelection;
use anyhow::Result;

pub async fn handle(
  dashboard: &Dashboard,
  profile: &CompanyProfile,
  bank: &str,
  options: &OutputOptions,
) -> Result<()> {
  if !KNOWN_BANKS.iter().any(|known| known.eq_ignore_ascii_case(bank.trim())) {
    logging::warn(&format!("'{bank}' is not one of the usual banks ({})", KNOWN_BANKS.join(", ")));
  }

  logging::info(&format!("Connecting to {bank} for {}", profile.company_name));
  let selection = SourceSelection::Bank(bank.to_string());
  let outcome = dashboard.orchestrator.run(selection, profile).await;
  dashboard.present(outcome, profile, options, "Bank connection failed").await
}
