use super::Dashboard;
use crate::dashboard::AuditRow;
use crate::display;
use anyhow::Result;

pub async fn handle(dashboard: &Dashboard, json: bool) -> Result<()> {
  let rows: Vec<AuditRow> = dashboard.audit().entries().iter().map(AuditRow::from).collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
  } else {
    display::render_audit(&rows);
  }
  Ok(())
}
