//! Presentation-ready aggregates derived from a result.
//!
//! Nothing here talks to the network; renderers (the CLI, `--json` output)
//! consume [`DashboardView`] instead of poking at the raw result.

use crate::audit::{display_timestamp, EMPTY_AUDIT_MESSAGE};
use crate::model::{
  AiInsights, AnalysisResult, AuditLogEntry, Creditworthiness, ForecastPoint, NET_PROFIT,
  PROFIT_MARGIN, TOTAL_EXPENSES, TOTAL_REVENUE,
};
use serde::Serialize;

pub const NO_RECOMMENDATIONS: &str = "No immediate actions required. Good job!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
  Strong,
  Fair,
  Weak,
}

impl HealthBand {
  pub fn from_score(score: u8) -> Self {
    if score > 70 {
      HealthBand::Strong
    } else if score > 40 {
      HealthBand::Fair
    } else {
      HealthBand::Weak
    }
  }
}

pub fn clamp_score(score: i64) -> u8 {
  score.clamp(0, 100) as u8
}

/// Badge text for the creditworthiness card.
pub fn credit_badge(credit: Option<Creditworthiness>) -> String {
  match credit {
    Some(Creditworthiness::High) => "High Confidence".to_string(),
    Some(other) => format!("{} Risk", other.as_str()),
    None => "Unrated".to_string(),
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
  pub name: &'static str,
  pub amount: f64,
}

/// Revenue, expenses and profit, in that order. Missing figures chart as zero.
pub fn headline_bars(result: &AnalysisResult) -> Vec<ChartBar> {
  [("Revenue", TOTAL_REVENUE), ("Expenses", TOTAL_EXPENSES), ("Profit", NET_PROFIT)]
    .into_iter()
    .map(|(name, key)| ChartBar { name, amount: result.metric(key).unwrap_or(0.0) })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseShare {
  pub category: String,
  pub value: f64,
  pub percent: f64,
}

/// Breakdown entries with their share of the total, in service order.
pub fn expense_shares(result: &AnalysisResult) -> Vec<ExpenseShare> {
  let Some(bookkeeping) = &result.bookkeeping else {
    return Vec::new();
  };

  let total: f64 = bookkeeping.breakdown.iter().map(|entry| entry.value.abs()).sum();
  bookkeeping
    .breakdown
    .iter()
    .map(|entry| ExpenseShare {
      category: entry.category.clone(),
      value: entry.value,
      percent: if total > 0.0 { entry.value.abs() / total * 100.0 } else { 0.0 },
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRow {
  pub timestamp: String,
  pub company_name: String,
  pub action_type: String,
  pub ai_model: String,
  pub decision_summary: String,
}

impl From<&AuditLogEntry> for AuditRow {
  fn from(entry: &AuditLogEntry) -> Self {
    Self {
      timestamp: display_timestamp(&entry.timestamp),
      company_name: entry.company_name.clone(),
      action_type: entry.action_type.clone(),
      ai_model: entry.ai_model.clone(),
      decision_summary: entry.decision_summary.clone(),
    }
  }
}

/// Everything the dashboard shows for one Ready result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
  pub health_score: u8,
  pub health_band: HealthBand,
  pub net_profit: f64,
  pub total_revenue: f64,
  pub total_expenses: f64,
  pub profit_margin: String,
  pub bars: Vec<ChartBar>,
  pub revenue_forecast: Vec<ForecastPoint>,
  pub credit_badge: String,
  pub insights: AiInsights,
  pub expense_shares: Vec<ExpenseShare>,
  pub recommendations: Vec<String>,
  pub audit: Vec<AuditRow>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub audit_notice: Option<&'static str>,
}

impl DashboardView {
  pub fn build(result: &AnalysisResult, insights: &AiInsights, audit: &[AuditLogEntry]) -> Self {
    let health_score = clamp_score(result.health_score);
    let recommendations = match &result.working_capital {
      Some(wc) if wc.recommendations.is_empty() => vec![NO_RECOMMENDATIONS.to_string()],
      Some(wc) => wc.recommendations.clone(),
      None => Vec::new(),
    };

    Self {
      health_score,
      health_band: HealthBand::from_score(health_score),
      net_profit: result.metric(NET_PROFIT).unwrap_or(0.0),
      total_revenue: result.metric(TOTAL_REVENUE).unwrap_or(0.0),
      total_expenses: result.metric(TOTAL_EXPENSES).unwrap_or(0.0),
      profit_margin: result
        .metrics
        .get(PROFIT_MARGIN)
        .map(|margin| margin.to_string())
        .unwrap_or_else(|| "N/A".to_string()),
      bars: headline_bars(result),
      revenue_forecast: result
        .forecast
        .as_ref()
        .map(|forecast| forecast.revenue_forecast.clone())
        .unwrap_or_default(),
      credit_badge: credit_badge(insights.creditworthiness),
      insights: insights.clone(),
      expense_shares: expense_shares(result),
      recommendations,
      audit: audit.iter().map(AuditRow::from).collect(),
      audit_notice: audit.is_empty().then_some(EMPTY_AUDIT_MESSAGE),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::normalize;
  use serde_json::json;

  fn result(raw: serde_json::Value) -> AnalysisResult {
    serde_json::from_value(raw).unwrap()
  }

  #[test]
  fn test_health_bands() {
    assert_eq!(HealthBand::from_score(71), HealthBand::Strong);
    assert_eq!(HealthBand::from_score(70), HealthBand::Fair);
    assert_eq!(HealthBand::from_score(41), HealthBand::Fair);
    assert_eq!(HealthBand::from_score(40), HealthBand::Weak);
    assert_eq!(clamp_score(140), 100);
    assert_eq!(clamp_score(-3), 0);
  }

  #[test]
  fn test_credit_badge() {
    assert_eq!(credit_badge(Some(Creditworthiness::High)), "High Confidence");
    assert_eq!(credit_badge(Some(Creditworthiness::Medium)), "Medium Risk");
    assert_eq!(credit_badge(Some(Creditworthiness::Low)), "Low Risk");
    assert_eq!(credit_badge(None), "Unrated");
  }

  #[test]
  fn test_headline_bars_default_missing_to_zero() {
    let r = result(json!({"metrics": {"Total Revenue": 1000}, "health_score": 50}));
    let bars = headline_bars(&r);
    assert_eq!(bars.iter().map(|b| b.name).collect::<Vec<_>>(), ["Revenue", "Expenses", "Profit"]);
    assert_eq!(bars[0].amount, 1000.0);
    assert_eq!(bars[1].amount, 0.0);
  }

  #[test]
  fn test_expense_shares() {
    let r = result(json!({
      "metrics": {},
      "health_score": 50,
      "bookkeeping": {"breakdown": [{"name": "Payroll", "value": 300.0}, {"name": "Rent", "value": 100.0}]}
    }));
    let shares = expense_shares(&r);
    assert_eq!(shares[0].percent, 75.0);
    assert_eq!(shares[1].percent, 25.0);
  }

  #[test]
  fn test_build_view() {
    let r = result(json!({
      "metrics": {"Total Revenue": 1000, "Total Expenses": 600, "Net Profit": 400, "Profit Margin": "40%"},
      "health_score": 72,
      "forecast": {"revenue_forecast": [{"date": "Jun 2024", "amount": 1020.0}], "expense_forecast": []},
      "working_capital": {"burn_rate": 600.0, "marketing_efficiency": 0.0, "recommendations": []},
      "ai_analysis": "```json\n{\"executive_summary\":\"Healthy\",\"creditworthiness\":\"High\"}\n```"
    }));
    let insights = normalize(&r);
    let view = DashboardView::build(&r, &insights, &[]);

    assert_eq!(view.health_score, 72);
    assert_eq!(view.health_band, HealthBand::Strong);
    assert_eq!(view.net_profit, 400.0);
    assert_eq!(view.profit_margin, "40%");
    assert_eq!(view.revenue_forecast.len(), 1);
    assert_eq!(view.credit_badge, "High Confidence");
    assert_eq!(view.insights.executive_summary, "Healthy");
    assert_eq!(view.recommendations, vec![NO_RECOMMENDATIONS.to_string()]);
    assert_eq!(view.audit_notice, Some(EMPTY_AUDIT_MESSAGE));
  }
}
