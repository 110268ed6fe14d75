use crate::dashboard::{AuditRow, DashboardView, HealthBand};
use crate::logging;
use colored::*;

const WIDTH: usize = 72;

/// Format an amount with thousands separators and two decimals.
pub fn format_money(amount: f64) -> String {
  let negative = amount < 0.0;
  let fixed = format!("{:.2}", amount.abs());
  let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  format!("{}${grouped}.{cents}", if negative { "-" } else { "" })
}

fn heading(title: &str) {
  println!();
  println!("{}", title.bold());
  println!("{}", logging::rule(WIDTH, '-'));
}

fn bullet_list(items: &[String]) {
  for item in items {
    println!("  • {item}");
  }
}

pub fn render_dashboard(view: &DashboardView) {
  let score = view.health_score.to_string();
  let score = match view.health_band {
    HealthBand::Strong => score.green().bold(),
    HealthBand::Fair => score.yellow().bold(),
    HealthBand::Weak => score.red().bold(),
  };

  heading("Financial Health");
  println!("  Health score    {score} / 100");
  println!("  Net profit      {}  ({} margin)", format_money(view.net_profit), view.profit_margin);
  println!("  Total revenue   {}", format_money(view.total_revenue));
  println!("  Total expenses  {}", format_money(view.total_expenses));

  if !view.revenue_forecast.is_empty() {
    heading("Revenue Forecast");
    for point in &view.revenue_forecast {
      println!("  {:<10} {}", point.date, format_money(point.amount));
    }
  }

  heading(&format!("AI Insights  [{}]", view.credit_badge));
  for line in view.insights.executive_summary.lines() {
    println!("  {line}");
  }
  if let Some(risk) = &view.insights.risk_assessment {
    println!();
    println!("  {} {risk}", "Risk:".bold());
  }
  if let Some(strategies) = view.insights.cost_optimization.as_deref().filter(|s| !s.is_empty()) {
    println!();
    println!("  {}", "Cost optimization".bold());
    bullet_list(strategies);
  }
  if let Some(products) = view.insights.recommended_products.as_deref().filter(|p| !p.is_empty()) {
    println!();
    println!("  {}", "Recommended products".bold());
    bullet_list(products);
  }

  if !view.expense_shares.is_empty() {
    heading("Expense Breakdown");
    for share in &view.expense_shares {
      let amount = format_money(share.value);
      println!("  {:<24} {:>14}  {:>5.1}%", share.category, amount, share.percent);
    }
  }

  if !view.recommendations.is_empty() {
    heading("Working Capital");
    bullet_list(&view.recommendations);
  }

  render_audit(&view.audit);
}

pub fn render_audit(rows: &[AuditRow]) {
  heading("AI Regulatory Audit Log");
  if rows.is_empty() {
    println!("  {}", crate::audit::EMPTY_AUDIT_MESSAGE.italic());
    return;
  }

  for row in rows {
    println!(
      "  {}  {:<20} {:<22} {:<10} {}",
      row.timestamp,
      row.company_name,
      row.action_type,
      row.ai_model,
      row.decision_summary.blue()
    );
  }
}
