use super::ui;
use crate::core::estimate::{ReturnEstimate, estimate_returns};
use anyhow::{Result, bail};
use comfy_table::Cell;

pub fn render_estimates(estimates: &[ReturnEstimate], tenure: &str, currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Deposit"),
        ui::header_cell("Rate (p.a.)"),
        ui::header_cell("Years"),
        ui::header_cell("Interest"),
        ui::header_cell("Maturity Amount"),
    ]);
    for e in estimates {
        table.add_row(vec![
            ui::amount_cell(currency_symbol, e.principal),
            ui::rate_cell(e.annual_rate * 100.0),
            Cell::new(format!("{:.2}", e.tenure_years)),
            ui::amount_cell(currency_symbol, e.interest_earned()),
            ui::amount_cell(currency_symbol, e.maturity_amount as f64),
        ]);
    }
    format!(
        "Tenure: {}\n\n{table}",
        ui::style_text(tenure, ui::StyleType::Heading)
    )
}

/// Offline calculator: no backend request is made.
pub fn run(rate_percent: f64, tenure: &str, principals: &[f64], currency_symbol: &str) -> Result<()> {
    if !rate_percent.is_finite() || rate_percent < 0.0 {
        bail!("Interest rate must be a non-negative percentage, got {rate_percent}");
    }
    if let Some(bad) = principals.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        bail!("Deposit amounts must be positive, got {bad}");
    }

    let estimates = estimate_returns(rate_percent, tenure, principals);
    println!("{}", render_estimates(&estimates, tenure, currency_symbol));
    Ok(())
}
