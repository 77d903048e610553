use super::ui;
use crate::core::catalog::{CatalogProvider, Product};
use crate::core::estimate::{ReturnEstimate, estimate_for_product};
use anyhow::Result;
use comfy_table::Cell;

/// Everything shown on a product's detail page.
pub struct ProductDetails {
    pub product: Product,
    pub estimates: Vec<ReturnEstimate>,
}

impl ProductDetails {
    pub fn new(product: Product, principals: &[f64]) -> Self {
        let estimates = estimate_for_product(&product, principals);
        Self { product, estimates }
    }

    pub fn display_as_text(&self, currency_symbol: &str) -> String {
        let p = &self.product;
        let mut output = format!(
            "{}\n{}  {}\n\n",
            ui::style_text(p.bank_name(), ui::StyleType::Title),
            p.product_type,
            ui::style_text(
                &format!("{} p.a.", ui::format_rate(p.interest_rate)),
                ui::StyleType::Highlight
            ),
        );

        section(
            &mut output,
            "Overview",
            p.product_overview
                .as_deref()
                .unwrap_or("No overview available"),
        );
        section(
            &mut output,
            "Key Features",
            &ui::bullet_list(&p.key_features(), "No features listed"),
        );
        section(
            &mut output,
            "Withdrawal Rules",
            p.withdrawal_rules
                .as_deref()
                .unwrap_or("Standard withdrawal rules apply"),
        );
        section(
            &mut output,
            "Eligibility",
            p.eligibility_criteria
                .as_deref()
                .unwrap_or("Contact bank for eligibility details"),
        );
        section(
            &mut output,
            "Required Documents",
            &ui::bullet_list(
                &p.required_documents(),
                "Contact bank for document requirements",
            ),
        );

        section(&mut output, "Quick Facts", &self.facts_table(currency_symbol));
        section(
            &mut output,
            "Estimated Returns",
            &self.returns_table(currency_symbol),
        );
        output.push_str(&ui::style_text(
            "Estimates use simple interest and are indicative only.",
            ui::StyleType::Subtle,
        ));
        output
    }

    fn facts_table(&self, currency_symbol: &str) -> String {
        let p = &self.product;
        let mut table = ui::new_styled_table();
        table.add_row(vec![
            Cell::new("Min. Deposit"),
            ui::amount_cell(currency_symbol, p.min_deposit),
        ]);
        table.add_row(vec![
            Cell::new("Max. Deposit"),
            ui::format_optional_cell(p.max_deposit, |v| ui::format_money(currency_symbol, v)),
        ]);
        table.add_row(vec![Cell::new("Tenure"), Cell::new(&p.tenure)]);
        if let Some(compounding) = &p.compounding_frequency {
            table.add_row(vec![Cell::new("Compounding"), Cell::new(compounding)]);
        }
        if let Some(penalty) = &p.premature_withdrawal_penalty {
            table.add_row(vec![Cell::new("Early Withdrawal Penalty"), Cell::new(penalty)]);
        }
        table.to_string()
    }

    fn returns_table(&self, currency_symbol: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Deposit"),
            ui::header_cell("Interest"),
            ui::header_cell("Maturity Amount"),
        ]);
        for estimate in &self.estimates {
            table.add_row(vec![
                ui::amount_cell(currency_symbol, estimate.principal),
                ui::amount_cell(currency_symbol, estimate.interest_earned()),
                ui::amount_cell(currency_symbol, estimate.maturity_amount as f64),
            ]);
        }
        table.to_string()
    }
}

fn section(output: &mut String, title: &str, body: &str) {
    output.push_str(&ui::style_text(title, ui::StyleType::Heading));
    output.push('\n');
    output.push_str(body);
    output.push_str("\n\n");
}

pub async fn run(
    provider: &(dyn CatalogProvider + Send + Sync),
    product_id: i64,
    principals: &[f64],
    currency_symbol: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching product...");
    let product = provider.get_product(product_id).await;
    spinner.finish_and_clear();

    let details = ProductDetails::new(product?, principals);
    println!("{}", details.display_as_text(currency_symbol));
    Ok(())
}
