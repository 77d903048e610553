use super::ui;
use crate::core::catalog::{CatalogProvider, Product};
use crate::core::filter::{FilterCriteria, filter_products};
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

/// Number of key features shown per product in the listing.
const FEATURES_IN_LISTING: usize = 3;

/// Fetches the catalog and applies `criteria`.
///
/// The type criterion is sent to the backend and applied again locally, so
/// the result is the same whichever side honours it.
pub async fn fetch_filtered(
    provider: &(dyn CatalogProvider + Send + Sync),
    criteria: &FilterCriteria,
) -> Result<Vec<Product>> {
    let products = provider
        .list_products(criteria.product_type.as_deref())
        .await?;
    let filtered = filter_products(&products, criteria);
    debug!(
        fetched = products.len(),
        shown = filtered.len(),
        ?criteria,
        "Filtered product listing"
    );
    Ok(filtered)
}

pub fn render_products(products: &[Product], currency_symbol: &str) -> String {
    if products.is_empty() {
        return ui::style_text("No products found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Bank"),
        ui::header_cell("Type"),
        ui::header_cell("Rate (p.a.)"),
        ui::header_cell("Min. Deposit"),
        ui::header_cell("Tenure"),
        ui::header_cell("Key Features"),
    ]);

    for product in products {
        let features = product
            .key_features()
            .into_iter()
            .take(FEATURES_IN_LISTING)
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(product.id),
            Cell::new(product.bank_name()),
            Cell::new(&product.product_type),
            ui::rate_cell(product.interest_rate),
            ui::amount_cell(currency_symbol, product.min_deposit),
            Cell::new(&product.tenure),
            Cell::new(features),
        ]);
    }

    format!("{table}\n\n{}", count_line(products.len()))
}

fn count_line(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    ui::style_text(&format!("{count} product{plural} found"), ui::StyleType::Heading)
}

pub async fn run(
    provider: &(dyn CatalogProvider + Send + Sync),
    criteria: &FilterCriteria,
    currency_symbol: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching products...");
    let result = fetch_filtered(provider, criteria).await;
    spinner.finish_and_clear();

    println!("{}", render_products(&result?, currency_symbol));
    Ok(())
}
