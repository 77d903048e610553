//! Catalog maintenance commands: adding, editing and deleting banks and products.

use super::ui;
use crate::core::catalog::{
    Bank, BankChanges, CatalogProvider, NewBank, NewProduct, Product, ProductChanges,
};
use anyhow::Result;
use tracing::{debug, info};

fn bank_saved(bank: &Bank, action: &str) -> String {
    format!(
        "Bank {} {action}: {}",
        bank.id,
        ui::style_text(&bank.name, ui::StyleType::Highlight)
    )
}

fn product_saved(product: &Product, action: &str) -> String {
    let name = if product.name.is_empty() {
        &product.product_type
    } else {
        &product.name
    };
    format!(
        "Product {} {action}: {} ({}, {})",
        product.id,
        ui::style_text(name, ui::StyleType::Highlight),
        ui::format_rate(product.interest_rate),
        product.tenure
    )
}

pub async fn add_bank(
    provider: &(dyn CatalogProvider + Send + Sync),
    changes: BankChanges,
) -> Result<Bank> {
    let body = NewBank::create(changes)?;
    let bank = provider.create_bank(&body).await?;
    info!(bank_id = bank.id, "Created bank");
    println!("{}", bank_saved(&bank, "created"));
    Ok(bank)
}

/// Loads the bank, applies `changes` and saves the full record.
pub async fn edit_bank(
    provider: &(dyn CatalogProvider + Send + Sync),
    id: i64,
    changes: BankChanges,
) -> Result<Bank> {
    let stored = provider.get_bank(id).await?;
    let body = NewBank::edit(&stored.bank, changes)?;
    debug!(?body, "Updating bank {id}");
    let bank = provider.update_bank(id, &body).await?;
    info!(bank_id = id, "Updated bank");
    println!("{}", bank_saved(&bank, "updated"));
    Ok(bank)
}

pub async fn add_product(
    provider: &(dyn CatalogProvider + Send + Sync),
    changes: ProductChanges,
) -> Result<Product> {
    let body = NewProduct::create(changes)?;
    let product = provider.create_product(&body).await?;
    info!(product_id = product.id, bank_id = product.bank_id, "Created product");
    println!("{}", product_saved(&product, "created"));
    Ok(product)
}

/// Loads the product, applies `changes` and saves the full record.
pub async fn edit_product(
    provider: &(dyn CatalogProvider + Send + Sync),
    id: i64,
    changes: ProductChanges,
) -> Result<Product> {
    let stored = provider.get_product(id).await?;
    let body = NewProduct::edit(&stored, changes)?;
    debug!(?body, "Updating product {id}");
    let product = provider.update_product(id, &body).await?;
    info!(product_id = id, "Updated product");
    println!("{}", product_saved(&product, "updated"));
    Ok(product)
}

pub async fn delete_bank(provider: &(dyn CatalogProvider + Send + Sync), id: i64) -> Result<()> {
    provider.delete_bank(id).await?;
    info!(bank_id = id, "Deleted bank");
    println!("Bank {id} deleted");
    Ok(())
}

pub async fn delete_product(provider: &(dyn CatalogProvider + Send + Sync), id: i64) -> Result<()> {
    provider.delete_product(id).await?;
    info!(product_id = id, "Deleted product");
    println!("Product {id} deleted");
    Ok(())
}
