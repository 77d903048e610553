use super::ui;
use crate::core::catalog::{BankWithProducts, CatalogProvider};
use anyhow::Result;
use comfy_table::{Cell, Color};

pub fn render_banks(banks: &[BankWithProducts]) -> String {
    if banks.is_empty() {
        return ui::style_text("No banks found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Bank"),
        ui::header_cell("Products"),
        ui::header_cell("Contact"),
        ui::header_cell("Website"),
        ui::header_cell("Status"),
    ]);

    for entry in banks {
        let bank = &entry.bank;
        let status = if bank.is_active {
            Cell::new("Active").fg(Color::Green)
        } else {
            Cell::new("Inactive").fg(Color::DarkGrey)
        };
        let contact = [bank.contact_number.as_deref(), bank.email.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(bank.id),
            Cell::new(&bank.name),
            Cell::new(entry.products.len()),
            Cell::new(if contact.is_empty() { "-".to_string() } else { contact }),
            Cell::new(bank.website.as_deref().unwrap_or("-")),
            status,
        ]);
    }
    table.to_string()
}

pub async fn run(provider: &(dyn CatalogProvider + Send + Sync)) -> Result<()> {
    let spinner = ui::new_spinner("Fetching banks...");
    let banks = provider.list_banks().await;
    spinner.finish_and_clear();

    println!("{}", render_banks(&banks?));
    Ok(())
}
