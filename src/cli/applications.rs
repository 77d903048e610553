use super::ui;
use crate::core::application::{
    ApplicantDetails, Application, ApplicationProvider, ApplicationReview, ApplicationStatus,
    NewApplication,
};
use crate::core::catalog::CatalogProvider;
use anyhow::Result;
use comfy_table::{Cell, Color};
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

fn status_cell(status: ApplicationStatus) -> Cell {
    let color = match status {
        ApplicationStatus::Pending => Color::Yellow,
        ApplicationStatus::Approved => Color::Green,
        ApplicationStatus::Rejected => Color::Red,
        ApplicationStatus::Other => Color::DarkGrey,
    };
    Cell::new(status).fg(color)
}

/// Resolves a display label for every product referenced by `applications`.
///
/// Lookups run concurrently; a product that fails to load is labelled by its
/// id instead of failing the whole listing.
pub async fn product_labels(
    catalog: &(dyn CatalogProvider + Send + Sync),
    applications: &[Application],
) -> HashMap<i64, String> {
    let ids: BTreeSet<i64> = applications.iter().map(|a| a.product_id).collect();
    if ids.is_empty() {
        return HashMap::new();
    }

    let pb = ui::new_progress_bar(ids.len() as u64, "Resolving products...");
    let futures = ids.into_iter().map(|id| {
        let pb_clone = pb.clone();
        async move {
            let label = match catalog.get_product(id).await {
                Ok(product) => product.label(),
                Err(e) => {
                    debug!("Could not resolve product {}: {:#}", id, e);
                    format!("Product #{id}")
                }
            };
            pb_clone.inc(1);
            (id, label)
        }
    });
    let labels = join_all(futures).await.into_iter().collect();
    pb.finish_and_clear();
    labels
}

pub fn render_applications(
    applications: &[Application],
    labels: &HashMap<i64, String>,
    currency_symbol: &str,
) -> String {
    if applications.is_empty() {
        return ui::style_text("No applications found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Applicant"),
        ui::header_cell("Phone"),
        ui::header_cell("Product"),
        ui::header_cell("Amount"),
        ui::header_cell("Tenure"),
        ui::header_cell("Status"),
        ui::header_cell("Submitted"),
    ]);

    for app in applications {
        let product = labels
            .get(&app.product_id)
            .cloned()
            .unwrap_or_else(|| format!("Product #{}", app.product_id));
        table.add_row(vec![
            Cell::new(app.id),
            Cell::new(&app.applicant_name),
            Cell::new(&app.phone),
            Cell::new(product),
            ui::amount_cell(currency_symbol, app.deposit_amount),
            Cell::new(&app.tenure_selected),
            status_cell(app.status),
            ui::format_optional_cell(app.created_at, |ts| ts.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_application(app: &Application, product_label: &str, currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let rows: Vec<(&str, Cell)> = vec![
        ("Product", Cell::new(product_label)),
        ("Applicant", Cell::new(&app.applicant_name)),
        ("Phone", Cell::new(&app.phone)),
        ("Email", Cell::new(optional(&app.email))),
        ("NID", Cell::new(optional(&app.nid_number))),
        ("Address", Cell::new(optional(&app.address))),
        ("Deposit Amount", ui::amount_cell(currency_symbol, app.deposit_amount)),
        ("Tenure", Cell::new(&app.tenure_selected)),
        ("Status", status_cell(app.status)),
        ("Notes", Cell::new(optional(&app.notes))),
        ("Reviewed By", Cell::new(optional(&app.reviewed_by))),
        (
            "Reviewed At",
            ui::format_optional_cell(app.reviewed_at, |ts| ts.to_rfc3339()),
        ),
        (
            "Submitted",
            ui::format_optional_cell(app.created_at, |ts| ts.to_rfc3339()),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value]);
    }
    format!(
        "Application #{}\n\n{table}",
        ui::style_text(&app.id.to_string(), ui::StyleType::Title)
    )
}

pub async fn list(
    applications: &(dyn ApplicationProvider + Send + Sync),
    catalog: &(dyn CatalogProvider + Send + Sync),
    status: Option<ApplicationStatus>,
    currency_symbol: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching applications...");
    let result = applications.list_applications(status).await;
    spinner.finish_and_clear();
    let apps = result?;

    let labels = product_labels(catalog, &apps).await;
    println!("{}", render_applications(&apps, &labels, currency_symbol));
    Ok(())
}

pub async fn show(
    applications: &(dyn ApplicationProvider + Send + Sync),
    catalog: &(dyn CatalogProvider + Send + Sync),
    id: i64,
    currency_symbol: &str,
) -> Result<()> {
    let app = applications.get_application(id).await?;
    let labels = product_labels(catalog, std::slice::from_ref(&app)).await;
    let label = labels.get(&app.product_id).map_or("-", String::as_str);
    println!("{}", render_application(&app, label, currency_symbol));
    Ok(())
}

/// Submits an application for `product_id`, validating it against the
/// product before anything is sent.
pub async fn apply(
    applications: &(dyn ApplicationProvider + Send + Sync),
    catalog: &(dyn CatalogProvider + Send + Sync),
    product_id: i64,
    applicant: ApplicantDetails,
    currency_symbol: &str,
) -> Result<Application> {
    let product = catalog.get_product(product_id).await?;
    let new_application = NewApplication::for_product(&product, applicant)?;

    let created = applications.submit_application(&new_application).await?;
    info!(application_id = created.id, product_id, "Submitted application");
    println!(
        "Application #{} submitted for {} ({}). The bank will contact you within 24-48 hours.",
        created.id,
        product.label(),
        ui::format_money(currency_symbol, created.deposit_amount)
    );
    Ok(created)
}

pub async fn review(
    applications: &(dyn ApplicationProvider + Send + Sync),
    id: i64,
    review: ApplicationReview,
) -> Result<Application> {
    let updated = applications.review_application(id, &review).await?;
    info!(application_id = id, status = %updated.status, "Reviewed application");
    println!("Application #{} is now {}", updated.id, updated.status);
    Ok(updated)
}
