pub mod cli;
pub mod core;
pub mod providers;

use crate::core::application::{ApplicantDetails, ApplicationReview, ApplicationStatus};
use crate::core::cache::Cache;
use crate::core::catalog::{BankChanges, ProductChanges};
use crate::core::config::AppConfig;
use crate::core::filter::FilterCriteria;
use crate::providers::RestCatalogProvider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A command that needs the loaded configuration.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Products(FilterCriteria),
    Product {
        id: i64,
    },
    Estimate {
        rate: f64,
        tenure: String,
        principals: Vec<f64>,
    },
    Banks,
    Applications {
        status: Option<ApplicationStatus>,
    },
    Application {
        id: i64,
    },
    Apply {
        product_id: i64,
        applicant: ApplicantDetails,
    },
    Review {
        id: i64,
        review: ApplicationReview,
    },
    AddBank(BankChanges),
    EditBank {
        id: i64,
        changes: BankChanges,
    },
    AddProduct(ProductChanges),
    EditProduct {
        id: i64,
        changes: ProductChanges,
    },
    DeleteBank {
        id: i64,
    },
    DeleteProduct {
        id: i64,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fdx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let symbol = config.currency_symbol.as_str();
    let product_cache = Arc::new(Cache::new());
    let provider = RestCatalogProvider::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        product_cache,
    )?;

    match command {
        AppCommand::Products(criteria) => cli::products::run(&provider, &criteria, symbol).await,
        AppCommand::Product { id } => {
            cli::details::run(&provider, id, &config.principals, symbol).await
        }
        AppCommand::Estimate {
            rate,
            tenure,
            principals,
        } => {
            let principals = if principals.is_empty() {
                &config.principals
            } else {
                &principals
            };
            cli::estimate::run(rate, &tenure, principals, symbol)
        }
        AppCommand::Banks => cli::banks::run(&provider).await,
        AppCommand::Applications { status } => {
            cli::applications::list(&provider, &provider, status, symbol).await
        }
        AppCommand::Application { id } => {
            cli::applications::show(&provider, &provider, id, symbol).await
        }
        AppCommand::Apply {
            product_id,
            applicant,
        } => cli::applications::apply(&provider, &provider, product_id, applicant, symbol)
            .await
            .map(|_| ()),
        AppCommand::Review { id, review } => cli::applications::review(&provider, id, review)
            .await
            .map(|_| ()),
        AppCommand::AddBank(changes) => cli::manage::add_bank(&provider, changes).await.map(|_| ()),
        AppCommand::EditBank { id, changes } => cli::manage::edit_bank(&provider, id, changes)
            .await
            .map(|_| ()),
        AppCommand::AddProduct(changes) => cli::manage::add_product(&provider, changes)
            .await
            .map(|_| ()),
        AppCommand::EditProduct { id, changes } => {
            cli::manage::edit_product(&provider, id, changes)
                .await
                .map(|_| ())
        }
        AppCommand::DeleteBank { id } => cli::manage::delete_bank(&provider, id).await,
        AppCommand::DeleteProduct { id } => cli::manage::delete_product(&provider, id).await,
    }
}
