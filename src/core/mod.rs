//! Core catalog model and the pure filtering/estimation logic

pub mod application;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod estimate;
pub mod filter;
pub mod log;
pub mod tenure;

// Re-export main types for cleaner imports
pub use application::{Application, ApplicationProvider, ApplicationReview, ApplicationStatus};
pub use catalog::{
    Bank, BankChanges, BankWithProducts, CatalogProvider, NewBank, NewProduct, Product,
    ProductChanges,
};
pub use estimate::{ReturnEstimate, estimate_maturity};
pub use filter::{FilterCriteria, filter_products};
pub use tenure::parse_tenure_years;
