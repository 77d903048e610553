pub mod rest_api;
pub mod util;

pub use rest_api::RestCatalogProvider;
