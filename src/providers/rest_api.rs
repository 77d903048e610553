use super::util::with_retry;
use crate::core::application::{
    Application, ApplicationProvider, ApplicationReview, ApplicationStatus, NewApplication,
};
use crate::core::cache::Cache;
use crate::core::catalog::{Bank, BankWithProducts, CatalogProvider, NewBank, NewProduct, Product};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

const RETRIES: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Client for the deposit catalog's REST backend.
pub struct RestCatalogProvider {
    base_url: String,
    client: Client,
    products: Arc<Cache<i64, Product>>,
}

impl RestCatalogProvider {
    pub fn new(base_url: &str, timeout: Duration, products: Arc<Cache<i64, Product>>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("fdx/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            products,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let mut url = Url::parse(&self.url(path))
            .with_context(|| format!("Invalid catalog URL: {}{path}", self.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        debug!(%url, "GET");
        let response = with_retry(
            || async { self.client.get(url.clone()).send().await },
            RETRIES,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;
        parse_json(check_status(response).await?).await
    }

    async fn send_json<B, T>(&self, method: reqwest::Method, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, %method, "Sending request");
        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        parse_json(check_status(response).await?).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turns a non-success response into an error carrying the backend's
/// `detail` message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|detail| match detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

    error!(%status, body = %body, "Catalog API request failed");
    Err(match detail {
        Some(detail) => anyhow!("{detail}"),
        None => anyhow!("API request failed with status {}", status.as_u16()),
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status() == StatusCode::NO_CONTENT {
        return Err(anyhow!("Expected a response body but got 204 No Content"));
    }
    let text = response
        .text()
        .await
        .context("Failed to get response text")?;
    serde_json::from_str(&text).map_err(|e| {
        error!(error = ?e, response = %text, "Failed to parse catalog response");
        anyhow!(e).context("Failed to parse catalog response")
    })
}

#[async_trait]
impl CatalogProvider for RestCatalogProvider {
    async fn list_banks(&self) -> Result<Vec<BankWithProducts>> {
        self.get_json("/banks", &[]).await
    }

    async fn get_bank(&self, id: i64) -> Result<BankWithProducts> {
        self.get_json(&format!("/banks/{id}"), &[])
            .await
            .with_context(|| format!("Failed to load bank {id}"))
    }

    async fn create_bank(&self, bank: &NewBank) -> Result<Bank> {
        self.send_json(reqwest::Method::POST, "/banks", bank)
            .await
            .context("Failed to create bank")
    }

    async fn update_bank(&self, id: i64, bank: &NewBank) -> Result<Bank> {
        self.send_json(reqwest::Method::PUT, &format!("/banks/{id}"), bank)
            .await
            .with_context(|| format!("Failed to update bank {id}"))
    }

    async fn list_products(&self, product_type: Option<&str>) -> Result<Vec<Product>> {
        let query: Vec<(&str, &str)> = product_type
            .filter(|t| !t.is_empty())
            .map(|t| vec![("type", t)])
            .unwrap_or_default();
        let products: Vec<Product> = self.get_json("/products", &query).await?;
        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    async fn get_product(&self, id: i64) -> Result<Product> {
        if let Some(cached) = self.products.get(&id).await {
            return Ok(cached);
        }
        let product: Product = self
            .get_json(&format!("/products/{id}"), &[])
            .await
            .with_context(|| format!("Failed to load product {id}"))?;
        self.products.put(id, product.clone()).await;
        Ok(product)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        self.send_json(reqwest::Method::POST, "/products", product)
            .await
            .context("Failed to create product")
    }

    // The update response carries no embedded bank, so the entry is dropped
    // rather than replaced.
    async fn update_product(&self, id: i64, product: &NewProduct) -> Result<Product> {
        let updated = self
            .send_json(reqwest::Method::PUT, &format!("/products/{id}"), product)
            .await
            .with_context(|| format!("Failed to update product {id}"))?;
        self.products.evict(&id).await;
        Ok(updated)
    }

    async fn delete_bank(&self, id: i64) -> Result<()> {
        self.delete(&format!("/banks/{id}"))
            .await
            .with_context(|| format!("Failed to delete bank {id}"))
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        self.delete(&format!("/products/{id}"))
            .await
            .with_context(|| format!("Failed to delete product {id}"))?;
        self.products.evict(&id).await;
        Ok(())
    }
}

#[async_trait]
impl ApplicationProvider for RestCatalogProvider {
    async fn list_applications(&self, status: Option<ApplicationStatus>) -> Result<Vec<Application>> {
        let status = status.map(|s| s.to_string());
        let query: Vec<(&str, &str)> = status
            .as_deref()
            .map(|s| vec![("status_filter", s)])
            .unwrap_or_default();
        self.get_json("/applications", &query).await
    }

    async fn get_application(&self, id: i64) -> Result<Application> {
        self.get_json(&format!("/applications/{id}"), &[])
            .await
            .with_context(|| format!("Failed to load application {id}"))
    }

    async fn submit_application(&self, application: &NewApplication) -> Result<Application> {
        self.send_json(reqwest::Method::POST, "/applications", application)
            .await
            .context("Failed to submit application")
    }

    async fn review_application(&self, id: i64, review: &ApplicationReview) -> Result<Application> {
        self.send_json(reqwest::Method::PUT, &format!("/applications/{id}"), review)
            .await
            .with_context(|| format!("Failed to update application {id}"))
    }
}
