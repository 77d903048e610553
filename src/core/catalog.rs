//! Catalog data model and the backend seam for banks and products.

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Bank {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A bank as listed by the backend, together with its products.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BankWithProducts {
    #[serde(flatten)]
    pub bank: Bank,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A deposit product offered by a bank.
///
/// `interest_rate` is a percentage (7.5 means 7.5% a year) and `tenure` is
/// free text such as "12 months".
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub bank_id: i64,
    #[serde(default)]
    pub bank: Option<Bank>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub interest_rate: f64,
    #[serde(default)]
    pub min_deposit: f64,
    #[serde(default)]
    pub tenure: String,
    pub product_overview: Option<String>,
    pub key_features: Option<String>,
    pub withdrawal_rules: Option<String>,
    pub eligibility_criteria: Option<String>,
    pub required_documents: Option<String>,
    pub max_deposit: Option<f64>,
    pub compounding_frequency: Option<String>,
    pub premature_withdrawal_penalty: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Product {
    /// Name of the owning bank, or an empty string if the backend did not
    /// embed it.
    pub fn bank_name(&self) -> &str {
        self.bank.as_ref().map_or("", |b| b.name.as_str())
    }

    pub fn key_features(&self) -> Vec<&str> {
        split_pipe_list(self.key_features.as_deref())
    }

    pub fn required_documents(&self) -> Vec<&str> {
        split_pipe_list(self.required_documents.as_deref())
    }

    /// Annual rate as a fraction, e.g. 0.075 for 7.5%.
    pub fn annual_rate(&self) -> f64 {
        self.interest_rate / 100.0
    }

    /// Short label used wherever a product is referenced, e.g. "Alpha Bank's FD".
    pub fn label(&self) -> String {
        match self.bank_name() {
            "" => self.product_type.clone(),
            bank => format!("{bank}'s {}", self.product_type),
        }
    }
}

fn split_pipe_list(text: Option<&str>) -> Vec<&str> {
    text.map(|t| {
        t.split('|')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Trims `field`, mapping blank text to `None` so it is sent as `null`.
fn blank_to_none(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(field: Option<String>, what: &str) -> Result<String> {
    match blank_to_none(field) {
        Some(value) => Ok(value),
        None => bail!("{what} is required"),
    }
}

/// Fields supplied when adding or editing a bank. `None` means "not given";
/// on edit, an empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
}

/// Full bank body sent on create and update. Every field is always present,
/// blank optionals as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBank {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

impl NewBank {
    pub fn create(changes: BankChanges) -> Result<Self> {
        Ok(Self {
            name: required(changes.name, "Bank name")?,
            description: blank_to_none(changes.description),
            website: blank_to_none(changes.website),
            contact_number: blank_to_none(changes.contact_number),
            email: blank_to_none(changes.email),
            is_active: true,
        })
    }

    /// Starts from the stored `bank` and applies whatever `changes` carries.
    pub fn edit(bank: &Bank, changes: BankChanges) -> Result<Self> {
        let merged = BankChanges {
            name: changes.name.or_else(|| Some(bank.name.clone())),
            description: changes.description.or_else(|| bank.description.clone()),
            website: changes.website.or_else(|| bank.website.clone()),
            contact_number: changes
                .contact_number
                .or_else(|| bank.contact_number.clone()),
            email: changes.email.or_else(|| bank.email.clone()),
        };
        Self::create(merged)
    }
}

/// Fields supplied when adding or editing a product. Same conventions as
/// [`BankChanges`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub bank_id: Option<i64>,
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub interest_rate: Option<f64>,
    pub min_deposit: Option<f64>,
    /// Zero clears the maximum.
    pub max_deposit: Option<f64>,
    pub tenure: Option<String>,
    pub product_overview: Option<String>,
    pub key_features: Option<String>,
    pub withdrawal_rules: Option<String>,
    pub eligibility_criteria: Option<String>,
    pub required_documents: Option<String>,
    pub compounding_frequency: Option<String>,
    pub premature_withdrawal_penalty: Option<String>,
}

/// Full product body sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub bank_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub interest_rate: f64,
    pub min_deposit: f64,
    pub max_deposit: Option<f64>,
    pub tenure: String,
    pub product_overview: Option<String>,
    pub key_features: Option<String>,
    pub withdrawal_rules: Option<String>,
    pub eligibility_criteria: Option<String>,
    pub required_documents: Option<String>,
    pub compounding_frequency: Option<String>,
    pub premature_withdrawal_penalty: Option<String>,
    pub is_active: bool,
}

impl NewProduct {
    pub fn create(changes: ProductChanges) -> Result<Self> {
        let Some(bank_id) = changes.bank_id else {
            bail!("Bank is required");
        };
        let Some(interest_rate) = changes.interest_rate else {
            bail!("Interest rate is required");
        };
        if !interest_rate.is_finite() || interest_rate < 0.0 {
            bail!("Interest rate must be zero or more");
        }
        let min_deposit = changes.min_deposit.unwrap_or(0.0);
        if !min_deposit.is_finite() || min_deposit < 0.0 {
            bail!("Minimum deposit must be zero or more");
        }
        let max_deposit = changes.max_deposit.filter(|max| *max != 0.0);
        if let Some(max) = max_deposit
            && !(max.is_finite() && max >= min_deposit)
        {
            bail!("Maximum deposit {max} is below the minimum deposit of {min_deposit}");
        }

        Ok(Self {
            bank_id,
            name: required(changes.name, "Product name")?,
            product_type: required(changes.product_type, "Product type")?,
            interest_rate,
            min_deposit,
            max_deposit,
            tenure: required(changes.tenure, "Tenure")?,
            product_overview: blank_to_none(changes.product_overview),
            key_features: blank_to_none(changes.key_features),
            withdrawal_rules: blank_to_none(changes.withdrawal_rules),
            eligibility_criteria: blank_to_none(changes.eligibility_criteria),
            required_documents: blank_to_none(changes.required_documents),
            compounding_frequency: blank_to_none(changes.compounding_frequency),
            premature_withdrawal_penalty: blank_to_none(changes.premature_withdrawal_penalty),
            is_active: true,
        })
    }

    /// Starts from the stored `product` and applies whatever `changes` carries.
    pub fn edit(product: &Product, changes: ProductChanges) -> Result<Self> {
        let keep = |given: Option<String>, stored: &Option<String>| given.or_else(|| stored.clone());
        let merged = ProductChanges {
            bank_id: changes.bank_id.or(Some(product.bank_id)),
            name: changes.name.or_else(|| Some(product.name.clone())),
            product_type: changes
                .product_type
                .or_else(|| Some(product.product_type.clone())),
            interest_rate: changes.interest_rate.or(Some(product.interest_rate)),
            min_deposit: changes.min_deposit.or(Some(product.min_deposit)),
            max_deposit: changes.max_deposit.or(product.max_deposit),
            tenure: changes.tenure.or_else(|| Some(product.tenure.clone())),
            product_overview: keep(changes.product_overview, &product.product_overview),
            key_features: keep(changes.key_features, &product.key_features),
            withdrawal_rules: keep(changes.withdrawal_rules, &product.withdrawal_rules),
            eligibility_criteria: keep(changes.eligibility_criteria, &product.eligibility_criteria),
            required_documents: keep(changes.required_documents, &product.required_documents),
            compounding_frequency: keep(
                changes.compounding_frequency,
                &product.compounding_frequency,
            ),
            premature_withdrawal_penalty: keep(
                changes.premature_withdrawal_penalty,
                &product.premature_withdrawal_penalty,
            ),
        };
        Self::create(merged)
    }
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn list_banks(&self) -> Result<Vec<BankWithProducts>>;
    async fn get_bank(&self, id: i64) -> Result<BankWithProducts>;
    async fn create_bank(&self, bank: &NewBank) -> Result<Bank>;
    async fn update_bank(&self, id: i64, bank: &NewBank) -> Result<Bank>;
    /// Lists products, letting the backend apply the type filter when given.
    async fn list_products(&self, product_type: Option<&str>) -> Result<Vec<Product>>;
    async fn get_product(&self, id: i64) -> Result<Product>;
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;
    /// Replaces a product. Any cached copy must not outlive the update.
    async fn update_product(&self, id: i64, product: &NewProduct) -> Result<Product>;
    async fn delete_bank(&self, id: i64) -> Result<()>;
    async fn delete_product(&self, id: i64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "id": 7,
        "bank_id": 2,
        "name": "Super Saver",
        "type": "Fixed Deposit",
        "interest_rate": 7.5,
        "min_deposit": 10000.0,
        "tenure": "12 months",
        "product_overview": null,
        "key_features": "High return | Loan facility||  Auto renewal ",
        "withdrawal_rules": null,
        "eligibility_criteria": null,
        "required_documents": null,
        "max_deposit": null,
        "compounding_frequency": "Quarterly",
        "premature_withdrawal_penalty": null,
        "is_active": true,
        "created_at": "2025-01-10T08:30:00",
        "updated_at": null,
        "bank": {
            "id": 2,
            "name": "Alpha Bank",
            "description": null,
            "logo_url": null,
            "website": "https://alpha.example",
            "contact_number": "16000",
            "email": null,
            "is_active": true,
            "created_at": "2025-01-01T00:00:00"
        }
    }"#;

    #[test]
    fn test_product_deserialization() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.product_type, "Fixed Deposit");
        assert_eq!(product.bank_name(), "Alpha Bank");
        assert_eq!(product.tenure, "12 months");
        assert_eq!(product.compounding_frequency.as_deref(), Some("Quarterly"));
        assert!((product.annual_rate() - 0.075).abs() < 1e-12);
        assert_eq!(product.label(), "Alpha Bank's Fixed Deposit");
    }

    #[test]
    fn test_pipe_lists() {
        let product: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        assert_eq!(
            product.key_features(),
            vec!["High return", "Loan facility", "Auto renewal"]
        );
        assert!(product.required_documents().is_empty());
    }

    #[test]
    fn test_product_without_bank() {
        let json = r#"{"id": 1, "bank_id": 3, "type": "DPS", "interest_rate": 6.0,
                       "min_deposit": 500, "tenure": "5 years"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.bank_name(), "");
        assert_eq!(product.label(), "DPS");
        assert!(product.is_active);
    }

    #[test]
    fn test_bank_with_products() {
        let json = r#"[{"id": 1, "name": "Beta Bank", "products": [
            {"id": 4, "bank_id": 1, "type": "FD", "interest_rate": 8.0,
             "min_deposit": 1000, "tenure": "24 months"}
        ]}]"#;
        let banks: Vec<BankWithProducts> = serde_json::from_str(json).unwrap();
        assert_eq!(banks[0].bank.name, "Beta Bank");
        assert_eq!(banks[0].products.len(), 1);
        assert_eq!(banks[0].products[0].tenure, "24 months");
    }

    #[test]
    fn test_new_bank_sends_blank_optionals_as_null() {
        let bank = NewBank::create(BankChanges {
            name: Some(" Gamma Bank ".to_string()),
            website: Some("   ".to_string()),
            email: Some("info@gamma.example".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(bank.name, "Gamma Bank");

        let body = serde_json::to_value(&bank).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "Gamma Bank",
                "description": null,
                "website": null,
                "contact_number": null,
                "email": "info@gamma.example",
                "is_active": true
            })
        );

        assert!(NewBank::create(BankChanges::default()).is_err());
    }

    #[test]
    fn test_edit_bank_keeps_stored_fields() {
        let stored = Bank {
            id: 4,
            name: "Delta Bank".to_string(),
            description: Some("Retail bank".to_string()),
            logo_url: None,
            website: Some("https://delta.example".to_string()),
            contact_number: Some("16234".to_string()),
            email: None,
            is_active: true,
        };
        let edited = NewBank::edit(
            &stored,
            BankChanges {
                contact_number: Some("16999".to_string()),
                website: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(edited.name, "Delta Bank");
        assert_eq!(edited.description.as_deref(), Some("Retail bank"));
        assert_eq!(edited.contact_number.as_deref(), Some("16999"));
        assert!(edited.website.is_none());
    }

    fn product_changes() -> ProductChanges {
        ProductChanges {
            bank_id: Some(2),
            name: Some("Gold FD".to_string()),
            product_type: Some("Fixed Deposit".to_string()),
            interest_rate: Some(8.25),
            min_deposit: Some(5000.0),
            tenure: Some("24 months".to_string()),
            key_features: Some("Loan facility|Auto renewal".to_string()),
            compounding_frequency: Some(String::new()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_product_body() {
        let product = NewProduct::create(product_changes()).unwrap();
        let body = serde_json::to_value(&product).unwrap();
        assert_eq!(body["type"], "Fixed Deposit");
        assert_eq!(body["bank_id"], 2);
        assert_eq!(body["interest_rate"], 8.25);
        assert_eq!(body["key_features"], "Loan facility|Auto renewal");
        assert!(body["compounding_frequency"].is_null());
        assert!(body["max_deposit"].is_null());
        assert_eq!(body["is_active"], true);
    }

    #[test]
    fn test_new_product_validation() {
        let mut changes = product_changes();
        changes.bank_id = None;
        assert!(NewProduct::create(changes).is_err());

        let mut changes = product_changes();
        changes.tenure = Some(" ".to_string());
        let err = NewProduct::create(changes).unwrap_err();
        assert_eq!(err.to_string(), "Tenure is required");

        let mut changes = product_changes();
        changes.interest_rate = Some(-1.0);
        assert!(NewProduct::create(changes).is_err());

        let mut changes = product_changes();
        changes.max_deposit = Some(1000.0);
        let err = NewProduct::create(changes).unwrap_err();
        assert!(err.to_string().contains("below the minimum"));

        // Zero means no maximum, as in the admin form
        let mut changes = product_changes();
        changes.max_deposit = Some(0.0);
        assert!(NewProduct::create(changes).unwrap().max_deposit.is_none());
    }

    #[test]
    fn test_edit_product_applies_changes_over_stored() {
        let stored: Product = serde_json::from_str(PRODUCT_JSON).unwrap();
        let edited = NewProduct::edit(
            &stored,
            ProductChanges {
                interest_rate: Some(7.75),
                compounding_frequency: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(edited.bank_id, 2);
        assert_eq!(edited.name, "Super Saver");
        assert_eq!(edited.tenure, "12 months");
        assert_eq!(edited.interest_rate, 7.75);
        assert_eq!(edited.min_deposit, 10000.0);
        assert!(edited.compounding_frequency.is_none());
        assert_eq!(
            edited.key_features.as_deref(),
            Some("High return | Loan facility||  Auto renewal")
        );
    }
}
