//! Deposit applications: data model, submission rules and the backend seam.

use crate::core::catalog::Product;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Other,
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ApplicationStatus::Pending => "pending",
                ApplicationStatus::Approved => "approved",
                ApplicationStatus::Rejected => "rejected",
                ApplicationStatus::Other => "other",
            }
        )
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" | "approve" => Ok(ApplicationStatus::Approved),
            "rejected" | "reject" => Ok(ApplicationStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid application status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Application {
    pub id: i64,
    pub product_id: i64,
    pub applicant_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub nid_number: Option<String>,
    pub address: Option<String>,
    pub deposit_amount: f64,
    pub tenure_selected: String,
    pub notes: Option<String>,
    pub status: ApplicationStatus,
    pub reviewed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// The backend emits RFC 3339 or, from some databases, naive timestamps.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Body of a new application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub product_id: i64,
    pub applicant_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub nid_number: Option<String>,
    pub address: Option<String>,
    pub deposit_amount: f64,
    pub tenure_selected: String,
    pub notes: Option<String>,
    pub status: ApplicationStatus,
}

/// Applicant-supplied details, before they are tied to a product.
#[derive(Debug, Clone, Default)]
pub struct ApplicantDetails {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub nid_number: Option<String>,
    pub address: Option<String>,
    pub deposit_amount: f64,
    pub notes: Option<String>,
}

impl NewApplication {
    /// Builds a pending application for `product`, taking the tenure from the
    /// product itself.
    pub fn for_product(product: &Product, applicant: ApplicantDetails) -> Result<Self> {
        if applicant.name.trim().is_empty() {
            bail!("Applicant name is required");
        }
        if applicant.phone.trim().is_empty() {
            bail!("Phone number is required");
        }
        let amount = applicant.deposit_amount;
        if !amount.is_finite() || amount <= 0.0 {
            bail!("Deposit amount must be a positive number");
        }
        if amount < product.min_deposit {
            bail!(
                "Deposit amount {amount} is below the minimum deposit of {} for this product",
                product.min_deposit
            );
        }
        if let Some(max) = product.max_deposit
            && amount > max
        {
            bail!("Deposit amount {amount} exceeds the maximum deposit of {max} for this product");
        }

        Ok(Self {
            product_id: product.id,
            applicant_name: applicant.name.trim().to_string(),
            phone: applicant.phone.trim().to_string(),
            email: blank_to_none(applicant.email),
            nid_number: blank_to_none(applicant.nid_number),
            address: blank_to_none(applicant.address),
            deposit_amount: amount,
            tenure_selected: product.tenure.clone(),
            notes: blank_to_none(applicant.notes),
            status: ApplicationStatus::Pending,
        })
    }
}

fn blank_to_none(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Reviewer update for an existing application. Unset fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
}

#[async_trait]
pub trait ApplicationProvider: Send + Sync {
    async fn list_applications(&self, status: Option<ApplicationStatus>) -> Result<Vec<Application>>;
    async fn get_application(&self, id: i64) -> Result<Application>;
    async fn submit_application(&self, application: &NewApplication) -> Result<Application>;
    async fn review_application(&self, id: i64, review: &ApplicationReview) -> Result<Application>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn product(min_deposit: f64, max_deposit: Option<f64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 11,
            "bank_id": 1,
            "type": "Fixed Deposit",
            "interest_rate": 7.0,
            "min_deposit": min_deposit,
            "max_deposit": max_deposit,
            "tenure": "36 months"
        }))
        .unwrap()
    }

    fn applicant(amount: f64) -> ApplicantDetails {
        ApplicantDetails {
            name: " Rahim Uddin ".to_string(),
            phone: "01700000000".to_string(),
            email: Some(String::new()),
            deposit_amount: amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_application_takes_product_tenure() {
        let app = NewApplication::for_product(&product(1000.0, None), applicant(5000.0)).unwrap();
        assert_eq!(app.product_id, 11);
        assert_eq!(app.tenure_selected, "36 months");
        assert_eq!(app.applicant_name, "Rahim Uddin");
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(app.email.is_none());

        let body = serde_json::to_value(&app).unwrap();
        assert_eq!(body["status"], "pending");
        assert_eq!(body["deposit_amount"], 5000.0);
    }

    #[test]
    fn test_new_application_rejects_bad_amounts() {
        let p = product(1000.0, Some(10_000.0));
        let err = NewApplication::for_product(&p, applicant(500.0)).unwrap_err();
        assert!(err.to_string().contains("below the minimum"));

        let err = NewApplication::for_product(&p, applicant(20_000.0)).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));

        let err = NewApplication::for_product(&p, applicant(-1.0)).unwrap_err();
        assert!(err.to_string().contains("positive"));

        assert!(NewApplication::for_product(&p, applicant(10_000.0)).is_ok());
    }

    #[test]
    fn test_new_application_requires_name_and_phone() {
        let p = product(0.0, None);
        let mut details = applicant(100.0);
        details.name = "  ".to_string();
        assert!(NewApplication::for_product(&p, details).is_err());

        let mut details = applicant(100.0);
        details.phone = String::new();
        assert!(NewApplication::for_product(&p, details).is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Approve".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Approved);
        assert_eq!("rejected".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Rejected);
        assert!("archived".parse::<ApplicationStatus>().is_err());

        let status: ApplicationStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(status, ApplicationStatus::Other);
    }

    #[test]
    fn test_review_omits_unset_fields() {
        let review = ApplicationReview {
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&review).unwrap(), r#"{"status":"approved"}"#);
    }

    #[test]
    fn test_application_timestamps() {
        let json = r#"{
            "id": 3, "product_id": 11, "applicant_name": "Karim", "phone": "017",
            "email": null, "nid_number": null, "address": null,
            "deposit_amount": 25000.0, "tenure_selected": "12 months", "notes": null,
            "status": "pending", "reviewed_by": null, "reviewed_at": null,
            "created_at": "2025-03-04T10:15:30.123456"
        }"#;
        let app: Application = serde_json::from_str(json).unwrap();
        let created = app.created_at.unwrap();
        assert_eq!(created.year(), 2025);
        assert_eq!(created.hour(), 10);
        assert!(app.reviewed_at.is_none());

        let json = json.replace("2025-03-04T10:15:30.123456", "2025-03-04T10:15:30+06:00");
        let app: Application = serde_json::from_str(&json).unwrap();
        assert_eq!(app.created_at.unwrap().hour(), 4);
    }
}
