//! Maturity estimates for deposit products.
//!
//! Estimates always use simple interest. A product's compounding frequency is
//! shown to the user but never feeds the calculation.
use crate::core::catalog::Product;
use crate::core::tenure::parse_tenure_years;

/// Principals shown on a product's detail page.
pub const DEFAULT_PRINCIPALS: [f64; 3] = [10_000.0, 50_000.0, 100_000.0];

/// Projected outcome of depositing `principal` for `tenure_years`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnEstimate {
    pub principal: f64,
    /// Annual rate as a fraction, e.g. 0.075.
    pub annual_rate: f64,
    pub tenure_years: f64,
    /// Rounded to the nearest whole currency unit.
    pub maturity_amount: i64,
}

impl ReturnEstimate {
    pub fn new(principal: f64, annual_rate: f64, tenure_years: f64) -> Self {
        Self {
            principal,
            annual_rate,
            tenure_years,
            maturity_amount: estimate_maturity(principal, annual_rate, tenure_years),
        }
    }

    pub fn interest_earned(&self) -> f64 {
        self.maturity_amount as f64 - self.principal
    }
}

/// Simple-interest maturity amount, rounded to the nearest whole unit.
pub fn estimate_maturity(principal: f64, annual_rate: f64, tenure_years: f64) -> i64 {
    (principal + principal * annual_rate * tenure_years).round() as i64
}

/// Estimates for each principal at `rate_percent` over a free-text tenure.
pub fn estimate_returns(rate_percent: f64, tenure: &str, principals: &[f64]) -> Vec<ReturnEstimate> {
    let annual_rate = rate_percent / 100.0;
    let tenure_years = parse_tenure_years(Some(tenure));
    principals
        .iter()
        .map(|&p| ReturnEstimate::new(p, annual_rate, tenure_years))
        .collect()
}

pub fn estimate_for_product(product: &Product, principals: &[f64]) -> Vec<ReturnEstimate> {
    estimate_returns(product.interest_rate, &product.tenure, principals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_maturity() {
        assert_eq!(estimate_maturity(10_000.0, 0.075, 1.0), 10_750);
        assert_eq!(estimate_maturity(50_000.0, 0.06, 0.5), 51_500);
        assert_eq!(estimate_maturity(100_000.0, 0.0, 3.0), 100_000);
    }

    #[test]
    fn test_estimate_rounds_to_nearest() {
        // 1000 * 0.0725 * 1.5 = 108.75
        assert_eq!(estimate_maturity(1_000.0, 0.0725, 1.5), 1_109);
        // 1000 * 0.0722 * 1.5 = 108.3
        assert_eq!(estimate_maturity(1_000.0, 0.0722, 1.5), 1_108);
        assert_eq!(estimate_maturity(1.0, 0.5, 1.0), 2);
    }

    #[test]
    fn test_estimate_returns_for_default_principals() {
        let estimates = estimate_returns(7.5, "24 Months", &DEFAULT_PRINCIPALS);
        let amounts: Vec<i64> = estimates.iter().map(|e| e.maturity_amount).collect();
        assert_eq!(amounts, vec![11_500, 57_500, 115_000]);
        assert!(estimates.iter().all(|e| e.tenure_years == 2.0));
        assert_eq!(estimates[0].interest_earned(), 1_500.0);
    }

    #[test]
    fn test_unknown_tenure_counts_as_one_year() {
        let estimates = estimate_returns(6.0, "flexible", &[10_000.0]);
        assert_eq!(estimates[0].tenure_years, 1.0);
        assert_eq!(estimates[0].maturity_amount, 10_600);
    }

    #[test]
    fn test_empty_principals() {
        assert!(estimate_returns(6.0, "12 months", &[]).is_empty());
    }
}
