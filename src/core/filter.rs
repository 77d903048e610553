//! Client-side product filtering.
use crate::core::catalog::Product;
use crate::core::tenure::leading_integer;

/// User-selected constraints for a product listing.
///
/// A field that is `None` or empty places no constraint on the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the bank name.
    pub search: Option<String>,
    /// Exact product type, e.g. "Fixed Deposit".
    pub product_type: Option<String>,
    /// Tenure bucket such as "12 months"; only its number is compared.
    pub tenure: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.search).is_none()
            && non_empty(&self.product_type).is_none()
            && non_empty(&self.tenure).is_none()
    }

    /// Whether `product` passes every supplied constraint.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.matches_type(product) && self.matches_tenure(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        match non_empty(&self.search) {
            Some(search) => product
                .bank_name()
                .to_lowercase()
                .contains(&search.to_lowercase()),
            None => true,
        }
    }

    fn matches_type(&self, product: &Product) -> bool {
        non_empty(&self.product_type).is_none_or(|t| product.product_type == t)
    }

    // Units are ignored: "12 months" and "12 years" share a bucket.
    fn matches_tenure(&self, product: &Product) -> bool {
        let Some(tenure) = non_empty(&self.tenure) else {
            return true;
        };
        match (leading_integer(&product.tenure), leading_integer(tenure)) {
            (Some(have), Some(want)) => have == want,
            _ => false,
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Returns the products that satisfy `criteria`, in their original order.
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Bank;

    fn product(id: i64, bank: &str, product_type: &str, tenure: &str) -> Product {
        Product {
            id,
            bank_id: id,
            bank: Some(Bank {
                id,
                name: bank.to_string(),
                description: None,
                logo_url: None,
                website: None,
                contact_number: None,
                email: None,
                is_active: true,
            }),
            name: format!("{bank} {product_type}"),
            product_type: product_type.to_string(),
            interest_rate: 7.0,
            min_deposit: 1000.0,
            tenure: tenure.to_string(),
            product_overview: None,
            key_features: None,
            withdrawal_rules: None,
            eligibility_criteria: None,
            required_documents: None,
            max_deposit: None,
            compounding_frequency: None,
            premature_withdrawal_penalty: None,
            is_active: true,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Alpha Bank", "Fixed Deposit", "12 months"),
            product(2, "Beta Bank", "Fixed Deposit", "24 months"),
            product(3, "Alphabet Savings", "DPS", "5 years"),
            product(4, "Gamma Bank", "DPS", "12 years"),
            product(5, "Delta Bank", "Fixed Deposit", "flexible"),
        ]
    }

    fn criteria(search: Option<&str>, product_type: Option<&str>, tenure: Option<&str>) -> FilterCriteria {
        FilterCriteria {
            search: search.map(String::from),
            product_type: product_type.map(String::from),
            tenure: tenure.map(String::from),
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let products = catalog();
        assert_eq!(filter_products(&products, &FilterCriteria::default()), products);

        let blank = criteria(Some(""), Some(""), Some(""));
        assert!(blank.is_empty());
        assert_eq!(filter_products(&products, &blank), products);
    }

    #[test]
    fn test_empty_product_list() {
        let result = filter_products(&[], &criteria(Some("alpha"), None, None));
        assert!(result.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = catalog();
        let result = filter_products(&products, &criteria(Some("ALPHA"), None, None));
        assert_eq!(ids(&result), vec![1, 3]);

        let result = filter_products(&products, &criteria(Some("bank"), None, None));
        assert_eq!(ids(&result), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_type_is_exact_and_case_sensitive() {
        let products = catalog();
        let result = filter_products(&products, &criteria(None, Some("DPS"), None));
        assert_eq!(ids(&result), vec![3, 4]);

        let result = filter_products(&products, &criteria(None, Some("dps"), None));
        assert!(result.is_empty());

        let result = filter_products(&products, &criteria(None, Some("Fixed"), None));
        assert!(result.is_empty());
    }

    #[test]
    fn test_tenure_compares_leading_integer() {
        let products = catalog();
        let result = filter_products(&products, &criteria(None, None, Some("24 months")));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_tenure_ignores_units() {
        let products = catalog();
        // "12 months" and "12 years" both carry 12.
        let result = filter_products(&products, &criteria(None, None, Some("12 years")));
        assert_eq!(ids(&result), vec![1, 4]);
    }

    #[test]
    fn test_tenure_case_insensitive() {
        let products = catalog();
        assert_eq!(
            filter_products(&products, &criteria(None, None, Some("12 Months"))),
            filter_products(&products, &criteria(None, None, Some("12 months")))
        );
    }

    #[test]
    fn test_tenure_without_digits_excludes() {
        let products = catalog();
        // Product 5 has no number in its tenure.
        let result = filter_products(&products, &criteria(None, None, Some("flexible")));
        assert!(result.is_empty());

        let result = filter_products(&products, &criteria(Some("delta"), None, Some("12 months")));
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_bank_fails_search_only() {
        let mut orphan = product(9, "", "FD", "12 months");
        orphan.bank = None;
        let products = vec![orphan];
        assert!(filter_products(&products, &criteria(Some("alpha"), None, None)).is_empty());
        assert_eq!(
            ids(&filter_products(&products, &criteria(None, None, Some("12 months")))),
            vec![9]
        );
    }

    #[test]
    fn test_all_predicates_must_hold() {
        let products = catalog();
        let c = criteria(Some("a"), Some("Fixed Deposit"), Some("12 months"));
        let result = filter_products(&products, &c);
        assert_eq!(ids(&result), vec![1]);

        for p in &products {
            let included = result.iter().any(|r| r.id == p.id);
            let each = criteria(Some("a"), None, None).matches(p)
                && criteria(None, Some("Fixed Deposit"), None).matches(p)
                && criteria(None, None, Some("12 months")).matches(p);
            assert_eq!(included, each, "product {}", p.id);
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let products = catalog();
        let c = criteria(Some("bank"), None, Some("12"));
        let once = filter_products(&products, &c);
        let twice = filter_products(&once, &c);
        assert_eq!(once, twice);
        assert_eq!(products.len(), 5);
    }

    #[test]
    fn test_alpha_beta_scenario() {
        let products = vec![
            product(1, "Alpha Bank", "FD", "12 months"),
            product(2, "Beta Bank", "FD", "24 months"),
        ];
        let result = filter_products(&products, &criteria(Some("alpha"), None, Some("12 months")));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bank_name(), "Alpha Bank");
    }
}
