//! Product filter predicate.
//!
//! The report view, the spreadsheet export and the JSON listing all build a
//! [`ProductFilter`] from their raw parameters and hand it to the store, so the
//! three surfaces always agree on what "matching" means.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Optional criteria, ANDed together. An empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    /// Lower price bound that actually applies.
    ///
    /// Zero counts as "no bound", as does a non-finite value.
    pub fn effective_min_price(&self) -> Option<f64> {
        self.min_price.filter(|p| p.is_finite() && *p != 0.0)
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(n) = needle(&self.name) {
            if !contains_ignore_case(&product.name, n) {
                return false;
            }
        }
        if let Some(c) = needle(&self.category) {
            if !contains_ignore_case(&product.category, c) {
                return false;
            }
        }
        match self.effective_min_price() {
            Some(min) => product.price >= min,
            None => true,
        }
    }
}

fn needle(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filter parameters exactly as they arrive from a form or a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
}

impl FilterParams {
    /// Build the filter. Empty text means "not set"; any other text is used
    /// exactly as sent, surrounding spaces included. An unparseable
    /// `min_price` is ignored rather than rejected.
    pub fn into_filter(self) -> ProductFilter {
        ProductFilter {
            name: non_empty(self.name),
            category: non_empty(self.category),
            min_price: self
                .min_price
                .and_then(|raw| raw.trim().parse::<f64>().ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motorshop_core::ProductId;

    fn product(id: i64, name: &str, category: &str, price: f64, quantity: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Oil Filter", "Filters", 10.0, 5),
            product(2, "Air Filter", "Filters", 20.0, 7),
            product(3, "Brake Pad", "Brakes", 30.0, 2),
        ]
    }

    fn matching_ids(f: &ProductFilter) -> Vec<i64> {
        catalog()
            .iter()
            .filter(|p| f.matches(p))
            .map(|p| p.id.get())
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(matching_ids(&ProductFilter::all()), vec![1, 2, 3]);
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let f = ProductFilter::all().with_name("fILT");
        assert_eq!(matching_ids(&f), vec![1, 2]);
    }

    #[test]
    fn criteria_are_anded() {
        let f = ProductFilter::all()
            .with_name("filter")
            .with_category("FILTERS")
            .with_min_price(15.0);
        assert_eq!(matching_ids(&f), vec![2]);
    }

    #[test]
    fn min_price_is_inclusive() {
        let f = ProductFilter::all().with_min_price(20.0);
        assert_eq!(matching_ids(&f), vec![2, 3]);
    }

    #[test]
    fn zero_min_price_means_no_bound() {
        let negative = product(9, "Credit", "Misc", -4.0, 1);
        let f = ProductFilter::all().with_min_price(0.0);
        assert_eq!(f.effective_min_price(), None);
        assert!(f.matches(&negative));
    }

    #[test]
    fn empty_strings_are_not_criteria() {
        let f = ProductFilter {
            name: Some(String::new()),
            category: Some(String::new()),
            min_price: None,
        };
        assert_eq!(matching_ids(&f), vec![1, 2, 3]);
    }

    #[test]
    fn params_parse_leniently() {
        let f = FilterParams {
            name: Some("oil".to_string()),
            category: Some(String::new()),
            min_price: Some("abc".to_string()),
        }
        .into_filter();
        assert_eq!(f.name.as_deref(), Some("oil"));
        assert_eq!(f.category, None);
        assert_eq!(f.min_price, None);

        let f = FilterParams {
            min_price: Some(" 15.5 ".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(f.min_price, Some(15.5));
    }

    #[test]
    fn text_params_keep_surrounding_spaces() {
        let airfilter = product(4, "AirFilter", "Filters", 5.0, 1);
        let f = FilterParams {
            name: Some(" Filter".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(f.name.as_deref(), Some(" Filter"));
        assert!(!f.matches(&airfilter));
        assert_eq!(matching_ids(&f), vec![1, 2]);

        // Whitespace is a real needle, not "no filter".
        let f = FilterParams {
            category: Some("   ".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matching_ids(&f).is_empty());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                "[A-Za-z][A-Za-z0-9 ]{0,30}",
                "[A-Za-z][A-Za-z0-9 ]{0,20}",
                -1_000.0f64..1_000_000.0,
                -1_000i64..1_000_000,
            )
                .prop_map(|(name, category, price, quantity)| Product {
                    id: ProductId::new(1),
                    name,
                    category,
                    price,
                    quantity,
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any substring of the name, in any case, selects the product.
            #[test]
            fn name_substring_in_any_case_matches(
                p in arb_product(),
                a in any::<prop::sample::Index>(),
                b in any::<prop::sample::Index>(),
                upper in any::<bool>(),
            ) {
                let len = p.name.len();
                let (mut start, mut end) = (a.index(len + 1), b.index(len + 1));
                if start > end {
                    std::mem::swap(&mut start, &mut end);
                }
                let sub = &p.name[start..end];
                let sub = if upper { sub.to_uppercase() } else { sub.to_lowercase() };
                let f = ProductFilter::all().with_name(sub);
                prop_assert!(f.matches(&p));
            }

            /// Property: a bound above the price excludes the product.
            #[test]
            fn min_price_above_price_excludes(p in arb_product()) {
                prop_assume!(p.price + 1.0 != 0.0);
                let f = ProductFilter::all().with_min_price(p.price + 1.0);
                prop_assert!(!f.matches(&p));
            }

            /// Property: a zero bound is the same as no price filter.
            #[test]
            fn zero_min_price_equals_no_filter(p in arb_product(), name in "[a-z]{0,3}") {
                let with_zero = ProductFilter::all().with_name(name.clone()).with_min_price(0.0);
                let without = ProductFilter::all().with_name(name);
                prop_assert_eq!(with_zero.matches(&p), without.matches(&p));
            }
        }
    }
}
