//! Store-style queries over raw documents.
//!
//! Route handlers marshal query parameters into a [`ProductFilter`]; the
//! document-level predicates run before adaptation, the discount threshold
//! after it.

use std::collections::HashMap;

use oohunt_core::generate_slug;
use serde::Serialize;
use serde_json::Value;

use crate::adapt::{adapt_document, AdaptOutcome};
use crate::raw::RawRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive match against any category label on the document.
    pub category: Option<String>,
    /// Case-insensitive substring of the title or brand.
    pub query: Option<String>,
    /// Minimum whole-percent discount of the adapted product.
    pub min_discount: Option<u8>,
}

impl ProductFilter {
    /// Returns `true` when the raw document passes the category and text
    /// predicates. Non-object documents only pass an unrestricted filter.
    #[must_use]
    pub fn matches_document(&self, document: &Value) -> bool {
        let category = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let query = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty());

        if category.is_none() && query.is_none() {
            return true;
        }

        let Some(fields) = document.as_object() else {
            return false;
        };
        let record = RawRecord::new(fields);

        if let Some(category) = category {
            let wanted = category.to_lowercase();
            let matched = record
                .category_labels()
                .iter()
                .any(|label| label.to_lowercase() == wanted || generate_slug(label) == wanted);
            if !matched {
                return false;
            }
        }

        if let Some(query) = query {
            let needle = query.to_lowercase();
            let matched = ["title", "brand"].iter().any(|key| {
                record
                    .lenient_text(&[*key])
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            });
            if !matched {
                return false;
            }
        }

        true
    }

    /// Returns `true` when the adapted outcome meets the discount threshold.
    #[must_use]
    pub fn matches_outcome(&self, outcome: &AdaptOutcome) -> bool {
        self.min_discount
            .is_none_or(|min| outcome.product().discount >= min)
    }
}

/// Filters, adapts and truncates `documents`, keeping catalog order.
#[must_use]
pub fn query_products(documents: &[Value], filter: &ProductFilter, limit: usize) -> Vec<AdaptOutcome> {
    documents
        .iter()
        .filter(|doc| filter.matches_document(doc))
        .map(adapt_document)
        .filter(|outcome| filter.matches_outcome(outcome))
        .take(limit)
        .collect()
}

/// Finds the document whose `asin` or `id` equals `id`.
#[must_use]
pub fn find_by_id<'a>(documents: &'a [Value], id: &str) -> Option<&'a Value> {
    documents.iter().find(|doc| {
        doc.as_object().is_some_and(|fields| {
            let record = RawRecord::new(fields);
            ["asin", "id"]
                .iter()
                .any(|key| record.lenient_text(&[*key]).as_deref() == Some(id))
        })
    })
}

/// A category heading for listing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
    pub product_count: usize,
}

/// Counts products per display category (the same fallback chain the
/// adapter uses). Largest categories first, then by name.
#[must_use]
pub fn category_summaries(documents: &[Value]) -> Vec<CategorySummary> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for fields in documents.iter().filter_map(Value::as_object) {
        let record = RawRecord::new(fields);
        if let Some(name) = record.category().ok().flatten() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<CategorySummary> = counts
        .into_iter()
        .map(|(name, product_count)| CategorySummary {
            slug: generate_slug(&name),
            name,
            product_count,
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> Vec<Value> {
        vec![
            json!({"asin": "B1", "title": "Echo Dot", "brand": "Amazon", "product_group": "Electronics", "price": 30, "original_price": 50}),
            json!({"id": 2, "title": "Cast Iron Pan", "brand": "Lodge", "categories": ["Home & Kitchen"], "price": 20}),
            Value::Null,
            json!({"id": "3", "title": "Kindle", "brand": "Amazon", "binding": "Electronics", "price": 90, "discount_rate": 10}),
        ]
    }

    #[test]
    fn empty_filter_keeps_every_document() {
        let outcomes = query_products(&catalog(), &ProductFilter::default(), 50);
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let filter = ProductFilter {
            category: Some("electronics".to_string()),
            ..ProductFilter::default()
        };
        let ids: Vec<_> = query_products(&catalog(), &filter, 50)
            .into_iter()
            .map(|o| o.into_product().id)
            .collect();
        assert_eq!(ids, vec!["B1", "3"]);
    }

    #[test]
    fn category_filter_accepts_slug() {
        let filter = ProductFilter {
            category: Some("home-kitchen".to_string()),
            ..ProductFilter::default()
        };
        let outcomes = query_products(&catalog(), &filter, 50);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].product().id, "2");
    }

    #[test]
    fn query_matches_title_or_brand() {
        let filter = ProductFilter {
            query: Some("amazon".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(query_products(&catalog(), &filter, 50).len(), 2);

        let filter = ProductFilter {
            query: Some("PAN".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(query_products(&catalog(), &filter, 50).len(), 1);
    }

    #[test]
    fn min_discount_applies_after_adaptation() {
        let filter = ProductFilter {
            min_discount: Some(15),
            ..ProductFilter::default()
        };
        let outcomes = query_products(&catalog(), &filter, 50);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].product().discount, 40);
    }

    #[test]
    fn limit_truncates_results() {
        assert_eq!(query_products(&catalog(), &ProductFilter::default(), 2).len(), 2);
    }

    #[test]
    fn find_by_id_matches_asin_and_numeric_id() {
        let docs = catalog();
        assert_eq!(find_by_id(&docs, "B1").unwrap()["title"], "Echo Dot");
        assert_eq!(find_by_id(&docs, "2").unwrap()["title"], "Cast Iron Pan");
        assert!(find_by_id(&docs, "missing").is_none());
    }

    #[test]
    fn category_summaries_count_display_categories() {
        let summaries = category_summaries(&catalog());
        assert_eq!(
            summaries,
            vec![
                CategorySummary {
                    name: "Electronics".to_string(),
                    slug: "electronics".to_string(),
                    product_count: 2,
                },
                CategorySummary {
                    name: "Home & Kitchen".to_string(),
                    slug: "home-kitchen".to_string(),
                    product_count: 1,
                },
            ]
        );
    }
}
