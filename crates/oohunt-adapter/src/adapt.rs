//! Conversion from raw provider documents to [`ProductViewModel`]s.
//!
//! Pricing rules live in [`crate::resolve`]; this module handles input
//! shapes, field fallbacks and per-element fault isolation.

use oohunt_core::products::{ERROR_PRODUCT_ID, ERROR_PRODUCT_TITLE};
use oohunt_core::{ProductDetails, ProductViewModel, NO_STOCK_AVAILABILITY, PLACEHOLDER_IMAGE};
use serde_json::{Map, Value};

use crate::error::AdaptError;
use crate::raw::{is_present, RawRecord};
use crate::resolve::resolve_pricing;

const ID_KEYS: &[&str] = &["asin", "id"];
const IMAGE_KEYS: &[&str] = &["main_image", "image_url", "image"];

/// What happened to one input element.
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptOutcome {
    /// Every field resolved.
    Resolved(ProductViewModel),
    /// The element was falsy (`null`, `false`, `0`, `""`); the fixed
    /// "unknown product" record stands in.
    Placeholder(ProductViewModel),
    /// Resolution failed; `product` holds whatever could be salvaged.
    Degraded {
        product: ProductViewModel,
        error: AdaptError,
    },
}

impl AdaptOutcome {
    #[must_use]
    pub fn product(&self) -> &ProductViewModel {
        match self {
            AdaptOutcome::Resolved(product)
            | AdaptOutcome::Placeholder(product)
            | AdaptOutcome::Degraded { product, .. } => product,
        }
    }

    #[must_use]
    pub fn into_product(self) -> ProductViewModel {
        match self {
            AdaptOutcome::Resolved(product)
            | AdaptOutcome::Placeholder(product)
            | AdaptOutcome::Degraded { product, .. } => product,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&AdaptError> {
        match self {
            AdaptOutcome::Degraded { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Adapts raw product documents into display-ready view models.
///
/// Accepts an array of documents, a single document object, or anything
/// else (which yields an empty result). The output has one entry per input
/// element, in input order. Never panics: bad elements become placeholder
/// or degraded records without affecting their neighbours.
#[must_use]
pub fn adapt_products(input: &Value) -> Vec<ProductViewModel> {
    adapt_products_detailed(input)
        .into_iter()
        .map(AdaptOutcome::into_product)
        .collect()
}

/// Same as [`adapt_products`] but keeps the per-element outcome, so callers
/// can report degraded documents.
#[must_use]
pub fn adapt_products_detailed(input: &Value) -> Vec<AdaptOutcome> {
    match input {
        Value::Array(documents) => documents.iter().map(adapt_document).collect(),
        Value::Object(_) => vec![adapt_document(input)],
        _ => Vec::new(),
    }
}

/// Adapts a single array element.
///
/// Falsy elements become the "unknown product" placeholder. Other
/// non-object elements carry no fields and resolve like an empty document.
#[must_use]
pub fn adapt_document(document: &Value) -> AdaptOutcome {
    if !is_present(document) {
        return AdaptOutcome::Placeholder(ProductViewModel::unknown());
    }

    let empty = Map::new();
    let fields = document.as_object().unwrap_or(&empty);
    let record = RawRecord::new(fields);
    match resolve_product(&record) {
        Ok(product) => AdaptOutcome::Resolved(product),
        Err(error) => AdaptOutcome::Degraded {
            product: degraded_product(&record),
            error,
        },
    }
}

fn resolve_product(record: &RawRecord<'_>) -> Result<ProductViewModel, AdaptError> {
    let offer = record.main_offer()?;
    let pricing = resolve_pricing(record, offer.as_ref())?;

    // Pass-through fields never fail the record; unreadable values fall
    // back to their defaults.
    let (coupon_value, coupon_type, availability, is_prime, is_free_shipping, is_amazon_fulfilled) =
        match &offer {
            Some(offer) => (
                offer.lenient_number("coupon_value").unwrap_or(0.0),
                offer.lenient_text(&["coupon_type"]),
                offer.lenient_text(&["availability"]),
                offer.flag("is_prime"),
                offer.flag("is_free_shipping_eligible"),
                offer.flag("is_amazon_fulfilled"),
            ),
            None => (0.0, None, None, false, false, false),
        };

    Ok(ProductViewModel {
        id: record.first_text(ID_KEYS)?.unwrap_or_default(),
        title: record.text("title")?.unwrap_or_default(),
        price: pricing.price,
        original_price: pricing.original_price,
        discount: pricing.discount_percent(),
        image: record
            .first_text(IMAGE_KEYS)?
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        category: record.category()?.unwrap_or_default(),
        details: Some(ProductDetails {
            description: record.lenient_text(&["description"]).unwrap_or_default(),
            brand: record.lenient_text(&["brand"]).unwrap_or_default(),
            rating: record.lenient_number("rating").unwrap_or(0.0),
            reviews: record.lenient_count("reviews").unwrap_or(0),
            url: record.lenient_text(&["url"]).unwrap_or_default(),
            affiliate_url: record.lenient_text(&["cj_url"]),
            is_prime,
            is_free_shipping,
            is_amazon_fulfilled,
            availability: availability.unwrap_or_else(|| NO_STOCK_AVAILABILITY.to_string()),
            coupon_value,
            coupon_type,
            api_provider: record.lenient_text(&["api_provider"]),
            coupon_expiration_date: record.lenient_text(&["coupon_expiration_date"]),
            coupon_terms: record.lenient_text(&["coupon_terms"]),
            source: record.lenient_text(&["source"]),
        }),
    })
}

/// Best-effort record for a document that failed resolution. Reads only
/// fields of the expected type and never fails.
fn degraded_product(record: &RawRecord<'_>) -> ProductViewModel {
    let price = record
        .lenient_number("price")
        .filter(|p| *p >= 0.0)
        .unwrap_or(0.0);
    let original_price = record
        .lenient_number("original_price")
        .filter(|p| *p >= 0.0)
        .unwrap_or(price);

    ProductViewModel {
        id: record
            .lenient_text(ID_KEYS)
            .unwrap_or_else(|| ERROR_PRODUCT_ID.to_string()),
        title: record
            .lenient_text(&["title"])
            .unwrap_or_else(|| ERROR_PRODUCT_TITLE.to_string()),
        price,
        original_price,
        discount: 0,
        image: record
            .lenient_text(IMAGE_KEYS)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        category: String::new(),
        details: None,
    }
}

#[cfg(test)]
#[path = "adapt_test.rs"]
mod tests;
