//! Resolution of the `{price, original_price, discount}` triple.
//!
//! Providers report discounts in different ways: an offer-level percentage,
//! a list price, a document-level rate, or an absolute saving. Exactly one
//! signal is used, in that order of preference, and the missing values are
//! derived from it.

use oohunt_core::{back_compute_original_price, calculate_discount};

use crate::error::AdaptError;
use crate::raw::RawRecord;

/// The resolved price triple, before the discount is rounded for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub price: f64,
    pub original_price: f64,
    pub discount: f64,
}

impl Pricing {
    /// The discount as a whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn discount_percent(&self) -> u8 {
        // `resolve_pricing` guarantees 0..=100.
        self.discount.round().clamp(0.0, 100.0) as u8
    }
}

/// Resolves the price triple for one document.
///
/// # Errors
///
/// Returns an [`AdaptError`] when a pricing field has the wrong type, the
/// price is negative, or the discount signal falls outside `0..=100`.
pub fn resolve_pricing(
    record: &RawRecord<'_>,
    offer: Option<&RawRecord<'_>>,
) -> Result<Pricing, AdaptError> {
    // An offer that lists a price of zero is still authoritative.
    let offer_price = match offer {
        Some(offer) => offer.explicit_number("price")?,
        None => None,
    };
    let price = match offer_price {
        Some(price) => price,
        None => record.number("price")?.unwrap_or(0.0),
    };
    if price < 0.0 {
        return Err(AdaptError::NegativePrice(price));
    }

    let listed_original = record.number("original_price")?;
    let mut original_price = listed_original.unwrap_or(price);
    let mut discount = 0.0;

    let savings_percentage = match offer {
        Some(offer) => offer.number("savings_percentage")?,
        None => None,
    };

    if let Some(percentage) = savings_percentage {
        discount = percentage;
        original_price = reconstruct_original(price, original_price, discount)?;
    } else if let Some(listed) = listed_original.filter(|listed| *listed > price) {
        discount = calculate_discount(listed, price);
    } else if let Some(rate) = record.number("discount_rate")? {
        discount = rate;
        original_price = reconstruct_original(price, original_price, discount)?;
    } else if let Some(savings) = match offer {
        Some(offer) => offer.number("savings")?,
        None => None,
    } {
        original_price = price + savings;
        discount = (savings / original_price * 100.0).round();
    }

    if !(0.0..=100.0).contains(&discount) {
        return Err(AdaptError::DiscountOutOfRange(discount));
    }

    Ok(Pricing {
        price,
        original_price,
        discount,
    })
}

/// Back-computes the original price from the discount when no independent
/// original price was supplied.
#[allow(clippy::float_cmp)]
fn reconstruct_original(price: f64, original_price: f64, discount: f64) -> Result<f64, AdaptError> {
    // Equal means `original_price` fell back to `price`.
    if original_price != price || discount <= 0.0 {
        return Ok(original_price);
    }
    if discount >= 100.0 {
        return Err(AdaptError::DiscountOutOfRange(discount));
    }
    Ok(back_compute_original_price(price, discount))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn resolve(doc: &Value) -> Result<Pricing, AdaptError> {
        let record = RawRecord::new(doc.as_object().expect("object fixture"));
        let offer = record.main_offer()?;
        resolve_pricing(&record, offer.as_ref())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn offer_price_wins_over_record_price() {
        let pricing = resolve(&json!({"price": 99, "offers": [{"price": 49}]})).unwrap();
        assert!(approx(pricing.price, 49.0));
        assert!(approx(pricing.original_price, 49.0));
    }

    #[test]
    fn zero_offer_price_is_not_replaced_by_record_price() {
        let pricing = resolve(&json!({"price": 10, "offers": [{"price": 0}]})).unwrap();
        assert!(approx(pricing.price, 0.0));
        assert!(approx(pricing.original_price, 0.0));
        assert_eq!(pricing.discount_percent(), 0);
    }

    #[test]
    fn null_offer_price_falls_back_to_record_price() {
        let pricing = resolve(&json!({"price": 12, "offers": [{"price": null}]})).unwrap();
        assert!(approx(pricing.price, 12.0));
    }

    #[test]
    fn offer_without_price_falls_back_to_record_price() {
        let pricing = resolve(&json!({"price": 15, "offers": [{"availability": "In Stock"}]})).unwrap();
        assert!(approx(pricing.price, 15.0));
    }

    #[test]
    fn savings_percentage_keeps_listed_original() {
        let doc = json!({
            "original_price": 120,
            "offers": [{"price": 80, "savings_percentage": 20}]
        });
        let pricing = resolve(&doc).unwrap();
        assert!(approx(pricing.original_price, 120.0));
        assert_eq!(pricing.discount_percent(), 20);
    }

    #[test]
    fn listed_original_not_above_price_is_ignored() {
        let pricing = resolve(&json!({"price": 50, "original_price": 40})).unwrap();
        assert!(approx(pricing.original_price, 40.0));
        assert_eq!(pricing.discount_percent(), 0);
    }

    #[test]
    fn discount_rate_reconstructs_original() {
        let pricing = resolve(&json!({"price": 75, "discount_rate": 25})).unwrap();
        assert!(approx(pricing.original_price, 100.0));
        assert_eq!(pricing.discount_percent(), 25);
    }

    #[test]
    fn discount_rate_with_listed_original_below_price_keeps_it() {
        let pricing = resolve(&json!({"price": 75, "original_price": 60, "discount_rate": 10})).unwrap();
        assert!(approx(pricing.original_price, 60.0));
        assert_eq!(pricing.discount_percent(), 10);
    }

    #[test]
    fn fractional_percentage_rounds_for_display() {
        let doc = json!({"offers": [{"price": 66.5, "savings_percentage": 33.5}]});
        let pricing = resolve(&doc).unwrap();
        assert_eq!(pricing.discount_percent(), 34);
        assert!(approx(pricing.original_price, 100.0));
    }

    #[test]
    fn full_discount_without_original_is_a_fault() {
        let doc = json!({"offers": [{"price": 10, "savings_percentage": 100}]});
        assert_eq!(resolve(&doc), Err(AdaptError::DiscountOutOfRange(100.0)));
    }

    #[test]
    fn full_discount_with_listed_original_is_kept() {
        let doc = json!({"original_price": 10, "offers": [{"price": 10, "savings_percentage": 100}]});
        // original_price equals price, so reconstruction is required.
        assert!(resolve(&doc).is_err());

        let free = json!({"original_price": 10, "offers": [{"price": 0.01, "savings_percentage": 100}]});
        assert_eq!(resolve(&free).unwrap().discount_percent(), 100);
    }

    #[test]
    fn negative_rate_is_a_fault() {
        let doc = json!({"price": 10, "discount_rate": -5});
        assert_eq!(resolve(&doc), Err(AdaptError::DiscountOutOfRange(-5.0)));
    }

    #[test]
    fn negative_price_is_a_fault() {
        let doc = json!({"price": -3});
        assert_eq!(resolve(&doc), Err(AdaptError::NegativePrice(-3.0)));
    }

    #[test]
    fn zero_percentage_falls_through_to_savings() {
        let doc = json!({"offers": [{"price": 45, "savings_percentage": 0, "savings": 5}]});
        let pricing = resolve(&doc).unwrap();
        assert!(approx(pricing.original_price, 50.0));
        assert_eq!(pricing.discount_percent(), 10);
    }
}
