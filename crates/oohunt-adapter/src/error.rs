use thiserror::Error;

/// Why a single product document could not be fully resolved.
///
/// These never escape [`crate::adapt_products`]; they travel inside
/// [`crate::AdaptOutcome::Degraded`] next to the fallback record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdaptError {
    #[error("field `{field}` has unexpected type: expected {expected}, found {found}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` is not a usable number: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("price {0} is negative")]
    NegativePrice(f64),

    #[error("discount {0} is outside 0..=100")]
    DiscountOutOfRange(f64),
}
