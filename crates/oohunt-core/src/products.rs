use serde::{Deserialize, Serialize};

/// Image path used whenever a product document carries no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-product.jpg";

/// Availability shown when the main offer does not report stock ("no stock").
pub const NO_STOCK_AVAILABILITY: &str = "无库存";

/// Identifier and title of the record emitted for a `null` input element.
pub const UNKNOWN_PRODUCT_ID: &str = "unknown";
pub const UNKNOWN_PRODUCT_TITLE: &str = "未知商品";

/// Identifier and title of a degraded record when the document has none.
pub const ERROR_PRODUCT_ID: &str = "error";
pub const ERROR_PRODUCT_TITLE: &str = "数据处理错误";

/// A display-ready product, built fresh from a raw upstream document for
/// every request.
///
/// Placeholder and degraded records only carry the core fields; `details`
/// is `None` for them and nothing beyond the core fields is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewModel {
    pub id: String,
    pub title: String,
    /// Authoritative selling price. Never negative.
    pub price: f64,
    /// Pre-discount price, either reported upstream or reconstructed from
    /// the discount signal.
    pub original_price: f64,
    /// Whole-number discount percentage in `0..=100`.
    pub discount: u8,
    pub image: String,
    pub category: String,
    #[serde(flatten)]
    pub details: Option<ProductDetails>,
}

/// Everything a fully resolved product carries beyond price and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub description: String,
    pub brand: String,
    pub rating: f64,
    pub reviews: u64,
    pub url: String,
    /// Affiliate tracking link, when the provider supplies one.
    #[serde(rename = "cj_url", skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    pub is_prime: bool,
    pub is_free_shipping: bool,
    pub is_amazon_fulfilled: bool,
    pub availability: String,
    pub coupon_value: f64,
    pub coupon_type: Option<String>,
    pub api_provider: Option<String>,
    pub coupon_expiration_date: Option<String>,
    pub coupon_terms: Option<String>,
    pub source: Option<String>,
}

impl ProductViewModel {
    /// The fixed record emitted in place of a missing (`null`) document.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN_PRODUCT_ID.to_string(),
            title: UNKNOWN_PRODUCT_TITLE.to_string(),
            price: 0.0,
            original_price: 0.0,
            discount: 0,
            image: PLACEHOLDER_IMAGE.to_string(),
            category: String::new(),
            details: None,
        }
    }

    /// Returns `true` when the product is sold below its original price.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    /// Absolute amount saved against the original price, never negative.
    #[must_use]
    pub fn savings(&self) -> f64 {
        (self.original_price - self.price).max(0.0)
    }

    /// Returns `true` when this record was produced from a document that
    /// could not be fully resolved.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.details.is_none()
    }
}
