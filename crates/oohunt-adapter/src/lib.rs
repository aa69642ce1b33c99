//! Normalization of heterogeneous upstream product documents into
//! [`oohunt_core::ProductViewModel`]s, plus the store-style filters the
//! HTTP and CLI front ends use to select documents.

pub mod adapt;
pub mod error;
pub mod filter;
pub mod raw;
pub mod resolve;

pub use adapt::{adapt_document, adapt_products, adapt_products_detailed, AdaptOutcome};
pub use error::AdaptError;
pub use filter::{category_summaries, find_by_id, query_products, CategorySummary, ProductFilter};
pub use raw::RawRecord;
