pub mod app_config;
pub mod catalog;
pub mod config;
pub mod content;
pub mod deals;
pub mod pricing;
pub mod products;
pub mod text;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, Catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    content_categories, find_page, ContentCategory, ContentPage, ProductSummary, SeoData,
};
pub use deals::select_featured_deals;
pub use pricing::{back_compute_original_price, calculate_discount, format_price, round_cents};
pub use products::{ProductDetails, ProductViewModel, NO_STOCK_AVAILABILITY, PLACEHOLDER_IMAGE};
pub use text::{generate_slug, title_case, truncate_text};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON catalog: {0}")]
    CatalogJson(#[from] serde_json::Error),

    #[error("failed to parse YAML catalog: {0}")]
    CatalogYaml(#[from] serde_yaml::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}
