use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// JSON or YAML file holding the raw product documents served by the API.
    pub catalog_path: PathBuf,
    /// Number of featured deals returned when the caller does not ask for a count.
    pub featured_limit: usize,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    /// ISO 4217 code used when formatting prices for display.
    pub currency: String,
}
