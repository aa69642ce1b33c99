//! File-backed product catalog standing in for the document store.
//!
//! Product documents are kept exactly as the upstream providers wrote them;
//! shaping them for display is the adapter's job. CMS pages are typed at
//! load time.

use std::path::Path;

use serde_json::Value;

use crate::content::ContentPage;
use crate::ConfigError;

const SHAPE_HINT: &str = "expected an array of products or an object with a `products` array";

/// Raw product documents and CMS pages, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    documents: Vec<Value>,
    pages: Vec<ContentPage>,
}

impl Catalog {
    #[must_use]
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents,
            pages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pages(mut self, pages: Vec<ContentPage>) -> Self {
        self.pages = pages;
        self
    }

    /// Builds a catalog from a parsed file body: either a top-level array of
    /// documents, or an object with a `products` array and an optional `cms`
    /// array of pages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCatalog`] for any other shape and
    /// [`ConfigError::CatalogJson`] for a malformed page.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut map = match value {
            Value::Array(documents) => return Ok(Self::new(documents)),
            Value::Object(map) => map,
            _ => return Err(ConfigError::InvalidCatalog(SHAPE_HINT.to_string())),
        };

        let documents = match map.remove("products") {
            Some(Value::Array(documents)) => documents,
            Some(_) => {
                return Err(ConfigError::InvalidCatalog(
                    "`products` must be an array".to_string(),
                ))
            }
            None => return Err(ConfigError::InvalidCatalog(SHAPE_HINT.to_string())),
        };

        let pages = match map.remove("cms") {
            None | Some(Value::Null) => Vec::new(),
            Some(pages @ Value::Array(_)) => serde_json::from_value(pages)?,
            Some(_) => {
                return Err(ConfigError::InvalidCatalog(
                    "`cms` must be an array".to_string(),
                ))
            }
        };

        Ok(Self::new(documents).with_pages(pages))
    }

    #[must_use]
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    #[must_use]
    pub fn pages(&self) -> &[ContentPage] {
        &self.pages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Load the product catalog from a JSON or YAML file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML; everything else as
/// JSON.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or has the
/// wrong shape.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    Catalog::from_value(value)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write_catalog(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write catalog fixture");
        path
    }

    #[test]
    fn from_value_accepts_top_level_array() {
        let catalog = Catalog::from_value(json!([{"id": "a"}, null])).expect("catalog");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn from_value_accepts_products_object() {
        let catalog =
            Catalog::from_value(json!({"products": [{"asin": "B01"}]})).expect("catalog");
        assert_eq!(catalog.documents()[0]["asin"], "B01");
    }

    #[test]
    fn from_value_reads_cms_pages() {
        let catalog = Catalog::from_value(json!({
            "products": [],
            "cms": [{"_id": "p1", "title": "Guide", "slug": "guide", "status": "published"}]
        }))
        .expect("catalog");
        assert!(catalog.is_empty());
        assert_eq!(catalog.pages().len(), 1);
        assert_eq!(catalog.pages()[0].slug, "guide");
    }

    #[test]
    fn from_value_rejects_malformed_page() {
        let err = Catalog::from_value(json!({"products": [], "cms": [{"title": "no slug"}]}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::CatalogJson(_)));

        let err = Catalog::from_value(json!({"products": [], "cms": {"slug": "x"}})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatalog(ref m) if m.contains("`cms`")));
    }

    #[test]
    fn from_value_rejects_scalar() {
        let err = Catalog::from_value(json!("products")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatalog(_)));
    }

    #[test]
    fn from_value_rejects_non_array_products() {
        let err = Catalog::from_value(json!({"products": {"id": "a"}})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCatalog(ref m) if m.contains("must be an array")));
    }

    #[test]
    fn load_catalog_reads_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_catalog(&dir, "catalog.json", r#"[{"id": "a", "price": 10}]"#);
        let catalog = load_catalog(&path).expect("load");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.documents()[0]["price"], 10);
    }

    #[test]
    fn load_catalog_reads_yaml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_catalog(
            &dir,
            "catalog.yaml",
            "products:\n  - asin: B0001\n    price: 19.99\n    categories: [Electronics]\n",
        );
        let catalog = load_catalog(&path).expect("load");
        assert_eq!(catalog.documents()[0]["asin"], "B0001");
        assert_eq!(catalog.documents()[0]["categories"][0], "Electronics");
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
    }

    #[test]
    fn load_catalog_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("catalog.json");
        assert!(path.exists(), "catalog.json missing at {path:?}");
        let catalog = load_catalog(&path).expect("load sample catalog");
        assert!(!catalog.is_empty());
        assert!(!catalog.pages().is_empty());
    }

    #[test]
    fn load_catalog_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_catalog(&dir, "broken.json", "[{");
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogJson(_)));
    }
}
