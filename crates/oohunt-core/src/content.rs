//! Read-only CMS pages (blog posts, guides) served next to the product
//! catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::products::{ProductViewModel, PLACEHOLDER_IMAGE};
use crate::text::generate_slug;

pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DRAFT: &str = "draft";

/// A CMS page as stored, in the store's camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPage {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub status: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_data: Option<SeoData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl ContentPage {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == STATUS_PUBLISHED
    }

    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.status == STATUS_DRAFT
    }
}

/// Compact product card attached to a page that references products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub price: f64,
    /// `None` when the product has no image of its own.
    pub image: Option<String>,
    pub rating: f64,
    pub url: String,
}

impl From<&ProductViewModel> for ProductSummary {
    fn from(product: &ProductViewModel) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: Some(product.image.clone()).filter(|image| image != PLACEHOLDER_IMAGE),
            rating: product.details.as_ref().map_or(0.0, |d| d.rating),
            url: format!("/product/{}", product.id),
        }
    }
}

/// Finds the page for `slug`. Outside preview only published pages are
/// visible; preview also returns drafts and any other status.
#[must_use]
pub fn find_page<'a>(pages: &'a [ContentPage], slug: &str, preview: bool) -> Option<&'a ContentPage> {
    pages
        .iter()
        .find(|page| page.slug == slug && (preview || page.is_published()))
}

/// A blog category with the number of published pages filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCategory {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Distinct categories across published pages, busiest first, then by
/// name. Names are grouped by slug; the first spelling seen wins.
#[must_use]
pub fn content_categories(pages: &[ContentPage]) -> Vec<ContentCategory> {
    let mut by_slug: HashMap<String, ContentCategory> = HashMap::new();

    for page in pages.iter().filter(|page| page.is_published()) {
        for name in &page.categories {
            let slug = generate_slug(name);
            if slug.is_empty() {
                continue;
            }
            by_slug
                .entry(slug.clone())
                .or_insert_with(|| ContentCategory {
                    name: name.trim().to_string(),
                    slug,
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut categories: Vec<ContentCategory> = by_slug.into_values().collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    categories
}
