use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use oohunt_adapter::{adapt_document, find_by_id, AdaptOutcome};
use oohunt_core::{content_categories, find_page, ContentCategory, ContentPage, ProductSummary};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// A page as served: the stored fields plus the draft marker and any linked
/// product cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContentPageView {
    #[serde(flatten)]
    page: ContentPage,
    /// Only ever `true` for a draft fetched in preview mode.
    is_draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    products: Option<Vec<ProductSummary>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentQuery {
    /// Presence alone enables preview, so `?preview` works without a value.
    pub preview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentCategoriesQuery {
    pub limit: Option<i64>,
}

/// Resolves `product_ids` against the catalog, in page order. Unknown ids
/// and documents that fail adaptation are left out.
fn linked_products(state: &AppState, product_ids: &[String]) -> Vec<ProductSummary> {
    product_ids
        .iter()
        .filter_map(|id| find_by_id(state.catalog.documents(), id))
        .map(adapt_document)
        .filter_map(|outcome| match outcome {
            AdaptOutcome::Resolved(product) => Some(ProductSummary::from(&product)),
            AdaptOutcome::Placeholder(_) | AdaptOutcome::Degraded { .. } => None,
        })
        .collect()
}

pub(super) async fn get_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ApiResponse<ContentPageView>>, ApiError> {
    let preview = query.preview.is_some();

    let Some(page) = find_page(state.catalog.pages(), &slug, preview) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("page {slug} not found or not published"),
        ));
    };

    let products = if page.product_ids.is_empty() {
        None
    } else {
        Some(linked_products(&state, &page.product_ids))
    };

    Ok(Json(ApiResponse {
        data: ContentPageView {
            is_draft: preview && page.is_draft(),
            page: page.clone(),
            products,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_content_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ContentCategoriesQuery>,
) -> Json<ApiResponse<Vec<ContentCategory>>> {
    let mut categories = content_categories(state.catalog.pages());
    categories.truncate(super::normalize_content_limit(query.limit));

    Json(ApiResponse {
        data: categories,
        meta: ResponseMeta::new(req_id.0),
    })
}
