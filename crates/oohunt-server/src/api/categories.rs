use axum::{extract::State, Extension, Json};
use oohunt_adapter::{category_summaries, CategorySummary};
use oohunt_core::title_case;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    name: String,
    slug: String,
    /// Heading for the category listing page, e.g. `"Home & Kitchen - Best Products and Deals"`.
    page_title: String,
    product_count: usize,
}

impl From<CategorySummary> for CategoryItem {
    fn from(summary: CategorySummary) -> Self {
        Self {
            page_title: format!("{} - Best Products and Deals", title_case(&summary.name)),
            name: summary.name,
            slug: summary.slug,
            product_count: summary.product_count,
        }
    }
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryItem>>> {
    let data = category_summaries(state.catalog.documents())
        .into_iter()
        .map(CategoryItem::from)
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
