use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension, Json,
};
use oohunt_adapter::{adapt_document, adapt_products_detailed, find_by_id, query_products, ProductFilter};
use oohunt_core::{format_price, select_featured_deals, ProductViewModel};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    log_degraded, normalize_featured_limit, normalize_limit, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

/// A view model plus its prices formatted in the storefront currency.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductItem {
    #[serde(flatten)]
    product: ProductViewModel,
    formatted_price: String,
    formatted_original_price: String,
}

impl ProductItem {
    fn new(product: ProductViewModel, currency: &str) -> Self {
        Self {
            formatted_price: format_price(product.price, currency),
            formatted_original_price: format_price(product.original_price, currency),
            product,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_discount: Option<u8>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeaturedQuery {
    pub limit: Option<i64>,
}

fn into_items(products: Vec<ProductViewModel>, currency: &str) -> Vec<ProductItem> {
    products
        .into_iter()
        .map(|product| ProductItem::new(product, currency))
        .collect()
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<Vec<ProductItem>>> {
    let filter = ProductFilter {
        category: query.category,
        query: query.q,
        min_discount: query.min_discount,
    };
    let outcomes = query_products(
        state.catalog.documents(),
        &filter,
        normalize_limit(query.limit),
    );
    log_degraded(&req_id.0, &outcomes);

    let products = outcomes.into_iter().map(|o| o.into_product()).collect();

    Json(ApiResponse {
        data: into_items(products, &state.currency),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_featured(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeaturedQuery>,
) -> Json<ApiResponse<Vec<ProductItem>>> {
    let limit = normalize_featured_limit(query.limit, state.featured_limit);
    let outcomes = state
        .catalog
        .documents()
        .iter()
        .map(adapt_document)
        .collect::<Vec<_>>();
    log_degraded(&req_id.0, &outcomes);

    let products: Vec<ProductViewModel> = outcomes.into_iter().map(|o| o.into_product()).collect();
    let deals = select_featured_deals(&products, limit);

    Json(ApiResponse {
        data: into_items(deals, &state.currency),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let Some(document) = find_by_id(state.catalog.documents(), &id) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product {id} not found"),
        ));
    };

    let outcome = adapt_document(document);
    log_degraded(&req_id.0, std::slice::from_ref(&outcome));

    Ok(Json(ApiResponse {
        data: ProductItem::new(outcome.into_product(), &state.currency),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Adapts whatever JSON the caller posts: an array of documents, a single
/// document, or anything else (which yields an empty list).
pub(super) async fn adapt(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let input: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("request body is not valid JSON: {e}"),
        )
    })?;

    let outcomes = adapt_products_detailed(&input);
    log_degraded(&req_id.0, &outcomes);

    let products = outcomes.into_iter().map(|o| o.into_product()).collect();

    Ok(Json(ApiResponse {
        data: into_items(products, &state.currency),
        meta: ResponseMeta::new(req_id.0),
    }))
}
