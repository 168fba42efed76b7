//! `GET /v2/products/search`, `/v2/products/{id}` and
//! `/v2/products/{id}/prices-by-location` (spec.md §6, §8 scenario 6).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use polica_entities::{GProductBestOfferDto, GoldenProductDto};

use crate::constants::DEFAULT_SEARCH_LIMIT;
use crate::errors::AppError;
use crate::infra::repositories::product::{self, SortBy};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductSearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
}

fn parse_sort_by(raw: Option<&str>) -> SortBy {
    match raw {
        Some("best_value_kg") => SortBy::BestValueKg,
        Some("best_value_l") => SortBy::BestValueL,
        Some("best_value_piece") => SortBy::BestValuePiece,
        _ => SortBy::Relevance,
    }
}

#[utoipa::path(
    get,
    path = "/v2/products/search",
    params(ProductSearchParams),
    responses((status = 200, description = "Matching golden products", body = [GoldenProductDto]))
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> Result<Json<Vec<GoldenProductDto>>, AppError> {
    let products = product::search(
        &state.pool,
        params.q,
        None,
        parse_sort_by(params.sort_by.as_deref()),
        params.category,
        params.brand,
        params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        params.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(products.into_iter().map(GoldenProductDto::from).collect()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailsResponse {
    pub product: GoldenProductDto,
    pub best_offer: Option<GProductBestOfferDto>,
}

#[utoipa::path(
    get,
    path = "/v2/products/{id}",
    params(("id" = Uuid, Path, description = "Golden product id")),
    responses(
        (status = 200, description = "Golden product details", body = ProductDetailsResponse),
        (status = 404, description = "No golden product with this id")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetailsResponse>, AppError> {
    let product = GoldenProductDto::from(product::get(&state.pool, id).await?);
    let best_offer = product::best_offer(&state.pool, id).await?.map(GProductBestOfferDto::from);
    Ok(Json(ProductDetailsResponse { product, best_offer }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PricesByLocationParams {
    /// Comma-separated list of store ids to price-check.
    pub store_ids: String,
}

#[utoipa::path(
    get,
    path = "/v2/products/{id}/prices-by-location",
    params(
        ("id" = Uuid, Path, description = "Golden product id"),
        PricesByLocationParams
    ),
    responses((status = 200, description = "Current prices across the given stores, cheapest first", body = [polica_entities::GPrice]))
)]
pub async fn prices_by_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PricesByLocationParams>,
) -> Result<Json<Vec<polica_entities::GPrice>>, AppError> {
    let store_ids: Vec<Uuid> = params
        .store_ids
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| AppError::BadRequest(format!("invalid store id: {s}"))))
        .collect::<Result<_, _>>()?;
    let prices = product::prices_by_location(&state.pool, id, store_ids).await?;
    Ok(Json(prices))
}
