//! The five domain tools the chat model may call mid-turn (spec.md §4.H).
//! Each tool is declared once as an OpenAI function schema and dispatched by
//! name against the same repository layer the REST handlers use.

use async_openai::types::{ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionObjectArgs};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use polica_entities::{GProductBestOfferDto, GoldenProductDto, StoreWithDistanceDto};

use crate::constants::DEFAULT_SEARCH_LIMIT;
use crate::errors::AppError;
use crate::infra::repositories::{product, store, user};
use crate::infra::repositories::product::SortBy;
use crate::state::AppState;

pub fn definitions() -> Vec<ChatCompletionTool> {
    vec![
        tool(
            "search_products_v2",
            "Search the golden product catalog by free text, with optional store/category/brand \
             filters and a value-for-money sort.",
            json!({
                "type": "object",
                "properties": {
                    "q": {"type": "string", "description": "Free text search query"},
                    "store_ids": {"type": "array", "items": {"type": "string", "format": "uuid"}},
                    "sort_by": {
                        "type": "string",
                        "enum": ["relevance", "best_value_kg", "best_value_l", "best_value_piece"]
                    },
                    "category": {"type": "string"},
                    "brand": {"type": "string"},
                    "limit": {"type": "integer"},
                    "offset": {"type": "integer"}
                },
                "required": ["q"]
            }),
        ),
        tool(
            "get_product_prices_by_location_v2",
            "List a product's current prices across a set of stores, cheapest first.",
            json!({
                "type": "object",
                "properties": {
                    "product_id": {"type": "string", "format": "uuid"},
                    "store_ids": {"type": "array", "items": {"type": "string", "format": "uuid"}}
                },
                "required": ["product_id", "store_ids"]
            }),
        ),
        tool(
            "get_product_details_v2",
            "Fetch a golden product's canonical record and its all-time best offer.",
            json!({
                "type": "object",
                "properties": {
                    "product_id": {"type": "string", "format": "uuid"}
                },
                "required": ["product_id"]
            }),
        ),
        tool(
            "find_nearby_stores_v2",
            "Find stores within a radius of a geographic point, closest first.",
            json!({
                "type": "object",
                "properties": {
                    "lat": {"type": "number"},
                    "lon": {"type": "number"},
                    "radius_meters": {"type": "number"},
                    "chain_code": {"type": "string"}
                },
                "required": ["lat", "lon", "radius_meters"]
            }),
        ),
        tool(
            "get_user_locations",
            "List the saved locations for the current user.",
            json!({"type": "object", "properties": {}}),
        ),
    ]
}

fn tool(name: &str, description: &str, parameters: Value) -> ChatCompletionTool {
    ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(name)
                .description(description)
                .parameters(parameters)
                .build()
                .expect("static tool schema always builds"),
        )
        .build()
        .expect("static tool schema always builds")
}

#[derive(Debug, Deserialize)]
struct SearchProductsArgs {
    q: String,
    #[serde(default)]
    store_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ProductPricesArgs {
    product_id: Uuid,
    store_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct ProductDetailsArgs {
    product_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct NearbyStoresArgs {
    lat: f64,
    lon: f64,
    radius_meters: f64,
    #[serde(default)]
    chain_code: Option<String>,
}

fn parse_sort_by(raw: Option<&str>) -> SortBy {
    match raw {
        Some("best_value_kg") => SortBy::BestValueKg,
        Some("best_value_l") => SortBy::BestValueL,
        Some("best_value_piece") => SortBy::BestValuePiece,
        _ => SortBy::Relevance,
    }
}

/// Runs one named tool call against `arguments` (the raw JSON string the
/// model produced) and returns the JSON value to feed back as the tool's
/// output (spec.md §4.H step 5). `None` means the tool name is unknown,
/// which terminates the turn with an `error` SSE part.
pub async fn dispatch(
    state: &AppState,
    user_id: Uuid,
    name: &str,
    arguments: &str,
) -> Option<Result<Value, AppError>> {
    match name {
        "search_products_v2" => Some(search_products(state, arguments).await),
        "get_product_prices_by_location_v2" => Some(product_prices(state, arguments).await),
        "get_product_details_v2" => Some(product_details(state, arguments).await),
        "find_nearby_stores_v2" => Some(nearby_stores(state, arguments).await),
        "get_user_locations" => Some(get_user_locations(state, user_id).await),
        _ => None,
    }
}

fn invalid_arguments(err: serde_json::Error) -> AppError {
    AppError::BadRequest(format!("invalid tool arguments: {err}"))
}

async fn search_products(state: &AppState, arguments: &str) -> Result<Value, AppError> {
    let args: SearchProductsArgs = serde_json::from_str(arguments).map_err(invalid_arguments)?;
    let sort_by = parse_sort_by(args.sort_by.as_deref());
    let limit = args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let offset = args.offset.unwrap_or(0);
    let products = product::search(
        &state.pool,
        args.q,
        args.store_ids,
        sort_by,
        args.category,
        args.brand,
        limit,
        offset,
    )
    .await?;
    let dtos: Vec<GoldenProductDto> = products.into_iter().map(GoldenProductDto::from).collect();
    Ok(json!({ "products": dtos }))
}

async fn product_prices(state: &AppState, arguments: &str) -> Result<Value, AppError> {
    let args: ProductPricesArgs = serde_json::from_str(arguments).map_err(invalid_arguments)?;
    let prices = product::prices_by_location(&state.pool, args.product_id, args.store_ids).await?;
    Ok(json!({ "prices": prices }))
}

async fn product_details(state: &AppState, arguments: &str) -> Result<Value, AppError> {
    let args: ProductDetailsArgs = serde_json::from_str(arguments).map_err(invalid_arguments)?;
    if let Some(cached) = state.caches.golden_products().get(&args.product_id).await {
        let best_offer = product::best_offer(&state.pool, args.product_id)
            .await?
            .map(GProductBestOfferDto::from);
        return Ok(json!({ "product": cached, "best_offer": best_offer }));
    }
    let golden = GoldenProductDto::from(product::get(&state.pool, args.product_id).await?);
    state
        .caches
        .golden_products()
        .insert(args.product_id, golden.clone())
        .await;
    let best_offer = product::best_offer(&state.pool, args.product_id)
        .await?
        .map(GProductBestOfferDto::from);
    Ok(json!({ "product": golden, "best_offer": best_offer }))
}

async fn nearby_stores(state: &AppState, arguments: &str) -> Result<Value, AppError> {
    let args: NearbyStoresArgs = serde_json::from_str(arguments).map_err(invalid_arguments)?;
    let cache_key = format!(
        "{:.4}:{:.4}:{:.0}:{}",
        args.lat,
        args.lon,
        args.radius_meters,
        args.chain_code.as_deref().unwrap_or("")
    );
    if let Some(cached) = state.caches.nearby_stores().get(&cache_key).await {
        return Ok(json!({ "stores": cached }));
    }
    let rows = store::find_nearby(&state.pool, args.lat, args.lon, args.radius_meters, args.chain_code).await?;
    let dtos: Vec<StoreWithDistanceDto> = rows.into_iter().map(StoreWithDistanceDto::from).collect();
    state.caches.nearby_stores().insert(cache_key, dtos.clone()).await;
    Ok(json!({ "stores": dtos }))
}

async fn get_user_locations(state: &AppState, user_id: Uuid) -> Result<Value, AppError> {
    let locations = user::list_locations(&state.pool, user_id).await?;
    Ok(json!({ "locations": locations }))
}
