use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use prometheus::{Encoder, TextEncoder};
use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_handlers, chat, crawler_status, importer_status, products, shopping_lists, stores, users};
use crate::state::AppState;

#[allow(clippy::extra_unused_type_parameters)]
pub fn app_router<T: OpenApiT>(state: AppState) -> Router<AppState> {
    let open_api = T::openapi();
    Router::new()
        .merge(SwaggerUi::new("/v1/docs").url("/v1/docs/openapi.json", open_api))
        .route("/", get(root))
        .route("/v1/metrics", get(metrics))
        .nest("/v1/crawler", crawler_routes())
        .nest("/v1/importer", importer_routes())
        .nest("/v2/products", product_routes())
        .nest("/v2/stores", store_routes())
        .nest("/v2", chat_routes())
        .nest("/v2/users", user_routes())
        .nest("/v2/shopping_lists", shopping_list_routes())
        .nest("/auth", auth_routes())
        .with_state(state)
        .fallback(handler_404)
}

async fn root() -> &'static str {
    "polica-api is running"
}

async fn metrics(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(err) = encoder.encode(&state.metrics.registry().gather(), &mut buffer) {
        tracing::error!(%err, "failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response();
    }
    Response::builder()
        .header("Content-Type", encoder.format_type())
        .body(axum::body::Body::from(buffer))
        .unwrap()
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "The requested resource was not found")
}

fn crawler_routes() -> Router<AppState> {
    Router::new()
        .route("/status", post(crawler_status::report_status))
        .route("/successful_runs/{date}", get(crawler_status::successful_runs))
        .route(
            "/failed_or_started_runs/{date}",
            get(crawler_status::failed_or_started_runs),
        )
}

fn importer_routes() -> Router<AppState> {
    Router::new()
        .route("/status", post(importer_status::report_status))
        .route("/status/{chain}/{date}", get(importer_status::get_status))
        .route("/successful_runs/{date}", get(importer_status::successful_runs))
        .route(
            "/failed_or_started_runs/{date}",
            get(importer_status::failed_or_started_runs),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(products::search))
        .route("/{id}", get(products::get))
        .route("/{id}/prices-by-location", get(products::prices_by_location))
}

fn store_routes() -> Router<AppState> {
    Router::new().route("/nearby", get(stores::nearby))
}

fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat_v2", post(chat::chat_v2))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", post(users::create_location).get(users::list_locations))
        .route("/locations/{id}", delete(users::delete_location))
}

fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(shopping_lists::create).get(shopping_lists::list))
        .route("/{id}", delete(shopping_lists::delete))
        .route("/{id}/items", post(shopping_lists::add_item).get(shopping_lists::list_items))
        .route("/{id}/items/{item_id}", delete(shopping_lists::remove_item))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/token", post(auth_handlers::token))
        .route("/refresh", post(auth_handlers::refresh))
        .route("/logout", post(auth_handlers::logout))
        .route("/verify-email/{token}", post(auth_handlers::verify_email))
        .route("/forgot-password", post(auth_handlers::forgot_password))
        .route("/reset-password", post(auth_handlers::reset_password))
}
