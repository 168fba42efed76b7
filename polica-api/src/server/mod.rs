pub mod middlewares;
pub mod routes;

use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use utoipauto::utoipauto;

use crate::errors::internal_error;
use crate::server::middlewares::TimingLayer;
use crate::{config::Config, server::routes::app_router, state::AppState};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn run_api_server(config: &Config, state: AppState) {
    #[utoipauto(paths = "./polica-api/src, ./polica-entities/src from polica_entities")]
    #[derive(OpenApi)]
    #[openapi(
        modifiers(&SecurityAddon),
        tags(
            (name = "polica-api", description = "Polica grocery catalog and chat API")
        ),
    )]
    struct ApiDoc;

    let app = app_router::<ApiDoc>(state.clone())
        .with_state(state)
        .with_timing()
        .layer(OtelAxumLayer::default())
        .layer(OtelInResponseLayer)
        .layer(CorsLayer::permissive());

    let host = config.server_host();
    let port = config.server_port();
    let address = format!("{host}:{port}");
    let socket_addr: SocketAddr = address.parse().unwrap();
    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .expect("Invalid API server address.");

    tracing::info!("polica-api started at http://{}", socket_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(internal_error)
        .unwrap();
}
