//! Saved-location CRUD for the logged-in user (spec.md §4.H's
//! `get_user_locations` tool backs onto the same rows).

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use polica_entities::{NewUserLocation, UserLocation};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::infra::repositories::user;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub label: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[utoipa::path(
    post,
    path = "/v2/users/locations",
    request_body = CreateLocationRequest,
    responses((status = 200, description = "Location saved", body = UserLocation))
)]
pub async fn create_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateLocationRequest>,
) -> Result<Json<UserLocation>, AppError> {
    let location = user::create_location(
        &state.pool,
        NewUserLocation {
            user_id: auth.user_id,
            label: body.label,
            lat: body.lat,
            lon: body.lon,
        },
    )
    .await?;
    Ok(Json(location))
}

#[utoipa::path(
    get,
    path = "/v2/users/locations",
    responses((status = 200, description = "The caller's saved locations", body = [UserLocation]))
)]
pub async fn list_locations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserLocation>>, AppError> {
    Ok(Json(user::list_locations(&state.pool, auth.user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/v2/users/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses((status = 204, description = "Location removed"))
)]
pub async fn delete_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    let deleted = user::delete_location(&state.pool, id, auth.user_id).await?;
    if deleted == 0 {
        return Err(AppError::Infra(polica_entities::InfraError::NotFound));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
