//! Shopping-list CRUD for the logged-in user (spec.md §4.H's shopping-list
//! tools are grounded on these same repository calls).

use axum::extract::{Path, State};
use axum::Json;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use polica_entities::{NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItem};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::infra::repositories::shopping_list;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShoppingListRequest {
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/v2/shopping_lists",
    request_body = CreateShoppingListRequest,
    responses((status = 200, description = "Shopping list created", body = ShoppingList))
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateShoppingListRequest>,
) -> Result<Json<ShoppingList>, AppError> {
    let list = shopping_list::create(
        &state.pool,
        NewShoppingList {
            user_id: auth.user_id,
            name: body.name,
        },
    )
    .await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/v2/shopping_lists",
    responses((status = 200, description = "The caller's shopping lists", body = [ShoppingList]))
)]
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<ShoppingList>>, AppError> {
    Ok(Json(shopping_list::list_for_user(&state.pool, auth.user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/v2/shopping_lists/{id}",
    params(("id" = Uuid, Path, description = "Shopping list id")),
    responses((status = 204, description = "Shopping list removed"))
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    let deleted = shopping_list::delete_owned(&state.pool, id, auth.user_id).await?;
    if deleted == 0 {
        return Err(AppError::Infra(polica_entities::InfraError::NotFound));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: Option<Uuid>,
    pub note: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<BigDecimal>,
}

#[utoipa::path(
    post,
    path = "/v2/shopping_lists/{id}/items",
    params(("id" = Uuid, Path, description = "Shopping list id")),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = ShoppingListItem),
        (status = 404, description = "No shopping list with this id owned by the caller")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ShoppingListItem>, AppError> {
    shopping_list::get_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or(polica_entities::InfraError::NotFound)?;
    let item = shopping_list::add_item(
        &state.pool,
        NewShoppingListItem {
            shopping_list_id: id,
            product_id: body.product_id,
            note: body.note,
            quantity: body.quantity,
        },
    )
    .await?;
    Ok(Json(item))
}

#[utoipa::path(
    get,
    path = "/v2/shopping_lists/{id}/items",
    params(("id" = Uuid, Path, description = "Shopping list id")),
    responses((status = 200, description = "Items on the shopping list", body = [ShoppingListItem]))
)]
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ShoppingListItem>>, AppError> {
    shopping_list::get_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or(polica_entities::InfraError::NotFound)?;
    Ok(Json(shopping_list::list_items(&state.pool, id).await?))
}

#[utoipa::path(
    delete,
    path = "/v2/shopping_lists/{id}/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Shopping list id"),
        ("item_id" = Uuid, Path, description = "Item id")
    ),
    responses((status = 204, description = "Item removed"))
)]
pub async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<axum::http::StatusCode, AppError> {
    shopping_list::get_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or(polica_entities::InfraError::NotFound)?;
    let deleted = shopping_list::remove_item(&state.pool, item_id, id).await?;
    if deleted == 0 {
        return Err(AppError::Infra(polica_entities::InfraError::NotFound));
    }
    Ok(axum::http::StatusCode::NO_CONTENT)
}
