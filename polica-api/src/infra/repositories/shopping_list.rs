use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use polica_entities::{
    adapt_infra_error, InfraError, NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItem,
};

pub async fn create(pool: &Pool, new: NewShoppingList) -> Result<ShoppingList, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingList::create(conn, new))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn list_for_user(pool: &Pool, user_id: Uuid) -> Result<Vec<ShoppingList>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingList::list_for_user(conn, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn get_owned(pool: &Pool, id: Uuid, user_id: Uuid) -> Result<Option<ShoppingList>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingList::get_owned(conn, id, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn delete_owned(pool: &Pool, id: Uuid, user_id: Uuid) -> Result<usize, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingList::delete_owned(conn, id, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn add_item(pool: &Pool, new: NewShoppingListItem) -> Result<ShoppingListItem, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingListItem::add(conn, new))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn list_items(pool: &Pool, shopping_list_id: Uuid) -> Result<Vec<ShoppingListItem>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingListItem::list_for_list(conn, shopping_list_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn remove_item(pool: &Pool, id: Uuid, shopping_list_id: Uuid) -> Result<usize, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ShoppingListItem::remove(conn, id, shopping_list_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
