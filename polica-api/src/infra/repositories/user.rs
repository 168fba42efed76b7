use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use polica_entities::{adapt_infra_error, InfraError, NewUser, NewUserLocation, User, UserLocation};

pub async fn create(pool: &Pool, new: NewUser) -> Result<User, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| User::create(conn, new))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn get_by_email(pool: &Pool, email: String) -> Result<Option<User>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| User::get_by_email(conn, &email))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn get(pool: &Pool, id: Uuid) -> Result<User, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| User::get(conn, id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn mark_verified(pool: &Pool, id: Uuid) -> Result<User, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| User::mark_verified(conn, id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

/// Backs `get_user_locations` and the `/v2/users/locations` CRUD surface.
pub async fn create_location(pool: &Pool, new: NewUserLocation) -> Result<UserLocation, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| UserLocation::create(conn, new))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn list_locations(pool: &Pool, user_id: Uuid) -> Result<Vec<UserLocation>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| UserLocation::list_for_user(conn, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn delete_location(pool: &Pool, id: Uuid, user_id: Uuid) -> Result<usize, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| UserLocation::delete(conn, id, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
