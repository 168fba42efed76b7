use chrono::{DateTime, Utc};
use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::{user_locations, user_personal_data, users};

/// Account row (spec.md §3). `password_hash` is never serialized out —
/// handlers in `polica-api` project onto a DTO that omits it.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

impl User {
    pub fn create(conn: &mut PgConnection, new: NewUser) -> DieselResult<User> {
        diesel::insert_into(users::table)
            .values(new)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn get_by_email(conn: &mut PgConnection, email: &str) -> DieselResult<Option<User>> {
        use diesel::OptionalExtension;
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn get(conn: &mut PgConnection, id: Uuid) -> DieselResult<User> {
        users::table.find(id).select(User::as_select()).get_result(conn)
    }

    pub fn mark_verified(conn: &mut PgConnection, id: Uuid) -> DieselResult<User> {
        diesel::update(users::table.find(id))
            .set(users::is_verified.eq(true))
            .returning(User::as_returning())
            .get_result(conn)
    }
}

/// One-to-one optional profile data, kept out of `users` so the hot
/// authentication path (email/password_hash lookup) never touches it.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = user_personal_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserPersonalData {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_personal_data)]
pub struct NewUserPersonalData {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl UserPersonalData {
    pub fn upsert(conn: &mut PgConnection, new: NewUserPersonalData) -> DieselResult<UserPersonalData> {
        diesel::insert_into(user_personal_data::table)
            .values(&new)
            .on_conflict(user_personal_data::user_id)
            .do_update()
            .set((
                user_personal_data::full_name.eq(&new.full_name),
                user_personal_data::phone.eq(&new.phone),
            ))
            .returning(UserPersonalData::as_returning())
            .get_result(conn)
    }

    pub fn get(conn: &mut PgConnection, user_id: Uuid) -> DieselResult<Option<UserPersonalData>> {
        use diesel::OptionalExtension;
        user_personal_data::table
            .filter(user_personal_data::user_id.eq(user_id))
            .select(UserPersonalData::as_select())
            .first(conn)
            .optional()
    }
}

/// A saved location used to resolve "nearby stores" for a logged-in user
/// (spec.md §4.H's location-aware product/chat queries).
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = user_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserLocation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_locations)]
pub struct NewUserLocation {
    pub user_id: Uuid,
    pub label: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl UserLocation {
    pub fn create(conn: &mut PgConnection, new: NewUserLocation) -> DieselResult<UserLocation> {
        diesel::insert_into(user_locations::table)
            .values(new)
            .returning(UserLocation::as_returning())
            .get_result(conn)
    }

    pub fn list_for_user(conn: &mut PgConnection, user_id: Uuid) -> DieselResult<Vec<UserLocation>> {
        user_locations::table
            .filter(user_locations::user_id.eq(user_id))
            .order(user_locations::created_at.asc())
            .select(UserLocation::as_select())
            .load(conn)
    }

    pub fn delete(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> DieselResult<usize> {
        diesel::delete(
            user_locations::table
                .filter(user_locations::id.eq(id))
                .filter(user_locations::user_id.eq(user_id)),
        )
        .execute(conn)
    }
}
