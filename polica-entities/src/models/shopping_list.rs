use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::{shopping_list_items, shopping_lists};

/// A named list of products a user intends to buy (spec.md §4.H's
/// shopping-list tools exposed to the chat assistant).
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = shopping_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shopping_lists)]
pub struct NewShoppingList {
    pub user_id: Uuid,
    pub name: String,
}

impl ShoppingList {
    pub fn create(conn: &mut PgConnection, new: NewShoppingList) -> DieselResult<ShoppingList> {
        diesel::insert_into(shopping_lists::table)
            .values(new)
            .returning(ShoppingList::as_returning())
            .get_result(conn)
    }

    pub fn list_for_user(conn: &mut PgConnection, user_id: Uuid) -> DieselResult<Vec<ShoppingList>> {
        shopping_lists::table
            .filter(shopping_lists::user_id.eq(user_id))
            .order(shopping_lists::created_at.desc())
            .select(ShoppingList::as_select())
            .load(conn)
    }

    pub fn get_owned(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> DieselResult<Option<ShoppingList>> {
        use diesel::OptionalExtension;
        shopping_lists::table
            .filter(shopping_lists::id.eq(id))
            .filter(shopping_lists::user_id.eq(user_id))
            .select(ShoppingList::as_select())
            .first(conn)
            .optional()
    }

    pub fn delete_owned(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> DieselResult<usize> {
        diesel::delete(
            shopping_lists::table
                .filter(shopping_lists::id.eq(id))
                .filter(shopping_lists::user_id.eq(user_id)),
        )
        .execute(conn)
    }
}

/// A line on a shopping list. `product_id` is optional since the assistant
/// may add a free-text note ("something for breakfast") before it has been
/// resolved to a golden product.
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = shopping_list_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub shopping_list_id: Uuid,
    pub product_id: Option<Uuid>,
    pub note: Option<String>,
    pub quantity: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shopping_list_items)]
pub struct NewShoppingListItem {
    pub shopping_list_id: Uuid,
    pub product_id: Option<Uuid>,
    pub note: Option<String>,
    pub quantity: Option<BigDecimal>,
}

impl ShoppingListItem {
    pub fn add(conn: &mut PgConnection, new: NewShoppingListItem) -> DieselResult<ShoppingListItem> {
        diesel::insert_into(shopping_list_items::table)
            .values(new)
            .returning(ShoppingListItem::as_returning())
            .get_result(conn)
    }

    pub fn list_for_list(conn: &mut PgConnection, shopping_list_id: Uuid) -> DieselResult<Vec<ShoppingListItem>> {
        shopping_list_items::table
            .filter(shopping_list_items::shopping_list_id.eq(shopping_list_id))
            .order(shopping_list_items::created_at.asc())
            .select(ShoppingListItem::as_select())
            .load(conn)
    }

    pub fn remove(conn: &mut PgConnection, id: Uuid, shopping_list_id: Uuid) -> DieselResult<usize> {
        diesel::delete(
            shopping_list_items::table
                .filter(shopping_list_items::id.eq(id))
                .filter(shopping_list_items::shopping_list_id.eq(shopping_list_id)),
        )
        .execute(conn)
    }
}
