use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::products;

/// `ean` is unique and may be a synthetic `chain:code` barcode for items
/// lacking an official one (spec.md §3).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: Uuid,
    pub ean: String,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct<'a> {
    pub ean: &'a str,
    pub brand: Option<&'a str>,
    pub name: Option<&'a str>,
    pub quantity: Option<&'a str>,
    pub unit: Option<&'a str>,
}

impl Product {
    pub fn get(conn: &mut PgConnection, id: Uuid) -> DieselResult<Product> {
        products::table
            .find(id)
            .select(Product::as_select())
            .get_result(conn)
    }

    pub fn get_by_ean(conn: &mut PgConnection, ean: &str) -> DieselResult<Product> {
        products::table
            .filter(products::ean.eq(ean))
            .select(Product::as_select())
            .get_result(conn)
    }

    /// Returns the ids of EANs already known, so the import engine only
    /// inserts genuinely new `Product` rows (spec.md §4.D step 5).
    pub fn existing_eans(conn: &mut PgConnection, eans: &[String]) -> DieselResult<Vec<(String, Uuid)>> {
        products::table
            .filter(products::ean.eq_any(eans))
            .select((products::ean, products::id))
            .load(conn)
    }

    pub fn insert_many(conn: &mut PgConnection, new_products: Vec<NewProduct<'_>>) -> DieselResult<Vec<Product>> {
        diesel::insert_into(products::table)
            .values(new_products)
            .on_conflict(products::ean)
            .do_nothing()
            .returning(Product::as_returning())
            .get_results(conn)
    }
}
