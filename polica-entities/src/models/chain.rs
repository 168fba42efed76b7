use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::chains;

/// Created on first sighting of a chain code; never deleted (spec.md §3).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = chains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Chain {
    pub id: Uuid,
    pub code: String,
}

#[derive(Insertable)]
#[diesel(table_name = chains)]
struct NewChain<'a> {
    code: &'a str,
}

impl Chain {
    /// Upserts a chain by `code`, returning its row either way. Used by the
    /// import engine's step 3 ("Upsert `Chain` by code").
    pub fn upsert_by_code(conn: &mut PgConnection, code: &str) -> DieselResult<Chain> {
        diesel::insert_into(chains::table)
            .values(NewChain { code })
            .on_conflict(chains::code)
            .do_update()
            .set(chains::code.eq(code))
            .returning(Chain::as_returning())
            .get_result(conn)
    }

    pub fn get_by_code(conn: &mut PgConnection, code: &str) -> DieselResult<Chain> {
        chains::table
            .filter(chains::code.eq(code))
            .select(Chain::as_select())
            .get_result(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> DieselResult<Vec<Chain>> {
        chains::table.select(Chain::as_select()).load(conn)
    }
}
