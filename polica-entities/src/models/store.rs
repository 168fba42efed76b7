use diesel::{
    AsChangeset, BoolExpressionMethods, ExpressionMethods, Insertable, PgConnection, QueryDsl,
    Queryable, RunQueryDsl, Selectable, SelectableHelper,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::stores;

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = stores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Store {
    pub id: Uuid,
    pub chain_id: Uuid,
    pub code: String,
    pub type_: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = stores)]
pub struct NewStore {
    pub chain_id: Uuid,
    pub code: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phone: Option<String>,
}

impl Store {
    /// Upserts on `(chain_id, code)`, coalescing non-null incoming fields
    /// over whatever is already stored (spec.md §4.D step 4).
    pub fn upsert(conn: &mut PgConnection, new_store: NewStore) -> DieselResult<Store> {
        diesel::insert_into(stores::table)
            .values(&new_store)
            .on_conflict((stores::chain_id, stores::code))
            .do_update()
            .set((
                stores::type_.eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Varchar>>(
                    "COALESCE(excluded.\"type\", stores.\"type\")",
                )),
                stores::address
                    .eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Varchar>>(
                        "COALESCE(excluded.address, stores.address)",
                    )),
                stores::city.eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Varchar>>(
                    "COALESCE(excluded.city, stores.city)",
                )),
                stores::zipcode
                    .eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Varchar>>(
                        "COALESCE(excluded.zipcode, stores.zipcode)",
                    )),
                stores::lat.eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Double>>(
                    "COALESCE(excluded.lat, stores.lat)",
                )),
                stores::lon.eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Double>>(
                    "COALESCE(excluded.lon, stores.lon)",
                )),
                stores::phone
                    .eq(diesel::dsl::sql::<diesel::sql_types::Nullable<diesel::sql_types::Varchar>>(
                        "COALESCE(excluded.phone, stores.phone)",
                    )),
            ))
            .returning(Store::as_returning())
            .get_result(conn)
    }

    pub fn get_by_chain_and_code(
        conn: &mut PgConnection,
        chain_id: Uuid,
        code: &str,
    ) -> DieselResult<Store> {
        stores::table
            .filter(stores::chain_id.eq(chain_id).and(stores::code.eq(code)))
            .select(Store::as_select())
            .get_result(conn)
    }

    /// Geographic nearest-neighbour lookup backing
    /// `find_nearby_stores_v2` (spec.md §4.H). The haversine distance is
    /// computed in SQL so the ordering/filtering happens server-side.
    pub fn find_nearby(
        conn: &mut PgConnection,
        lat: f64,
        lon: f64,
        radius_meters: f64,
        chain_code: Option<&str>,
    ) -> DieselResult<Vec<(Store, f64)>> {
        use diesel::sql_types::{Double, Nullable, Text};

        #[derive(diesel::QueryableByName)]
        struct Row {
            #[diesel(sql_type = diesel::sql_types::Uuid)]
            id: Uuid,
            #[diesel(sql_type = diesel::sql_types::Uuid)]
            chain_id: Uuid,
            #[diesel(sql_type = Text)]
            code: String,
            #[diesel(sql_type = Nullable<Text>)]
            #[diesel(column_name = "type")]
            type_: Option<String>,
            #[diesel(sql_type = Nullable<Text>)]
            address: Option<String>,
            #[diesel(sql_type = Nullable<Text>)]
            city: Option<String>,
            #[diesel(sql_type = Nullable<Text>)]
            zipcode: Option<String>,
            #[diesel(sql_type = Nullable<Double>)]
            lat: Option<f64>,
            #[diesel(sql_type = Nullable<Double>)]
            lon: Option<f64>,
            #[diesel(sql_type = Nullable<Text>)]
            phone: Option<String>,
            #[diesel(sql_type = Double)]
            distance_meters: f64,
        }

        let query = diesel::sql_query(
            r#"
            SELECT * FROM (
                SELECT s.id, s.chain_id, s.code, s."type", s.address, s.city, s.zipcode,
                       s.lat, s.lon, s.phone,
                       (6371000 * acos(least(1.0,
                            cos(radians($1)) * cos(radians(s.lat)) * cos(radians(s.lon) - radians($2))
                            + sin(radians($1)) * sin(radians(s.lat))
                       ))) AS distance_meters
                FROM stores s
                JOIN chains c ON c.id = s.chain_id
                WHERE s.lat IS NOT NULL AND s.lon IS NOT NULL
                  AND ($4::varchar IS NULL OR c.code = $4)
            ) ranked
            WHERE distance_meters <= $3
            ORDER BY distance_meters ASC
            "#,
        )
        .bind::<Double, _>(lat)
        .bind::<Double, _>(lon)
        .bind::<Double, _>(radius_meters)
        .bind::<Nullable<Text>, _>(chain_code);

        let rows: Vec<Row> = query.load(conn)?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    Store {
                        id: r.id,
                        chain_id: r.chain_id,
                        code: r.code,
                        type_: r.type_,
                        address: r.address,
                        city: r.city,
                        zipcode: r.zipcode,
                        lat: r.lat,
                        lon: r.lon,
                        phone: r.phone,
                    },
                    r.distance_meters,
                )
            })
            .collect())
    }
}
