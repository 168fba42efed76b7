use crate::error::ErrorKind;
use deadpool_diesel::postgres::{Manager, Pool};

pub const ENV_DATABASE_URL: &str = "CATALOG_DATABASE_URL";
const ENV_DATABASE_MAX_CONN: &str = "DATABASE_MAX_CONN";
const DEFAULT_MAX_CONN: usize = 10;

/// Builds the shared deadpool-diesel pool used by every binary in the
/// workspace (spec.md §5: "all repositories bind to the same pool at
/// startup"). `app_name` is tagged onto the Postgres `application_name`
/// parameter for operator visibility in `pg_stat_activity`.
pub fn init_pool(app_name: &str) -> Result<Pool, ErrorKind> {
    let database_url = std::env::var(ENV_DATABASE_URL)
        .map_err(|_| ErrorKind::VariableDatabase(ENV_DATABASE_URL.to_string()))?;

    let database_max_conn = std::env::var(ENV_DATABASE_MAX_CONN)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_CONN);

    let manager = Manager::new(
        format!("{database_url}?application_name={app_name}"),
        deadpool_diesel::Runtime::Tokio1,
    );

    Pool::builder(manager)
        .max_size(database_max_conn)
        .build()
        .map_err(|e| ErrorKind::PoolDatabase(e.to_string()))
}
