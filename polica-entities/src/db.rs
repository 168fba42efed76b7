use deadpool_diesel::postgres::Pool;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations/");

pub async fn run_migrations(pool: &Pool) {
    let conn = pool.get().await.expect("failed to get DB connection");
    conn.interact(|conn| {
        conn.transaction(|conn| conn.run_pending_migrations(MIGRATIONS).map(|_| ()))
    })
    .await
    .expect("failed to run migrations")
    .expect("database error during migration");
}
