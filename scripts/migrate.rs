use polica_entities::connection::init_pool;
use polica_entities::db::run_migrations;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    println!("Running database migrations...");

    let pool = init_pool("polica-migrations").expect("failed to initialize database pool");
    run_migrations(&pool).await;

    println!("Database migrations completed successfully!");

    Ok(())
}
