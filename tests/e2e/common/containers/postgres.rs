use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

#[rstest::fixture]
pub async fn setup_postgres() -> ContainerAsync<Postgres> {
    Postgres::default()
        .with_env_var("POSTGRES_DB", "polica")
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .start()
        .await
        .unwrap()
}
