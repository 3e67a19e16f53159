use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub mod repositories;

pub type PgPool = sqlx::PgPool;

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("postgres_connect")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("postgres_migrate")
}
