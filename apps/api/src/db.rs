use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const USERS_SCHEMA: &str = include_str!("../migrations/0001_users.sql");

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the `users` table schema. Idempotent.
pub async fn apply_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(USERS_SCHEMA)
        .execute(pool)
        .await
        .context("apply users schema")?;

    info!("Users schema applied");
    Ok(())
}
