use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates the PostgreSQL pool backing analysis-result storage.
/// One insert and one lookup per request keeps contention low, so a
/// small pool suffices.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to the analysis results database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("Analysis results pool ready");
    Ok(pool)
}
