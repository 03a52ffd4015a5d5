use anyhow::Context;
use readstash::{config::Config, telemetry};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    let pool: Pool<Postgres> = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database_url())
        .await
        .context("failed to connect to database")?;

    // runs all pending migrations; no-op if up-to-date
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("migrations applied");

    Ok(())
}
