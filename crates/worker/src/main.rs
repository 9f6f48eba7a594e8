use anyhow::Context;
use guestbay_worker::config::SweepSchedule;
use guestbay_worker::sweeper::{self, Sweep};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestbay_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = guestbay_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    guestbay_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    let schedule = SweepSchedule::from_env();
    let cancel = CancellationToken::new();

    let expiry = tokio::spawn(sweeper::run(
        pool.clone(),
        Sweep::Expiry,
        schedule.expiry_interval,
        cancel.clone(),
    ));
    let completion = tokio::spawn(sweeper::run(
        pool.clone(),
        Sweep::Completion,
        schedule.completion_interval,
        cancel.clone(),
    ));

    tracing::info!("Worker running");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received, stopping sweepers");
    cancel.cancel();

    let _ = tokio::join!(expiry, completion);
    pool.close().await;
    tracing::info!("Worker stopped");
    Ok(())
}
