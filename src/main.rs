//! Server binary: configuration, pool, migrations, router, serve.

use hostel_api::gateway::{ConsoleNotifier, PayPalGateway, SmtpNotifier, TextReceiptRenderer};
use hostel_api::gateway::notifier::Notifier;
use hostel_api::{build_router, AppState, Config};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!("connecting to database");
    let pool = hostel_api::store::connect(&config.database).await?;

    tracing::info!("running migrations");
    hostel_api::store::migrate(&pool).await?;

    let notifier: Arc<dyn Notifier> = if config.smtp.server.is_empty() {
        tracing::warn!("SMTP not configured; emails go to the log");
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(SmtpNotifier::from_config(&config.smtp))
    };

    let payments = Arc::new(PayPalGateway::new(config.paypal.clone()));
    let receipts = Arc::new(TextReceiptRenderer);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, pool, payments, notifier, receipts);
    let router = build_router(state);

    tracing::info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
