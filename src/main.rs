use anyhow::Context;
use tracing_subscriber::EnvFilter;

use matbook_api::app::{self, AppState};
use matbook_api::config::AppConfig;
use matbook_api::database::{DatabaseManager, SqliteSubmissionStore};
use matbook_api::schema;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, FORM_SCHEMA_PATH, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matbook_api=info,tower_http=info")),
        )
        .init();

    // A panic anywhere is fatal: log it and stop, no drain
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("UNCAUGHT PANIC, shutting down: {}", info);
        std::process::exit(1);
    }));

    let config = AppConfig::from_env();
    tracing::info!("Starting MatBook Forms API in {:?} mode", config.environment);

    if let Err(e) = run(config).await {
        tracing::error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let form = schema::load(config.form.schema_path.as_deref()).context("failed to load form schema")?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, form, SqliteSubmissionStore::new(pool));
    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("MatBook Forms API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
