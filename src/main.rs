use moodreel_api::{
    config::Config,
    routes::{create_router, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.tmdb_api_key.is_none() || config.tmdb_access_token.is_none() {
        tracing::warn!("TMDB credentials missing, catalog requests will fall back to Gemini");
    }
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY missing, generated recommendations will fail");
    }

    let state = AppState::from_config(&config);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
