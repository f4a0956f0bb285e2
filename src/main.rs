use std::{sync::Arc, time::Duration};

use menu_catalog_api::{
    config::Config,
    db::{self, MenuStore, PgMenuStore},
    routes::{create_router, AppState},
    services::{
        providers::{GeminiClient, GenerativeClient},
        RecommendationResolver,
    },
};
use tokio::signal;
use tracing_subscriber::EnvFilter;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config);

    tracing::info!(env = %config.app_env, port = config.port, "Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let store: Arc<dyn MenuStore> = Arc::new(PgMenuStore::new(pool.clone()));

    let generator = connect_generator(&config).await;
    let resolver = RecommendationResolver::new(generator, config.gemini_timeout());

    let state = Arc::new(AppState::new(store, resolver));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("menu_catalog_api=info,tower_http=info"));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Builds and probes the Gemini client; `None` means heuristics only
async fn connect_generator(config: &Config) -> Option<Arc<dyn GenerativeClient>> {
    let Some(api_key) = config.gemini_key() else {
        tracing::warn!("GEMINI_API_KEY not set, running without generative recommendations");
        return None;
    };

    let client = match GeminiClient::new(
        api_key.to_string(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid Gemini configuration");
            return None;
        }
    };

    match client.probe(PROBE_TIMEOUT).await {
        Ok(()) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Gemini probe failed, running without generative recommendations"
            );
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
