mod api;
mod middleware;

use std::sync::Arc;

use courtfinder_directory::DirectoryClient;
use courtfinder_geocode::GeocodeClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState, DirectorySnapshot},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = courtfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting court finder server");

    let directory = load_directory(&config).await?;

    let geocoder = match config.maps_api_key.as_deref() {
        Some(key) => Some(Arc::new(GeocodeClient::with_base_url(
            Some(key),
            &config.geocode_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?)),
        None => {
            tracing::warn!("GOOGLE_MAPS_API_KEY is not set; /api/geocode will answer 500");
            None
        }
    };

    let app = build_app(
        AppState {
            directory: Arc::new(directory),
            geocoder,
        },
        RateLimitState::per_minute(config.geocode_rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Fetches the directory once. A failed fetch is logged and the server comes
/// up with an empty, unavailable snapshot.
async fn load_directory(
    config: &courtfinder_core::AppConfig,
) -> anyhow::Result<DirectorySnapshot> {
    let client = DirectoryClient::new(
        &config.directory_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    match client.load().await {
        Ok(load) => Ok(DirectorySnapshot::ready(load.locations)),
        Err(e) => {
            tracing::error!(
                error = %e,
                url = %config.directory_url,
                "failed to load court directory"
            );
            Ok(DirectorySnapshot::unavailable())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
