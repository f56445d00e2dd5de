mod search;

use anyhow::Context;
use clap::{Parser, Subcommand};
use courtfinder_core::{AppConfig, SearchRadius, SessionState, DEFAULT_MAP_CENTER};
use courtfinder_directory::DirectoryClient;
use courtfinder_geocode::GeocodeClient;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "courtfinder")]
#[command(about = "Find tennis courts near an address")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every location in the directory.
    List,
    /// Show locations within a radius of an address.
    Search {
        address: String,
        /// Search radius in km: 2, 5, 10 or 20.
        #[arg(long, default_value_t = SearchRadius::Five)]
        radius: SearchRadius,
        /// Geocode through a running server's `/api/geocode` instead of
        /// calling the geocoding service directly.
        #[arg(long, env = "COURTFINDER_PROXY_URL")]
        proxy_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = courtfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List => run_list(&config).await,
        Commands::Search {
            address,
            radius,
            proxy_url,
        } => run_search(&config, &address, radius, proxy_url.as_deref()).await,
    }
}

async fn load_session(config: &AppConfig) -> anyhow::Result<SessionState> {
    let client = DirectoryClient::new(
        &config.directory_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let load = client
        .load()
        .await
        .context("failed to load the court directory")?;
    let mut session = SessionState::new();
    session.load_directory(load.locations);
    Ok(session)
}

fn build_geocoder(config: &AppConfig, proxy_url: Option<&str>) -> anyhow::Result<GeocodeClient> {
    let client = match proxy_url {
        Some(url) => {
            GeocodeClient::via_proxy(url, config.request_timeout_secs, &config.user_agent)?
        }
        None => GeocodeClient::with_base_url(
            Some(config.public_maps_api_key()?),
            &config.geocode_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?,
    };
    Ok(client)
}

async fn run_list(config: &AppConfig) -> anyhow::Result<()> {
    let session = load_session(config).await?;
    if session.directory().is_empty() {
        println!("the directory has no locations");
        return Ok(());
    }
    for card in search::render_cards(session.directory(), Some(DEFAULT_MAP_CENTER)) {
        println!("{card}");
    }
    Ok(())
}

async fn run_search(
    config: &AppConfig,
    address: &str,
    radius: SearchRadius,
    proxy_url: Option<&str>,
) -> anyhow::Result<()> {
    let geocoder = build_geocoder(config, proxy_url)?;
    let mut session = load_session(config).await?;
    session.set_radius(radius);

    let session = Mutex::new(session);
    let ticket = session.lock().await.begin_search();
    let applied = search::resolve_search(&session, &geocoder, ticket, address).await?;

    let session = session.into_inner();
    search::print_outcome(&session, applied);
    Ok(())
}
