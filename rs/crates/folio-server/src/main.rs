mod error;
mod pages;
mod server;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use folio_cms::config::{DEFAULT_API_URL, DEFAULT_MEDIA_URL};
use folio_cms::{CmsConfig, StrapiClient};
use folio_grid::pagination::DEFAULT_PAGE_SIZE;
use folio_grid::PortfolioConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "folio-server", version, about = "Portfolio site backed by a Strapi CMS")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Strapi REST root
    #[arg(long, env = "FOLIO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Prefix for relative media URLs
    #[arg(long, env = "FOLIO_MEDIA_URL", default_value = DEFAULT_MEDIA_URL)]
    media_url: String,

    #[arg(long, env = "FOLIO_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// CMS request timeout in seconds
    #[arg(long, env = "FOLIO_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Extra attempts for transient CMS failures
    #[arg(long, env = "FOLIO_RETRIES", default_value_t = 2)]
    retries: u32,

    /// Gutter between grid columns, in pixels
    #[arg(long, env = "FOLIO_GUTTER", default_value_t = 0)]
    gutter: u32,

    /// Seconds before an unused page view is dropped
    #[arg(long, env = "FOLIO_SESSION_IDLE", default_value_t = session::DEFAULT_IDLE.as_secs())]
    session_idle: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let cms = CmsConfig {
        api_url: args.api_url,
        media_url: args.media_url,
        page_size: args.page_size,
        timeout: Duration::from_secs(args.timeout),
        retries: args.retries,
        ..CmsConfig::default()
    };
    let client = StrapiClient::new(cms).context("invalid CMS configuration")?;
    info!(target: "folio::server", api = %client.config().api_url, "CMS configured");

    let portfolio = PortfolioConfig {
        page_size: args.page_size,
        gutter: args.gutter,
        ..PortfolioConfig::default()
    };
    let idle = Duration::from_secs(args.session_idle);
    let state = Arc::new(server::AppState::new(Arc::new(client), portfolio, idle));

    // First page before the first paint.
    if state.feed.load_more().await.is_some() {
        let catalog = state.catalog();
        match catalog.error() {
            Some(err) => warn!(target: "folio::server", error = %err, "initial page failed"),
            None => info!(target: "folio::server", items = catalog.items().len(), "initial page loaded"),
        }
    }

    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(target: "folio::server", "http://localhost:{}", args.port);
    info!(target: "folio::server", "Folio v{}", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
