use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;
use studentapi::{api, config, logging, students::StudentService};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` may set the log file path, so load it before the subscriber is installed.
    dotenvy::dotenv().ok();
    logging::init_tracing();
    let config = config::init_config().context("failed to load configuration")?;

    let service =
        StudentService::from_config(config).context("failed to initialize summarization client")?;
    let app = api::create_router(Arc::new(service));

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
