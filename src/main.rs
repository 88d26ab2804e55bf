use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use calling_service::{app, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let app = app::build(&config).context("building http client")?;

    info!(
        message = "Forwarding customer calls",
        listen_addr = %config.listen_addr,
        downstream = %config.downstream_base_url,
        registration_id = %config.registration.registration_id,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}
