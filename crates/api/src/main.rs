use anyhow::Context;

use saldoo_api::app::{AppServices, build_app};
use saldoo_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    saldoo_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = AppServices::from_config(&config).context("failed to set up backend")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        base_domain = %config.base_domain,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
