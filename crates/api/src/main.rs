use std::net::SocketAddr;

use anyhow::Context;

use casedesk_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    casedesk_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "starting casedesk-api");

    let app = casedesk_api::app::build_app(&config).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
