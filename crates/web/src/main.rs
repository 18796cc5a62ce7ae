use anyhow::Context;

use storefront_web::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = storefront_web::app::build_app_from_config(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
