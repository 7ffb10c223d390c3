use anyhow::Context;
use car_proxy::Config;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        upstream = %config.upstream_host,
        timeout_secs = config.upstream_timeout.as_secs(),
        "starting car proxy"
    );

    let service = car_proxy::service_from_config(&config);
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("listening on {}", config.listen_addr);

    car_proxy::run(listener, service).await?;
    Ok(())
}
