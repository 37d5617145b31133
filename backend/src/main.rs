use std::sync::Arc;

use salesmap::{
    AppState, config::AppConfig, create_router, service::ZoneService, upstream::HttpZoneSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesmap=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "zones upstream {} (timeout {:?}), clustering within {} km, min {} point(s)",
        config.zones_api_root,
        config.upstream_timeout,
        config.cluster.max_distance_km,
        config.cluster.min_cluster_size
    );

    let source = HttpZoneSource::new(&config.zones_api_root, config.upstream_timeout)?;
    let state = AppState {
        service: Arc::new(ZoneService::new(source, config.cluster)),
    };
    let app = create_router(state);

    tracing::info!("starting backend on http://{}", config.bind_addr);
    tracing::info!("  POST /api/zones/cluster - cluster zone records from the body");
    tracing::info!("  GET /api/countries/:country/zones - select a country");
    tracing::info!("  GET /api/zones - latest published zones");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
