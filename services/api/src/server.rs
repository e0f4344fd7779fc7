use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use staybook::config::AppConfig;
use staybook::error::AppError;
use staybook::marketplace::HttpMarketplaceApi;
use staybook::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();

    let marketplace = HttpMarketplaceApi::new(&config.upstream.base_url)?;
    let state = AppState::new(Arc::new(marketplace), prometheus_handle);
    let readiness = state.readiness.clone();

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upstream = %config.upstream.base_url,
        "staybook insights service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
