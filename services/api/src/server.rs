use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryOrderRepository, OrderTableHistory};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fulfillment_guard::config::AppConfig;
use fulfillment_guard::error::AppError;
use fulfillment_guard::orders::OrderFulfillmentService;
use fulfillment_guard::telemetry;
use fulfillment_guard::trust::{
    InMemoryTrustStore, ScoringConfig, SystemClock, TrustOverrideManager,
};
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let orders = Arc::new(InMemoryOrderRepository::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        orders: orders.clone(),
    };

    let fulfillment = Arc::new(OrderFulfillmentService::new(
        orders.clone(),
        &config.fulfillment,
    ));
    let trust = Arc::new(
        TrustOverrideManager::new(
            Arc::new(InMemoryTrustStore::default()),
            Arc::new(OrderTableHistory::new(orders)),
            Arc::new(SystemClock),
            ScoringConfig::default(),
        )
        .with_min_reason_len(config.fulfillment.override_reason_min_len),
    );

    let app = with_routes(fulfillment, trust)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        currency = %config.fulfillment.default_currency,
        "fulfillment guard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
