use crate::cli::ServeArgs;
use crate::infra::{sample_workers, AppState, InMemoryEntityStore};
use crate::routes::api_router;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use waste_ops::config::AppConfig;
use waste_ops::dispatch::{DispatchService, TracingDispatcher};
use waste_ops::error::AppError;
use waste_ops::telemetry;
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

    let store = InMemoryEntityStore::default();
    if args.seed_demo {
        for worker in sample_workers() {
            store.seed_worker(worker);
        }
        info!("seeded demo worker roster");
    }

    let notifier = Arc::new(TracingDispatcher);
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: store.clone(),
        notifier: notifier.clone(),
    };

    let dispatch_service = Arc::new(DispatchService::new(Arc::new(store), notifier));

    let app = api_router(dispatch_service, app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "waste dispatch service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
