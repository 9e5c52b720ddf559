use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState, ConfiguredStore};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use brandlife::applications::{ApplicationRepository, ApplicationService};
use brandlife::config::AppConfig;
use brandlife::error::AppError;
use brandlife::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    match open_store(&config.storage)? {
        ConfiguredStore::Memory(repository) => serve(config, repository).await,
        ConfiguredStore::Sqlite(repository) => serve(config, repository).await,
    }
}

async fn serve<R>(config: AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: ApplicationRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let application_service = Arc::new(ApplicationService::new(repository, config.listing));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, backend = ?config.storage.backend, %addr, "application intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
