use brandlife::applications::{InMemoryApplicationRepository, SqliteApplicationRepository};
use brandlife::config::{StorageBackend, StorageConfig};
use brandlife::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected by `APP_STORAGE`.
pub(crate) enum ConfiguredStore {
    Memory(Arc<InMemoryApplicationRepository>),
    Sqlite(Arc<SqliteApplicationRepository>),
}

pub(crate) fn open_store(config: &StorageConfig) -> Result<ConfiguredStore, AppError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("using in-memory application store");
            Ok(ConfiguredStore::Memory(Arc::new(
                InMemoryApplicationRepository::default(),
            )))
        }
        StorageBackend::Sqlite => {
            let repository = SqliteApplicationRepository::open(&config.database_path)?;
            info!(path = %config.database_path.display(), "opened application database");
            Ok(ConfiguredStore::Sqlite(Arc::new(repository)))
        }
    }
}
