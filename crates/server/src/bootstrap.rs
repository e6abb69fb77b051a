use axum::Router;
use barberbook_core::config::{AppConfig, ConfigError};
use barberbook_db::{connect, provision, ProvisionReport, RecordStore, StoreError};
use thiserror::Error;
use tracing::info;

use crate::routes;

pub struct Application {
    pub config: AppConfig,
    pub store: RecordStore,
    pub provisioned: ProvisionReport,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage provisioning failed: {0}")]
    Storage(#[source] StoreError),
}

impl Application {
    pub fn router(&self) -> Router {
        routes::router(self.store.clone(), &self.config.server.static_dir)
    }
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        data_dir = %config.storage.data_dir.display(),
        "starting application bootstrap"
    );

    let store = connect(&config.storage.data_dir);
    let provisioned = provision(&store).await.map_err(BootstrapError::Storage)?;
    info!(
        event_name = "system.bootstrap.storage_ready",
        correlation_id = "bootstrap",
        created = ?provisioned.created,
        skipped = ?provisioned.skipped,
        "record collections provisioned"
    );

    Ok(Application { config, store, provisioned })
}
