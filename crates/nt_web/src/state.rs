use nt_storage::FallbackReader;
use std::sync::Arc;
use tracing::info;

use crate::service::CategoryService;
use crate::stream::Notifier;
use crate::ServerConfig;

pub struct AppState {
    pub service: CategoryService,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(service: CategoryService, notifier: Notifier) -> Self {
        Self { service, notifier }
    }

    /// Opens the configured stores and builds the key registry. Stores that
    /// fail to open are left out rather than aborting startup.
    pub async fn from_config(config: &ServerConfig) -> Self {
        let primary = nt_storage::open_primary(config.primary_path.as_deref()).await;
        let secondary = nt_storage::open_secondary(config.document_dir.as_deref());
        if primary.is_none() && secondary.is_none() {
            info!("🎭 No article stores configured, serving demo data only");
        }
        let reader = FallbackReader::new(primary, secondary, config.fallback.clone());

        let (gate, _dev_key) = config.auth.build_gate().await;
        if gate.is_enabled() {
            info!("🔐 API key required on category endpoints");
        }

        Self::new(
            CategoryService::new(gate, reader),
            Notifier::new(config.heartbeat),
        )
    }
}
