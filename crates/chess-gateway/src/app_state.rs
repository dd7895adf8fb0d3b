//! Shared application state, handed to every axum handler via `.with_state`.
//! `Arc`-backed and cheap to clone.

use std::sync::Arc;

use crate::config::Config;
use crate::obs::metrics::GatewayMetrics;
use crate::realtime::Manager;
use crate::store::RoomRepository;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    manager: Arc<Manager>,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<RoomRepository>) -> Self {
        let metrics = Arc::new(GatewayMetrics::new());
        let manager = Arc::new(Manager::new(store, metrics.clone()));
        Self { inner: Arc::new(AppStateInner { config, manager, metrics }) }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn manager(&self) -> &Arc<Manager> {
        &self.inner.manager
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }
}
