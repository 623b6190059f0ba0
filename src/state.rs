//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::render::{EngineLauncher, RendererPool};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pool: RendererPool,
}

impl AppState {
    /// Create application state over an injected engine launcher
    ///
    /// The launcher is a parameter (rather than constructed here) so
    /// tests can wire in a mock engine.
    pub fn new(config: Config, launcher: Arc<dyn EngineLauncher>) -> Self {
        let pool = RendererPool::new(launcher, config.pool.to_pool_config());
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the renderer pool
    pub fn pool(&self) -> &RendererPool {
        &self.inner.pool
    }

    /// Shut down the renderer pool, closing any live engine
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down application state...");
        self.inner.pool.shutdown().await;
    }
}
