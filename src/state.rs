//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{config::Config, services::SessionEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Live session engine
    pub engine: Arc<SessionEngine>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(engine: Arc<SessionEngine>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { engine, config }),
        }
    }

    /// Get a reference to the session engine
    pub fn engine(&self) -> &SessionEngine {
        &self.inner.engine
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
