//! Application state for the Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::repository::InMemorySettlementRepository;

/// Shared application state.
///
/// Holds the loaded statutory tables and the settlement store.
#[derive(Clone)]
pub struct AppState {
    /// The loaded statutory configuration.
    config: Arc<ConfigLoader>,
    /// Settlements created through the API.
    settlements: Arc<RwLock<InMemorySettlementRepository>>,
}

impl AppState {
    /// Creates a new application state with an empty settlement store.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            settlements: Arc::new(RwLock::new(InMemorySettlementRepository::default())),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the settlement store.
    pub fn settlements(&self) -> &RwLock<InMemorySettlementRepository> {
        &self.settlements
    }
}
