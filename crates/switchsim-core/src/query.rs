//! Read-only view of the switch configuration

use crate::model::{LinkState, SwitchConfiguration};
use crate::store::ConfigurationStore;

/// Serves snapshots to presentation adapters
///
/// Reads only the in-memory store and never waits on an external action.
#[derive(Debug, Clone)]
pub struct QueryService {
    store: ConfigurationStore,
}

impl QueryService {
    pub fn new(store: ConfigurationStore) -> Self {
        Self { store }
    }

    /// Snapshot of the current committed configuration
    pub async fn current_configuration(&self) -> SwitchConfiguration {
        self.store.snapshot().await
    }

    /// Link state of a single interface, if it exists
    pub async fn interface_state(&self, name: &str) -> Option<LinkState> {
        self.store.snapshot().await.interfaces.get(name).copied()
    }

    /// Number of field commits so far
    pub async fn revision(&self) -> u64 {
        self.store.revision().await
    }
}
