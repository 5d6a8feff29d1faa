// # Configuration Store
//
// In-memory home of the switch configuration.
//
// ## Purpose
//
// Holds the one authoritative `SwitchConfiguration` for a simulated switch and
// mediates every read and write to it. Each store is an explicit instance, so
// several simulated switches can live in one process.
//
// ## Locking
//
// A single `RwLock` guards all fields. Snapshots take the read lock and clone;
// each field mutation takes the write lock once. A reader therefore never sees
// a half-written field, while a multi-field update may interleave with other
// writers between fields.
//
// ## Lifetime
//
// - Seeded once at startup; the interface set is fixed from then on
// - Nothing is persisted; state is gone when the process exits

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

use crate::config::SwitchConfig;
use crate::model::{LinkState, SwitchConfiguration, validate_hostname};
use crate::{Error, Result};

#[derive(Debug)]
struct StoreState {
    config: SwitchConfiguration,
    revision: u64,
}

/// Lock-guarded switch configuration
///
/// Cloning is cheap and yields a handle to the same underlying state.
///
/// # Example
///
/// ```rust,no_run
/// use switchsim_core::{ConfigurationStore, SwitchConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = ConfigurationStore::from_config(&SwitchConfig::default())?;
///
///     let previous = store.apply_interface_state("eth1", "UP").await?;
///     assert_eq!(previous.to_string(), "down");
///
///     let snapshot = store.snapshot().await;
///     assert_eq!(snapshot.interfaces["eth1"].to_string(), "up");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    inner: Arc<RwLock<StoreState>>,
}

impl ConfigurationStore {
    /// Create a store from a seed configuration
    ///
    /// The seed's interface names become the fixed interface set.
    pub fn new(seed: SwitchConfiguration) -> Result<Self> {
        validate_hostname(&seed.hostname)?;

        if seed.status.trim().is_empty() {
            return Err(Error::invalid_value("status cannot be empty"));
        }

        if seed.interfaces.is_empty() {
            return Err(Error::config("at least one interface is required"));
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(StoreState {
                config: seed,
                revision: 0,
            })),
        })
    }

    /// Create a store seeded from a [`SwitchConfig`]
    pub fn from_config(config: &SwitchConfig) -> Result<Self> {
        Self::new(SwitchConfiguration {
            hostname: config.hostname.clone(),
            interfaces: config.interfaces.clone(),
            status: config.status.clone(),
        })
    }

    /// Copy of the current committed configuration
    pub async fn snapshot(&self) -> SwitchConfiguration {
        self.inner.read().await.config.clone()
    }

    /// Number of field commits since the store was created
    pub async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }

    /// Names of the fixed interface set, sorted
    pub async fn interface_names(&self) -> Vec<String> {
        self.inner.read().await.config.interfaces.keys().cloned().collect()
    }

    pub async fn has_interface(&self, name: &str) -> bool {
        self.inner.read().await.config.interfaces.contains_key(name)
    }

    /// Validate an interface change without applying it
    ///
    /// Returns the normalized state. The interface set never changes, so a
    /// positive answer stays valid until the commit.
    pub async fn check_interface_state(&self, name: &str, state: &str) -> Result<LinkState> {
        let guard = self.inner.read().await;
        check_interface(&guard.config.interfaces, name)?;
        state.parse()
    }

    /// Set the hostname, returning the previous one
    pub async fn apply_hostname(&self, hostname: &str) -> Result<String> {
        validate_hostname(hostname)?;

        let mut guard = self.inner.write().await;
        let previous = std::mem::replace(&mut guard.config.hostname, hostname.to_string());
        guard.revision += 1;
        trace!(hostname, revision = guard.revision, "hostname committed");

        Ok(previous)
    }

    /// Set the operational status, returning the previous one
    pub async fn apply_status(&self, status: &str) -> Result<String> {
        if status.trim().is_empty() {
            return Err(Error::invalid_value("status cannot be empty"));
        }

        let mut guard = self.inner.write().await;
        let previous = std::mem::replace(&mut guard.config.status, status.to_string());
        guard.revision += 1;
        trace!(status, revision = guard.revision, "status committed");

        Ok(previous)
    }

    /// Set the link state of a known interface, returning the previous state
    ///
    /// `state` is parsed case-insensitively and stored normalized.
    pub async fn apply_interface_state(&self, name: &str, state: &str) -> Result<LinkState> {
        let new_state: LinkState = state.parse()?;

        let mut guard = self.inner.write().await;
        let slot = guard
            .config
            .interfaces
            .get_mut(name)
            .ok_or_else(|| Error::unknown_interface(name))?;
        let previous = std::mem::replace(slot, new_state);
        guard.revision += 1;
        trace!(interface = name, state = %new_state, revision = guard.revision, "interface committed");

        Ok(previous)
    }
}

fn check_interface(interfaces: &BTreeMap<String, LinkState>, name: &str) -> Result<()> {
    if interfaces.contains_key(name) {
        Ok(())
    } else {
        Err(Error::unknown_interface(name))
    }
}
