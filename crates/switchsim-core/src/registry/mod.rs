//! Plugin-based action runner registry
//!
//! Runner crates register a factory under a type name; binaries then build the
//! configured runner without hard-coding every implementation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use switchsim_core::{RunnerRegistry, SwitchConfig};
//!
//! let registry = RunnerRegistry::with_builtins();
//! switchsim_action_shell::register(&registry);
//!
//! let runner = registry.create_runner(&SwitchConfig::default().runner)?;
//! ```

use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::runner::NoopActionRunnerFactory;
use crate::traits::{ActionRunner, ActionRunnerFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry of action runner factories, keyed by runner type name
///
/// ## Thread Safety
///
/// Interior mutability with RwLock: concurrent lookups, exclusive registration.
#[derive(Default)]
pub struct RunnerRegistry {
    runners: RwLock<HashMap<String, Box<dyn ActionRunnerFactory>>>,
}

impl RunnerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the runners built into this crate (`noop`)
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_runner("noop", Box::new(NoopActionRunnerFactory));
        registry
    }

    /// Register a runner factory under `name`, replacing any previous one
    pub fn register_runner(&self, name: impl Into<String>, factory: Box<dyn ActionRunnerFactory>) {
        let mut runners = self.runners.write().unwrap_or_else(PoisonError::into_inner);
        runners.insert(name.into(), factory);
    }

    /// Create the runner described by `config`
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ActionRunner>)`: Created runner
    /// - `Err(Error)`: If the runner type is not registered or creation fails
    pub fn create_runner(&self, config: &RunnerConfig) -> Result<Box<dyn ActionRunner>> {
        let runner_type = config.type_name();
        let runners = self.runners.read().unwrap_or_else(PoisonError::into_inner);

        let factory = runners
            .get(runner_type)
            .ok_or_else(|| Error::config(format!("Unknown runner type: {runner_type}")))?;

        factory.create(config)
    }

    /// List all registered runner types
    pub fn list_runners(&self) -> Vec<String> {
        let runners = self.runners.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = runners.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a runner type is registered
    pub fn has_runner(&self, name: &str) -> bool {
        let runners = self.runners.read().unwrap_or_else(PoisonError::into_inner);
        runners.contains_key(name)
    }
}
