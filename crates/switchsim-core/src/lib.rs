// # switchsim-core
//
// Configuration state engine for the simulated network switch.
//
// ## Architecture Overview
//
// - **ConfigurationStore**: the lock-guarded, in-memory switch configuration
// - **SwitchEngine**: applies partial updates, coordinating with the runner
// - **QueryService**: read-only snapshots for presentation adapters
// - **ActionRunner**: trait for the side-effecting actions that stand in for
//   real device control (shell scripts, or nothing at all)
// - **RunnerRegistry**: plugin-based registry for action runners
//
// ## Design Principles
//
// 1. **Owned state**: no globals; every switch is an explicit store instance
// 2. **Commit after success**: a field changes only if its action succeeded
// 3. **Independent fields**: one failing field never blocks the others
// 4. **Library-first**: the daemon and the CLI are thin layers over this crate

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod runner;
pub mod store;

// Re-export core types for convenience
pub use traits::{Action, ActionKind, ActionOutcome, ActionRunner, ActionStatus};
pub use engine::{EngineEvent, SwitchEngine, UpdateOutcome};
pub use registry::RunnerRegistry;
pub use config::{EngineConfig, RunnerConfig, SwitchConfig};
pub use error::{Error, ErrorKind, FieldError, Result};
pub use model::{ChangeSummary, ConfigurationUpdateRequest, LinkState, SwitchConfiguration};
pub use query::QueryService;
pub use runner::NoopActionRunner;
pub use store::ConfigurationStore;
