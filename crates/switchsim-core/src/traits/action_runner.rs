// # Action Runner Trait
//
// Defines the interface for the external actions that stand in for real
// device control.
//
// ## Implementations
//
// - No-op: `NoopActionRunner` in this crate (memory-only simulation)
// - Shell scripts: `switchsim-action-shell` crate
//
// ## Usage
//
// ```rust,ignore
// use switchsim_core::{Action, ActionRunner};
//
// let outcome = runner
//     .run(&Action::SetHostname { hostname: "core-1".into() })
//     .await?;
//
// if outcome.is_success() {
//     println!("{}", outcome.output);
// }
// ```

use async_trait::async_trait;
use std::fmt;

use crate::model::LinkState;

/// Part of the live status report to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusComponent {
    /// Hostname and operational status
    System,
    /// Interface link states
    Interfaces,
}

impl StatusComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusComponent::System => "system",
            StatusComponent::Interfaces => "interfaces",
        }
    }
}

/// A side-effecting action with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Apply a new hostname to the device
    SetHostname { hostname: String },

    /// Bring an interface up or down
    SetInterfaceState { interface: String, state: LinkState },

    /// Produce a live status report (read-only, used by presentation adapters)
    GetStatus { component: Option<StatusComponent> },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SetHostname { .. } => ActionKind::SetHostname,
            Action::SetInterfaceState { .. } => ActionKind::SetInterfaceState,
            Action::GetStatus { .. } => ActionKind::GetStatus,
        }
    }

    /// Positional arguments, in the order external actions expect them
    pub fn args(&self) -> Vec<String> {
        match self {
            Action::SetHostname { hostname } => vec![hostname.clone()],
            Action::SetInterfaceState { interface, state } => {
                vec![interface.clone(), state.to_string()]
            }
            Action::GetStatus { component } => component
                .map(|c| vec![c.as_str().to_string()])
                .unwrap_or_default(),
        }
    }
}

/// Action name without arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetHostname,
    SetInterfaceState,
    GetStatus,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SetHostname => "set_hostname",
            ActionKind::SetInterfaceState => "set_interface_state",
            ActionKind::GetStatus => "get_status",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an action succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Succeeded,
    Failed { reason: String },
}

/// Captured result of running an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Combined output captured from the action
    pub output: String,
    /// Success or failure, with the failure reason
    pub status: ActionStatus,
}

impl ActionOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: ActionStatus::Succeeded,
        }
    }

    pub fn failed(output: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: ActionStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Succeeded
    }
}

/// Trait for action runner implementations
///
/// # Contract
///
/// - A failed action is reported through [`ActionStatus::Failed`] together with
///   whatever output it produced; failures are never folded into `output`.
/// - `Err` is reserved for actions that could not be started at all.
/// - Runners do not retry and do not touch switch state; committing the
///   change after success is the engine's job.
/// - Runners may block for as long as the action takes. The engine never
///   holds the configuration lock while awaiting one.
#[async_trait]
pub trait ActionRunner: Send + Sync {
    /// Run a single action to completion
    async fn run(&self, action: &Action) -> Result<ActionOutcome, crate::Error>;

    /// Runner name (for logging)
    fn runner_name(&self) -> &'static str;
}

/// Helper trait for constructing runners from configuration
pub trait ActionRunnerFactory: Send + Sync {
    /// Create an ActionRunner instance from configuration
    fn create(
        &self,
        config: &crate::config::RunnerConfig,
    ) -> Result<Box<dyn ActionRunner>, crate::Error>;
}
