// # No-op Action Runner
//
// Runner for the memory-only simulation: every action succeeds immediately
// and touches nothing outside the process.

use async_trait::async_trait;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::traits::{Action, ActionOutcome, ActionRunner, ActionRunnerFactory};

/// Runner whose actions always succeed without side effects
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActionRunner;

impl NoopActionRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionRunner for NoopActionRunner {
    async fn run(&self, action: &Action) -> Result<ActionOutcome, crate::Error> {
        debug!(action = %action.kind(), args = ?action.args(), "noop runner accepted action");

        let output = match action {
            Action::SetHostname { hostname } => format!("Hostname set to {hostname} (simulated)"),
            Action::SetInterfaceState { interface, state } => {
                format!("Interface {interface} set to {state} (simulated)")
            }
            Action::GetStatus { .. } => "Status report unavailable in simulation mode".to_string(),
        };

        Ok(ActionOutcome::succeeded(output))
    }

    fn runner_name(&self) -> &'static str {
        "noop"
    }
}

/// Factory for [`NoopActionRunner`]
pub struct NoopActionRunnerFactory;

impl ActionRunnerFactory for NoopActionRunnerFactory {
    fn create(&self, _config: &RunnerConfig) -> Result<Box<dyn ActionRunner>, crate::Error> {
        Ok(Box::new(NoopActionRunner))
    }
}
