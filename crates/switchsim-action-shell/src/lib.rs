// # Shell Script Action Runner
//
// Runs each action as a script from a configured directory:
//
// | Action              | Script             | Arguments                  |
// |---------------------|--------------------|----------------------------|
// | `SetHostname`       | `set_hostname.sh`  | `<hostname>`               |
// | `SetInterfaceState` | `set_interface.sh` | `<interface> <up\|down>`   |
// | `GetStatus`         | `get_status.sh`    | `[system\|interfaces]`     |
//
// Scripts are executed directly, never through `sh -c`, so arguments reach
// them verbatim and cannot inject commands.
//
// ## Outcome
//
// - Exit status 0: success, with combined stdout/stderr as output
// - Non-zero exit or signal: failure, output kept for diagnostics
// - Script missing or not executable: `Error::Runner`
//
// The runner is single-shot: no retries, no timeouts, no background tasks.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use switchsim_core::config::RunnerConfig;
use switchsim_core::traits::{Action, ActionOutcome, ActionRunner, ActionRunnerFactory};
use switchsim_core::{Error, Result};
use tokio::process::Command;
use tracing::{debug, warn};

/// Script that applies a hostname
pub const SET_HOSTNAME_SCRIPT: &str = "set_hostname.sh";

/// Script that brings an interface up or down
pub const SET_INTERFACE_SCRIPT: &str = "set_interface.sh";

/// Script that prints a live status report
pub const GET_STATUS_SCRIPT: &str = "get_status.sh";

/// Action runner backed by shell scripts
#[derive(Debug, Clone)]
pub struct ShellActionRunner {
    script_dir: PathBuf,
}

impl ShellActionRunner {
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
        }
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    /// Path of the script that implements `action`
    pub fn script_for(&self, action: &Action) -> PathBuf {
        let script = match action {
            Action::SetHostname { .. } => SET_HOSTNAME_SCRIPT,
            Action::SetInterfaceState { .. } => SET_INTERFACE_SCRIPT,
            Action::GetStatus { .. } => GET_STATUS_SCRIPT,
        };
        self.script_dir.join(script)
    }
}

#[async_trait]
impl ActionRunner for ShellActionRunner {
    async fn run(&self, action: &Action) -> Result<ActionOutcome> {
        let script = self.script_for(action);
        let args = action.args();

        debug!(script = %script.display(), ?args, "Running action script");

        let output = Command::new(&script)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::runner(format!("Failed to run {}: {e}", script.display())))?;

        let combined = combined_output(&output.stdout, &output.stderr);

        if output.status.success() {
            Ok(ActionOutcome::succeeded(combined))
        } else {
            let reason = failure_reason(output.status);
            warn!(script = %script.display(), %reason, "Action script failed");
            Ok(ActionOutcome::failed(combined, reason))
        }
    }

    fn runner_name(&self) -> &'static str {
        "shell"
    }
}

/// Join stdout and stderr the way a terminal would show them
fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let stdout = stdout.trim_end();
    let stderr = stderr.trim_end();

    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

fn failure_reason(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status: {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Factory for creating shell runners
pub struct ShellActionRunnerFactory;

impl ActionRunnerFactory for ShellActionRunnerFactory {
    fn create(&self, config: &RunnerConfig) -> Result<Box<dyn ActionRunner>> {
        match config {
            RunnerConfig::Shell { script_dir } => {
                if script_dir.trim().is_empty() {
                    return Err(Error::config("Shell runner script directory is required"));
                }

                let dir = Path::new(script_dir);
                if !dir.is_dir() {
                    // Scripts may be mounted later; each action reports its own failure
                    warn!(script_dir = %dir.display(), "Script directory does not exist");
                }

                Ok(Box::new(ShellActionRunner::new(dir)))
            }
            other => Err(Error::config(format!(
                "Invalid config for shell runner: {}",
                other.type_name()
            ))),
        }
    }
}

/// Register the shell runner with a registry
pub fn register(registry: &switchsim_core::RunnerRegistry) {
    registry.register_runner("shell", Box::new(ShellActionRunnerFactory));
}
