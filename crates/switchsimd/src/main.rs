// # switchsimd - Switch Configuration Daemon
//
// The switchsimd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime
// 3. Registering action runners and building the configured one
// 4. Serving the REST API until SIGTERM or SIGINT
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Switch
// - `SWITCHSIM_HOSTNAME`, `SWITCHSIM_STATUS`: initial values
// - `SWITCHSIM_INTERFACES`: fixed interface set, e.g. `eth0=up,eth1=down`
// - `SWITCHSIM_ALLOWED_STATUSES`: optional closed status set
// - `SWITCHSIM_STRICT_INTERFACE_PAIR`: reject half-specified interface changes
//
// ### Runner
// - `SWITCHSIM_RUNNER`: `shell` (default) or `noop`
// - `SWITCHSIM_SCRIPT_DIR`: script directory for the shell runner (default `./shell`)
//
// ### Daemon
// - `SWITCHSIM_LISTEN_ADDR`: bind address (default `0.0.0.0:8080`)
// - `SWITCHSIM_LIVE_STATUS`: run `get_status.sh` on every config read
// - `SWITCHSIM_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export SWITCHSIM_RUNNER=shell
// export SWITCHSIM_SCRIPT_DIR=/opt/switchsim/shell
// export SWITCHSIM_INTERFACES=swp1=up,swp2=up,swp3=down
//
// switchsimd
// ```

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use switchsim_core::{EngineEvent, RunnerRegistry, SwitchEngine};
use switchsimd::{AppState, DaemonSettings, build_router};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let settings = match DaemonSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {e:#}");
        return DaemonExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting switchsimd daemon");
    info!(
        hostname = %settings.switch.hostname,
        interfaces = settings.switch.interfaces.len(),
        runner = settings.switch.runner.type_name(),
        "Configuration loaded"
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(settings).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(DaemonError::Startup(e)) => {
                error!("Startup error: {:#}", e);
                DaemonExitCode::ConfigError
            }
            Err(DaemonError::Runtime(e)) => {
                error!("Daemon error: {:#}", e);
                DaemonExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Failures split by the exit code they map to
enum DaemonError {
    Startup(anyhow::Error),
    Runtime(anyhow::Error),
}

/// Run the daemon
async fn run_daemon(settings: DaemonSettings) -> Result<(), DaemonError> {
    let registry = RunnerRegistry::with_builtins();

    #[cfg(feature = "shell")]
    {
        info!("Registering shell action runner");
        switchsim_action_shell::register(&registry);
    }

    let runner = registry
        .create_runner(&settings.switch.runner)
        .context("Failed to create action runner")
        .map_err(DaemonError::Startup)?;

    let (engine, events) = SwitchEngine::from_config(&settings.switch, runner)
        .context("Failed to create switch engine")
        .map_err(DaemonError::Startup)?;

    let engine = Arc::new(engine);
    tokio::spawn(log_engine_events(events));

    let listener = tokio::net::TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))
        .map_err(DaemonError::Startup)?;

    info!(
        addr = %settings.listen_addr,
        live_status = settings.live_status,
        runner = engine.runner_name(),
        "REST API listening"
    );

    let app = build_router(AppState::new(engine, settings.live_status));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown signal error: {:#}", e),
            }
        })
        .await
        .context("HTTP server failed")
        .map_err(DaemonError::Runtime)?;

    info!("Shutting down daemon");
    Ok(())
}

/// Drain engine events into the log
async fn log_engine_events(events: mpsc::Receiver<EngineEvent>) {
    let mut events = ReceiverStream::new(events);

    while let Some(event) = events.next().await {
        match event {
            EngineEvent::UpdateReceived { fields } => debug!(?fields, "Update received"),
            EngineEvent::ActionStarted { field, action } => {
                debug!(%field, %action, "Action started")
            }
            EngineEvent::FieldApplied { field, change } => debug!(%field, %change, "Field applied"),
            EngineEvent::FieldFailed {
                field,
                kind,
                message,
            } => warn!(%field, %kind, "Field failed: {}", message),
            EngineEvent::FieldSkipped { field, reason } => debug!(%field, "Field skipped: {}", reason),
            EngineEvent::UpdateCompleted { applied, failed } => {
                debug!(applied, failed, "Update completed")
            }
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
