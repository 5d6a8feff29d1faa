//! Switch configuration engine
//!
//! The SwitchEngine is responsible for:
//! - Validating each field of a partial update
//! - Running the external action behind hostname and interface changes
//! - Committing a field to the store only after its action succeeded
//! - Reporting what changed and what failed, field by field
//!
//! ## Architecture
//!
//! ```text
//!                  ConfigurationUpdateRequest
//!                             │
//!                             ▼
//!                    ┌────────────────┐
//!                    │  SwitchEngine  │
//!                    └────────────────┘
//!                             │
//!         ┌───────────────────┼───────────────────┐
//!         │                   │                   │
//!         ▼                   ▼                   ▼
//! ┌───────────────┐   ┌───────────────┐   ┌─────────────┐
//! │ ActionRunner  │   │ Configuration │   │   Events    │
//! │ (side effect) │   │ Store (commit)│   │  (notify)   │
//! └───────────────┘   └───────────────┘   └─────────────┘
//! ```
//!
//! ## Field Flow
//!
//! Fields are processed in a fixed order: hostname, status, interface.
//!
//! 1. Validate the field value
//! 2. Run the field's action, if it has one (status has none)
//! 3. On success, commit to the store and record `before -> after`
//! 4. On failure, leave the store untouched and record a `FieldError`
//! 5. Continue with the next field either way

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use crate::config::{EngineConfig, SwitchConfig};
use crate::error::{Error, ErrorKind, FieldError, Result};
use crate::model::{
    ChangeSummary, ConfigurationUpdateRequest, InterfaceChange, LinkState, SwitchConfiguration,
    validate_hostname,
};
use crate::query::QueryService;
use crate::store::ConfigurationStore;
use crate::traits::{Action, ActionKind, ActionOutcome, ActionRunner, ActionStatus};

/// Events emitted by the SwitchEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An update request was accepted for processing
    UpdateReceived { fields: Vec<String> },

    /// An external action is about to run
    ActionStarted { field: String, action: ActionKind },

    /// A field was committed
    FieldApplied { field: String, change: String },

    /// A field was left unchanged because it failed
    FieldFailed {
        field: String,
        kind: ErrorKind,
        message: String,
    },

    /// A half-specified field was ignored
    FieldSkipped { field: String, reason: String },

    /// The update request finished
    UpdateCompleted { applied: usize, failed: usize },
}

/// Result of applying one update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Fields that were committed, in application order
    pub changes: ChangeSummary,
    /// Fields that failed, in application order
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl UpdateOutcome {
    /// No field failed
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Some fields were committed and some failed
    pub fn is_partial(&self) -> bool {
        !self.changes.is_empty() && !self.errors.is_empty()
    }

    /// Nothing was committed and nothing failed
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.errors.is_empty()
    }

    /// The error recorded for `field`, if any
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// Core switch configuration engine
///
/// Owns the configuration store and the action runner. Share it across
/// request handlers behind an `Arc`; every method takes `&self`.
///
/// ## Concurrency
///
/// Actions are awaited without holding the store lock, so a slow action
/// never stalls snapshots or other writers. The lock is taken only for each
/// field's commit.
pub struct SwitchEngine {
    /// Authoritative configuration
    store: ConfigurationStore,

    /// Snapshot access for readers
    query: QueryService,

    /// Side-effecting actions
    runner: Box<dyn ActionRunner>,

    /// Engine settings
    config: EngineConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SwitchEngine {
    /// Create a new engine over an existing store
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        store: ConfigurationStore,
        runner: Box<dyn ActionRunner>,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            query: QueryService::new(store.clone()),
            store,
            runner,
            config,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Create an engine with a fresh store seeded from `config`
    pub fn from_config(
        config: &SwitchConfig,
        runner: Box<dyn ActionRunner>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;
        let store = ConfigurationStore::from_config(config)?;
        Self::new(store, runner, config.engine.clone())
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    pub fn query(&self) -> &QueryService {
        &self.query
    }

    pub fn runner_name(&self) -> &'static str {
        self.runner.runner_name()
    }

    /// Snapshot of the current configuration
    pub async fn snapshot(&self) -> SwitchConfiguration {
        self.query.current_configuration().await
    }

    /// Apply a partial update
    ///
    /// Never fails as a whole: each field's failure is reported in
    /// [`UpdateOutcome::errors`] and the remaining fields are still attempted.
    ///
    /// # Cancel safety
    ///
    /// Not cancel safe. Dropping the future after an action started can leave
    /// the device changed and the store not. Callers that may be cancelled
    /// (request handlers, timeouts) should run it on its own task with
    /// `tokio::spawn` and await the handle.
    pub async fn apply(&self, request: ConfigurationUpdateRequest) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        if request.is_empty() {
            debug!("Update request has no fields, nothing to do");
            return outcome;
        }

        self.emit_event(EngineEvent::UpdateReceived {
            fields: requested_fields(&request),
        });

        if let Some(hostname) = request.hostname() {
            self.apply_hostname(hostname, &mut outcome).await;
        }

        if let Some(status) = request.status() {
            self.apply_status(status, &mut outcome).await;
        }

        match request.interface_change() {
            InterfaceChange::Requested { interface, state } => {
                self.apply_interface(interface, state, &mut outcome).await;
            }
            InterfaceChange::Partial { interface, state } => {
                self.handle_partial_interface(interface, state, &mut outcome);
            }
            InterfaceChange::Absent => {}
        }

        info!(
            applied = outcome.changes.len(),
            failed = outcome.errors.len(),
            "Update request processed"
        );
        self.emit_event(EngineEvent::UpdateCompleted {
            applied: outcome.changes.len(),
            failed: outcome.errors.len(),
        });

        outcome
    }

    /// Run an action outside of any update (e.g. a live status report)
    ///
    /// Does not touch the store.
    pub async fn run_action(&self, action: &Action) -> Result<ActionOutcome> {
        self.runner.run(action).await
    }

    async fn apply_hostname(&self, hostname: &str, outcome: &mut UpdateOutcome) {
        const FIELD: &str = "hostname";

        if let Err(e) = validate_hostname(hostname) {
            self.record_failure(FIELD, e, outcome);
            return;
        }

        let action = Action::SetHostname {
            hostname: hostname.to_string(),
        };
        if let Err(e) = self.invoke(FIELD, &action).await {
            self.record_failure(FIELD, e, outcome);
            return;
        }

        match self.store.apply_hostname(hostname).await {
            Ok(previous) => self.record_change(FIELD, previous, hostname, outcome),
            Err(e) => self.record_commit_failure(FIELD, e, outcome),
        }
    }

    async fn apply_status(&self, status: &str, outcome: &mut UpdateOutcome) {
        const FIELD: &str = "status";

        if !self.config.status_allowed(status) {
            let allowed = self.config.allowed_statuses.as_deref().unwrap_or_default();
            let e = Error::invalid_value(format!(
                "status '{status}' is not one of: {}",
                allowed.join(", ")
            ));
            self.record_failure(FIELD, e, outcome);
            return;
        }

        match self.store.apply_status(status).await {
            Ok(previous) => self.record_change(FIELD, previous, status, outcome),
            Err(e) => self.record_failure(FIELD, e, outcome),
        }
    }

    async fn apply_interface(&self, interface: &str, state: &str, outcome: &mut UpdateOutcome) {
        let field = format!("interface_{interface}");

        // Validate before running anything: an unknown port must not reach the device
        let new_state: LinkState = match self.store.check_interface_state(interface, state).await {
            Ok(new_state) => new_state,
            Err(e) => {
                self.record_failure(&field, e, outcome);
                return;
            }
        };

        let action = Action::SetInterfaceState {
            interface: interface.to_string(),
            state: new_state,
        };
        if let Err(e) = self.invoke(&field, &action).await {
            self.record_failure(&field, e, outcome);
            return;
        }

        match self
            .store
            .apply_interface_state(interface, new_state.as_str())
            .await
        {
            Ok(previous) => self.record_change(&field, previous, new_state, outcome),
            Err(e) => self.record_commit_failure(&field, e, outcome),
        }
    }

    fn handle_partial_interface(
        &self,
        interface: Option<&str>,
        state: Option<&str>,
        outcome: &mut UpdateOutcome,
    ) {
        let field = interface.map_or_else(|| "interface".to_string(), |name| format!("interface_{name}"));
        let reason = if interface.is_some() {
            "interface given without interface_state"
        } else {
            "interface_state given without interface"
        };

        if self.config.strict_interface_pair {
            self.record_failure(&field, Error::malformed_request(reason), outcome);
        } else {
            debug!(field = %field, state = ?state, "Skipping half-specified interface change: {}", reason);
            self.emit_event(EngineEvent::FieldSkipped {
                field,
                reason: reason.to_string(),
            });
        }
    }

    /// Run the action behind `field`; any failure becomes an `ExternalAction` error
    async fn invoke(&self, field: &str, action: &Action) -> Result<()> {
        self.emit_event(EngineEvent::ActionStarted {
            field: field.to_string(),
            action: action.kind(),
        });

        debug!(
            field,
            action = %action.kind(),
            runner = self.runner.runner_name(),
            "Running action"
        );

        let outcome = match self.runner.run(action).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(Error::external_action(action.kind().as_str(), "", e.to_string())),
        };

        match outcome.status {
            ActionStatus::Succeeded => {
                debug!(field, output = %outcome.output, "Action output");
                Ok(())
            }
            ActionStatus::Failed { reason } => Err(Error::external_action(
                action.kind().as_str(),
                outcome.output,
                reason,
            )),
        }
    }

    fn record_change(
        &self,
        field: &str,
        before: impl std::fmt::Display,
        after: impl std::fmt::Display,
        outcome: &mut UpdateOutcome,
    ) {
        outcome.changes.record(field, before, after);
        let change = outcome.changes.get(field).unwrap_or_default().to_string();

        info!(field, change = %change, "Field applied");
        self.emit_event(EngineEvent::FieldApplied {
            field: field.to_string(),
            change,
        });
    }

    fn record_failure(&self, field: &str, error: Error, outcome: &mut UpdateOutcome) {
        let field_error = FieldError::new(field, &error);

        match field_error.kind {
            ErrorKind::ExternalActionFailure => warn!(
                field,
                output = field_error.output.as_deref().unwrap_or_default(),
                "Field not applied: {}",
                error
            ),
            _ => debug!(field, "Field rejected: {}", error),
        }

        self.emit_event(EngineEvent::FieldFailed {
            field: field.to_string(),
            kind: field_error.kind,
            message: field_error.message.clone(),
        });
        outcome.errors.push(field_error);
    }

    fn record_commit_failure(&self, field: &str, error: Error, outcome: &mut UpdateOutcome) {
        error!(field, "Action succeeded but commit failed: {}", error);
        self.record_failure(field, error, outcome);
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening; events are optional
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

fn requested_fields(request: &ConfigurationUpdateRequest) -> Vec<String> {
    let mut fields = Vec::new();
    if request.hostname().is_some() {
        fields.push("hostname".to_string());
    }
    if request.status().is_some() {
        fields.push("status".to_string());
    }
    match request.interface_change() {
        InterfaceChange::Requested { interface, .. }
        | InterfaceChange::Partial {
            interface: Some(interface),
            ..
        } => fields.push(format!("interface_{interface}")),
        InterfaceChange::Partial { interface: None, .. } => fields.push("interface".to_string()),
        InterfaceChange::Absent => {}
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::NoopActionRunner;

    fn engine(config: EngineConfig) -> (SwitchEngine, mpsc::Receiver<EngineEvent>) {
        let store = ConfigurationStore::from_config(&SwitchConfig::default()).unwrap();
        SwitchEngine::new(store, Box::new(NoopActionRunner), config).unwrap()
    }

    #[tokio::test]
    async fn test_engine_events_follow_field_order() {
        let (engine, mut events) = engine(EngineConfig::default());

        let request = ConfigurationUpdateRequest::new()
            .with_interface("eth1", "up")
            .with_hostname("core-1");
        let outcome = engine.apply(request).await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome.changes.fields().collect::<Vec<_>>(),
            vec!["hostname", "interface_eth1"]
        );

        assert_eq!(
            events.recv().await,
            Some(EngineEvent::UpdateReceived {
                fields: vec!["hostname".to_string(), "interface_eth1".to_string()]
            })
        );
        assert_eq!(
            events.recv().await,
            Some(EngineEvent::ActionStarted {
                field: "hostname".to_string(),
                action: ActionKind::SetHostname
            })
        );
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_half_interface_pair() {
        let (engine, _events) = engine(EngineConfig {
            strict_interface_pair: true,
            ..EngineConfig::default()
        });

        let request = ConfigurationUpdateRequest {
            interface_state: Some("up".to_string()),
            ..Default::default()
        };
        let outcome = engine.apply(request).await;

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "interface");
        assert_eq!(outcome.errors[0].kind, ErrorKind::MalformedRequest);
    }

    #[tokio::test]
    async fn test_events_dropped_without_receiver() {
        let (engine, events) = engine(EngineConfig::default());
        drop(events);

        let outcome = engine
            .apply(ConfigurationUpdateRequest::new().with_status("Maintenance"))
            .await;

        assert_eq!(outcome.changes.get("status"), Some("Operational -> Maintenance"));
    }

    #[test]
    fn test_outcome_classification() {
        let mut outcome = UpdateOutcome::default();
        assert!(outcome.is_noop());

        outcome.changes.record("status", "Operational", "Failed");
        outcome
            .errors
            .push(FieldError::new("hostname", &Error::invalid_value("bad")));

        assert!(outcome.is_partial());
        assert!(!outcome.is_success());
        assert!(outcome.error_for("hostname").is_some());
    }
}
