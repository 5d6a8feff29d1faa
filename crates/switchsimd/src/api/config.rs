//! `/switch/config` handlers

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use switchsim_core::traits::{Action, ActionStatus};
use switchsim_core::{ChangeSummary, ConfigurationUpdateRequest, FieldError, SwitchConfiguration, UpdateOutcome};
use tracing::{debug, info, warn};

use super::{ApiError, AppState};

/// Body returned by `PUT /switch/config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub changes: ChangeSummary,
    pub errors: Vec<FieldError>,
    pub message: String,
}

impl UpdateResponse {
    /// HTTP status and body for an update outcome
    pub fn from_outcome(outcome: UpdateOutcome) -> (StatusCode, Self) {
        let (code, status, message) = if outcome.is_noop() {
            (StatusCode::OK, "No Changes", "No configuration fields were supplied")
        } else if outcome.is_success() {
            (
                StatusCode::OK,
                "Config Updated",
                "Configuration changes applied successfully",
            )
        } else if outcome.is_partial() {
            (
                StatusCode::MULTI_STATUS,
                "Partially Applied",
                "Some configuration changes failed; see errors",
            )
        } else {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Update Failed",
                "No configuration changes were applied; see errors",
            )
        };

        let response = Self {
            status: status.to_string(),
            changes: outcome.changes,
            errors: outcome.errors,
            message: message.to_string(),
        };
        (code, response)
    }
}

/// `GET /switch/config`
pub async fn get_config(State(state): State<AppState>) -> Result<Json<SwitchConfiguration>, ApiError> {
    if state.live_status {
        let outcome = state
            .engine
            .run_action(&Action::GetStatus { component: None })
            .await?;

        match outcome.status {
            ActionStatus::Succeeded => debug!(output = %outcome.output, "Live status"),
            ActionStatus::Failed { reason } => {
                warn!(%reason, "Live status action failed");
                return Err(ApiError::ActionFailed {
                    message: format!("Status check failed: {reason}"),
                    output: outcome.output,
                });
            }
        }
    }

    Ok(Json(state.engine.snapshot().await))
}

/// `PUT /switch/config`
///
/// The body is decoded as JSON whatever its `Content-Type`.
pub async fn update_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UpdateResponse>), ApiError> {
    let request: ConfigurationUpdateRequest = serde_json::from_slice(&body)?;

    // Run on its own task: if the client goes away, an action that already
    // started must still be committed.
    let engine = Arc::clone(&state.engine);
    let outcome = tokio::spawn(async move { engine.apply(request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Update task failed: {e}")))?;
    let (code, response) = UpdateResponse::from_outcome(outcome);

    info!(
        status = %response.status,
        changes = response.changes.len(),
        errors = response.errors.len(),
        "Configuration update handled"
    );

    Ok((code, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchsim_core::Error;

    #[test]
    fn outcome_status_codes() {
        let (code, body) = UpdateResponse::from_outcome(UpdateOutcome::default());
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "No Changes");

        let mut changed = UpdateOutcome::default();
        changed.changes.record("status", "Operational", "Maintenance");
        let (code, body) = UpdateResponse::from_outcome(changed.clone());
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "Config Updated");

        let mut partial = changed;
        partial
            .errors
            .push(FieldError::new("interface_eth9", &Error::unknown_interface("eth9")));
        let (code, _) = UpdateResponse::from_outcome(partial);
        assert_eq!(code, StatusCode::MULTI_STATUS);

        let mut failed = UpdateOutcome::default();
        failed
            .errors
            .push(FieldError::new("interface_eth9", &Error::unknown_interface("eth9")));
        let (code, body) = UpdateResponse::from_outcome(failed);
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.status, "Update Failed");
    }
}
