//! Where commands are executed
//!
//! - [`Backend::Local`]: an in-process engine built from `SWITCHSIM_*`
//!   variables, running the configured action runner directly
//! - [`Backend::Remote`]: a running `switchsimd`, over HTTP

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use switchsim_core::traits::{Action, ActionStatus, StatusComponent};
use switchsim_core::{
    ConfigurationUpdateRequest, RunnerRegistry, SwitchConfig, SwitchConfiguration, SwitchEngine,
    UpdateOutcome,
};
use tracing::debug;

/// Default HTTP timeout for remote requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub enum Backend {
    Local(SwitchEngine),
    Remote(RemoteClient),
}

impl Backend {
    /// Remote when `server` is given, local otherwise
    pub fn connect(server: Option<&str>) -> Result<Self> {
        match server {
            Some(url) => Ok(Backend::Remote(RemoteClient::new(url)?)),
            None => Self::local(&SwitchConfig::from_env()?),
        }
    }

    /// In-process engine for `config`
    pub fn local(config: &SwitchConfig) -> Result<Self> {
        let registry = RunnerRegistry::with_builtins();
        switchsim_action_shell::register(&registry);

        let runner = registry.create_runner(&config.runner)?;
        let (engine, _events) = SwitchEngine::from_config(config, runner)?;
        debug!(runner = engine.runner_name(), "Using local engine");

        Ok(Backend::Local(engine))
    }

    pub async fn snapshot(&self) -> Result<SwitchConfiguration> {
        match self {
            Backend::Local(engine) => Ok(engine.snapshot().await),
            Backend::Remote(client) => client.get_config().await,
        }
    }

    pub async fn apply(&self, request: ConfigurationUpdateRequest) -> Result<UpdateOutcome> {
        match self {
            Backend::Local(engine) => Ok(engine.apply(request).await),
            Backend::Remote(client) => client.put_config(&request).await,
        }
    }

    /// Output of the status action
    pub async fn live_status(&self, component: Option<StatusComponent>) -> Result<String> {
        let engine = match self {
            Backend::Local(engine) => engine,
            Backend::Remote(_) => bail!("Live status is only available without --server"),
        };

        let outcome = engine.run_action(&Action::GetStatus { component }).await?;
        match outcome.status {
            ActionStatus::Succeeded => Ok(outcome.output),
            ActionStatus::Failed { reason } => Err(anyhow!(
                "Status check failed: {reason}\n{}",
                outcome.output
            )),
        }
    }
}

/// Error body returned by switchsimd
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    output: Option<String>,
}

/// HTTP client for the switchsimd REST API
pub struct RemoteClient {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("Server URL must use HTTP or HTTPS scheme. Got: {base_url}");
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(concat!("switchctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn config_url(&self) -> String {
        format!("{}/switch/config", self.base_url)
    }

    pub async fn get_config(&self) -> Result<SwitchConfiguration> {
        let url = self.config_url();
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse configuration from server")
    }

    pub async fn put_config(&self, request: &ConfigurationUpdateRequest) -> Result<UpdateOutcome> {
        let url = self.config_url();
        debug!(%url, "PUT");

        let response = self
            .client
            .put(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        // 207 and 422 still carry a per-field report
        match response.status() {
            StatusCode::OK | StatusCode::MULTI_STATUS | StatusCode::UNPROCESSABLE_ENTITY => response
                .json()
                .await
                .context("Failed to parse update response from server"),
            _ => Err(error_from_response(response).await),
        }
    }
}

async fn error_from_response(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(ApiErrorBody {
            error,
            output: Some(output),
        }) => anyhow!("Server returned {status}: {error}\n{output}"),
        Ok(ApiErrorBody { error, .. }) => anyhow!("Server returned {status}: {error}"),
        Err(_) if text.is_empty() => anyhow!("Server returned {status}"),
        Err(_) => anyhow!("Server returned {status}: {text}"),
    }
}
