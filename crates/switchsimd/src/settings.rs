//! Daemon settings
//!
//! Configuration is via environment variables only. The switch itself is
//! described by the `SWITCHSIM_*` variables understood by
//! [`SwitchConfig::from_env`]; this module adds the daemon's own:
//!
//! - `SWITCHSIM_LISTEN_ADDR`: socket address to bind (default `0.0.0.0:8080`)
//! - `SWITCHSIM_LIVE_STATUS`: run the status action on every config read
//! - `SWITCHSIM_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)

use anyhow::{Context, Result};
use std::net::SocketAddr;
use switchsim_core::SwitchConfig;
use tracing::Level;

/// Default bind address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Everything the daemon needs to start
#[derive(Debug, Clone)]
pub struct DaemonSettings {
    pub switch: SwitchConfig,
    pub listen_addr: SocketAddr,
    pub live_status: bool,
    pub log_level: String,
}

impl DaemonSettings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let switch = SwitchConfig::from_lookup(&lookup)?;

        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = var("SWITCHSIM_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr.trim().parse().with_context(|| {
            format!("SWITCHSIM_LISTEN_ADDR must look like host:port. Got: {listen_addr}")
        })?;

        let live_status = match var("SWITCHSIM_LIVE_STATUS") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => anyhow::bail!("SWITCHSIM_LIVE_STATUS must be true or false. Got: {value}"),
            },
            None => false,
        };

        Ok(Self {
            switch,
            listen_addr,
            live_status,
            log_level: var("SWITCHSIM_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.switch.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SWITCHSIM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    pub fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}
