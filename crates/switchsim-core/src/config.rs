//! Configuration types for the switch simulator
//!
//! Configuration can be built in code, deserialized with serde, or read from
//! `SWITCHSIM_*` environment variables via [`SwitchConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{LinkState, validate_hostname};

/// Main switch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Initial hostname
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Initial operational status
    #[serde(default = "default_status")]
    pub status: String,

    /// Fixed interface set and initial link states
    #[serde(default = "default_interfaces")]
    pub interfaces: BTreeMap<String, LinkState>,

    /// Action runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SwitchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            hostname: default_hostname(),
            status: default_status(),
            interfaces: default_interfaces(),
            runner: RunnerConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Load configuration from `SWITCHSIM_*` environment variables
    ///
    /// - `SWITCHSIM_HOSTNAME`, `SWITCHSIM_STATUS`: initial values
    /// - `SWITCHSIM_INTERFACES`: `eth0=up,eth1=down,...`
    /// - `SWITCHSIM_RUNNER`: `shell` (default) or `noop`
    /// - `SWITCHSIM_SCRIPT_DIR`: script directory for the shell runner
    /// - `SWITCHSIM_STRICT_INTERFACE_PAIR`: reject half-specified interface changes
    /// - `SWITCHSIM_ALLOWED_STATUSES`: comma-separated closed set of statuses
    /// - `SWITCHSIM_EVENT_CAPACITY`: engine event channel capacity
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(hostname) = var("SWITCHSIM_HOSTNAME") {
            config.hostname = hostname.trim().to_string();
        }

        if let Some(status) = var("SWITCHSIM_STATUS") {
            config.status = status.trim().to_string();
        }

        if let Some(interfaces) = var("SWITCHSIM_INTERFACES") {
            config.interfaces = parse_interfaces(&interfaces)?;
        }

        match var("SWITCHSIM_RUNNER").as_deref().map(str::trim) {
            None | Some("shell") => {
                config.runner = RunnerConfig::Shell {
                    script_dir: var("SWITCHSIM_SCRIPT_DIR")
                        .unwrap_or_else(default_script_dir),
                };
            }
            Some("noop") => config.runner = RunnerConfig::Noop,
            Some(other) => {
                return Err(crate::Error::config(format!(
                    "SWITCHSIM_RUNNER '{other}' is not supported. Supported runners: shell, noop"
                )));
            }
        }

        if let Some(strict) = var("SWITCHSIM_STRICT_INTERFACE_PAIR") {
            config.engine.strict_interface_pair = parse_bool("SWITCHSIM_STRICT_INTERFACE_PAIR", &strict)?;
        }

        if let Some(statuses) = var("SWITCHSIM_ALLOWED_STATUSES") {
            let allowed: Vec<String> = statuses
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            config.engine.allowed_statuses = Some(allowed);
        }

        if let Some(capacity) = var("SWITCHSIM_EVENT_CAPACITY") {
            config.engine.event_channel_capacity = capacity.trim().parse().map_err(|_| {
                crate::Error::config(format!(
                    "SWITCHSIM_EVENT_CAPACITY must be a positive integer. Got: {capacity}"
                ))
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_hostname(&self.hostname)
            .map_err(|e| crate::Error::config(format!("Initial hostname: {e}")))?;

        if self.status.trim().is_empty() {
            return Err(crate::Error::config("Initial status cannot be empty"));
        }

        if self.interfaces.is_empty() {
            return Err(crate::Error::config("No interfaces configured"));
        }

        if self.interfaces.keys().any(|name| name.trim().is_empty()) {
            return Err(crate::Error::config("Interface names cannot be empty"));
        }

        self.runner.validate()?;
        self.engine.validate()?;

        if !self.engine.status_allowed(&self.status) {
            return Err(crate::Error::config(format!(
                "Initial status '{}' is not in the allowed status set",
                self.status
            )));
        }

        Ok(())
    }
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Action runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunnerConfig {
    /// Memory-only simulation, every action succeeds without side effects
    Noop,

    /// Run scripts from a directory
    Shell {
        /// Directory holding `set_hostname.sh`, `set_interface.sh`, `get_status.sh`
        #[serde(default = "default_script_dir")]
        script_dir: String,
    },
}

impl RunnerConfig {
    /// Validate the runner configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RunnerConfig::Shell { script_dir } if script_dir.trim().is_empty() => Err(
                crate::Error::config("Shell runner script directory cannot be empty"),
            ),
            _ => Ok(()),
        }
    }

    /// Get the runner type name
    pub fn type_name(&self) -> &str {
        match self {
            RunnerConfig::Noop => "noop",
            RunnerConfig::Shell { .. } => "shell",
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig::Shell {
            script_dir: default_script_dir(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject an update naming an interface without a state (or vice versa)
    ///
    /// When false, such a half-specified pair is skipped as "not requested".
    #[serde(default)]
    pub strict_interface_pair: bool,

    /// Closed set of accepted status values (None = any non-blank status)
    #[serde(default)]
    pub allowed_statuses: Option<Vec<String>>,

    /// Capacity of the engine event channel
    ///
    /// When full, new events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        if let Some(allowed) = &self.allowed_statuses
            && allowed.is_empty()
        {
            return Err(crate::Error::config("Allowed status set cannot be empty"));
        }

        Ok(())
    }

    /// Whether `status` is acceptable under the configured status set
    pub fn status_allowed(&self, status: &str) -> bool {
        match &self.allowed_statuses {
            Some(allowed) => allowed.iter().any(|s| s == status),
            None => true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_interface_pair: false,
            allowed_statuses: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Parse `eth0=up,eth1=down` into an interface map
pub fn parse_interfaces(spec: &str) -> Result<BTreeMap<String, LinkState>, crate::Error> {
    let mut interfaces = BTreeMap::new();

    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, state) = entry.split_once('=').ok_or_else(|| {
            crate::Error::config(format!("Interface entry '{entry}' must look like name=up|down"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(crate::Error::config(format!("Interface entry '{entry}' has no name")));
        }

        let state: LinkState = state
            .parse()
            .map_err(|e| crate::Error::config(format!("Interface {name}: {e}")))?;

        if interfaces.insert(name.to_string(), state).is_some() {
            return Err(crate::Error::config(format!("Interface {name} is listed twice")));
        }
    }

    if interfaces.is_empty() {
        return Err(crate::Error::config("Interface list is empty"));
    }

    Ok(interfaces)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, crate::Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(crate::Error::config(format!("{key} must be true or false. Got: {value}"))),
    }
}

fn default_hostname() -> String {
    "switch1".to_string()
}

fn default_status() -> String {
    "Operational".to_string()
}

fn default_interfaces() -> BTreeMap<String, LinkState> {
    BTreeMap::from([
        ("eth0".to_string(), LinkState::Up),
        ("eth1".to_string(), LinkState::Down),
        ("eth2".to_string(), LinkState::Up),
        ("ethx".to_string(), LinkState::Up),
    ])
}

fn default_script_dir() -> String {
    "./shell".to_string()
}

fn default_event_channel_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_stock_switch() {
        let config = SwitchConfig::default();

        assert_eq!(config.hostname, "switch1");
        assert_eq!(config.status, "Operational");
        assert_eq!(config.interfaces.len(), 4);
        assert_eq!(config.interfaces["eth1"], LinkState::Down);
        assert_eq!(config.runner.type_name(), "shell");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_reads_every_setting() {
        let config = SwitchConfig::from_lookup(lookup(&[
            ("SWITCHSIM_HOSTNAME", "leaf-7"),
            ("SWITCHSIM_INTERFACES", "swp1=up, swp2=DOWN"),
            ("SWITCHSIM_RUNNER", "noop"),
            ("SWITCHSIM_STRICT_INTERFACE_PAIR", "true"),
            ("SWITCHSIM_ALLOWED_STATUSES", "Operational,Maintenance"),
            ("SWITCHSIM_EVENT_CAPACITY", "8"),
        ]))
        .unwrap();

        assert_eq!(config.hostname, "leaf-7");
        assert_eq!(config.interfaces["swp2"], LinkState::Down);
        assert_eq!(config.runner, RunnerConfig::Noop);
        assert!(config.engine.strict_interface_pair);
        assert!(config.engine.status_allowed("Maintenance"));
        assert!(!config.engine.status_allowed("Failed"));
        assert_eq!(config.engine.event_channel_capacity, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_rejects_bad_values() {
        assert!(SwitchConfig::from_lookup(lookup(&[("SWITCHSIM_RUNNER", "ansible")])).is_err());
        assert!(SwitchConfig::from_lookup(lookup(&[("SWITCHSIM_INTERFACES", "eth0")])).is_err());
        assert!(
            SwitchConfig::from_lookup(lookup(&[("SWITCHSIM_INTERFACES", "eth0=up,eth0=down")]))
                .is_err()
        );
        assert!(
            SwitchConfig::from_lookup(lookup(&[("SWITCHSIM_STRICT_INTERFACE_PAIR", "maybe")]))
                .is_err()
        );
    }

    #[test]
    fn validate_checks_initial_status_against_allowed_set() {
        let mut config = SwitchConfig::default();
        config.engine.allowed_statuses = Some(vec!["Maintenance".to_string()]);

        assert!(config.validate().is_err());
    }

    #[test]
    fn runner_config_deserializes_tagged() {
        let runner: RunnerConfig =
            serde_json::from_str(r#"{"type": "shell", "script_dir": "/opt/switch"}"#).unwrap();
        assert_eq!(
            runner,
            RunnerConfig::Shell {
                script_dir: "/opt/switch".to_string()
            }
        );
    }
}
