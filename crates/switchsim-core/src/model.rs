//! Switch configuration data model
//!
//! - [`SwitchConfiguration`]: the authoritative state (and snapshot type)
//! - [`ConfigurationUpdateRequest`]: a partial update as submitted by a caller
//! - [`ChangeSummary`]: ordered `field -> "before -> after"` report

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Link state of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Up,
    Down,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `up`/`down` case-insensitively, ignoring surrounding whitespace.
impl FromStr for LinkState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(LinkState::Up),
            "down" => Ok(LinkState::Down),
            _ => Err(Error::invalid_state(s)),
        }
    }
}

/// Point-in-time switch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfiguration {
    /// Switch hostname (never empty)
    pub hostname: String,
    /// Interface name -> link state
    pub interfaces: BTreeMap<String, LinkState>,
    /// Operational status ("Operational", "Maintenance", ...)
    pub status: String,
}

/// A caller's partial update intent
///
/// Absent and blank fields both mean "leave this field alone". Unknown JSON
/// fields are ignored, so an object with nothing recognizable is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_state: Option<String>,
}

/// Interface portion of an update request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceChange<'a> {
    /// Neither name nor state supplied
    Absent,
    /// Only one of name/state supplied
    Partial {
        interface: Option<&'a str>,
        state: Option<&'a str>,
    },
    /// Both supplied
    Requested { interface: &'a str, state: &'a str },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ConfigurationUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>, state: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self.interface_state = Some(state.into());
        self
    }

    /// Requested hostname, if present and non-blank
    pub fn hostname(&self) -> Option<&str> {
        present(&self.hostname)
    }

    /// Requested status, if present and non-blank
    pub fn status(&self) -> Option<&str> {
        present(&self.status)
    }

    /// Requested interface change
    pub fn interface_change(&self) -> InterfaceChange<'_> {
        match (present(&self.interface), present(&self.interface_state)) {
            (Some(interface), Some(state)) => InterfaceChange::Requested { interface, state },
            (None, None) => InterfaceChange::Absent,
            (interface, state) => InterfaceChange::Partial { interface, state },
        }
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.hostname().is_none()
            && self.status().is_none()
            && self.interface_change() == InterfaceChange::Absent
    }
}

/// Ordered report of the fields an update changed
///
/// Serializes as a JSON object whose keys keep application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    entries: Vec<(String, String)>,
}

impl ChangeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as changed from `before` to `after`
    pub fn record(&mut self, field: impl Into<String>, before: impl fmt::Display, after: impl fmt::Display) {
        self.entries.push((field.into(), format!("{before} -> {after}")));
    }

    /// The `"before -> after"` description for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, change)| change.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in application order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, change)| (name.as_str(), change.as_str()))
    }
}

impl Serialize for ChangeSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, change) in &self.entries {
            map.serialize_entry(field, change)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChangeSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = ChangeSummary;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to change descriptions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((field, change)) = access.next_entry::<String, String>()? {
                    entries.push((field, change));
                }
                Ok(ChangeSummary { entries })
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}

/// Validate a hostname (RFC 1123 labels: alphanumeric and hyphen, 1-63 chars,
/// no leading or trailing hyphen, 253 chars total)
pub fn validate_hostname(hostname: &str) -> Result<(), Error> {
    if hostname.trim().is_empty() {
        return Err(Error::invalid_value("hostname cannot be empty"));
    }

    if hostname.len() > 253 {
        return Err(Error::invalid_value(format!(
            "hostname too long: {} chars (max 253)",
            hostname.len()
        )));
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_value(format!(
                "hostname has an empty label: '{hostname}'"
            )));
        }

        if label.len() > 63 {
            return Err(Error::invalid_value(format!(
                "hostname label too long: {} chars (max 63). Label: '{label}'",
                label.len()
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::invalid_value(format!(
                "hostname label contains invalid characters: '{label}'"
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_value(format!(
                "hostname label cannot start or end with a hyphen: '{label}'"
            )));
        }
    }

    Ok(())
}
