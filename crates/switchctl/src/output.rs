//! Text rendering for command output

use std::fmt::Write;
use switchsim_core::{FieldError, SwitchConfiguration, UpdateOutcome};

use crate::cli::Section;

/// Render the stored configuration, or one section of it
pub fn render_config(config: &SwitchConfiguration, section: Option<Section>) -> String {
    match section {
        Some(Section::System) => render_system(config),
        Some(Section::Interfaces) => render_interfaces(config),
        None => format!("{}\n{}", render_system(config), render_interfaces(config)),
    }
}

pub fn render_system(config: &SwitchConfiguration) -> String {
    format!(
        "System\n  Hostname: {}\n  Status:   {}\n",
        config.hostname, config.status
    )
}

pub fn render_interfaces(config: &SwitchConfiguration) -> String {
    let width = config
        .interfaces
        .keys()
        .map(String::len)
        .chain(std::iter::once("Interface".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::from("Interfaces\n");
    let _ = writeln!(out, "  {:<width$}  State", "Interface");
    for (name, state) in &config.interfaces {
        let _ = writeln!(out, "  {name:<width$}  {state}");
    }
    out
}

/// `field: before -> after`, one line per change
pub fn render_changes(outcome: &UpdateOutcome) -> String {
    let mut out = String::new();
    for (field, change) in outcome.changes.iter() {
        let _ = writeln!(out, "{field}: {change}");
    }
    out
}

/// One block per failed field, with captured output indented below
pub fn render_errors(errors: &[FieldError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "error: {error}");
        if let Some(output) = &error.output {
            for line in output.lines() {
                let _ = writeln!(out, "  | {line}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use switchsim_core::{Error, LinkState};

    fn config() -> SwitchConfiguration {
        SwitchConfiguration {
            hostname: "switch1".to_string(),
            interfaces: BTreeMap::from([
                ("eth0".to_string(), LinkState::Up),
                ("eth1".to_string(), LinkState::Down),
            ]),
            status: "Operational".to_string(),
        }
    }

    #[test]
    fn renders_sections() {
        assert_eq!(
            render_config(&config(), Some(Section::System)),
            "System\n  Hostname: switch1\n  Status:   Operational\n"
        );
        assert_eq!(
            render_config(&config(), Some(Section::Interfaces)),
            "Interfaces\n  Interface  State\n  eth0       up\n  eth1       down\n"
        );
        assert!(render_config(&config(), None).contains("Hostname: switch1"));
    }

    #[test]
    fn renders_changes_and_errors() {
        let mut outcome = UpdateOutcome::default();
        outcome.changes.record("hostname", "switch1", "core-1");
        outcome.errors.push(FieldError::new(
            "interface_eth0",
            &Error::external_action("set_interface_state", "RTNETLINK answers: busy", "exit status: 2"),
        ));

        assert_eq!(render_changes(&outcome), "hostname: switch1 -> core-1\n");

        let errors = render_errors(&outcome.errors);
        assert!(errors.starts_with("error: interface_eth0: Action set_interface_state failed"));
        assert!(errors.contains("  | RTNETLINK answers: busy"));
    }
}
