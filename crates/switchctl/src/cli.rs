//! Command-line grammar

use clap::{Args, Parser, Subcommand, ValueEnum};
use switchsim_core::LinkState;
use switchsim_core::traits::StatusComponent;

/// Manage a simulated network switch
#[derive(Debug, Parser)]
#[command(name = "switchctl", version, about, long_about = None)]
pub struct Cli {
    /// switchsimd base URL; without it the switch is simulated in-process
    #[arg(long, env = "SWITCHCTL_SERVER", global = true)]
    pub server: Option<String>,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display switch configuration
    Show(ShowArgs),

    /// Change switch configuration
    #[command(subcommand)]
    Set(SetCommand),

    /// Show version information
    Version,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Limit output to one section
    #[arg(value_enum)]
    pub section: Option<Section>,

    /// Print raw JSON
    #[arg(long, conflicts_with = "live")]
    pub json: bool,

    /// Print the live status report instead of the stored configuration
    #[arg(long)]
    pub live: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Hostname and status
    System,
    /// Interface link states
    Interfaces,
}

impl From<Section> for StatusComponent {
    fn from(section: Section) -> Self {
        match section {
            Section::System => StatusComponent::System,
            Section::Interfaces => StatusComponent::Interfaces,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Set switch hostname
    Hostname {
        /// New hostname, e.g. core-switch-01
        name: String,
    },

    /// Set interface state
    Interface {
        /// Interface name, e.g. eth0
        name: String,

        /// up or down
        #[arg(value_parser = parse_link_state)]
        state: LinkState,
    },
}

fn parse_link_state(value: &str) -> Result<LinkState, String> {
    value.parse().map_err(|e: switchsim_core::Error| e.to_string())
}
