// # switchctl
//
// Command-line front end for the simulated switch. Commands run against an
// in-process engine by default, or against a running switchsimd with
// `--server`.

pub mod backend;
pub mod cli;
pub mod output;

pub use backend::{Backend, RemoteClient};
pub use cli::{Cli, Command, Section, SetCommand, ShowArgs};
