// # switchsimd
//
// REST API daemon for the simulated switch. A thin layer: every
// configuration rule lives in `switchsim-core`; this crate only maps HTTP
// onto `SwitchEngine` and reads its settings from the environment.

pub mod api;
pub mod settings;

pub use api::{AppState, build_router};
pub use settings::DaemonSettings;
