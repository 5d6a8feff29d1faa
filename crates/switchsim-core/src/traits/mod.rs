//! Core traits for the switch engine
//!
//! - [`ActionRunner`]: execute the side-effecting actions behind configuration changes

pub mod action_runner;

pub use action_runner::{
    Action, ActionKind, ActionOutcome, ActionRunner, ActionRunnerFactory, ActionStatus,
    StatusComponent,
};
