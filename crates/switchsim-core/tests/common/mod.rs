//! Test doubles and common utilities for architecture contract tests
//!
//! The runners here record what they were asked to do and answer with
//! scripted outcomes, so tests can check what the engine committed.

#![allow(dead_code)]

use switchsim_core::config::SwitchConfig;
use switchsim_core::error::Result;
use switchsim_core::traits::{Action, ActionKind, ActionOutcome, ActionRunner};
use switchsim_core::{ConfigurationStore, SwitchEngine};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How a scripted action should end
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Succeed with this output
    Succeed(String),
    /// Fail with this output and reason
    Fail { output: String, reason: String },
    /// Return `Err` as if the runner could not start the action
    Unavailable(String),
}

/// An ActionRunner that records every call and answers from a script
///
/// Actions without a scripted answer succeed.
pub struct RecordingRunner {
    /// Call counter for run()
    run_call_count: Arc<AtomicUsize>,
    /// Recorded actions in call order
    actions: Arc<std::sync::Mutex<Vec<Action>>>,
    /// Answers keyed by action kind
    script: Arc<std::sync::Mutex<HashMap<ActionKind, Scripted>>>,
    /// Artificial latency for every action
    delay: Option<Duration>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            run_call_count: Arc::new(AtomicUsize::new(0)),
            actions: Arc::new(std::sync::Mutex::new(Vec::new())),
            script: Arc::new(std::sync::Mutex::new(HashMap::new())),
            delay: None,
        }
    }

    /// Make every action take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script the answer for every action of `kind`
    pub fn script(&self, kind: ActionKind, answer: Scripted) {
        self.script.lock().unwrap().insert(kind, answer);
    }

    /// Make every action of `kind` fail with `output`
    pub fn fail(&self, kind: ActionKind, output: &str) {
        self.script(
            kind,
            Scripted::Fail {
                output: output.to_string(),
                reason: "exit status: 1".to_string(),
            },
        );
    }

    /// Get the number of times run() was called
    pub fn run_call_count(&self) -> usize {
        self.run_call_count.load(Ordering::SeqCst)
    }

    /// Get the actions that were run, in order
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    /// Create a new RecordingRunner that shares counters and script with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            run_call_count: Arc::clone(&other.run_call_count),
            actions: Arc::clone(&other.actions),
            script: Arc::clone(&other.script),
            delay: other.delay,
        }
    }
}

#[async_trait::async_trait]
impl ActionRunner for RecordingRunner {
    async fn run(&self, action: &Action) -> Result<ActionOutcome> {
        self.run_call_count.fetch_add(1, Ordering::SeqCst);
        self.actions.lock().unwrap().push(action.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let answer = self.script.lock().unwrap().get(&action.kind()).cloned();
        match answer {
            None => Ok(ActionOutcome::succeeded(format!("ok: {}", action.args().join(" ")))),
            Some(Scripted::Succeed(output)) => Ok(ActionOutcome::succeeded(output)),
            Some(Scripted::Fail { output, reason }) => Ok(ActionOutcome::failed(output, reason)),
            Some(Scripted::Unavailable(msg)) => Err(switchsim_core::Error::runner(msg)),
        }
    }

    fn runner_name(&self) -> &'static str {
        "recording"
    }
}

/// The stock seed: switch1, Operational, eth0=up, eth1=down, eth2=up, ethx=up
pub fn seed_config() -> SwitchConfig {
    SwitchConfig::default()
}

/// Build an engine over the stock seed, sharing counters with `runner`
pub fn engine_with(runner: &RecordingRunner) -> SwitchEngine {
    engine_with_config(runner, &seed_config())
}

/// Build an engine over `config`, sharing counters with `runner`
pub fn engine_with_config(runner: &RecordingRunner, config: &SwitchConfig) -> SwitchEngine {
    let store = ConfigurationStore::from_config(config).expect("seed is valid");
    let (engine, _event_rx) = SwitchEngine::new(
        store,
        Box::new(RecordingRunner::sharing_counters_with(runner)),
        config.engine.clone(),
    )
    .expect("engine construction succeeds");
    engine
}
