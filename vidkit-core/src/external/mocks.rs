// vidkit-core/src/external/mocks.rs

// --- In-memory engine (tests and dry runs) ---

use std::sync::{Condvar, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

use super::{Engine, parse_arguments};
use crate::error::{CoreError, CoreResult};

/// One call received by a [`MockEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Execute(String),
    Probe(String),
    LastOutput,
    MediaInformation(String),
    Cancel,
}

#[derive(Default)]
struct MockState {
    calls: Vec<EngineCall>,
    executed_args: Vec<Vec<String>>,
    media_information_calls: usize,
    last_output: String,
    cancelled: bool,
    active: usize,
    max_active: usize,
}

/// Scripted engine that records every call instead of running ffmpeg.
///
/// By default every command succeeds with return code 0, the probe prints a
/// 1280x720 document and media information is an empty object.
pub struct MockEngine {
    state: Mutex<MockState>,
    cancelled: Condvar,
    return_code: i32,
    probe_output: String,
    media_information: Value,
    execute_failure: Option<String>,
    probe_failure: Option<String>,
    /// Number of successful calls before failing, and the failure message.
    media_information_failure: Option<(usize, String)>,
    hold_until_cancelled: bool,
    execute_delay: Option<Duration>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Return code reported for a run stopped by `cancel`.
    pub const CANCELLED_RETURN_CODE: i32 = 255;

    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            cancelled: Condvar::new(),
            return_code: 0,
            probe_output: json!({
                "programs": [],
                "streams": [{"width": 1280, "height": 720}],
                "format": {"size": "1048576"}
            })
            .to_string(),
            media_information: json!({}),
            execute_failure: None,
            probe_failure: None,
            media_information_failure: None,
            hold_until_cancelled: false,
            execute_delay: None,
        }
    }

    pub fn with_return_code(mut self, rc: i32) -> Self {
        self.return_code = rc;
        self
    }

    /// Raw text returned by `last_output` after a probe.
    pub fn with_probe_output(mut self, output: impl Into<String>) -> Self {
        self.probe_output = output.into();
        self
    }

    pub fn with_media_information(mut self, info: Value) -> Self {
        self.media_information = info;
        self
    }

    pub fn failing_execute(mut self, message: impl Into<String>) -> Self {
        self.execute_failure = Some(message.into());
        self
    }

    pub fn failing_probe(mut self, message: impl Into<String>) -> Self {
        self.probe_failure = Some(message.into());
        self
    }

    pub fn failing_media_information(self, message: impl Into<String>) -> Self {
        self.failing_media_information_after(0, message)
    }

    /// Lets `successes` media-information calls through, then fails every one.
    pub fn failing_media_information_after(
        mut self,
        successes: usize,
        message: impl Into<String>,
    ) -> Self {
        self.media_information_failure = Some((successes, message.into()));
        self
    }

    /// Makes `execute` block until `cancel` is called.
    pub fn hold_until_cancelled(mut self) -> Self {
        self.hold_until_cancelled = true;
        self
    }

    /// Makes `execute` sleep before returning.
    pub fn with_execute_delay(mut self, delay: Duration) -> Self {
        self.execute_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// Commands passed to `execute`, in order.
    pub fn executed_commands(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Execute(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    /// Argument vectors passed to `execute`/`execute_args`, in order.
    pub fn executed_args(&self) -> Vec<Vec<String>> {
        self.lock().executed_args.clone()
    }

    /// Highest number of `execute` calls observed running at once.
    pub fn max_concurrent_executions(&self) -> usize {
        self.lock().max_active
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: EngineCall) {
        self.lock().calls.push(call);
    }

    fn run(&self, rendered: String, args: Vec<String>) -> CoreResult<i32> {
        {
            let mut state = self.lock();
            state.calls.push(EngineCall::Execute(rendered));
            state.executed_args.push(args);
            state.active += 1;
            state.max_active = state.max_active.max(state.active);
        }
        if let Some(delay) = self.execute_delay {
            thread::sleep(delay);
        }

        let mut state = self.lock();
        let mut rc = self.return_code;
        if self.hold_until_cancelled {
            while !state.cancelled {
                state = self
                    .cancelled
                    .wait(state)
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
            }
            state.cancelled = false;
            rc = Self::CANCELLED_RETURN_CODE;
        }
        state.active -= 1;
        state.last_output.clear();

        match &self.execute_failure {
            Some(message) => Err(CoreError::EngineExecution(message.clone())),
            None => Ok(rc),
        }
    }

    fn run_probe(&self, rendered: String) -> CoreResult<i32> {
        self.record(EngineCall::Probe(rendered));
        if let Some(message) = &self.probe_failure {
            return Err(CoreError::EngineExecution(message.clone()));
        }
        self.lock().last_output = self.probe_output.clone();
        Ok(0)
    }
}

impl Engine for MockEngine {
    fn execute(&self, command: &str) -> CoreResult<i32> {
        self.run(command.to_string(), parse_arguments(command))
    }

    fn execute_args(&self, args: &[String]) -> CoreResult<i32> {
        self.run(args.join(" "), args.to_vec())
    }

    fn probe(&self, command: &str) -> CoreResult<i32> {
        self.run_probe(command.to_string())
    }

    fn probe_args(&self, args: &[String]) -> CoreResult<i32> {
        self.run_probe(args.join(" "))
    }

    fn last_output(&self) -> CoreResult<String> {
        let mut state = self.lock();
        state.calls.push(EngineCall::LastOutput);
        Ok(state.last_output.clone())
    }

    fn media_information(&self, path: &str) -> CoreResult<Value> {
        let previous_calls = {
            let mut state = self.lock();
            state.calls.push(EngineCall::MediaInformation(path.to_string()));
            state.media_information_calls += 1;
            state.media_information_calls - 1
        };
        match &self.media_information_failure {
            Some((successes, message)) if previous_calls >= *successes => {
                Err(CoreError::EngineExecution(message.clone()))
            }
            _ => Ok(self.media_information.clone()),
        }
    }

    fn cancel(&self) {
        let mut state = self.lock();
        state.calls.push(EngineCall::Cancel);
        state.cancelled = true;
        self.cancelled.notify_all();
    }

    fn clear_cancel(&self) {
        self.lock().cancelled = false;
    }
}
