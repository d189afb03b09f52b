// ============================================================================
// vidkit-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: The Media Engine Seam
//
// This module defines how vidkit talks to the command-driven media engine
// (ffmpeg/ffprobe). The engine is a process-wide resource with a single
// execution slot: it runs one command at a time and its cancel operation
// is untargeted. `EngineHandle` makes that explicit by admitting one command
// at a time through a mutex, and by exposing cancellation only as "cancel
// the currently admitted command".
//
// KEY COMPONENTS:
// - Engine: trait implemented by concrete engines
// - EngineHandle: cloneable, serialized access to one engine instance
// - FfmpegEngine: implementation backed by ffmpeg-sidecar and ffprobe
// - MockEngine: scripted in-memory engine for tests and dry runs
// - global_engine: lazily created process-wide FfmpegEngine handle
//
// CANCELLATION:
// The running command and the engine's cancel request only change while the
// `running` lock is held. Admission and release both clear the request, so a
// cancel always lands on the command that was running when it was issued and
// never on the next one. The request is observed cooperatively: ffmpeg checks
// it once per emitted event and ffprobe once per wait poll.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::config::ToolsConfig;
use crate::error::CoreResult;

pub mod ffmpeg;
pub mod mocks;

pub use ffmpeg::{FfmpegEngine, parse_arguments};
pub use mocks::{EngineCall, MockEngine};

// ============================================================================
// ENGINE TRAIT
// ============================================================================

/// A command-driven media engine.
///
/// Implementations are shared between threads through [`EngineHandle`], which
/// guarantees that `execute`, `probe`, `last_output` and `media_information`
/// are never called concurrently. `cancel` may be called at any time from any
/// thread.
pub trait Engine: Send + Sync {
    /// Runs an ffmpeg command string and returns its return code.
    ///
    /// The string is split with [`parse_arguments`]; callers holding paths
    /// should prefer [`execute_args`](Self::execute_args).
    fn execute(&self, command: &str) -> CoreResult<i32> {
        self.execute_args(&parse_arguments(command))
    }

    /// Runs ffmpeg with an already split argument vector.
    fn execute_args(&self, args: &[String]) -> CoreResult<i32>;

    /// Runs an ffprobe command string and returns its return code.
    fn probe(&self, command: &str) -> CoreResult<i32> {
        self.probe_args(&parse_arguments(command))
    }

    /// Runs ffprobe with an already split argument vector.
    fn probe_args(&self, args: &[String]) -> CoreResult<i32>;

    /// Raw output of the most recent command.
    fn last_output(&self) -> CoreResult<String>;

    /// Full media-information document for `path`.
    fn media_information(&self, path: &str) -> CoreResult<Value>;

    /// Cancels whatever command is currently running.
    fn cancel(&self);

    /// Drops a pending cancel request.
    fn clear_cancel(&self);
}

// ============================================================================
// ENGINE HANDLE
// ============================================================================

struct Shared<E> {
    engine: E,
    admission: Mutex<()>,
    running: Mutex<Option<String>>,
}

/// Serialized access to a shared engine.
pub struct EngineHandle<E> {
    inner: Arc<Shared<E>>,
}

impl<E> Clone for EngineHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EngineHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("running", &*lock(&self.inner.running))
            .finish()
    }
}

/// Holds the execution slot; releases it and clears the running command on drop.
struct Admission<'a, E: Engine> {
    _slot: MutexGuard<'a, ()>,
    shared: &'a Shared<E>,
}

impl<E: Engine> Drop for Admission<'_, E> {
    fn drop(&mut self) {
        let mut running = lock(&self.shared.running);
        self.shared.engine.clear_cancel();
        *running = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The guarded data stays valid even if a holder panicked.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: Engine> EngineHandle<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Arc::new(Shared {
                engine,
                admission: Mutex::new(()),
                running: Mutex::new(None),
            }),
        }
    }

    /// Direct access to the wrapped engine (outside the execution slot).
    pub fn engine(&self) -> &E {
        &self.inner.engine
    }

    /// The command currently holding the execution slot, if any.
    pub fn running_command(&self) -> Option<String> {
        lock(&self.inner.running).clone()
    }

    fn admit(&self, command: String) -> Admission<'_, E> {
        let slot = lock(&self.inner.admission);
        {
            let mut running = lock(&self.inner.running);
            self.inner.engine.clear_cancel();
            log::debug!("Engine admitted: {}", command);
            *running = Some(command);
        }
        Admission {
            _slot: slot,
            shared: &self.inner,
        }
    }

    /// Runs an ffmpeg command string once the execution slot is free.
    pub fn execute(&self, command: &str) -> CoreResult<i32> {
        let _admission = self.admit(command.to_string());
        self.inner.engine.execute(command)
    }

    /// Runs ffmpeg with an argument vector once the execution slot is free.
    pub fn execute_args(&self, args: &[String]) -> CoreResult<i32> {
        let _admission = self.admit(args.join(" "));
        self.inner.engine.execute_args(args)
    }

    /// Runs an ffprobe command and reads its output within one admission, so
    /// no other command can replace the engine's last output in between.
    pub fn probe_output(&self, command: &str) -> CoreResult<(i32, String)> {
        let _admission = self.admit(command.to_string());
        let rc = self.inner.engine.probe(command)?;
        let output = self.inner.engine.last_output()?;
        Ok((rc, output))
    }

    /// Argument-vector form of [`probe_output`](Self::probe_output).
    pub fn probe_args_output(&self, args: &[String]) -> CoreResult<(i32, String)> {
        let _admission = self.admit(args.join(" "));
        let rc = self.inner.engine.probe_args(args)?;
        let output = self.inner.engine.last_output()?;
        Ok((rc, output))
    }

    /// Fetches the full media-information document for `path`.
    pub fn media_information(&self, path: &str) -> CoreResult<Value> {
        let _admission = self.admit(format!("media information: {path}"));
        self.inner.engine.media_information(path)
    }

    /// Cancels the currently admitted command.
    ///
    /// Returns false and does nothing when no command is admitted.
    pub fn cancel(&self) -> bool {
        let running = lock(&self.inner.running);
        match running.as_deref() {
            Some(command) => {
                log::info!("Cancelling running command: {}", command);
                self.inner.engine.cancel();
                true
            }
            None => {
                log::debug!("Cancel requested with no running command");
                false
            }
        }
    }
}

// ============================================================================
// PROCESS-WIDE ENGINE
// ============================================================================

static GLOBAL_ENGINE: Lazy<EngineHandle<FfmpegEngine>> =
    Lazy::new(|| EngineHandle::new(FfmpegEngine::from_config(&ToolsConfig::from_env())));

/// Handle to the process-wide ffmpeg engine.
pub fn global_engine() -> EngineHandle<FfmpegEngine> {
    GLOBAL_ENGINE.clone()
}
