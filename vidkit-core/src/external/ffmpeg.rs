//! ffmpeg/ffprobe backed engine.
//!
//! Arguments reach both tools as vectors; command strings are split with
//! [`parse_arguments`] only when a caller hands one in. ffmpeg runs through
//! `ffmpeg-sidecar` so its log events can be collected as the command's output
//! and the child can be killed on cancel. ffprobe runs as a plain child process
//! whose pipes are drained on reader threads while the wait loop polls the
//! cancel request.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use serde_json::Value;

use super::Engine;
use crate::config::ToolsConfig;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

/// Return code reported when a run was cancelled or killed by a signal.
pub const CANCELLED_RETURN_CODE: i32 = 255;

const FFPROBE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Engine that shells out to ffmpeg and ffprobe.
#[derive(Debug)]
pub struct FfmpegEngine {
    ffprobe_path: PathBuf,
    cancel_requested: AtomicBool,
    last_output: Mutex<String>,
}

/// Captured result of one ffprobe run.
struct ProbeRun {
    status: ExitStatus,
    stdout: String,
    stderr: String,
    cancelled: bool,
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::from_config(&ToolsConfig::default())
    }
}

impl FfmpegEngine {
    pub fn from_config(config: &ToolsConfig) -> Self {
        Self {
            ffprobe_path: config.ffprobe_path.clone(),
            cancel_requested: AtomicBool::new(false),
            last_output: Mutex::new(String::new()),
        }
    }

    fn set_last_output(&self, output: String) {
        *self
            .last_output
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = output;
    }

    fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    fn run_ffprobe(&self, args: &[String], context: &str) -> CoreResult<ProbeRun> {
        log::debug!("Running ffprobe ({}): {:?}", context, args);
        let mut child = Command::new(&self.ffprobe_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(format!("ffprobe ({context})"), e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let (status, cancelled) = self.wait_or_kill(&mut child, context)?;

        Ok(ProbeRun {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
            cancelled,
        })
    }

    fn wait_or_kill(&self, child: &mut Child, context: &str) -> CoreResult<(ExitStatus, bool)> {
        loop {
            if self.cancel_requested() {
                log::info!("Cancelling ffprobe ({})", context);
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill ffprobe on cancel: {}", e);
                }
                let status = child.wait().map_err(|e| {
                    CoreError::EngineExecution(format!("failed to wait for ffprobe: {e}"))
                })?;
                return Ok((status, true));
            }
            match child.try_wait() {
                Ok(Some(status)) => return Ok((status, false)),
                Ok(None) => thread::sleep(FFPROBE_POLL_INTERVAL),
                Err(e) => {
                    return Err(CoreError::EngineExecution(format!(
                        "failed to wait for ffprobe: {e}"
                    )));
                }
            }
        }
    }
}

/// Reads a child pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("Failed to read ffprobe output: {}", e);
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

impl Engine for FfmpegEngine {
    fn execute_args(&self, args: &[String]) -> CoreResult<i32> {
        let mut cmd = FfmpegCommand::new();
        // Outputs may be pre-created by the path generator; never prompt.
        cmd.arg("-y");
        cmd.args(args);
        log::debug!("Running ffmpeg command: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| CoreError::EngineExecution(format!("failed to start ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| CoreError::EngineExecution(format!("failed to read ffmpeg output: {e}")))?;

        let mut output = String::new();
        let mut cancelled = false;
        // The cancel request is only seen when ffmpeg emits its next event.
        for event in events {
            if self.cancel_requested() {
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill ffmpeg on cancel: {}", e);
                }
                cancelled = true;
                break;
            }
            match event {
                FfmpegEvent::Log(_, line) => {
                    output.push_str(&line);
                    output.push('\n');
                }
                FfmpegEvent::Error(message) => {
                    log::warn!("ffmpeg reported: {}", message);
                    output.push_str(&message);
                    output.push('\n');
                }
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| CoreError::EngineExecution(format!("failed to wait for ffmpeg: {e}")))?;
        self.set_last_output(output);

        if cancelled {
            log::info!("ffmpeg run cancelled");
            return Ok(CANCELLED_RETURN_CODE);
        }
        Ok(status.code().unwrap_or(CANCELLED_RETURN_CODE))
    }

    fn probe_args(&self, args: &[String]) -> CoreResult<i32> {
        let run = self.run_ffprobe(args, "execute")?;
        self.set_last_output(run.stdout);
        if run.cancelled {
            return Ok(CANCELLED_RETURN_CODE);
        }
        if !run.status.success() {
            log::warn!("ffprobe exited with {}: {}", run.status, run.stderr.trim());
        }
        Ok(run.status.code().unwrap_or(CANCELLED_RETURN_CODE))
    }

    fn last_output(&self) -> CoreResult<String> {
        Ok(self
            .last_output
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn media_information(&self, path: &str) -> CoreResult<Value> {
        let args = [
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            path,
        ]
        .map(String::from);
        let run = self.run_ffprobe(&args, "media information")?;
        self.set_last_output(run.stdout.clone());

        if run.cancelled {
            return Err(CoreError::EngineExecution(format!(
                "media information for {path} was cancelled"
            )));
        }
        if !run.status.success() {
            return Err(command_failed_error(
                "ffprobe (media information)",
                run.status,
                run.stderr,
            ));
        }
        Ok(serde_json::from_str(&run.stdout)?)
    }

    fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    fn clear_cancel(&self) {
        self.cancel_requested.store(false, Ordering::SeqCst);
    }
}

/// Splits a command string into arguments.
///
/// Whitespace separates arguments except inside single or double quotes; the
/// quote characters themselves are dropped.
#[must_use]
pub fn parse_arguments(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    args
}
