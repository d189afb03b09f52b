// ============================================================================
// vidkit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for vidkit-core
//
// Every failure a `VideoTools` call can produce is a variant of `CoreError`.
// Errors are scoped to the call that produced them; none of them leaves the
// asset handle in an inconsistent state and none is retried automatically.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

use crate::utils::INCORRECT_INPUT_PATH;

/// Message used when a caller-supplied output path cannot be used.
pub const INCORRECT_OUTPUT_PATH: &str = "Incorrect output path";

/// Message used when the output-path generator could not produce a file.
pub const ERROR_OCCUR_WHILE_GENERATING_OUTPUT_FILE: &str =
    "Error occur while generating output file";

/// Custom error type for vidkit-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The asset path has no usable extension.
    #[error("{}", INCORRECT_INPUT_PATH)]
    InvalidInputPath,

    /// A compression option is not part of its allowed value set.
    #[error("{message}")]
    InvalidOptions {
        field: &'static str,
        allowed: Vec<&'static str>,
        message: String,
    },

    /// No output path could be resolved for a compression run.
    #[error("{}", output_path_message(.caller_supplied))]
    OutputPathUnavailable { caller_supplied: bool },

    #[error("Failed to parse probe output: {0}")]
    ProbeParse(String),

    #[error("Engine execution failed: {0}")]
    EngineExecution(String),

    #[error("{0}")]
    InvalidArgumentType(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, io::Error),

    #[error("{0} exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),
}

/// Result type for vidkit-core operations
pub type CoreResult<T> = Result<T, CoreError>;

fn output_path_message(caller_supplied: &bool) -> &'static str {
    if *caller_supplied {
        INCORRECT_OUTPUT_PATH
    } else {
        ERROR_OCCUR_WHILE_GENERATING_OUTPUT_FILE
    }
}

pub(crate) fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub(crate) fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}
