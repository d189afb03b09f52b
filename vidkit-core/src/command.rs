//! FFmpeg command construction.
//!
//! A compression command is an ordered list of `(flag, value)` pairs followed
//! by a bare output path. ffmpeg reads its arguments sequentially, so the
//! pairs are kept in insertion order and never sorted or deduplicated.

use crate::options::DEFAULT_PRESET;

/// Video codec passed to `-c:v` unless configured otherwise.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Flag carrying the target video bitrate.
///
/// Deliberately `-b:v` rather than a literal `bitrate` key: ffmpeg would read
/// a bare `bitrate` as an extra output file.
pub const BITRATE_FLAG: &str = "-b:v";

/// An ordered compression command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressCommand {
    pairs: Vec<(String, String)>,
    output_path: String,
}

impl CompressCommand {
    /// Starts an empty command that will write to `output_path`.
    #[must_use]
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            pairs: Vec::new(),
            output_path: output_path.into(),
        }
    }

    /// Appends a flag/value pair after the existing ones.
    #[must_use]
    pub fn arg_pair(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((flag.into(), value.into()));
        self
    }

    /// The flag/value pairs in the order they will be emitted.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    #[must_use]
    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    /// Flattens the command into an argv vector, output path last.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.pairs.len() * 2 + 1);
        for (flag, value) in &self.pairs {
            args.push(flag.clone());
            args.push(value.clone());
        }
        args.push(self.output_path.clone());
        args
    }

    /// Renders the space-joined command string.
    ///
    /// Used for logging and display only. Paths are not quoted, so the engine
    /// is always handed [`args`](Self::args) instead.
    #[must_use]
    pub fn to_command_string(&self) -> String {
        self.args().join(" ")
    }
}

/// Builds the compression command for one input.
///
/// `preset` falls back to the default preset when absent. The bitrate pair is
/// only emitted when a bitrate is given and always sits right before the
/// output path.
#[must_use]
pub fn build_compress_command(
    input_path: &str,
    crf: &str,
    preset: Option<&str>,
    bitrate: Option<&str>,
    output_path: &str,
    codec: &str,
) -> CompressCommand {
    let mut cmd = CompressCommand::new(output_path)
        .arg_pair("-i", input_path)
        .arg_pair("-c:v", codec)
        .arg_pair("-crf", crf)
        .arg_pair("-preset", preset.unwrap_or(DEFAULT_PRESET.as_str()));

    if let Some(bitrate) = bitrate {
        cmd = cmd.arg_pair(BITRATE_FLAG, bitrate);
    }
    cmd
}

const SIZE_PROBE_FLAGS: [&str; 9] = [
    "-v",
    "error",
    "-select_streams",
    "v:0",
    "-show_entries",
    "format=size",
    "-show_entries",
    "stream=size,width,height",
    "-of",
];

/// Argument vector of the size/dimension probe query for `input_path`.
///
/// This runs with `-v error`, which keeps the JSON output clean; the full
/// media-information query does not reliably report container size or
/// dimensions, so both queries are needed.
#[must_use]
pub fn size_probe_args(input_path: &str) -> Vec<String> {
    probe_args_for(input_path.to_string())
}

/// Renders the size probe query as a string, input path in double quotes.
#[must_use]
pub fn size_probe_command(input_path: &str) -> String {
    probe_args_for(format!("\"{input_path}\"")).join(" ")
}

fn probe_args_for(input: String) -> Vec<String> {
    let mut args = vec!["-i".to_string(), input];
    args.extend(SIZE_PROBE_FLAGS.iter().map(|flag| flag.to_string()));
    args.push("json".to_string());
    args
}
