// vidkit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidkit: compress videos and inspect media with ffmpeg",
    long_about = "Validates compression options, builds ffmpeg commands \
                  and probes media details via vidkit-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compresses a video with x264
    Compress(CompressArgs),
    /// Prints size, dimensions and probe data of a media file
    Info(InfoArgs),
    /// Lists the accepted quality levels and speed presets
    Options,
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input video path
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: String,

    /// Quality level (high, medium, low). Defaults to VIDKIT_QUALITY or medium
    #[arg(short, long, value_name = "QUALITY")]
    pub quality: Option<String>,

    /// Encoder speed preset (ultrafast ... veryslow). Defaults to VIDKIT_PRESET or veryslow
    #[arg(short, long, value_name = "PRESET")]
    pub speed: Option<String>,

    /// Optional target video bitrate (e.g. 1M, 800k)
    #[arg(short, long, value_name = "BITRATE")]
    pub bitrate: Option<String>,

    /// Output path. A file in the cache directory is generated when omitted
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    pub output: Option<String>,

    /// Print the ffmpeg command instead of running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Media file to probe
    #[arg(value_name = "INPUT_PATH")]
    pub input_path: String,

    /// Print the full merged details as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
