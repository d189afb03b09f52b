//! Core library for compressing videos and inspecting media through ffmpeg.
//!
//! This crate validates user-supplied compression options, turns them into
//! ordered ffmpeg command lines, serializes access to the shared engine, and
//! caches probe results per asset.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidkit_core::{CompressOptions, Quality, VideoTools};
//!
//! let mut tools = VideoTools::new("/videos/holiday.mp4");
//! let details = tools.get_details(false).unwrap();
//! println!("{}x{}, {} bytes", details.width, details.height, details.size);
//!
//! let options = CompressOptions::default().with_quality(Quality::Low);
//! let outcome = tools.compress(Some(&options)).unwrap();
//! println!("rc={} -> {}", outcome.return_code, outcome.output_path);
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod media;
pub mod options;
pub mod temp_files;
pub mod utils;
pub mod video_tools;

// Re-exports for public API
pub use command::{CompressCommand, build_compress_command, size_probe_args, size_probe_command};
pub use config::ToolsConfig;
pub use error::{CoreError, CoreResult};
pub use external::{Engine, EngineHandle, FfmpegEngine, MockEngine, global_engine};
pub use media::{DetailsCache, MediaDetails};
pub use options::{
    CompressOptions, CompressionResolution, OptionsCheck, Preset, Quality, resolve_compression,
    validate_options,
};
pub use temp_files::{CacheFileGenerator, OutputPathGenerator};
pub use utils::{INCORRECT_INPUT_PATH, format_bytes, resolve_extension};
pub use video_tools::{CompressOutcome, InputCheck, VideoTools};
