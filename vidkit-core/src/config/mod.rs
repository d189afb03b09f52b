//! Configuration structures and constants for the vidkit-core library.
//!
//! `ToolsConfig` carries the knobs shared by every asset handle: the video
//! codec, where generated output files go, which ffprobe binary to run, and
//! the default quality/preset offered to front ends.

mod builder;
mod utils;

use std::path::PathBuf;

use crate::command::DEFAULT_VIDEO_CODEC;
use crate::options::{DEFAULT_PRESET, DEFAULT_QUALITY, Preset, Quality};

pub use builder::ToolsConfigBuilder;
pub use utils::{get_env_parsed, get_env_path, get_env_string};

/// Environment variable overriding the video codec.
pub const ENV_CODEC: &str = "VIDKIT_CODEC";
/// Environment variable overriding the output cache directory.
pub const ENV_CACHE_DIR: &str = "VIDKIT_CACHE_DIR";
/// Environment variable overriding the ffprobe binary.
pub const ENV_FFPROBE: &str = "VIDKIT_FFPROBE";
/// Environment variable overriding the default quality.
pub const ENV_QUALITY: &str = "VIDKIT_QUALITY";
/// Environment variable overriding the default preset.
pub const ENV_PRESET: &str = "VIDKIT_PRESET";

/// Name of the cache subdirectory created under the system temp dir.
pub const DEFAULT_CACHE_SUBDIR: &str = "vidkit";

/// Main configuration structure for the vidkit-core library.
///
/// # Examples
///
/// ```rust
/// use vidkit_core::config::ToolsConfig;
/// use vidkit_core::options::{Preset, Quality};
///
/// let config = ToolsConfig::builder()
///     .codec("libx265")
///     .cache_dir("/tmp/vidkit-test")
///     .default_quality(Quality::Low)
///     .default_preset(Preset::Fast)
///     .build();
/// assert_eq!(config.codec, "libx265");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Encoder passed to `-c:v`
    pub codec: String,

    /// Directory where generated output files are created
    pub cache_dir: PathBuf,

    /// ffprobe binary (name looked up on PATH, or a full path)
    pub ffprobe_path: PathBuf,

    /// Quality offered by front ends when the user picks none
    pub default_quality: Quality,

    /// Preset offered by front ends when the user picks none
    pub default_preset: Preset,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            cache_dir: std::env::temp_dir().join(DEFAULT_CACHE_SUBDIR),
            ffprobe_path: PathBuf::from("ffprobe"),
            default_quality: DEFAULT_QUALITY,
            default_preset: DEFAULT_PRESET,
        }
    }
}

impl ToolsConfig {
    pub fn builder() -> ToolsConfigBuilder {
        ToolsConfigBuilder::new()
    }

    /// Defaults overridden by `VIDKIT_*` environment variables.
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            codec: get_env_string(ENV_CODEC, defaults.codec),
            cache_dir: get_env_path(ENV_CACHE_DIR, defaults.cache_dir),
            ffprobe_path: get_env_path(ENV_FFPROBE, defaults.ffprobe_path),
            default_quality: get_env_parsed(ENV_QUALITY, defaults.default_quality),
            default_preset: get_env_parsed(ENV_PRESET, defaults.default_preset),
        }
    }
}
