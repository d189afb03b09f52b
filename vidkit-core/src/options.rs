// ============================================================================
// vidkit-core/src/options.rs
// ============================================================================
//
// COMPRESSION OPTIONS: Quality/Preset Enumerations, Validation, CRF Policy
//
// User-supplied compression options arrive as strings (from a CLI, a config
// file, a JSON request). They are checked against the closed `Quality` and
// `Preset` enumerations before any command is built, and the quality level is
// mapped to the x264 CRF value the engine understands.
//
// KEY COMPONENTS:
// - Quality / Preset: closed enumerations with a pure `values()` listing
// - CompressOptions: the per-call option set, with defaults
// - validate_options: short-circuiting membership check (quality before speed)
// - resolve_compression: quality level -> CRF

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// QUALITY
// ============================================================================

/// Human-facing quality level of a compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::High, Quality::Medium, Quality::Low];

    /// Allowed string values, in declaration order.
    #[must_use]
    pub fn values() -> Vec<&'static str> {
        Self::ALL.iter().map(|q| q.as_str()).collect()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }

    /// CRF value for this level. Lower CRF means higher quality and larger files.
    #[must_use]
    pub fn crf(self) -> u8 {
        match self {
            Quality::High => 14,
            Quality::Medium => 18,
            Quality::Low => 22,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| invalid_option("quality", Self::values()))
    }
}

// ============================================================================
// PRESET
// ============================================================================

/// x264 encoder speed preset. Slower presets compress better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    UltraFast,
    SuperFast,
    VeryFast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    VerySlow,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::UltraFast,
        Preset::SuperFast,
        Preset::VeryFast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::VerySlow,
    ];

    /// Allowed string values, fastest first.
    #[must_use]
    pub fn values() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::UltraFast => "ultrafast",
            Preset::SuperFast => "superfast",
            Preset::VeryFast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::VerySlow => "veryslow",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| invalid_option("speed", Self::values()))
    }
}

/// Quality used when a caller does not supply options at all.
pub const DEFAULT_QUALITY: Quality = Quality::Medium;

/// Preset used when options omit `speed`.
pub const DEFAULT_PRESET: Preset = Preset::VerySlow;

// ============================================================================
// COMPRESS OPTIONS
// ============================================================================

/// Options for a single compression run.
///
/// `quality` and `speed` hold the raw user-supplied values so that they can be
/// validated with [`validate_options`]; an empty string counts as absent.
///
/// # Examples
///
/// ```rust
/// use vidkit_core::options::{CompressOptions, Preset, Quality};
///
/// let options = CompressOptions::new()
///     .with_quality(Quality::High)
///     .with_speed(Preset::Fast)
///     .with_bitrate("2M");
/// assert_eq!(options.quality.as_deref(), Some("high"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    pub quality: Option<String>,
    pub speed: Option<String>,
    pub bitrate: Option<String>,
    pub output_path: Option<String>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            quality: Some(DEFAULT_QUALITY.as_str().to_string()),
            speed: Some(DEFAULT_PRESET.as_str().to_string()),
            bitrate: None,
            output_path: None,
        }
    }
}

impl CompressOptions {
    /// Creates an empty option set (every field absent).
    #[must_use]
    pub fn new() -> Self {
        Self {
            quality: None,
            speed: None,
            bitrate: None,
            output_path: None,
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality.as_str().to_string());
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: Preset) -> Self {
        self.speed = Some(speed.as_str().to_string());
        self
    }

    #[must_use]
    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, output_path: impl Into<String>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    pub(crate) fn quality_str(&self) -> Option<&str> {
        non_empty(self.quality.as_deref())
    }

    pub(crate) fn speed_str(&self) -> Option<&str> {
        non_empty(self.speed.as_deref())
    }

    pub(crate) fn bitrate_str(&self) -> Option<&str> {
        non_empty(self.bitrate.as_deref())
    }

    pub(crate) fn output_path_str(&self) -> Option<&str> {
        non_empty(self.output_path.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Outcome of [`validate_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsCheck {
    pub valid: bool,
    pub message: String,
}

impl OptionsCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }
}

/// Checks `quality` and `speed` against their allowed value sets.
///
/// Absent options are valid. Only the first failure is reported, quality
/// before speed.
#[must_use]
pub fn validate_options(options: Option<&CompressOptions>) -> OptionsCheck {
    match check_options(options) {
        Ok(()) => OptionsCheck::ok(),
        Err(err) => OptionsCheck {
            valid: false,
            message: err.to_string(),
        },
    }
}

/// Same check as [`validate_options`], returned as a `CoreError::InvalidOptions`.
pub(crate) fn check_options(options: Option<&CompressOptions>) -> Result<(), CoreError> {
    let Some(options) = options else {
        return Ok(());
    };
    if let Some(quality) = options.quality_str() {
        quality.parse::<Quality>()?;
    }
    if let Some(speed) = options.speed_str() {
        speed.parse::<Preset>()?;
    }
    Ok(())
}

fn invalid_option(field: &'static str, allowed: Vec<&'static str>) -> CoreError {
    let listed = allowed
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ");
    CoreError::InvalidOptions {
        field,
        message: format!("Incorrect {field} options. Please provide one of [{listed}]"),
        allowed,
    }
}

// ============================================================================
// CRF RESOLUTION
// ============================================================================

/// Engine parameters derived from a quality level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResolution {
    /// Value for the `-crf` flag.
    pub crf: String,
}

/// Maps a quality value to its CRF. Unknown or absent values fall back to the
/// `high` CRF of 14.
#[must_use]
pub fn resolve_compression(quality: Option<&str>) -> CompressionResolution {
    let crf = quality
        .and_then(|q| q.parse::<Quality>().ok())
        .unwrap_or(Quality::High)
        .crf();
    CompressionResolution {
        crf: crf.to_string(),
    }
}
