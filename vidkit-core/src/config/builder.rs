// ============================================================================
// vidkit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ToolsConfig
//
// Fluent construction of `ToolsConfig`; every field starts from its default.

use std::path::PathBuf;

use super::ToolsConfig;
use crate::options::{Preset, Quality};

/// Builder for creating `ToolsConfig` instances.
#[derive(Debug, Clone, Default)]
pub struct ToolsConfigBuilder {
    config: ToolsConfig,
}

impl ToolsConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration (e.g. `ToolsConfig::from_env()`).
    pub fn from_config(config: ToolsConfig) -> Self {
        Self { config }
    }

    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.config.codec = codec.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    pub fn default_quality(mut self, quality: Quality) -> Self {
        self.config.default_quality = quality;
        self
    }

    pub fn default_preset(mut self, preset: Preset) -> Self {
        self.config.default_preset = preset;
        self
    }

    pub fn build(self) -> ToolsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_only_given_fields() {
        let config = ToolsConfigBuilder::new()
            .codec("libx265")
            .default_preset(Preset::Fast)
            .build();
        let defaults = ToolsConfig::default();
        assert_eq!(config.codec, "libx265");
        assert_eq!(config.default_preset, Preset::Fast);
        assert_eq!(config.cache_dir, defaults.cache_dir);
        assert_eq!(config.default_quality, defaults.default_quality);
    }

    #[test]
    fn test_builder_from_existing_config() {
        let base = ToolsConfig::builder().cache_dir("/tmp/a").build();
        let config = ToolsConfigBuilder::from_config(base)
            .default_quality(Quality::High)
            .build();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/a"));
        assert_eq!(config.default_quality, Quality::High);
    }
}
