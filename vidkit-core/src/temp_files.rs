//! Output file generation.
//!
//! When a compression run has no caller-supplied output path, a fresh file is
//! created in the cache directory. The `tempfile` crate picks a unique name;
//! the file is persisted (not deleted on drop) because ffmpeg writes to it
//! afterwards and the caller owns the result.

use std::path::{Path, PathBuf};

use tempfile::Builder as TempFileBuilder;

use crate::config::ToolsConfig;
use crate::error::CoreResult;

/// Prefix of generated output file names.
pub const OUTPUT_FILE_PREFIX: &str = "vidkit_";

/// Produces a usable output path for a given extension.
///
/// `Ok(None)` and `Err(_)` both mean no path could be produced.
pub trait OutputPathGenerator {
    fn generate(&self, extension: &str) -> CoreResult<Option<String>>;
}

/// Generator creating persisted files inside a cache directory.
#[derive(Debug, Clone)]
pub struct CacheFileGenerator {
    dir: PathBuf,
}

impl CacheFileGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.cache_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for CacheFileGenerator {
    fn default() -> Self {
        Self::from_config(&ToolsConfig::from_env())
    }
}

impl OutputPathGenerator for CacheFileGenerator {
    fn generate(&self, extension: &str) -> CoreResult<Option<String>> {
        let path = create_output_file(&self.dir, OUTPUT_FILE_PREFIX, extension)?;
        log::debug!("Generated output file: {}", path.display());
        Ok(path.to_str().map(str::to_string))
    }
}

/// Creates an empty, persisted file `<prefix><random>.<extension>` in `dir`.
pub fn create_output_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file = TempFileBuilder::new()
        .prefix(prefix)
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}
