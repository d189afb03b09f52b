// ============================================================================
// vidkit-cli/src/commands/options.rs
// ============================================================================
//
// OPTIONS COMMAND: lists accepted quality levels and speed presets

use vidkit_core::{Preset, Quality, ToolsConfig};

use crate::error::CliResult;
use crate::output::{print_heading, print_info};

pub fn run_options() -> CliResult<()> {
    let config = ToolsConfig::from_env();

    print_heading("Compression options");
    let qualities: Vec<String> = Quality::ALL
        .iter()
        .map(|q| format!("{} (crf {})", q.as_str(), q.crf()))
        .collect();
    print_info("Quality", qualities.join(", "));
    print_info("Speed", Preset::values().join(", "));
    print_info("Default quality", config.default_quality);
    print_info("Default speed", config.default_preset);
    print_info("Codec", &config.codec);
    print_info("Cache directory", config.cache_dir.display());
    Ok(())
}
