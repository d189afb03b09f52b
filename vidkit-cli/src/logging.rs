// ============================================================================
// vidkit-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the vidkit binary
//
// The library logs through the `log` facade; the binary installs env_logger.
// - RUST_LOG, when set, wins
// - otherwise `--verbose` selects debug and the default is warn, so command
//   output stays readable

use log::LevelFilter;

/// Installs the global logger. Safe to call once per process.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp_secs().init();

    log::debug!("Logger initialized with level: {}", default_level);
}
