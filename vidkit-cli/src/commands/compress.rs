// ============================================================================
// vidkit-cli/src/commands/compress.rs
// ============================================================================
//
// COMPRESS COMMAND: validates options and runs (or prints) the ffmpeg job
//
// Missing flags fall back to the configured defaults (VIDKIT_QUALITY,
// VIDKIT_PRESET). `--dry-run` swaps the real engine for the recording mock so
// the exact command line can be shown without invoking ffmpeg.

use std::path::PathBuf;

use log::{debug, info};
use vidkit_core::{
    CacheFileGenerator, CompressOptions, CompressOutcome, CoreResult, Engine, EngineHandle,
    MockEngine, OutputPathGenerator, ToolsConfig, VideoTools, global_engine,
};

use crate::cli::CompressArgs;
use crate::error::CliResult;
use crate::output::{print_heading, print_info, print_success};

/// Names the would-be output file without creating it.
#[derive(Debug, Clone)]
struct DryRunGenerator {
    dir: PathBuf,
}

impl OutputPathGenerator for DryRunGenerator {
    fn generate(&self, extension: &str) -> CoreResult<Option<String>> {
        let path = self.dir.join(format!("vidkit_dry_run.{extension}"));
        Ok(path.to_str().map(str::to_string))
    }
}

/// Merges command-line flags with configured defaults.
pub fn build_options(args: &CompressArgs, config: &ToolsConfig) -> CompressOptions {
    CompressOptions {
        quality: Some(
            args.quality
                .clone()
                .unwrap_or_else(|| config.default_quality.as_str().to_string()),
        ),
        speed: Some(
            args.speed
                .clone()
                .unwrap_or_else(|| config.default_preset.as_str().to_string()),
        ),
        bitrate: args.bitrate.clone(),
        output_path: args.output.clone(),
    }
}

pub fn run_compress(args: CompressArgs) -> CliResult<()> {
    let config = ToolsConfig::from_env();
    let options = build_options(&args, &config);
    debug!("Compress options: {:?}", options);

    if args.dry_run {
        let engine = EngineHandle::new(MockEngine::new());
        let tools = VideoTools::with_engine(
            args.input_path.as_str(),
            engine.clone(),
            DryRunGenerator {
                dir: config.cache_dir.clone(),
            },
        )
        .with_codec(config.codec.as_str());
        tools.compress(Some(&options))?;

        for command in engine.engine().executed_commands() {
            println!("ffmpeg -y {command}");
        }
        return Ok(());
    }

    let tools = VideoTools::with_engine(
        args.input_path.as_str(),
        global_engine(),
        CacheFileGenerator::from_config(&config),
    )
    .with_codec(config.codec.as_str());

    print_heading("Compressing");
    print_info("Input", tools.path());
    print_info("Quality", options.quality.as_deref().unwrap_or_default());
    print_info("Speed", options.speed.as_deref().unwrap_or_default());
    if let Some(bitrate) = &options.bitrate {
        print_info("Bitrate", bitrate);
    }

    let outcome = tools.compress(Some(&options))?;
    report(&outcome, tools.engine_handle())
}

fn report<E: Engine>(outcome: &CompressOutcome, engine: &EngineHandle<E>) -> CliResult<()> {
    info!(
        "ffmpeg finished with return code {} -> {}",
        outcome.return_code, outcome.output_path
    );
    if outcome.return_code == 0 {
        print_success(&format!("Wrote {}", outcome.output_path));
        return Ok(());
    }

    let tail = engine.engine().last_output().unwrap_or_default();
    Err(vidkit_core::CoreError::EngineExecution(format!(
        "ffmpeg exited with code {}: {}",
        outcome.return_code,
        tail.trim()
    )))
}
