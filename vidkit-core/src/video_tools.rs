// ============================================================================
// vidkit-core/src/video_tools.rs
// ============================================================================
//
// ASSET HANDLE: Compression and Probing Around One Media File
//
// `VideoTools` owns one asset (path, derived extension, cached details) and
// is the single point of contact with the engine for that asset.
//
// COMPRESS WORKFLOW:
// 1. Input gate: the path must have an extension
// 2. Options gate: quality/speed must belong to their enumerations
// 3. Output gate: caller-supplied path, or one from the output generator
// 4. Resolve CRF, build the ordered command, execute through the engine
//
// DETAILS WORKFLOW (two-step probe):
// 1. Size/dimension query with `-v error`, then read its output, in one
//    engine admission. The full media-information query does not reliably
//    report container size or dimensions, so this step is mandatory; re-verify
//    it when moving to another engine version.
// 2. Full media-information query
// 3. Merge and replace the cached value
//
// Every step of a workflow finishes before the next one starts. A failed call
// leaves path, extension and cache exactly as they were.

use std::sync::Arc;

use serde_json::Value;

use crate::command::{DEFAULT_VIDEO_CODEC, build_compress_command, size_probe_args};
use crate::config::ToolsConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{Engine, EngineHandle, FfmpegEngine, global_engine};
use crate::media::{DetailsCache, MediaDetails, merge_details, parse_size_probe};
use crate::options::{CompressOptions, check_options, resolve_compression};
use crate::temp_files::{CacheFileGenerator, OutputPathGenerator};
use crate::utils::{INCORRECT_INPUT_PATH, is_valid_extension, resolve_extension};

/// Result of the input-path check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCheck {
    pub valid: bool,
    pub message: String,
}

/// Result of a successful compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOutcome {
    /// Engine return code (0 on success, 255 when cancelled)
    pub return_code: i32,
    pub output_path: String,
}

/// Handle around one media asset.
#[derive(Debug)]
pub struct VideoTools<E, G> {
    engine: EngineHandle<E>,
    generator: G,
    codec: String,
    path: String,
    extension: String,
    details: DetailsCache,
}

impl VideoTools<FfmpegEngine, CacheFileGenerator> {
    /// Handle using the process-wide ffmpeg engine and env-derived config.
    pub fn new(path: impl Into<String>) -> Self {
        let config = ToolsConfig::from_env();
        Self::with_engine(path, global_engine(), CacheFileGenerator::from_config(&config))
            .with_codec(config.codec)
    }

    /// Cancels whatever command the process-wide engine is running,
    /// regardless of which handle started it.
    pub fn cancel() -> bool {
        global_engine().cancel()
    }
}

impl<E: Engine, G: OutputPathGenerator> VideoTools<E, G> {
    pub fn with_engine(path: impl Into<String>, engine: EngineHandle<E>, generator: G) -> Self {
        let path = path.into();
        let extension = resolve_extension(&path);
        Self {
            engine,
            generator,
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            path,
            extension,
            details: DetailsCache::new(),
        }
    }

    /// Sets the encoder passed to `-c:v`.
    #[must_use]
    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn engine_handle(&self) -> &EngineHandle<E> {
        &self.engine
    }

    /// Currently cached details, without probing.
    pub fn cached_details(&self) -> Option<Arc<MediaDetails>> {
        self.details.get()
    }

    /// Points the handle at another file. A no-op when the path is unchanged.
    pub fn set_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if path == self.path {
            return;
        }
        log::debug!("Asset path changed: {} -> {}", self.path, path);
        self.details.clear();
        self.extension = resolve_extension(&path);
        self.path = path;
    }

    pub fn has_correct_input_file(&self) -> bool {
        is_valid_extension(&self.extension)
    }

    pub fn is_input_valid(&self) -> InputCheck {
        if self.has_correct_input_file() {
            InputCheck {
                valid: true,
                message: String::new(),
            }
        } else {
            InputCheck {
                valid: false,
                message: INCORRECT_INPUT_PATH.to_string(),
            }
        }
    }

    /// Compresses the asset. `None` uses `CompressOptions::default()`.
    pub fn compress(&self, options: Option<&CompressOptions>) -> CoreResult<CompressOutcome> {
        let defaults = CompressOptions::default();
        let options = options.unwrap_or(&defaults);

        if !self.has_correct_input_file() {
            log::warn!("Refusing to compress {:?}: no usable extension", self.path);
            return Err(CoreError::InvalidInputPath);
        }
        check_options(Some(options))?;
        let output_path = self.resolve_output_path(options)?;

        let resolution = resolve_compression(options.quality_str());
        let command = build_compress_command(
            &self.path,
            &resolution.crf,
            options.speed_str(),
            options.bitrate_str(),
            &output_path,
            &self.codec,
        );

        log::debug!("Compress command: {}", command.to_command_string());
        let return_code = self.engine.execute_args(&command.args())?;
        log::info!(
            "Compressed {} -> {} (rc={})",
            self.path,
            output_path,
            return_code
        );

        Ok(CompressOutcome {
            return_code,
            output_path,
        })
    }

    fn resolve_output_path(&self, options: &CompressOptions) -> CoreResult<String> {
        if let Some(path) = options.output_path_str() {
            // ffmpeg picks the container from the output extension.
            if !is_valid_extension(&resolve_extension(path)) {
                log::error!("Caller-supplied output path has no extension: {}", path);
                return Err(CoreError::OutputPathUnavailable {
                    caller_supplied: true,
                });
            }
            return Ok(path.to_string());
        }
        match self.generator.generate(&self.extension) {
            Ok(Some(path)) if !path.is_empty() => Ok(path),
            Ok(_) => {
                log::error!("Output generator returned no path for .{}", self.extension);
                Err(CoreError::OutputPathUnavailable {
                    caller_supplied: false,
                })
            }
            Err(e) => {
                log::error!("Output generator failed for .{}: {}", self.extension, e);
                Err(CoreError::OutputPathUnavailable {
                    caller_supplied: false,
                })
            }
        }
    }

    /// Returns the media details, probing only on a cache miss or when forced.
    pub fn get_details(&mut self, force: bool) -> CoreResult<Arc<MediaDetails>> {
        if !force {
            if let Some(details) = self.details.get() {
                log::debug!("Media details cache hit for {}", self.path);
                return Ok(details);
            }
        }

        let details = self.probe_details()?;
        Ok(self.details.store(details))
    }

    /// Dynamically typed variant of [`get_details`](Self::get_details) for
    /// callers holding an untyped `force` (JSON requests, scripting bridges).
    ///
    /// A non-boolean `force` is rejected before the engine is touched.
    pub fn get_details_checked(&mut self, force: &Value) -> CoreResult<Arc<MediaDetails>> {
        match force {
            Value::Bool(force) => self.get_details(*force),
            other => Err(CoreError::InvalidArgumentType(format!(
                "Parameter force should be boolean. {} given",
                json_type_name(other)
            ))),
        }
    }

    /// Drops the cache and probes again in the background of the caller's
    /// flow: failures are logged, not returned.
    pub fn prefetch_details(&mut self) {
        if !self.has_correct_input_file() {
            return;
        }
        self.details.clear();
        if let Err(e) = self.get_details(false) {
            log::warn!("Prefetching media details for {} failed: {}", self.path, e);
        }
    }

    fn probe_details(&self) -> CoreResult<MediaDetails> {
        log::debug!("Probing media details for {}", self.path);

        let (rc, raw) = self.engine.probe_args_output(&size_probe_args(&self.path))?;
        if rc != 0 {
            return Err(CoreError::EngineExecution(format!(
                "size probe for {} exited with code {}",
                self.path, rc
            )));
        }
        let sizes = parse_size_probe(&raw)?;

        let media_information = self.engine.media_information(&self.path)?;
        merge_details(media_information, sizes, &resolve_extension(&self.path))
    }

    /// Cancels whatever command this handle's engine is running. The engine
    /// cannot target a command, so this may stop a run started elsewhere.
    pub fn cancel_running(&self) -> bool {
        self.engine.cancel()
    }
}

/// Type name in the wording of JavaScript's `typeof`, where null and arrays
/// are both "object".
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{EngineCall, MockEngine};
    use std::cell::Cell;

    /// Generator returning a fixed answer and counting calls.
    struct FixedGenerator {
        answer: Option<&'static str>,
        fail: bool,
        calls: Cell<usize>,
    }

    impl FixedGenerator {
        fn path(path: &'static str) -> Self {
            Self {
                answer: Some(path),
                fail: false,
                calls: Cell::new(0),
            }
        }

        fn none() -> Self {
            Self {
                answer: None,
                fail: false,
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                fail: true,
                calls: Cell::new(0),
            }
        }
    }

    impl OutputPathGenerator for FixedGenerator {
        fn generate(&self, _extension: &str) -> CoreResult<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(CoreError::Io(std::io::Error::other("disk full")));
            }
            Ok(self.answer.map(str::to_string))
        }
    }

    fn make_tools(
        path: &str,
        engine: MockEngine,
        generator: FixedGenerator,
    ) -> VideoTools<MockEngine, FixedGenerator> {
        VideoTools::with_engine(path, EngineHandle::new(engine), generator)
    }

    #[test]
    fn test_compress_with_defaults() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new(),
            FixedGenerator::path("/cache/out.mp4"),
        );
        let outcome = tools.compress(None).unwrap();
        assert_eq!(
            outcome,
            CompressOutcome {
                return_code: 0,
                output_path: "/cache/out.mp4".to_string()
            }
        );
        assert_eq!(
            tools.engine_handle().engine().executed_commands(),
            vec!["-i /a/in.mp4 -c:v libx264 -crf 18 -preset veryslow /cache/out.mp4"]
        );
    }

    #[test]
    fn test_compress_with_caller_output_skips_generator() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new(),
            FixedGenerator::path("/unused.mp4"),
        );
        let options = CompressOptions::new()
            .with_bitrate("1M")
            .with_output_path("/a/out.mp4");
        let outcome = tools.compress(Some(&options)).unwrap();

        assert_eq!(outcome.output_path, "/a/out.mp4");
        assert_eq!(tools.generator.calls.get(), 0);
        // No quality given: CRF falls back to 14.
        assert_eq!(
            tools.engine_handle().engine().executed_commands(),
            vec!["-i /a/in.mp4 -c:v libx264 -crf 14 -preset veryslow -b:v 1M /a/out.mp4"]
        );
    }

    #[test]
    fn test_compress_rejects_invalid_input_before_generating_output() {
        let tools = make_tools("", MockEngine::new(), FixedGenerator::path("/cache/out.mp4"));
        let err = tools.compress(None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInputPath));
        assert_eq!(tools.generator.calls.get(), 0);
        assert!(tools.engine_handle().engine().calls().is_empty());
    }

    #[test]
    fn test_compress_rejects_invalid_options() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new(),
            FixedGenerator::path("/cache/out.mp4"),
        );
        let options = CompressOptions {
            speed: Some("warp".to_string()),
            ..CompressOptions::default()
        };
        let err = tools.compress(Some(&options)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOptions { field: "speed", .. }));
        assert!(err.to_string().contains("'veryslow'"));
        assert_eq!(tools.generator.calls.get(), 0);
    }

    #[test]
    fn test_compress_output_generation_failures() {
        let tools_none = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::none());
        let err = tools_none.compress(None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::OutputPathUnavailable {
                caller_supplied: false
            }
        ));

        let tools_fail = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::failing());
        let err = tools_fail.compress(None).unwrap_err();
        assert_eq!(err.to_string(), "Error occur while generating output file");
        assert!(tools_fail.engine_handle().engine().calls().is_empty());
    }

    #[test]
    fn test_compress_rejects_unusable_caller_output() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new(),
            FixedGenerator::path("/cache/out.mp4"),
        );
        let options = CompressOptions::default().with_output_path("/a/out");
        let err = tools.compress(Some(&options)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::OutputPathUnavailable {
                caller_supplied: true
            }
        ));
        assert_eq!(err.to_string(), "Incorrect output path");
        assert_eq!(tools.generator.calls.get(), 0);
    }

    #[test]
    fn test_compress_propagates_engine_error() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new().failing_execute("encoder crashed"),
            FixedGenerator::path("/cache/out.mp4"),
        );
        let err = tools.compress(None).unwrap_err();
        assert!(matches!(err, CoreError::EngineExecution(ref m) if m == "encoder crashed"));
        assert_eq!(tools.path(), "/a/in.mp4");
        assert_eq!(tools.extension(), "mp4");
    }

    #[test]
    fn test_compress_returns_nonzero_return_code() {
        let tools = make_tools(
            "/a/in.mp4",
            MockEngine::new().with_return_code(1),
            FixedGenerator::path("/cache/out.mp4"),
        );
        assert_eq!(tools.compress(None).unwrap().return_code, 1);
    }

    #[test]
    fn test_set_path_same_path_keeps_cache() {
        let mut tools = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::none());
        let first = tools.get_details(false).unwrap();
        tools.set_path("/a/in.mp4");
        let cached = tools.cached_details().unwrap();
        assert!(Arc::ptr_eq(&first, &cached));
    }

    #[test]
    fn test_set_path_new_path_clears_cache_and_extension() {
        let mut tools = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::none());
        tools.get_details(false).unwrap();
        tools.set_path("/a/other.MKV");
        assert!(tools.cached_details().is_none());
        assert_eq!(tools.extension(), "MKV");

        tools.set_path("/a/broken.");
        let check = tools.is_input_valid();
        assert!(!check.valid);
        assert_eq!(check.message, INCORRECT_INPUT_PATH);
    }

    #[test]
    fn test_get_details_two_step_probe_and_merge() {
        let engine = MockEngine::new()
            .with_probe_output(
                r#"{"streams": [{"width": 640, "height": 360}], "format": {"size": "15804433"}}"#,
            )
            .with_media_information(serde_json::json!({
                "format": {"duration": "10.0"},
                "size": "0"
            }));
        let mut tools = make_tools("/a/in.mp4", engine, FixedGenerator::none());

        let details = tools.get_details(false).unwrap();
        assert_eq!(details.size, 15_804_433);
        assert_eq!((details.width, details.height), (640, 360));
        assert_eq!(details.extension, "mp4");
        assert!(details.raw.contains_key("format"));

        assert_eq!(
            tools.engine_handle().engine().calls(),
            vec![
                EngineCall::Probe(size_probe_args("/a/in.mp4").join(" ")),
                EngineCall::LastOutput,
                EngineCall::MediaInformation("/a/in.mp4".to_string()),
            ]
        );
    }

    #[test]
    fn test_get_details_cache_hit_and_force() {
        let mut tools = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::none());
        let first = tools.get_details(false).unwrap();
        let calls_after_first = tools.engine_handle().engine().calls().len();

        let second = tools.get_details(false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(tools.engine_handle().engine().calls().len(), calls_after_first);

        let forced = tools.get_details(true).unwrap();
        assert!(!Arc::ptr_eq(&first, &forced));
        assert_eq!(tools.engine_handle().engine().calls().len(), calls_after_first * 2);
    }

    #[test]
    fn test_get_details_failure_leaves_cache_untouched() {
        let mut tools = make_tools(
            "/a/in.mp4",
            MockEngine::new().with_probe_output("{not json"),
            FixedGenerator::none(),
        );
        assert!(matches!(tools.get_details(false), Err(CoreError::JsonParse(_))));
        assert!(tools.cached_details().is_none());

        let mut tools = tools_with_media_failure();
        assert!(tools.get_details(true).is_err());
        assert!(tools.cached_details().is_none());
    }

    #[test]
    fn test_failed_forced_reprobe_keeps_cached_details() {
        let mut tools = make_tools(
            "/a/in.mp4",
            MockEngine::new().failing_media_information_after(1, "ffprobe crashed"),
            FixedGenerator::none(),
        );
        let first = tools.get_details(false).unwrap();

        let err = tools.get_details(true).unwrap_err();
        assert!(matches!(err, CoreError::EngineExecution(ref m) if m == "ffprobe crashed"));
        let cached = tools.cached_details().unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        // Without force the surviving entry is served again.
        let again = tools.get_details(false).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_compress_hands_paths_to_engine_unsplit() {
        for (input, output) in [
            ("/v/my clip.mp4", "/out dir/o.mp4"),
            ("/v/Bob's.mp4", "/v/o'k.mp4"),
        ] {
            let tools = make_tools(input, MockEngine::new(), FixedGenerator::none());
            let options = CompressOptions::default().with_output_path(output);
            tools.compress(Some(&options)).unwrap();

            let executed = tools.engine_handle().engine().executed_args();
            assert_eq!(
                executed,
                vec![vec![
                    "-i", input, "-c:v", "libx264", "-crf", "18", "-preset", "veryslow", output,
                ]]
            );
        }
    }

    #[test]
    fn test_size_probe_keeps_quoted_path_whole() {
        let input = "/v/say \"hi\".mp4";
        let mut tools = make_tools(input, MockEngine::new(), FixedGenerator::none());
        tools.get_details(false).unwrap();
        assert_eq!(
            tools.engine_handle().engine().calls()[0],
            EngineCall::Probe(size_probe_args(input).join(" "))
        );
        assert_eq!(size_probe_args(input)[1], input);
    }

    fn tools_with_media_failure() -> VideoTools<MockEngine, FixedGenerator> {
        make_tools(
            "/a/in.mp4",
            MockEngine::new().failing_media_information("ffprobe crashed"),
            FixedGenerator::none(),
        )
    }

    #[test]
    fn test_get_details_checked_rejects_non_boolean() {
        let mut tools = make_tools("/a/in.mp4", MockEngine::new(), FixedGenerator::none());
        let err = tools
            .get_details_checked(&Value::String("not-a-boolean".to_string()))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgumentType(_)));
        assert_eq!(err.to_string(), "Parameter force should be boolean. string given");

        for (value, name) in [
            (Value::Null, "object"),
            (serde_json::json!([true]), "object"),
            (serde_json::json!(1), "number"),
        ] {
            let err = tools.get_details_checked(&value).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Parameter force should be boolean. {name} given")
            );
        }
        assert!(tools.engine_handle().engine().calls().is_empty());

        assert!(tools.get_details_checked(&Value::Bool(false)).is_ok());
    }

    #[test]
    fn test_prefetch_details_swallows_errors() {
        let mut tools = tools_with_media_failure();
        tools.prefetch_details();
        assert!(tools.cached_details().is_none());

        let mut tools = make_tools("noext", MockEngine::new(), FixedGenerator::none());
        tools.prefetch_details();
        assert!(tools.engine_handle().engine().calls().is_empty());
    }
}
