// vidkit-core/tests/compress_workflow_tests.rs

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::tempdir;
use vidkit_core::external::EngineCall;
use vidkit_core::{
    CacheFileGenerator, CompressOptions, CoreError, EngineHandle, MockEngine, Preset, Quality,
    VideoTools,
};

#[test]
fn test_compress_generates_output_in_cache_dir() -> Result<(), Box<dyn std::error::Error>> {
    let cache = tempdir()?;
    let engine = EngineHandle::new(MockEngine::new());
    let tools = VideoTools::with_engine(
        "/videos/holiday.mov",
        engine.clone(),
        CacheFileGenerator::new(cache.path()),
    );

    let options = CompressOptions::new()
        .with_quality(Quality::Low)
        .with_speed(Preset::Fast);
    let outcome = tools.compress(Some(&options))?;

    assert_eq!(outcome.return_code, 0);
    let output = Path::new(&outcome.output_path);
    assert!(output.starts_with(cache.path()));
    assert_eq!(output.extension().unwrap(), "mov");
    assert!(output.exists());

    let commands = engine.engine().executed_commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(
        commands[0],
        format!(
            "-i /videos/holiday.mov -c:v libx264 -crf 22 -preset fast {}",
            outcome.output_path
        )
    );
    Ok(())
}

#[test]
fn test_empty_path_fails_before_any_side_effect() -> Result<(), Box<dyn std::error::Error>> {
    let cache = tempdir()?;
    let cache_dir = cache.path().join("never_created");
    let engine = EngineHandle::new(MockEngine::new());
    let tools = VideoTools::with_engine("", engine.clone(), CacheFileGenerator::new(&cache_dir));

    let err = tools.compress(None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInputPath));
    assert!(!cache_dir.exists(), "output generation must not run");
    assert!(engine.engine().calls().is_empty());
    Ok(())
}

#[test]
fn test_codec_override_flows_into_command() {
    let engine = EngineHandle::new(MockEngine::new());
    let tools =
        VideoTools::with_engine("in.mkv", engine.clone(), CacheFileGenerator::new("/unused"))
            .with_codec("libx265");
    let options = CompressOptions::default().with_output_path("out.mkv");
    tools.compress(Some(&options)).unwrap();

    assert_eq!(
        engine.engine().executed_commands(),
        vec!["-i in.mkv -c:v libx265 -crf 18 -preset veryslow out.mkv"]
    );
}

#[test]
fn test_handles_sharing_an_engine_see_each_others_cancel() {
    let engine = EngineHandle::new(MockEngine::new().hold_until_cancelled());
    let busy = VideoTools::with_engine("a.mp4", engine.clone(), CacheFileGenerator::new("/unused"));
    let idle = VideoTools::with_engine("b.mp4", engine.clone(), CacheFileGenerator::new("/unused"));

    let worker = thread::spawn(move || {
        let options = CompressOptions::default().with_output_path("a_out.mp4");
        busy.compress(Some(&options))
    });

    while engine.running_command().is_none() {
        thread::sleep(Duration::from_millis(5));
    }
    // The cancel is untargeted: the idle handle stops the busy one's run.
    assert!(idle.cancel_running());

    let outcome = worker.join().unwrap().unwrap();
    assert_eq!(outcome.return_code, MockEngine::CANCELLED_RETURN_CODE);
    assert!(engine.engine().calls().contains(&EngineCall::Cancel));
}

#[test]
fn test_details_cache_follows_path() {
    let engine = EngineHandle::new(
        MockEngine::new()
            .with_probe_output(
                r#"{"streams": [{"width": "1920", "height": "1080"}], "format": {"size": "2048"}}"#,
            )
            .with_media_information(serde_json::json!({
                "streams": [],
                "format": {"format_name": "mov,mp4"}
            })),
    );
    let mut tools =
        VideoTools::with_engine("clip.mp4", engine.clone(), CacheFileGenerator::new("/unused"));

    let first = tools.get_details(false).unwrap();
    assert_eq!((first.width, first.height, first.size), (1920, 1080, 2048));
    let again = tools.get_details(false).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(engine.engine().calls().len(), 3);

    tools.set_path("clip.mp4");
    assert!(tools.cached_details().is_some());

    tools.set_path("other.webm");
    assert!(tools.cached_details().is_none());
    let other = tools.get_details(false).unwrap();
    assert_eq!(other.extension, "webm");
    assert_eq!(engine.engine().calls().len(), 6);
}
