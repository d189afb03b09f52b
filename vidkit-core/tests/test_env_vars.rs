// vidkit-core/tests/test_env_vars.rs

use std::env;
use std::path::PathBuf;

use vidkit_core::config::{ENV_CACHE_DIR, ENV_CODEC, ENV_FFPROBE, ENV_PRESET, ENV_QUALITY};
use vidkit_core::{Preset, Quality, ToolsConfig};

const ALL_VARS: [&str; 5] = [ENV_CODEC, ENV_CACHE_DIR, ENV_FFPROBE, ENV_QUALITY, ENV_PRESET];

fn clear_vars() {
    for key in ALL_VARS {
        // SAFETY: this is the only test in this binary touching the environment.
        unsafe { env::remove_var(key) };
    }
}

// A single test so the environment is never mutated concurrently.
#[test]
fn test_env_var_overrides() {
    clear_vars();
    assert_eq!(ToolsConfig::from_env(), ToolsConfig::default());

    unsafe {
        env::set_var(ENV_CODEC, "libx265");
        env::set_var(ENV_CACHE_DIR, "/tmp/vidkit-env-cache");
        env::set_var(ENV_FFPROBE, "/opt/ffmpeg/bin/ffprobe");
        env::set_var(ENV_QUALITY, "low");
        env::set_var(ENV_PRESET, "slower");
    }
    let config = ToolsConfig::from_env();
    assert_eq!(config.codec, "libx265");
    assert_eq!(config.cache_dir, PathBuf::from("/tmp/vidkit-env-cache"));
    assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
    assert_eq!(config.default_quality, Quality::Low);
    assert_eq!(config.default_preset, Preset::Slower);

    // Unparseable enum values fall back to the defaults.
    unsafe {
        env::set_var(ENV_QUALITY, "ultra");
        env::set_var(ENV_PRESET, "warp");
    }
    let config = ToolsConfig::from_env();
    assert_eq!(config.default_quality, Quality::Medium);
    assert_eq!(config.default_preset, Preset::VerySlow);

    clear_vars();
}
