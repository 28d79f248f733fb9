use std::fs;

use tempdir::TempDir;
use track_replay_core::config::ReplayConfig;

#[test]
fn defaults() {
    let config = ReplayConfig::default();
    assert_eq!(config.playback.default_speed_multiplier, 60.);
    assert_eq!(config.tracks.layer_prefix, "track-");
    assert_eq!(config.warnings.lifetime_ms, 5000);
    assert_eq!(config.icons.default_color, "#00f");
    config.validate().unwrap();
}

#[test]
fn partial_file() {
    let dir = TempDir::new("config").unwrap();
    let path = dir.path().join("replay.json");
    fs::write(&path, r#"{ "playback": { "default_speed_multiplier": 10 } }"#).unwrap();

    let config = ReplayConfig::load(&path).unwrap();
    assert_eq!(config.playback.default_speed_multiplier, 10.);
    assert_eq!(config.tracks.layer_prefix, "track-");
    assert_eq!(config.warnings.lifetime_ms, 5000);
}

#[test]
fn missing_file() {
    let dir = TempDir::new("config").unwrap();
    let config = ReplayConfig::load(dir.path().join("nope.json")).unwrap();
    assert_eq!(config, ReplayConfig::default());
}

#[test]
fn invalid_file() {
    let dir = TempDir::new("config").unwrap();
    let path = dir.path().join("replay.json");

    fs::write(&path, r#"{ "playback": { "default_speed_multiplier": -1 } }"#).unwrap();
    assert!(ReplayConfig::load(&path).is_err());

    fs::write(&path, r#"{ "playback": { "default_speed_multiplier": 0 } }"#).unwrap();
    assert!(ReplayConfig::load(&path).is_err());

    fs::write(&path, "{ not json").unwrap();
    assert!(ReplayConfig::load(&path).is_err());
}

#[test]
fn save_and_load() {
    let dir = TempDir::new("config").unwrap();
    let path = dir.path().join("replay.json");

    let mut config = ReplayConfig::default();
    config.playback.default_speed_multiplier = 600.;
    config.tracks.layer_prefix = "replay-".to_owned();
    config.icons.default_color = "#123456".to_owned();
    config.save(&path).unwrap();

    assert_eq!(ReplayConfig::load(&path).unwrap(), config);
}
