use std::path::Path;
use std::time::Duration;

use dino_runner::config::*;
use dino_runner::error::ConfigError;
use tempfile::TempDir;

#[test]
fn defaults_match_tuning() {
    let config = GameConfig::default();
    assert!((config.max_frame_delta().as_secs_f32() - 0.1).abs() < 1e-6);
    assert_eq!(config.jump.height, 150.0);
    assert_eq!(config.jump.duration_secs, 0.7);
    assert_eq!(config.speed.base, 2.0);
    assert_eq!(config.speed.max, 10.0);
    assert_eq!(config.speed.ramp_secs, 60.0);
    assert_eq!(config.store.cooldown(), Duration::from_secs(2));
    assert!(config.store.path.ends_with(".dino_runner/high_score.json"));
}

#[test]
fn empty_file_is_all_defaults() {
    let config = GameConfig::from_toml_str(Path::new("empty.toml"), "").unwrap();
    assert_eq!(config, GameConfig::default());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let text = r#"
        max_frame_delta_secs = 0.05

        [speed]
        max = 12.0

        [store]
        path = "/tmp/dino/scores.json"
    "#;
    let config = GameConfig::from_toml_str(Path::new("game.toml"), text).unwrap();
    assert!((config.max_frame_delta().as_secs_f32() - 0.05).abs() < 1e-6);
    assert_eq!(config.speed.max, 12.0);
    assert_eq!(config.speed.base, 2.0);
    assert_eq!(config.jump, JumpConfig::default());
    assert_eq!(config.store.path, Path::new("/tmp/dino/scores.json"));
    assert_eq!(config.store.cooldown_secs, 2.0);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = GameConfig::from_toml_str(Path::new("bad.toml"), "[speed\nmax = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let err = GameConfig::from_toml_str(Path::new("t.toml"), "[jump]\nheight = \"tall\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = GameConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "[jump]\nduration_secs = 0.5\n").unwrap();
    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.jump.duration_secs, 0.5);
    assert_eq!(config.jump.height, 150.0);
}

#[test]
fn negative_durations_clamp_to_zero() {
    let config = GameConfig {
        max_frame_delta_secs: -1.0,
        ..GameConfig::default()
    };
    assert_eq!(config.max_frame_delta(), Duration::ZERO);
}

// ── Validation ────────────────────────────────────────────────────────────────

fn rejected_field(text: &str) -> &'static str {
    match GameConfig::from_toml_str(Path::new("game.toml"), text) {
        Err(ConfigError::Invalid { field, .. }) => field,
        other => panic!("expected Invalid for {text:?}, got {other:?}"),
    }
}

#[test]
fn defaults_validate() {
    assert!(GameConfig::default().validate().is_ok());
}

#[test]
fn non_finite_speed_is_rejected() {
    assert_eq!(rejected_field("[speed]\nbase = inf"), "speed.base");
    assert_eq!(rejected_field("[speed]\nmax = nan"), "speed.max");
    assert_eq!(rejected_field("[speed]\nramp_secs = -inf"), "speed.ramp_secs");
    assert_eq!(rejected_field("[speed]\nscore_rate = nan"), "speed.score_rate");
}

#[test]
fn non_positive_tuning_is_rejected() {
    assert_eq!(rejected_field("[jump]\nduration_secs = 0.0"), "jump.duration_secs");
    assert_eq!(rejected_field("[jump]\nheight = -10.0"), "jump.height");
    assert_eq!(rejected_field("[speed]\nbase = 0.0"), "speed.base");
    assert_eq!(rejected_field("[speed]\nramp_secs = 0.0"), "speed.ramp_secs");
}

#[test]
fn negative_delays_are_rejected() {
    assert_eq!(rejected_field("max_frame_delta_secs = -0.1"), "max_frame_delta_secs");
    assert_eq!(rejected_field("[store]\ncooldown_secs = -1.0"), "store.cooldown_secs");
    assert_eq!(rejected_field("[store]\ncooldown_secs = inf"), "store.cooldown_secs");
}

#[test]
fn zero_delays_are_allowed() {
    let text = "max_frame_delta_secs = 0.0\n[store]\ncooldown_secs = 0.0\n";
    let config = GameConfig::from_toml_str(Path::new("game.toml"), text).unwrap();
    assert_eq!(config.store.cooldown(), Duration::ZERO);
}

#[test]
fn load_validates_file_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "[speed]\nbase = inf\n").unwrap();
    let err = GameConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "speed.base", .. }));
}
