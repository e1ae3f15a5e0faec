/// Tuning values and the score-file location.
///
/// Everything has a default; a TOML file named by `DINO_RUNNER_CONFIG`
/// may override any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const CONFIG_ENV_VAR: &str = "DINO_RUNNER_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Longest delta a single tick may consume; a stalled frame must not
    /// teleport obstacles through the character.
    pub max_frame_delta_secs: f32,
    pub jump: JumpConfig,
    pub speed: SpeedConfig,
    pub store: StoreConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub height: f32,
    pub duration_secs: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Pixels per tick-equivalent at the start of a run.
    pub base: f32,
    pub max: f32,
    pub ramp_secs: f32,
    /// Score gained per second per unit of speed.
    pub score_rate: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub cooldown_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_secs: 0.1,
            jump: JumpConfig::default(),
            speed: SpeedConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            height: 150.0,
            duration_secs: 0.7,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base: 2.0,
            max: 10.0,
            ramp_secs: 60.0,
            score_rate: 3.0,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_score_path(),
            cooldown_secs: 2.0,
        }
    }
}

impl StoreConfig {
    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown_secs)
    }
}

impl GameConfig {
    pub fn max_frame_delta(&self) -> Duration {
        seconds(self.max_frame_delta_secs)
    }

    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// TOML happily parses `inf` and `nan`; none of those may reach the
    /// simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("jump.height", self.jump.height),
            ("jump.duration_secs", self.jump.duration_secs),
            ("speed.base", self.speed.base),
            ("speed.max", self.speed.max),
            ("speed.ramp_secs", self.speed.ramp_secs),
        ];
        let non_negative = [
            ("max_frame_delta_secs", self.max_frame_delta_secs),
            ("speed.score_rate", self.speed.score_rate),
            ("store.cooldown_secs", self.store.cooldown_secs),
        ];

        let bad_positive = positive
            .into_iter()
            .find(|&(_, v)| !(v.is_finite() && v > 0.0));
        let bad_non_negative = non_negative
            .into_iter()
            .find(|&(_, v)| !(v.is_finite() && v >= 0.0));
        match bad_positive.or(bad_non_negative) {
            Some((field, value)) => Err(ConfigError::Invalid { field, value }),
            None => Ok(()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &text)
    }

    /// Load from the file named by `DINO_RUNNER_CONFIG`, or defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

fn default_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".dino_runner").join("high_score.json")
}
