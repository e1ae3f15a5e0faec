/// All game entity types: pure data, no logic beyond per-kind tables.

use serde::{Deserialize, Serialize};

// ── World geometry ────────────────────────────────────────────────────────────

/// Logical playfield size in world pixels. y grows upwards.
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 500.0;

/// y of the ground line; every obstacle baseline sits here.
pub const GROUND_Y: f32 = 100.0;

/// Character's left edge and visual size.
pub const CHARACTER_X: f32 = 110.0;
pub const CHARACTER_WIDTH: f32 = 40.0;
pub const CHARACTER_HEIGHT: f32 = 60.0;

/// Flying obstacles are drawn this far above their baseline.
pub const FLYING_ELEVATION: f32 = 90.0;

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Small,
    Tall,
    Group,
    Flying,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Small,
        ObstacleKind::Tall,
        ObstacleKind::Group,
        ObstacleKind::Flying,
    ];

    pub fn width(self) -> f32 {
        match self {
            ObstacleKind::Small => 20.0,
            ObstacleKind::Tall => 25.0,
            ObstacleKind::Flying => 30.0,
            ObstacleKind::Group => 60.0,
        }
    }

    /// Inclusive height range in world pixels.
    pub fn height_range(self) -> (u32, u32) {
        match self {
            ObstacleKind::Small => (40, 60),
            ObstacleKind::Tall => (70, 90),
            ObstacleKind::Flying => (120, 160),
            ObstacleKind::Group => (50, 70),
        }
    }

    pub fn is_flying(self) -> bool {
        matches!(self, ObstacleKind::Flying)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Left edge.
    pub x: f32,
    /// Ground-relative baseline.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set once, when `x` first crosses the character's x.
    pub passed: bool,
    /// Sub-cacti drawn for a `Group`; 1 for every other kind.
    pub segments: u8,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical span that can hurt the character, as (bottom, top).
    pub fn vertical_band(&self) -> (f32, f32) {
        match self.kind {
            ObstacleKind::Flying => (self.y + FLYING_ELEVATION, self.y + self.height),
            _ => (self.y, self.y + self.height),
        }
    }
}

// ── Jump ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct JumpState {
    pub is_jumping: bool,
    /// Session-clock seconds at take-off.
    pub start_time: f64,
    /// Whether the jump button is currently held.
    pub pressed: bool,
    pub current_y: f32,
    pub progress: f32,
}

/// Result of advancing the jump by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpSample {
    pub y: f32,
    pub progress: f32,
    pub airborne: bool,
}

// ── Speed ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedState {
    /// Pixels per tick-equivalent.
    pub current_speed: f32,
    /// Seconds of play since the last reset.
    pub elapsed: f32,
    pub score: f32,
}

// ── Scores ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub date: String,
}

/// On-disk layout of the score file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredScores {
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub score_history: Vec<ScoreRecord>,
    #[serde(default)]
    pub last_played: String,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Discrete events produced by whatever binds the input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    JumpPress,
    JumpRelease,
    ToggleDayNight,
    PauseToggle,
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub character_x: f32,
    pub character_y: f32,
    pub character_width: f32,
    pub character_height: f32,
    pub character_airborne: bool,
    pub jump_progress: f32,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub high_score: u32,
    /// High score as it stood when this run began.
    pub previous_best: u32,
    pub obstacles_passed: u32,
    pub speed: f32,
    pub status: GameStatus,
    pub is_day: bool,
}
