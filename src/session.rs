/// One game: the character's jump, the obstacle field, and the score
/// store, advanced together once per tick.
///
/// The session keeps its own clock, built from the deltas handed to
/// [`GameSession::tick`], so the loop samples the wall clock exactly once
/// per tick and pausing freezes every timer at once.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::entities::{
    Flow, GameStatus, InputEvent, RenderSnapshot, ScoreRecord, CHARACTER_HEIGHT, CHARACTER_WIDTH,
    CHARACTER_X, GROUND_Y,
};
use crate::jump::JumpPhysics;
use crate::obstacles::ObstacleField;
use crate::score_store::ScoreStore;

pub struct GameSession {
    jump: JumpPhysics,
    field: ObstacleField,
    store: ScoreStore,
    rng: StdRng,
    status: GameStatus,
    is_day: bool,
    clock: f64,
    max_frame_delta: Duration,
    previous_best: u32,
    finished: bool,
}

impl GameSession {
    pub fn new(config: &GameConfig, store: ScoreStore) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    pub fn with_rng(config: &GameConfig, store: ScoreStore, mut rng: StdRng) -> Self {
        let field = ObstacleField::new(&config.speed, &mut rng);
        let previous_best = store.high_score();
        Self {
            jump: JumpPhysics::new(GROUND_Y, config.jump.height, config.jump.duration_secs),
            field,
            store,
            rng,
            status: GameStatus::Playing,
            is_day: true,
            clock: 0.0,
            max_frame_delta: config.max_frame_delta(),
            previous_best,
            finished: false,
        }
    }

    /// Input dispatch. Only `Quit` asks the caller to stop.
    pub fn handle_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::JumpPress => {
                if self.status == GameStatus::Playing {
                    self.jump.press(self.clock);
                }
            }
            InputEvent::JumpRelease => self.jump.release(),
            InputEvent::ToggleDayNight => self.is_day = !self.is_day,
            InputEvent::PauseToggle => {
                self.status = match self.status {
                    GameStatus::Playing => GameStatus::Paused,
                    GameStatus::Paused => GameStatus::Playing,
                    GameStatus::GameOver => GameStatus::GameOver,
                };
            }
            InputEvent::Restart => self.reset(),
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Advance the simulation by `dt` (clamped to the configured maximum).
    /// Does nothing unless playing.
    pub fn tick(&mut self, dt: Duration) {
        if self.status != GameStatus::Playing {
            return;
        }
        let dt = dt.min(self.max_frame_delta);
        self.clock += dt.as_secs_f64();

        self.field.update(dt.as_secs_f32(), CHARACTER_X, &mut self.rng);
        let sample = self.jump.advance(self.clock);

        let hit = self
            .field
            .detect_collision(CHARACTER_X, sample.y, CHARACTER_WIDTH, CHARACTER_HEIGHT);
        let score = self.field.score();
        if hit {
            self.status = GameStatus::GameOver;
            info!(score, passed = self.field.passed_count(), "game over");
            if let Err(err) = self.store.save_score(score) {
                warn!(%err, "final score not persisted");
            }
        } else if let Err(err) = self.store.save_high_score(score, false) {
            warn!(%err, "high score not persisted");
        }
    }

    /// Start a new run in place. A run abandoned mid-play has its score
    /// flushed first, since the in-play saves are throttled.
    pub fn reset(&mut self) {
        if self.status != GameStatus::GameOver {
            let score = self.field.score();
            if let Err(err) = self.store.save_high_score(score, true) {
                warn!(%err, score, "abandoned run not persisted");
            }
        }
        self.previous_best = self.store.high_score();
        self.jump.reset();
        self.field.reset(&mut self.rng);
        self.status = GameStatus::Playing;
    }

    /// Forced write of the current state; runs at most once, and from
    /// `Drop` if the caller never did.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Err(err) = self.store.save_high_score(self.field.score(), true) {
            warn!(%err, "final flush failed");
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let jump = self.jump.state();
        RenderSnapshot {
            character_x: CHARACTER_X,
            character_y: jump.current_y,
            character_width: CHARACTER_WIDTH,
            character_height: CHARACTER_HEIGHT,
            character_airborne: jump.is_jumping,
            jump_progress: jump.progress,
            obstacles: self.field.obstacles().to_vec(),
            score: self.field.score(),
            high_score: self.store.high_score(),
            previous_best: self.previous_best,
            obstacles_passed: self.field.passed_count(),
            speed: self.field.speed(),
            status: self.status,
            is_day: self.is_day,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn score(&self) -> u32 {
        self.field.score()
    }

    pub fn high_score(&self) -> u32 {
        self.store.high_score()
    }

    pub fn history(&self) -> &[ScoreRecord] {
        self.store.history()
    }

    pub fn character_y(&self) -> f32 {
        self.jump.current_y()
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    /// Seconds of play on the session clock.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn jump(&self) -> &JumpPhysics {
        &self.jump
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ObstacleField {
        &mut self.field
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.finish();
    }
}
