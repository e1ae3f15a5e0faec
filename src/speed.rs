use crate::compute::{ramp_fraction, speed_at};
use crate::config::SpeedConfig;
use crate::entities::SpeedState;

/// Scroll speed and score as functions of play time since the last reset.
#[derive(Clone, Debug)]
pub struct GameSpeed {
    state: SpeedState,
    base: f32,
    max: f32,
    ramp_secs: f32,
    score_rate: f32,
}

impl GameSpeed {
    pub fn new(config: &SpeedConfig) -> Self {
        let base = config.base;
        Self {
            state: SpeedState {
                current_speed: base,
                elapsed: 0.0,
                score: 0.0,
            },
            base,
            max: config.max.max(base),
            ramp_secs: config.ramp_secs,
            score_rate: config.score_rate,
        }
    }

    /// Advance by `dt` seconds and return the new speed. Score grows with
    /// `speed · score_rate · dt`, so it does not depend on frame rate.
    pub fn update(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.state.elapsed += dt;
        self.state.current_speed = speed_at(self.base, self.max, self.ramp_secs, self.state.elapsed);
        self.state.score += self.state.current_speed * self.score_rate * dt;
        self.state.current_speed
    }

    pub fn reset(&mut self) {
        self.state.current_speed = self.base;
        self.state.elapsed = 0.0;
        self.state.score = 0.0;
    }

    pub fn speed(&self) -> f32 {
        self.state.current_speed
    }

    /// Speed at an arbitrary elapsed time, without touching state.
    pub fn speed_at(&self, elapsed: f32) -> f32 {
        speed_at(self.base, self.max, self.ramp_secs, elapsed)
    }

    pub fn score(&self) -> u32 {
        self.state.score as u32
    }

    pub fn elapsed(&self) -> f32 {
        self.state.elapsed
    }

    /// 0 at base speed, 1 once the ramp has completed.
    pub fn progress(&self) -> f32 {
        ramp_fraction(self.state.elapsed, self.ramp_secs)
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn ramp_secs(&self) -> f32 {
        self.ramp_secs
    }

    pub fn state(&self) -> &SpeedState {
        &self.state
    }
}
