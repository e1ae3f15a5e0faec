/// Fixed-arc jump: press starts a parabola of fixed height and duration
/// that always runs to completion.

use tracing::debug;

use crate::compute::jump_height;
use crate::entities::{JumpSample, JumpState};

#[derive(Clone, Debug)]
pub struct JumpPhysics {
    state: JumpState,
    base_y: f32,
    max_height: f32,
    duration: f64,
}

impl JumpPhysics {
    pub fn new(base_y: f32, max_height: f32, duration_secs: f32) -> Self {
        debug_assert!(duration_secs > 0.0, "jump duration must be positive");
        Self {
            state: JumpState {
                is_jumping: false,
                start_time: 0.0,
                pressed: false,
                current_y: base_y,
                progress: 0.0,
            },
            base_y,
            max_height,
            duration: f64::from(duration_secs.max(f32::EPSILON)),
        }
    }

    /// Take off at session time `now`. Rejected (returns `false`, nothing
    /// changes) while already airborne.
    pub fn press(&mut self, now: f64) -> bool {
        if self.state.is_jumping {
            return false;
        }
        self.state.is_jumping = true;
        self.state.start_time = now;
        self.state.pressed = true;
        debug!(now, "jump started");
        true
    }

    /// Button bookkeeping only; the arc is not cut short.
    pub fn release(&mut self) {
        self.state.pressed = false;
    }

    pub fn advance(&mut self, now: f64) -> JumpSample {
        if !self.state.is_jumping {
            return self.grounded();
        }

        let progress = ((now - self.state.start_time) / self.duration).clamp(0.0, 1.0) as f32;
        if progress >= 1.0 {
            self.land();
            return self.grounded();
        }

        self.state.current_y = self.base_y + jump_height(self.max_height, progress);
        self.state.progress = progress;
        JumpSample {
            y: self.state.current_y,
            progress,
            airborne: true,
        }
    }

    pub fn reset(&mut self) {
        self.land();
        self.state.pressed = false;
        self.state.start_time = 0.0;
    }

    pub fn state(&self) -> &JumpState {
        &self.state
    }

    pub fn is_airborne(&self) -> bool {
        self.state.is_jumping
    }

    pub fn current_y(&self) -> f32 {
        self.state.current_y
    }

    fn land(&mut self) {
        self.state.is_jumping = false;
        self.state.current_y = self.base_y;
        self.state.progress = 0.0;
    }

    fn grounded(&self) -> JumpSample {
        JumpSample {
            y: self.base_y,
            progress: 0.0,
            airborne: false,
        }
    }
}
