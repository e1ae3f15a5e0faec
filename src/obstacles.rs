/// Obstacle lifecycle: seeding, scrolling, recycling, and collision.
///
/// All randomness comes through the `rng` argument so callers control
/// determinism (tests pass a seeded `StdRng`).

use rand::Rng;
use tracing::debug;

use crate::compute::{distance_for, spacing_range, spans_overlap, spawn_interval_range};
use crate::config::SpeedConfig;
use crate::entities::{Obstacle, ObstacleKind, GROUND_Y};
use crate::speed::GameSpeed;

/// Upper bound on live obstacles; a due spawn at the cap is skipped.
pub const MAX_OBSTACLES: usize = 8;

/// x of the first, always-small, seeded obstacle.
pub const FIRST_OBSTACLE_X: f32 = 800.0;
const FIRST_OBSTACLE_HEIGHT: f32 = 50.0;
/// x of the remaining seeded obstacles, far enough apart to react.
pub const SEEDED_XS: [f32; 3] = [1200.0, 1800.0, 2400.0];
/// Where a spawn lands when the field is empty: just off-screen.
pub const EMPTY_FIELD_SPAWN_X: f32 = 850.0;

/// Character hitbox trims relative to its visual bounds.
pub const HITBOX_INSET_X: f32 = 10.0;
pub const HITBOX_TRIM_Y: f32 = 10.0;
/// A flying obstacle only threatens a character whose feet are this far
/// above the ground.
pub const FLYING_HIT_MIN_HEIGHT: f32 = 60.0;

/// First spawn interval is drawn from the easiest range.
const INITIAL_INTERVAL: (f32, f32) = (2.5, 4.0);

#[derive(Clone, Debug)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    speed: GameSpeed,
    spawn_timer: f32,
    spawn_interval: f32,
    passed: u32,
    disappeared: u32,
}

impl ObstacleField {
    pub fn new(speed_config: &SpeedConfig, rng: &mut impl Rng) -> Self {
        let mut field = Self {
            obstacles: Vec::with_capacity(MAX_OBSTACLES),
            speed: GameSpeed::new(speed_config),
            spawn_timer: 0.0,
            spawn_interval: 0.0,
            passed: 0,
            disappeared: 0,
        };
        field.reset(rng);
        field
    }

    /// Empty the field, zero the counters, reseed, and reset the speed.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.obstacles.clear();
        self.passed = 0;
        self.disappeared = 0;
        self.spawn_timer = 0.0;
        self.spawn_interval = rng.gen_range(INITIAL_INTERVAL.0..=INITIAL_INTERVAL.1);
        self.speed.reset();
        self.seed(rng);
    }

    fn seed(&mut self, rng: &mut impl Rng) {
        self.obstacles.push(Obstacle {
            kind: ObstacleKind::Small,
            x: FIRST_OBSTACLE_X,
            y: GROUND_Y,
            width: ObstacleKind::Small.width(),
            height: FIRST_OBSTACLE_HEIGHT,
            passed: false,
            segments: 1,
        });
        for x in SEEDED_XS {
            let kind = random_kind(rng);
            self.obstacles.push(make_obstacle(kind, x, rng));
        }
    }

    /// Advance the field by `dt` seconds and return the speed used.
    ///
    /// Order: speed update, scroll, pass detection, pruning, spawn timer.
    pub fn update(&mut self, dt: f32, character_x: f32, rng: &mut impl Rng) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let speed = self.speed.update(dt);
        let shift = distance_for(speed, dt);

        let mut passed_flying = false;
        for obstacle in &mut self.obstacles {
            obstacle.x -= shift;
            if !obstacle.passed && obstacle.x < character_x {
                obstacle.passed = true;
                self.passed += 1;
                passed_flying |= obstacle.kind.is_flying();
            }
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right() >= 0.0);
        self.disappeared += (before - self.obstacles.len()) as u32;

        self.spawn_timer += dt;
        if self.spawn_timer > self.spawn_interval {
            self.spawn_timer = 0.0;
            let (lo, hi) = spawn_interval_range(self.speed.progress());
            self.spawn_interval = rng.gen_range(lo..=hi);
            if self.obstacles.len() < MAX_OBSTACLES {
                self.spawn(passed_flying, rng);
            }
        }

        speed
    }

    /// Append one random obstacle beyond the rightmost existing one.
    pub fn spawn(&mut self, passed_flying: bool, rng: &mut impl Rng) -> &Obstacle {
        let kind = random_kind(rng);
        let x = match self.rightmost() {
            Some(last) => {
                let after_flying = passed_flying || last.kind.is_flying();
                let (lo, hi) = spacing_range(self.speed.speed(), after_flying);
                last.x + rng.gen_range(lo..=hi)
            }
            None => EMPTY_FIELD_SPAWN_X,
        };
        let obstacle = make_obstacle(kind, x, rng);
        debug!(?kind, x, height = obstacle.height, "obstacle spawned");
        self.obstacles.push(obstacle);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Whether the character's hitbox touches any obstacle.
    ///
    /// The hitbox is the visual box inset by [`HITBOX_INSET_X`] on each
    /// side and trimmed by [`HITBOX_TRIM_Y`] at the top; `y` is the
    /// character's feet.
    pub fn detect_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let valid = x.is_finite() && y.is_finite() && width > 0.0 && height > 0.0;
        debug_assert!(valid, "collision probe out of range: ({x}, {y}, {width}, {height})");
        if !valid {
            return false;
        }

        let hit_x = x + HITBOX_INSET_X;
        let hit_w = (width - 2.0 * HITBOX_INSET_X).max(0.0);
        let hit_h = (height - HITBOX_TRIM_Y).max(0.0);

        self.obstacles
            .iter()
            .filter(|o| spans_overlap(hit_x, hit_w, o.x, o.width))
            .any(|o| {
                let (bottom, top) = o.vertical_band();
                let vertical = spans_overlap(y, hit_h, bottom, top - bottom);
                match o.kind {
                    ObstacleKind::Flying => y > GROUND_Y + FLYING_HIT_MIN_HEIGHT && vertical,
                    _ => vertical,
                }
            })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn rightmost(&self) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .max_by(|a, b| a.x.total_cmp(&b.x))
    }

    pub fn speed(&self) -> f32 {
        self.speed.speed()
    }

    pub fn score(&self) -> u32 {
        self.speed.score()
    }

    pub fn passed_count(&self) -> u32 {
        self.passed
    }

    pub fn disappeared_count(&self) -> u32 {
        self.disappeared
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    /// Replace the live obstacles, e.g. to stage a scenario.
    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }
}

pub fn random_kind(rng: &mut impl Rng) -> ObstacleKind {
    ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())]
}

/// Build an obstacle of `kind` at `x`, drawing its height (and group
/// segment count) once.
pub fn make_obstacle(kind: ObstacleKind, x: f32, rng: &mut impl Rng) -> Obstacle {
    let (lo, hi) = kind.height_range();
    let segments = match kind {
        ObstacleKind::Group => rng.gen_range(2..=3),
        _ => 1,
    };
    Obstacle {
        kind,
        x,
        y: GROUND_Y,
        width: kind.width(),
        height: rng.gen_range(lo..=hi) as f32,
        passed: false,
        segments,
    }
}
