/// Pure game-logic functions.
///
/// Nothing here owns state or touches I/O: each function maps numbers to
/// numbers so the stateful components (jump, speed, obstacle field) share
/// one definition of the curves and ranges they are tuned by.

/// Motion is expressed in pixels per tick-equivalent; one tick-equivalent
/// is 1/60 s.
pub const REFERENCE_TICK_RATE: f32 = 60.0;

// ── Spawn tuning tables ──────────────────────────────────────────────────────

const INTERVAL_MIN_START: f32 = 2.5;
const INTERVAL_MIN_DROP: f32 = 1.5;
const INTERVAL_MAX_START: f32 = 4.0;
const INTERVAL_MAX_DROP: f32 = 2.5;

pub const SPACING_MIN: f32 = 400.0;
pub const SPACING_MAX: f32 = 650.0;
pub const FLYING_SPACING_BONUS: f32 = 150.0;
const SPACING_MIN_CAP: f32 = 900.0;
const SPACING_MAX_CAP: f32 = 1200.0;

// ── Curves ───────────────────────────────────────────────────────────────────

/// Scroll speed after `elapsed` seconds: a linear ramp from `base` to `max`
/// reached at `ramp_secs`, flat afterwards.
pub fn speed_at(base: f32, max: f32, ramp_secs: f32, elapsed: f32) -> f32 {
    base + (max - base) * ramp_fraction(elapsed, ramp_secs)
}

/// `min(elapsed / ramp_secs, 1)`, with a zero-length ramp counting as done.
pub fn ramp_fraction(elapsed: f32, ramp_secs: f32) -> f32 {
    if ramp_secs <= 0.0 {
        return 1.0;
    }
    (elapsed.max(0.0) / ramp_secs).min(1.0)
}

/// Jump height for normalized progress `p`: `4·H·p·(1−p)`, zero at both
/// ends and `H` at the midpoint. `p` is clamped to [0, 1].
pub fn jump_height(max_height: f32, progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    4.0 * max_height * p * (1.0 - p)
}

/// Pixels travelled during `dt` seconds at `speed` px per tick-equivalent.
pub fn distance_for(speed: f32, dt: f32) -> f32 {
    speed * dt * REFERENCE_TICK_RATE
}

// ── Spawn ranges ─────────────────────────────────────────────────────────────

/// Range (seconds) the next spawn interval is drawn from. Narrows as
/// `difficulty` (0 = base speed, 1 = max speed) rises.
pub fn spawn_interval_range(difficulty: f32) -> (f32, f32) {
    let f = difficulty.clamp(0.0, 1.0);
    (
        INTERVAL_MIN_START - f * INTERVAL_MIN_DROP,
        INTERVAL_MAX_START - f * INTERVAL_MAX_DROP,
    )
}

/// Range for the gap between the rightmost obstacle and a newly spawned
/// one. Wider at higher speed, wider still after a flying obstacle.
pub fn spacing_range(speed: f32, after_flying: bool) -> (f32, f32) {
    let mut min = SPACING_MIN;
    let mut max = SPACING_MAX;
    if after_flying {
        min += FLYING_SPACING_BONUS;
        max += FLYING_SPACING_BONUS;
    }
    let speed_adjustment = speed.abs() * REFERENCE_TICK_RATE;
    min = (min + speed_adjustment).clamp(SPACING_MIN, SPACING_MIN_CAP);
    max = (max + speed_adjustment).clamp(SPACING_MAX, SPACING_MAX_CAP);
    (min, max.max(min))
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Open-interval overlap of `[a, a + a_len)` and `[b, b + b_len)`.
pub fn spans_overlap(a: f32, a_len: f32, b: f32, b_len: f32) -> bool {
    a < b + b_len && a + a_len > b
}
