use std::path::PathBuf;
use std::time::Duration;

use dino_runner::config::GameConfig;
use dino_runner::entities::*;
use dino_runner::score_store::{ScoreStore, DEFAULT_COOLDOWN};
use dino_runner::session::GameSession;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

const FRAME: Duration = Duration::from_nanos(16_666_667);

/// The directory comes first so it outlives the session's final flush.
fn session() -> (TempDir, GameSession) {
    let dir = TempDir::new().unwrap();
    let store = ScoreStore::open(score_path(&dir), DEFAULT_COOLDOWN);
    let session = GameSession::with_rng(&GameConfig::default(), store, StdRng::seed_from_u64(7));
    (dir, session)
}

fn score_path(dir: &TempDir) -> PathBuf {
    dir.path().join("high_score.json")
}

fn run(session: &mut GameSession, frames: usize, dt: Duration) {
    for _ in 0..frames {
        session.tick(dt);
    }
}

fn small_at(x: f32) -> Obstacle {
    Obstacle {
        kind: ObstacleKind::Small,
        x,
        y: GROUND_Y,
        width: ObstacleKind::Small.width(),
        height: 50.0,
        passed: false,
        segments: 1,
    }
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn starts_playing_on_the_ground() {
    let (_dir, session) = session();
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.score(), 0);
    assert_eq!(session.character_y(), GROUND_Y);
    assert_eq!(session.clock(), 0.0);
    assert!(session.is_day());
}

#[test]
fn snapshot_reflects_session() {
    let (_dir, session) = session();
    let snap = session.snapshot();
    assert_eq!(snap.character_x, CHARACTER_X);
    assert_eq!(snap.character_y, GROUND_Y);
    assert_eq!(snap.character_width, CHARACTER_WIDTH);
    assert_eq!(snap.character_height, CHARACTER_HEIGHT);
    assert!(!snap.character_airborne);
    assert_eq!(snap.obstacles.len(), 4);
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.high_score, session.high_score());
    assert_eq!(snap.speed, 2.0);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn jump_press_lifts_character() {
    let (_dir, mut session) = session();
    assert_eq!(session.handle_input(InputEvent::JumpPress), Flow::Continue);
    session.tick(Duration::from_millis(100));
    assert!(session.jump().is_airborne());
    assert!(session.character_y() > GROUND_Y);
    assert!(session.snapshot().character_airborne);
}

#[test]
fn quit_asks_caller_to_stop() {
    let (_dir, mut session) = session();
    assert_eq!(session.handle_input(InputEvent::Quit), Flow::Quit);
    assert_eq!(session.handle_input(InputEvent::JumpRelease), Flow::Continue);
}

#[test]
fn toggle_day_night() {
    let (_dir, mut session) = session();
    session.handle_input(InputEvent::ToggleDayNight);
    assert!(!session.is_day());
    session.handle_input(InputEvent::ToggleDayNight);
    assert!(session.is_day());
}

#[test]
fn pause_freezes_clock_and_score() {
    let (_dir, mut session) = session();
    run(&mut session, 60, FRAME);
    session.handle_input(InputEvent::PauseToggle);
    assert_eq!(session.status(), GameStatus::Paused);

    let (clock, score, xs) = (
        session.clock(),
        session.score(),
        session.field().obstacles()[0].x,
    );
    run(&mut session, 120, FRAME);
    assert_eq!(session.clock(), clock);
    assert_eq!(session.score(), score);
    assert_eq!(session.field().obstacles()[0].x, xs);

    session.handle_input(InputEvent::PauseToggle);
    session.tick(FRAME);
    assert!(session.clock() > clock);
}

#[test]
fn jump_ignored_while_paused() {
    let (_dir, mut session) = session();
    session.handle_input(InputEvent::PauseToggle);
    session.handle_input(InputEvent::JumpPress);
    assert!(!session.jump().is_airborne());
}

// ── Timing ────────────────────────────────────────────────────────────────────

#[test]
fn long_frame_is_clamped() {
    let (_dir, mut session) = session();
    session.tick(Duration::from_secs(5));
    assert!((session.clock() - 0.1).abs() < 1e-6);
}

#[test]
fn score_is_frame_rate_independent() {
    let (_a, mut fast) = session();
    let (_b, mut slow) = session();
    fast.field_mut().set_obstacles(Vec::new());
    slow.field_mut().set_obstacles(Vec::new());

    run(&mut fast, 120, FRAME);
    run(&mut slow, 40, Duration::from_millis(50));

    assert!(!fast.is_game_over() && !slow.is_game_over());
    assert!(fast.score() > 10);
    assert!(fast.score().abs_diff(slow.score()) <= 1);
}

// ── Game over & restart ───────────────────────────────────────────────────────

#[test]
fn collision_ends_the_run_and_records_score() {
    let (_dir, mut session) = session();
    session.field_mut().set_obstacles(vec![small_at(CHARACTER_X + 15.0)]);
    session.tick(FRAME);

    assert!(session.is_game_over());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.store().write_count(), 1);

    // Frozen after the hit.
    let clock = session.clock();
    run(&mut session, 30, FRAME);
    assert_eq!(session.clock(), clock);
}

#[test]
fn game_over_ignores_jump_and_pause() {
    let (_dir, mut session) = session();
    session.field_mut().set_obstacles(vec![small_at(CHARACTER_X + 15.0)]);
    session.tick(FRAME);

    session.handle_input(InputEvent::JumpPress);
    assert!(!session.jump().is_airborne());
    session.handle_input(InputEvent::PauseToggle);
    assert_eq!(session.status(), GameStatus::GameOver);
}

#[test]
fn restart_begins_a_new_run() {
    let (_dir, mut session) = session();
    run(&mut session, 60, FRAME);
    session.field_mut().set_obstacles(vec![small_at(CHARACTER_X + 15.0)]);
    session.tick(FRAME);
    assert!(session.is_game_over());

    session.handle_input(InputEvent::Restart);
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.score(), 0);
    assert_eq!(session.field().speed(), 2.0);
    assert_eq!(session.field().obstacles().len(), 4);
    assert_eq!(session.character_y(), GROUND_Y);
    // History survives the restart.
    assert_eq!(session.history().len(), 1);
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[test]
fn drop_flushes_current_score() {
    let (dir, mut session) = session();
    session.field_mut().set_obstacles(Vec::new());
    run(&mut session, 180, FRAME);
    assert!(!session.is_game_over());
    let score = session.score();
    assert!(score > 10);

    drop(session);
    let reopened = ScoreStore::open(score_path(&dir), DEFAULT_COOLDOWN);
    assert_eq!(reopened.high_score(), score);
}

#[test]
fn restart_mid_run_keeps_new_best() {
    let (dir, mut session) = session();
    session.field_mut().set_obstacles(Vec::new());
    run(&mut session, 110, FRAME);
    assert!(!session.is_game_over());
    let reached = session.score();
    assert!(reached > 5);

    session.handle_input(InputEvent::Restart);
    assert_eq!(session.high_score(), reached);
    assert_eq!(session.score(), 0);

    drop(session);
    let reopened = ScoreStore::open(score_path(&dir), DEFAULT_COOLDOWN);
    assert_eq!(reopened.high_score(), reached);
}

#[test]
fn previous_best_is_fixed_per_run() {
    let dir = TempDir::new().unwrap();
    let mut store = ScoreStore::open(score_path(&dir), DEFAULT_COOLDOWN);
    store.save_score(40).unwrap();
    let mut session =
        GameSession::with_rng(&GameConfig::default(), store, StdRng::seed_from_u64(7));
    assert_eq!(session.snapshot().previous_best, 40);

    session.field_mut().set_obstacles(vec![small_at(CHARACTER_X + 15.0)]);
    session.tick(FRAME);
    assert!(session.is_game_over());
    let snap = session.snapshot();
    assert_eq!(snap.previous_best, 40);
    assert!(snap.score <= snap.previous_best);
    drop(session);
}

#[test]
fn finish_runs_once() {
    let (_dir, mut session) = session();
    session.finish();
    let writes = session.store().write_count();
    assert_eq!(writes, 1);
    session.finish();
    assert_eq!(session.store().write_count(), writes);
}

#[test]
fn high_score_tracked_while_playing() {
    let (_dir, mut session) = session();
    session.field_mut().set_obstacles(Vec::new());
    run(&mut session, 60, FRAME);
    assert!(session.high_score() > 0);
    assert!(session.high_score() <= session.score());
    assert!(session.store().write_count() >= 1);
}
