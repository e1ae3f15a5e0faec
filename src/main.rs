mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dino_runner::config::GameConfig;
use dino_runner::entities::{Flow, InputEvent};
use dino_runner::score_store::ScoreStore;
use dino_runner::session::GameSession;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

// ── Key binding ───────────────────────────────────────────────────────────────

/// Translate a terminal key event into a game input, if it is bound.
///
/// Terminals without keyboard enhancement never report releases; the jump
/// arc does not depend on them, so nothing is lost.
fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    let jump_key = matches!(
        key.code,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W')
    );
    match key.kind {
        KeyEventKind::Release if jump_key => Some(InputEvent::JumpRelease),
        KeyEventKind::Release | KeyEventKind::Repeat => None,
        KeyEventKind::Press => match key.code {
            _ if jump_key => Some(InputEvent::JumpPress),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(InputEvent::ToggleDayNight),
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => {
                Some(InputEvent::PauseToggle)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Restart),
            _ => None,
        },
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Poll input, advance, then draw, once per frame. The clock is
/// read once per frame and the delta handed to the session.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                if let Some(input) = map_key(&key) {
                    if session.handle_input(input) == Flow::Quit {
                        return Ok(());
                    }
                }
            }
        }

        session.tick(frame_start.duration_since(last));
        last = frame_start;

        display::render(out, &session.snapshot(), session.history())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file beside the score file; stdout belongs to the game.
fn init_logging(score_path: &Path) -> anyhow::Result<()> {
    let log_path = score_path.with_file_name("dino_runner.log");
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::from_env().context("loading configuration")?;
    init_logging(&config.store.path)?;

    let store = ScoreStore::open(config.store.path.clone(), config.store.cooldown());
    info!(path = %store.path().display(), high_score = store.high_score(), "scores loaded");
    let mut session = GameSession::new(&config, store);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events are only available on kitty-protocol terminals.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the loop never waits on
    // the terminal.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut session, &rx);

    // The score write happens whether the loop ended by quitting or by an
    // I/O error.
    session.finish();

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}
