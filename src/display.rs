/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of
/// the session. No game logic is performed; this module only maps world
/// pixels onto terminal cells and emits terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use dino_runner::entities::{
    GameStatus, Obstacle, ObstacleKind, RenderSnapshot, ScoreRecord, GROUND_Y, WORLD_HEIGHT,
    WORLD_WIDTH,
};

// ── Colour palette ────────────────────────────────────────────────────────────

struct Palette {
    border: Color,
    ground: Color,
    character: Color,
    cactus: Color,
    flying: Color,
    hud: Color,
}

const DAY: Palette = Palette {
    border: Color::DarkBlue,
    ground: Color::DarkYellow,
    character: Color::Blue,
    cactus: Color::DarkGreen,
    flying: Color::Green,
    hud: Color::Black,
};

const NIGHT: Palette = Palette {
    border: Color::DarkGrey,
    ground: Color::Grey,
    character: Color::Cyan,
    cactus: Color::Green,
    flying: Color::Magenta,
    hud: Color::Yellow,
};

const C_HINT: Color = Color::DarkGrey;

/// Cell mapping for the current terminal size.
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    /// Row the ground line is drawn on.
    fn ground_row(&self) -> u16 {
        self.height.saturating_sub(3)
    }

    fn col(&self, x: f32) -> i32 {
        let inner = self.width.saturating_sub(2) as f32;
        1 + (x / WORLD_WIDTH * inner).floor() as i32
    }

    fn cols(&self, width: f32) -> i32 {
        let inner = self.width.saturating_sub(2) as f32;
        ((width / WORLD_WIDTH * inner).round() as i32).max(1)
    }

    /// Row holding world height `y`; the ground baseline lands just above
    /// the ground line.
    fn row(&self, y: f32) -> i32 {
        let rows = self.ground_row().saturating_sub(3) as f32;
        let scaled = (y - GROUND_Y) / (WORLD_HEIGHT - GROUND_Y) * rows;
        self.ground_row() as i32 - 1 - scaled.floor() as i32
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        col >= 1 && col < self.width as i32 - 1 && row >= 2 && row < self.ground_row() as i32
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot,
    history: &[ScoreRecord],
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport { width, height };
    let palette = if snap.is_day { &DAY } else { &NIGHT };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view, palette)?;
    draw_hud(out, &view, snap, palette)?;

    for obstacle in &snap.obstacles {
        draw_obstacle(out, &view, obstacle, palette)?;
    }
    draw_character(out, &view, snap, palette)?;
    draw_controls_hint(out, &view)?;

    match snap.status {
        GameStatus::Paused => draw_paused(out, &view)?,
        GameStatus::GameOver => draw_game_over(out, &view, snap, history)?,
        GameStatus::Playing => {}
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & ground ───────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport, palette: &Palette) -> std::io::Result<()> {
    let w = view.width as usize;

    out.queue(style::SetForegroundColor(palette.border))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..view.ground_row() {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    out.queue(style::SetForegroundColor(palette.ground))?;
    out.queue(cursor::MoveTo(0, view.ground_row()))?;
    out.queue(Print("▀".repeat(w)))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &RenderSnapshot,
    palette: &Palette,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(palette.hud))?;
    out.queue(Print(format!(
        "Score:{:>6}  Hi:{:>6}  Passed:{:>4}",
        snap.score, snap.high_score, snap.obstacles_passed
    )))?;

    let speed = format!("Speed {:>4.1}", snap.speed);
    let col = view.width.saturating_sub(speed.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(Print(speed))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Fill the cells covering world box `(x, bottom)..(x + width, top)`.
fn fill_box<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f32,
    width: f32,
    bottom: f32,
    top: f32,
    glyph: &str,
) -> std::io::Result<()> {
    let c0 = view.col(x);
    let c1 = c0 + view.cols(width);
    let r_bottom = view.row(bottom);
    let r_top = view.row(top).min(r_bottom);
    for row in r_top..=r_bottom {
        for col in c0..c1 {
            if view.contains(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn draw_obstacle<W: Write>(
    out: &mut W,
    view: &Viewport,
    obstacle: &Obstacle,
    palette: &Palette,
) -> std::io::Result<()> {
    let (bottom, top) = obstacle.vertical_band();
    match obstacle.kind {
        ObstacleKind::Small | ObstacleKind::Tall => {
            out.queue(style::SetForegroundColor(palette.cactus))?;
            fill_box(out, view, obstacle.x, obstacle.width, bottom, top, "▓")
        }
        ObstacleKind::Group => {
            // Narrow stems with gaps, alternating heights.
            out.queue(style::SetForegroundColor(palette.cactus))?;
            let stem = obstacle.width / 4.0;
            for i in 0..obstacle.segments {
                let x = obstacle.x + f32::from(i) * stem * 1.5;
                let height = if i % 2 == 0 { obstacle.height * 0.85 } else { obstacle.height };
                fill_box(out, view, x, stem, bottom, bottom + height, "▓")?;
            }
            Ok(())
        }
        ObstacleKind::Flying => {
            out.queue(style::SetForegroundColor(palette.flying))?;
            fill_box(out, view, obstacle.x, obstacle.width, bottom, top, "◆")
        }
    }
}

fn draw_character<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &RenderSnapshot,
    palette: &Palette,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(palette.character))?;
    let glyph = if snap.character_airborne { "▒" } else { "█" };
    fill_box(
        out,
        view,
        snap.character_x,
        snap.character_width,
        snap.character_y,
        snap.character_y + snap.character_height,
        glyph,
    )
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE : Jump   D : Day/Night   P : Pause   R : Restart   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let row = view.height / 3;
    print_centered(out, view, row, "╔══════════════╗", Color::Yellow)?;
    print_centered(out, view, row + 1, "║    PAUSED    ║", Color::Yellow)?;
    print_centered(out, view, row + 2, "╚══════════════╝", Color::Yellow)?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &RenderSnapshot,
    history: &[ScoreRecord],
) -> std::io::Result<()> {
    let best = snap.high_score.max(snap.score);
    let new_best = snap.score > snap.previous_best;

    let mut row = (view.height / 4).max(2);
    print_centered(out, view, row, "╔════════════════════╗", Color::Red)?;
    print_centered(out, view, row + 1, "║    GAME  OVER      ║", Color::Red)?;
    print_centered(out, view, row + 2, "╚════════════════════╝", Color::Red)?;
    row += 3;

    print_centered(out, view, row, &format!("Final Score: {:>6}", snap.score), Color::Yellow)?;
    row += 1;
    let (best_line, best_color) = if new_best {
        (format!("★ NEW BEST: {:>6} ★", best), Color::Yellow)
    } else {
        (format!("Best Score:  {:>6}", best), Color::DarkGrey)
    };
    print_centered(out, view, row, &best_line, best_color)?;
    row += 2;

    for (i, record) in history.iter().take(5).enumerate() {
        let line = format!("{}. {:>6}  {}", i + 1, record.score, record.date);
        print_centered(out, view, row, &line, Color::Grey)?;
        row += 1;
    }

    print_centered(out, view, row + 1, "R - Play Again  Q - Quit", Color::White)?;
    Ok(())
}
