/// High-score persistence.
///
/// The score file is pretty-printed JSON (see [`StoredScores`]). Every
/// successful write is followed by a best-effort byte copy to
/// `<file>.bak`, which [`ScoreStore::open`] falls back to when the primary
/// file no longer parses.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::entities::{ScoreRecord, StoredScores};
use crate::error::StoreError;

pub const HISTORY_LIMIT: usize = 10;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct ScoreStore {
    path: PathBuf,
    backup_path: PathBuf,
    cooldown: Duration,
    high_score: u32,
    history: Vec<ScoreRecord>,
    last_attempt: Option<Instant>,
    writes: u64,
}

impl ScoreStore {
    /// Open the store at `path`. Never fails: an absent or empty file is a
    /// fresh start, a corrupt one is restored from the backup when that
    /// parses, and otherwise replaced by a fresh zero state.
    pub fn open(path: impl Into<PathBuf>, cooldown: Duration) -> Self {
        let path = path.into();
        let mut store = Self {
            backup_path: backup_path_for(&path),
            path,
            cooldown,
            high_score: 0,
            history: Vec::new(),
            last_attempt: None,
            writes: 0,
        };

        match store.load() {
            Ok(scores) => store.apply(scores),
            Err(err) => {
                warn!(%err, "score file unreadable; trying backup");
                match store.restore_from_backup() {
                    Ok(true) => info!(path = %store.path.display(), "scores restored from backup"),
                    Ok(false) => store.recreate(),
                    Err(backup_err) => {
                        warn!(err = %backup_err, "backup unusable");
                        store.recreate();
                    }
                }
            }
        }
        store
    }

    /// Read and parse the primary file without touching in-memory state.
    /// An absent or whitespace-only file reads as the default state.
    pub fn load(&self) -> Result<StoredScores, StoreError> {
        match read_scores(&self.path)? {
            Some(scores) => Ok(scores),
            None => Ok(StoredScores::default()),
        }
    }

    /// Persist `candidate` if it beats the stored high score, or
    /// unconditionally when `force` is set. Non-forced calls inside the
    /// cooldown since the last write, or the last failed attempt here, are
    /// dropped. Returns whether the file was written.
    pub fn save_high_score(&mut self, candidate: u32, force: bool) -> Result<bool, StoreError> {
        if !force && self.cooling_down() {
            return Ok(false);
        }
        if candidate > self.high_score {
            info!(old = self.high_score, new = candidate, "new high score");
            self.high_score = candidate;
        } else if !force {
            return Ok(false);
        }
        // A failing disk is retried once per cooldown, not every tick.
        self.last_attempt = Some(Instant::now());
        self.write()?;
        Ok(true)
    }

    /// Record a finished run, high score or not. The in-memory history and
    /// high score are updated even if the write then fails.
    pub fn save_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.history.push(ScoreRecord {
            score,
            date: timestamp_now(),
        });
        normalize_history(&mut self.history);
        if score > self.high_score {
            self.high_score = score;
        }
        self.write()
    }

    /// Copy a parseable backup over the primary file and reload from it.
    /// `Ok(false)` when there is no usable backup.
    pub fn restore_from_backup(&mut self) -> Result<bool, StoreError> {
        let content = match fs::read_to_string(&self.backup_path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.backup_path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(false);
        }
        let scores: StoredScores =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.backup_path.clone(),
                source,
            })?;

        ensure_parent(&self.path)?;
        fs::write(&self.path, &content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.apply(scores);
        Ok(true)
    }

    /// Wipe the high score and history and persist the empty state.
    pub fn reset_scores(&mut self) -> Result<(), StoreError> {
        self.high_score = 0;
        self.history.clear();
        self.write()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn history(&self) -> &[ScoreRecord] {
        &self.history
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Successful writes of the primary file since opening.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn cooling_down(&self) -> bool {
        self.last_attempt
            .map(|at| at.elapsed() < self.cooldown)
            .unwrap_or(false)
    }

    fn apply(&mut self, scores: StoredScores) {
        self.high_score = scores.high_score;
        self.history = scores.score_history;
        normalize_history(&mut self.history);
    }

    fn recreate(&mut self) {
        self.high_score = 0;
        self.history.clear();
        if let Err(err) = self.write() {
            warn!(%err, "could not recreate score file");
        }
    }

    fn write(&mut self) -> Result<(), StoreError> {
        let data = StoredScores {
            high_score: self.high_score,
            score_history: self.history.clone(),
            last_played: timestamp_now(),
        };
        let json = serde_json::to_string_pretty(&data)?;

        ensure_parent(&self.path)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.writes += 1;
        self.last_attempt = Some(Instant::now());
        debug!(path = %self.path.display(), high_score = self.high_score, "scores written");

        self.create_backup();
        Ok(())
    }

    /// Best effort: failures are logged, never returned.
    fn create_backup(&self) {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {
                if let Err(err) = fs::copy(&self.path, &self.backup_path) {
                    warn!(%err, path = %self.backup_path.display(), "backup failed");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(%err, "backup skipped"),
        }
    }
}

/// `<file>.bak` next to the score file.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn read_scores(path: &Path) -> Result<Option<StoredScores>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Highest first, ties in insertion order, at most [`HISTORY_LIMIT`].
fn normalize_history(history: &mut Vec<ScoreRecord>) {
    history.sort_by(|a, b| b.score.cmp(&a.score));
    history.truncate(HISTORY_LIMIT);
}

fn timestamp_now() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_utc(secs)
}

/// `YYYY-MM-DD HH:MM:SS` for a Unix timestamp, in UTC.
pub fn format_utc(unix_secs: u64) -> String {
    let days = (unix_secs / 86_400) as i64;
    let rem = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
