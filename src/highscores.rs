use std::cell::{Cell, RefCell};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::PersistenceError;
use crate::levels::Difficulty;
use crate::session::SessionState;

pub const MAX_HIGH_SCORES: usize = 10;
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub difficulty: Difficulty,
    pub score: i64,
    pub stars: u32,
    pub date: String,
}

impl HighScoreEntry {
    /// Entry stamped with the current local time
    pub fn new(name: impl Into<String>, difficulty: Difficulty, score: i64, stars: u32) -> Self {
        Self {
            name: name.into(),
            difficulty,
            score,
            stars,
            date: Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    pub fn from_session(state: &SessionState) -> Self {
        Self::new(
            state.player_name.clone(),
            state.difficulty,
            state.total_score,
            state.stars_earned,
        )
    }
}

/// Sort by score descending and keep the top ten. Ties keep their existing
/// order, so an older score stays ahead of a newer one with the same points.
pub fn rank(entries: Vec<HighScoreEntry>) -> Vec<HighScoreEntry> {
    entries
        .into_iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .take(MAX_HIGH_SCORES)
        .collect()
}

pub fn insert_ranked(mut entries: Vec<HighScoreEntry>, entry: HighScoreEntry) -> Vec<HighScoreEntry> {
    entries.push(entry);
    rank(entries)
}

/// The leaderboard backing store
pub trait HighScoreStore {
    /// Top scores, best first. Never fails: an unreadable store is empty.
    fn load_top_scores(&self) -> Vec<HighScoreEntry>;
    /// Insert `entry`, keep the top ten, and return the new leaderboard
    fn submit_score(&self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, PersistenceError>;
}

/// Leaderboard kept as a pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::high_scores_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write(&self, entries: &[HighScoreEntry]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load_top_scores(&self) -> Vec<HighScoreEntry> {
        match self.read() {
            Ok(entries) => rank(entries),
            Err(PersistenceError::Io(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable high score file");
                Vec::new()
            }
        }
    }

    fn submit_score(&self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        let ranked = insert_ranked(self.load_top_scores(), entry);
        self.write(&ranked)?;
        Ok(ranked)
    }
}

/// Leaderboard that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryHighScoreStore {
    entries: RefCell<Vec<HighScoreEntry>>,
    submissions: Cell<usize>,
}

impl InMemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self {
            entries: RefCell::new(rank(entries)),
            submissions: Cell::new(0),
        }
    }

    /// How many times `submit_score` has been called
    pub fn submissions(&self) -> usize {
        self.submissions.get()
    }
}

impl HighScoreStore for InMemoryHighScoreStore {
    fn load_top_scores(&self) -> Vec<HighScoreEntry> {
        self.entries.borrow().clone()
    }

    fn submit_score(&self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        self.submissions.set(self.submissions.get() + 1);
        let ranked = insert_ranked(self.entries.take(), entry);
        self.entries.replace(ranked.clone());
        Ok(ranked)
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &S {
    fn load_top_scores(&self) -> Vec<HighScoreEntry> {
        (**self).load_top_scores()
    }

    fn submit_score(&self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        (**self).submit_score(entry)
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load_top_scores(&self) -> Vec<HighScoreEntry> {
        (**self).load_top_scores()
    }

    fn submit_score(&self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        (**self).submit_score(entry)
    }
}
