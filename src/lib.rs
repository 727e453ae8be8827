// Library surface for the binary, headless tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod controller;
pub mod error;
pub mod highscores;
pub mod levels;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod ui;

pub use controller::{SessionController, Transition};
pub use error::{CatalogError, PersistenceError};
pub use highscores::{FileHighScoreStore, HighScoreEntry, HighScoreStore, InMemoryHighScoreStore};
pub use levels::{Difficulty, LevelDefinition, MAX_LEVEL};
pub use session::{Phase, SessionState};
