use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typing-master";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn high_scores_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("highscores.json"))
            .unwrap_or_else(|| PathBuf::from("typing_master_highscores.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("typing-master.log"))
            .unwrap_or_else(|| PathBuf::from("typing-master.log"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typing_master_config.json"))
    }
}
