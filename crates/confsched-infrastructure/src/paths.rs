//! Platform paths for confsched files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/confsched/          # Config directory
//! ├── config.toml               # Application configuration
//! └── preferences.toml          # Filters, onboarding and notification flags
//!
//! ~/.local/share/confsched/     # Data directory
//! └── conference_data.json      # Bootstrap catalog, if installed
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "confsched";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct ConfschedPaths;

impl ConfschedPaths {
    /// Returns the configuration directory (e.g., `~/.config/confsched/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g., `~/.local/share/confsched/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn preferences_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("preferences.toml"))
    }

    pub fn bootstrap_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("conference_data.json"))
    }
}

impl From<PathError> for confsched_core::ScheduleError {
    fn from(e: PathError) -> Self {
        confsched_core::ScheduleError::config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_app_dir() {
        // Resolution depends on the environment; only check the shape.
        if let Ok(file) = ConfschedPaths::preferences_file() {
            assert!(file.ends_with("confsched/preferences.toml"));
        }
        if let Ok(file) = ConfschedPaths::bootstrap_file() {
            assert!(file.ends_with("confsched/conference_data.json"));
        }
    }
}
