use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{NoteError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where note documents are stored
    pub notes_dir: PathBuf,

    /// File extension of note documents, without the leading dot
    pub file_ext: String,
}

impl Default for Config {
    fn default() -> Self {
        let notes_dir = ProjectDirs::from("", "", "svgnotes")
            .map(|dirs| dirs.data_dir().join("notes"))
            .unwrap_or_else(|| PathBuf::from("notes"));

        Config {
            notes_dir,
            file_ext: "svg".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the given file, or from the platform default
    /// location when none is given. Falls back to defaults when no config
    /// file exists; an explicitly named file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(NoteError::ConfigError {
                    message: format!("Config file not found: {}", config_path.display()),
                });
            }
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&config_path)?;
        serde_json::from_str(&raw).map_err(|e| NoteError::ConfigError {
            message: format!("Failed to parse {}: {}", config_path.display(), e),
        })
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "svgnotes").map(|dirs| dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/config.json"))).unwrap_err();
        assert!(matches!(err, NoteError::ConfigError { .. }));
    }

    #[test]
    fn config_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let config = Config {
            notes_dir: PathBuf::from("/tmp/notes"),
            file_ext: "svg".to_string(),
        };
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.notes_dir, config.notes_dir);
        assert_eq!(loaded.file_ext, config.file_ext);
    }
}
