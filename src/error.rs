use std::path::PathBuf;
use thiserror::Error;

/// Startup failures reported to the user before any file is touched.
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Set your DeepL API key in {}", .0.display())]
    MissingApiKey(PathBuf),

    #[error("Invalid folder: {}", .0.display())]
    InvalidFolder(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Could not parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OrganizerError>;
