use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Destination exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Could not create archive {path}: {reason}")]
    ArchiveCreateFailed { path: PathBuf, reason: String },

    #[error("Could not extract archive {path}: {reason}")]
    ArchiveExtractFailed { path: PathBuf, reason: String },

    #[error("Could not delete {path}: {reason}")]
    DeleteFailed { path: PathBuf, reason: String },
}

impl ArchiveExtractError {
    /// io::Error를 경로 정보가 있는 에러로 변환
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => ArchiveExtractError::PathNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ArchiveExtractError::PermissionDenied {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::AlreadyExists => ArchiveExtractError::DestinationExists {
                path: path.to_path_buf(),
            },
            _ => ArchiveExtractError::Io(error),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveExtractError>;
