use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors (command line layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] timewics_service::error::ServiceError),

    #[error("Failed to read calendar {path}: {source}")]
    ReadCalendar {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Calendar path has no file name: {0}")]
    InvalidCalendarPath(PathBuf),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
