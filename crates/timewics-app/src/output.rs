//! Output file naming and writing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Builds `<directory>/<calendar file name>-<YYYYMMDD>-00.data`.
///
/// ## Errors
/// Returns `AppError::InvalidCalendarPath` when `calendar` has no file name.
pub fn output_path(directory: &Path, calendar: &Path, date: NaiveDate) -> AppResult<PathBuf> {
    let file_name = calendar
        .file_name()
        .ok_or_else(|| AppError::InvalidCalendarPath(calendar.to_path_buf()))?;

    let mut name = file_name.to_os_string();
    name.push(format!("-{}-00.data", date.format("%Y%m%d")));
    Ok(directory.join(name))
}

/// ## Summary
/// Writes rendered entries to `path`, replacing any previous content.
///
/// ## Errors
/// Returns `AppError::WriteOutput` if the file cannot be written.
pub fn write_entries(path: &Path, contents: &str) -> AppResult<()> {
    fs::write(path, contents).map_err(|source| AppError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote output file");
    Ok(())
}
