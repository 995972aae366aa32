//! One conversion: read the calendar, export it, write the `.data` file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use timewics_core::config::Settings;
use timewics_service::calendar::Calendar;
use timewics_service::export::{ExportReport, export};

use crate::cli::Args;
use crate::error::{AppError, AppResult};
use crate::output::{output_path, write_entries};

/// What a conversion produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub path: PathBuf,
    pub report: ExportReport,
}

/// ## Summary
/// Converts `args.calendar` and writes the entries into the configured
/// output directory, naming the file after `today`.
///
/// The command line directory wins over `output.directory`.
///
/// ## Errors
/// Returns an error if the calendar cannot be read or parsed, or the output
/// file cannot be written.
#[tracing::instrument(skip_all, fields(calendar = %args.calendar.display()))]
pub fn run(args: &Args, settings: &Settings, today: NaiveDate) -> AppResult<RunOutcome> {
    let text = fs::read_to_string(&args.calendar).map_err(|source| AppError::ReadCalendar {
        path: args.calendar.clone(),
        source,
    })?;

    let calendar =
        Calendar::parse_with_default_timezone(&text, &settings.calendar.default_timezone)?;
    let report = export(&calendar, &args.tags)?;

    let directory = args
        .output_directory
        .as_deref()
        .unwrap_or_else(|| Path::new(&settings.output.directory));
    let path = output_path(directory, &args.calendar, today)?;
    write_entries(&path, &report.render())?;

    tracing::info!(
        path = %path.display(),
        entries = report.entries.len(),
        "Calendar converted"
    );

    Ok(RunOutcome { path, report })
}
