//! Timewarrior export: turns a calendar into `inc` entries.

use std::fmt;

use crate::calendar::Calendar;
use crate::error::{ServiceError, ServiceResult};

/// One timewarrior interval, timestamps formatted as `YYYYMMDDTHHMMSSZ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimewEntry {
    pub start: String,
    pub end: String,
    pub tags: Vec<String>,
}

impl fmt::Display for TimewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inc {} - {} #", self.start, self.end)?;
        for tag in &self.tags {
            write!(f, " \"{}\"", tag.replace('"', "'"))?;
        }
        Ok(())
    }
}

/// Result of exporting a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub entries: Vec<TimewEntry>,
    /// Summaries of all-day events, which are never converted.
    pub skipped_all_day: Vec<String>,
    /// Summaries of events whose recurrence never ends.
    pub skipped_unbounded: Vec<String>,
}

impl ExportReport {
    /// Renders the entries one per line, without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// ## Summary
/// Converts every event of `calendar` into timewarrior entries.
///
/// Events are visited in document order. All-day events and events that
/// repeat forever are skipped and listed in the report; every other event
/// yields one entry per occurrence, tagged with its summary followed by
/// `extra_tags`.
///
/// ## Errors
/// Returns an error if an occurrence cannot be placed on the UTC timeline.
#[tracing::instrument(skip_all, fields(calendar = calendar.name(), extra_tags = extra_tags.len()))]
pub fn export(calendar: &Calendar, extra_tags: &[String]) -> ServiceResult<ExportReport> {
    let mut report = ExportReport::default();

    for event in calendar.events() {
        if event.is_all_day() {
            tracing::warn!(summary = event.summary(), "Skipping all-day event");
            report.skipped_all_day.push(event.summary().to_string());
            continue;
        }

        let occurrences = match event.occurrences() {
            Ok(occurrences) => occurrences,
            Err(ServiceError::UnboundedRecurrence { summary }) => {
                tracing::warn!(%summary, "Skipping event that repeats forever");
                report.skipped_unbounded.push(summary);
                continue;
            }
            Err(err) => return Err(err),
        };

        let tags: Vec<String> = std::iter::once(event.summary().to_string())
            .chain(extra_tags.iter().cloned())
            .collect();

        let before = report.entries.len();
        for occurrence in occurrences {
            let occurrence = occurrence?;
            report.entries.push(TimewEntry {
                start: occurrence.formatted_start(),
                end: occurrence.formatted_end(),
                tags: tags.clone(),
            });
        }

        tracing::debug!(
            summary = event.summary(),
            repeats = event.does_repeat(),
            entries = report.entries.len() - before,
            "Exported event"
        );
    }

    tracing::info!(
        entries = report.entries.len(),
        skipped_all_day = report.skipped_all_day.len(),
        skipped_unbounded = report.skipped_unbounded.len(),
        "Export finished"
    );

    Ok(report)
}
