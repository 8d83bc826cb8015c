// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal rendering of conversion progress and results.

use folio_core::human_errors::{Severity, humanize_error, summarize};
use folio_core::FolioError;
use folio_document::progress::percent;
use folio_document::{ConversionOutcome, ProgressCallback};
use tracing::{info, warn};

/// Logs one line per processed image.
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_start(&self, total: usize) {
        info!(total, "Converting images");
    }

    fn on_item_complete(&self, completed: usize, total: usize) {
        info!(
            "Processed {completed}/{total} ({:.0}%)",
            percent(completed, total)
        );
    }

    fn on_item_failed(&self, position: usize, _total: usize, name: &str, reason: &str) {
        warn!(position, "Failed to process {name}. Skipping... ({reason})");
    }
}

/// Summary line for a finished conversion.
pub fn outcome_summary(outcome: &ConversionOutcome) -> String {
    summarize(outcome.total(), &outcome.skipped_names())
}

/// Human-readable description of a call-level failure, labelled by
/// severity.
pub fn error_report(err: &FolioError) -> String {
    let human = humanize_error(err);
    let label = match human.severity {
        Severity::Transient => "Temporary problem",
        Severity::ActionRequired => "Action needed",
        Severity::Permanent => "Error",
    };
    let mut report = format!("{label}: {}\n{}", human.message, human.suggestion);
    if human.retriable {
        report.push_str("\nRunning the same command again may work.");
    }
    report
}
