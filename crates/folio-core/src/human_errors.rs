// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages and run summaries.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the front end presents it.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is (disk blip, interrupted write).
    Transient,
    /// User must do something (pick images, fix a setting).
    ActionRequired,
    /// Retrying will not help; the input itself is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether simply running again might succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::EmptyBatch => HumanError {
            message: "No images selected.".into(),
            suggestion: "Please select at least one image to convert.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::InvalidConfig(detail) => HumanError {
            message: "That setting isn't valid.".into(),
            suggestion: format!("Choose one of the page sizes A4, A3, Letter or Legal. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::TotalFailure { attempted } => HumanError {
            message: "Conversion failed.".into(),
            suggestion: format!(
                "None of the {attempted} images could be read. They may be damaged or in an unusual format; try saving them as JPEG or PNG first."
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::Assembly(_) | FolioError::PdfError(_) => HumanError {
            message: "An error occurred while converting to PDF.".into(),
            suggestion: "Try again with fewer or smaller images.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FolioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Folio doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or choose a different location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        FolioError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Fix or delete the config file; defaults will be used when it is missing.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// One-line summary of a finished run.
///
/// Distinguishes a clean run from a partial one so the caller can show
/// which images were skipped.
pub fn summarize(total: usize, skipped: &[&str]) -> String {
    if skipped.is_empty() {
        return format!("All {total} images converted.");
    }
    format!(
        "{} of {} images converted, skipped: {}",
        total.saturating_sub(skipped.len()),
        total,
        skipped.join(", ")
    )
}
