// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress events emitted by the page assembler.

/// Receives progress events from a conversion run.
///
/// Events arrive synchronously on the converting thread, in input order.
/// All methods have no-op defaults so callers only override what they need.
/// Any `Fn(usize, usize)` closure works as a callback for per-item progress.
pub trait ProgressCallback: Send + Sync {
    /// Called once before the first item is attempted.
    fn on_start(&self, total: usize) {
        let _ = total;
    }

    /// Called once per attempted item, successful or not.
    ///
    /// `completed` runs 1, 2, ..., `total` and reaches `total` exactly once.
    fn on_item_complete(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }

    /// Called when an item is skipped because it could not be rasterised,
    /// just before the matching [`ProgressCallback::on_item_complete`].
    ///
    /// `position` is 1-indexed.
    fn on_item_failed(&self, position: usize, total: usize, name: &str, reason: &str) {
        let _ = (position, total, name, reason);
    }

    /// Called once after every item has been attempted, before the document
    /// is finalised.
    fn on_finish(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// For callers that don't need progress events.
pub struct NoopProgressCallback;

impl ProgressCallback for NoopProgressCallback {}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_item_complete(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Completion percentage for a progress bar.
pub fn percent(completed: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    completed as f32 / total as f32 * 100.0
}
