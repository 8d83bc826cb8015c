// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Image-to-PDF conversion pipeline for Folio.
//
// Provides the rasterizer (decode + fixed-quality JPEG re-encode), page layout
// (fit-and-centre inside a fixed margin), the page assembler that drives a
// batch onto consecutive pages, and PDF writing/inspection.

pub mod assemble;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod progress;

// Re-export the primary structs so callers can use `folio_document::PageAssembler` etc.
pub use assemble::{ConversionOutcome, FailureKind, ItemFailure, ItemOutcome, PageAssembler};
pub use self::image::{RasterResult, Rasterizer};
pub use layout::{PAGE_MARGIN_MM, compute_placement};
pub use pdf::{DocumentSink, EmbeddedImage, PdfReader, PdfSink};
pub use progress::{NoopProgressCallback, ProgressCallback};
