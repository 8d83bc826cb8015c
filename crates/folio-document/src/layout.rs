// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — fit one image inside the margin-inset page area, preserving
// its aspect ratio, and centre it.

use std::num::NonZeroU32;

use folio_core::{PageSize, PlacementGeometry};

/// Flat margin on every side of the page, in millimetres. Not proportional
/// to the page size.
pub const PAGE_MARGIN_MM: f64 = 10.0;

/// Page dimensions in millimetres as `f64`.
pub fn page_dimensions_mm(page: PageSize) -> (f64, f64) {
    let (width, height) = page.dimensions_mm();
    (f64::from(width), f64::from(height))
}

/// The area left after removing the margin from all four sides.
pub fn inset_dimensions_mm(page: PageSize) -> (f64, f64) {
    let (width, height) = page_dimensions_mm(page);
    (width - 2.0 * PAGE_MARGIN_MM, height - 2.0 * PAGE_MARGIN_MM)
}

/// Compute where an image of the given pixel size lands on `page`.
///
/// The image touches the inset on its constraining axis and is centred on
/// the other. Pure: identical inputs always give identical geometry.
pub fn compute_placement(
    page: PageSize,
    pixel_width: NonZeroU32,
    pixel_height: NonZeroU32,
) -> PlacementGeometry {
    let (page_w, page_h) = page_dimensions_mm(page);
    let (inset_w, inset_h) = inset_dimensions_mm(page);

    let img_ratio = f64::from(pixel_width.get()) / f64::from(pixel_height.get());
    let page_ratio = inset_w / inset_h;

    let (width, height) = if img_ratio > page_ratio {
        // Relatively wider than the inset: width-constrained.
        (inset_w, inset_w / img_ratio)
    } else {
        (inset_h * img_ratio, inset_h)
    };

    PlacementGeometry {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    }
}
