// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// One user-supplied image, exactly as it was acquired.
///
/// Immutable once built: the conversion pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    name: String,
    media_type: String,
    byte_size: u64,
    data: Vec<u8>,
}

impl ImageInput {
    /// Capture an image blob. The byte size is taken from `data`.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            byte_size: data.len() as u64,
            data,
        }
    }

    /// Display name (usually the original file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type declared by whoever acquired the blob, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the declared media type is in the `image/` family.
    pub fn is_image_type(&self) -> bool {
        self.media_type
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// Output page sizes. All four share millimetres as their unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [Self::A4, Self::A3, Self::Letter, Self::Legal];

    /// Dimensions in millimetres (width, height), portrait.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::Letter => (216.0, 279.0),
            Self::Legal => (216.0, 356.0),
        }
    }

    /// Lower-case keyword used on the command line and in config files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::A3 => "a3",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        };
        f.write_str(label)
    }
}

impl FromStr for PageSize {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.keyword().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                FolioError::InvalidConfig(format!(
                    "unknown page size {trimmed:?} (expected one of a4, a3, letter, legal)"
                ))
            })
    }
}

/// Where a rasterised image lands on its page.
///
/// Millimetres, origin at the top-left corner of the page, y growing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacementGeometry {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}
