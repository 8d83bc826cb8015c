// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File acquisition — read image files from disk into `ImageInput`s, keeping
// the order they were given in and dropping anything that isn't an image.

use std::path::{Path, PathBuf};

use folio_core::ImageInput;
use folio_core::error::Result;
use tracing::{debug, warn};

/// Files read from disk, split into usable images and rejected paths.
#[derive(Debug, Default)]
pub struct Acquired {
    pub images: Vec<ImageInput>,
    /// Paths skipped because their media type isn't `image/*`.
    pub rejected: Vec<PathBuf>,
}

/// Media type implied by a file extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Read `paths` in order. Non-image files are skipped, not read.
///
/// A file that cannot be read at all is an error for the whole call.
pub fn acquire(paths: &[PathBuf]) -> Result<Acquired> {
    let mut acquired = Acquired::default();

    for path in paths {
        let media_type = media_type_for(path);
        if !media_type.starts_with("image/") {
            warn!(path = %path.display(), media_type, "Not an image file, skipping");
            acquired.rejected.push(path.clone());
            continue;
        }

        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(name, media_type, bytes = data.len(), "Image acquired");
        acquired
            .images
            .push(ImageInput::new(name, media_type, data));
    }

    Ok(acquired)
}
