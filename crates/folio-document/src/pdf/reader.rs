// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect finished PDF documents using the `lopdf`
// crate.

use std::path::Path;

use folio_core::error::FolioError;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

/// Millimetres per PDF point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Guards against cycles in a malformed page tree.
const MAX_PARENT_DEPTH: usize = 32;

/// An image XObject stored in a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    /// First stream filter, e.g. `DCTDecode` for JPEG data.
    pub filter: Option<String>,
    pub stream_len: usize,
}

/// Read-only view over an existing PDF.
///
/// Wraps `lopdf::Document`; used to check the page count, page sizes and
/// embedded images of generated output.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            FolioError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of every page in millimetres, in page order.
    ///
    /// Pages whose /MediaBox cannot be resolved are skipped with a warning.
    pub fn page_sizes_mm(&self) -> Vec<(f32, f32)> {
        // get_pages is keyed by 1-indexed page number, so iteration is ordered.
        self.document
            .get_pages()
            .into_iter()
            .filter_map(|(page_number, page_id)| {
                let size = self.media_box(page_id).map(|[x0, y0, x1, y1]| {
                    ((x1 - x0).abs() * MM_PER_PT, (y1 - y0).abs() * MM_PER_PT)
                });
                if size.is_none() {
                    warn!(page_number, "Page has no usable /MediaBox");
                }
                size
            })
            .collect()
    }

    /// Every image XObject in the document, in object-number order.
    pub fn embedded_images(&self) -> Vec<EmbeddedImage> {
        self.document
            .objects
            .values()
            .filter_map(|object| {
                let stream = object.as_stream().ok()?;
                let dict = &stream.dict;
                if dict.get(b"Subtype").and_then(Object::as_name).ok()? != b"Image" {
                    return None;
                }
                let dimension = |key: &[u8]| {
                    dict.get(key)
                        .and_then(Object::as_i64)
                        .ok()
                        .and_then(|value| u32::try_from(value).ok())
                };
                Some(EmbeddedImage {
                    width: dimension(b"Width")?,
                    height: dimension(b"Height")?,
                    filter: dict.get(b"Filter").ok().and_then(filter_name),
                    stream_len: stream.content.len(),
                })
            })
            .collect()
    }

    // -- Helpers --------------------------------------------------------------

    /// Resolve /MediaBox for a page, following inherited values up /Parent.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut current = page_id;
        for _ in 0..MAX_PARENT_DEPTH {
            let dict = self.document.get_object(current).ok()?.as_dict().ok()?;
            if let Ok(media_box) = dict.get(b"MediaBox") {
                return self.parse_rect(media_box);
            }
            current = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => *parent,
                _ => return None,
            };
        }
        None
    }

    fn parse_rect(&self, object: &Object) -> Option<[f32; 4]> {
        let resolved = match object {
            Object::Reference(id) => self.document.get_object(*id).ok()?,
            other => other,
        };
        let values = resolved.as_array().ok()?;
        if values.len() != 4 {
            return None;
        }
        let mut rect = [0.0f32; 4];
        for (slot, value) in rect.iter_mut().zip(values) {
            *slot = value.as_float().ok()?;
        }
        Some(rect)
    }
}

fn filter_name(object: &Object) -> Option<String> {
    let name = match object {
        Object::Array(filters) => filters.first()?.as_name().ok()?,
        other => other.as_name().ok()?,
    };
    Some(String::from_utf8_lossy(name).into_owned())
}
