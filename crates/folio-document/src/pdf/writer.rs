// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — the document sink that turns placed rasters into a multi-page
// PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::collections::BTreeMap;
use std::io::Cursor;

use folio_core::error::FolioError;
use folio_core::{PageSize, PlacementGeometry};
use printpdf::{
    DictItem, ExternalStream, ExternalXObject, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, Px, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::RasterResult;
use crate::layout::page_dimensions_mm;

/// Title embedded in every generated document.
pub const DOCUMENT_TITLE: &str = "Folio Images";

/// Image DPI handed to printpdf. At 72 DPI one pixel is one point, so the
/// scale factors below are simply target points over source pixels.
const PLACEMENT_DPI: f32 = 72.0;

/// The document-assembly collaborator driven by the page assembler.
///
/// A sink starts with one empty page of a fixed size. It is owned by a
/// single conversion call and consumed by [`DocumentSink::finish`].
pub trait DocumentSink {
    /// Paper size every page of this document uses.
    fn page_size(&self) -> PageSize;

    /// Append a new, empty page and make it current.
    fn add_page(&mut self) -> Result<(), FolioError>;

    /// Draw `raster` on the current page at `geometry` (millimetres,
    /// top-left origin).
    fn place_image(
        &mut self,
        raster: RasterResult,
        geometry: PlacementGeometry,
    ) -> Result<(), FolioError>;

    /// Pages created so far, including the initial one.
    fn page_count(&self) -> usize;

    /// Serialise the finished document.
    fn finish(self) -> Result<Vec<u8>, FolioError>
    where
        Self: Sized;
}

/// A [`DocumentSink`] that produces PDF bytes.
///
/// Rasters are embedded as-is: the JPEG stream becomes a `/DCTDecode` image
/// XObject, so the page carries the original pixel size and the rasterizer's
/// quality setting untouched.
pub struct PdfSink {
    page_size: PageSize,
    document: PdfDocument,
    /// Operation lists, one per page; the last entry is the current page.
    pages: Vec<Vec<Op>>,
}

impl PdfSink {
    /// Create a sink with one empty page of `page_size`.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            document: PdfDocument::new(DOCUMENT_TITLE),
            pages: vec![Vec::new()],
        }
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.page_size.dimensions_mm();
        (Mm(w_mm), Mm(h_mm))
    }
}

impl DocumentSink for PdfSink {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn add_page(&mut self) -> Result<(), FolioError> {
        self.pages.push(Vec::new());
        debug!(pages = self.pages.len(), "Page appended");
        Ok(())
    }

    #[instrument(skip(self, raster), fields(jpeg_bytes = raster.encoded.len()))]
    fn place_image(
        &mut self,
        raster: RasterResult,
        geometry: PlacementGeometry,
    ) -> Result<(), FolioError> {
        let (width_px, height_px) = jpeg_dimensions(&raster.encoded)?;
        if (width_px, height_px) != (raster.pixel_width.get(), raster.pixel_height.get()) {
            return Err(FolioError::Assembly(format!(
                "raster is {width_px}x{height_px} but was recorded as {}x{}",
                raster.pixel_width, raster.pixel_height
            )));
        }

        let xobject = ExternalXObject {
            stream: ExternalStream {
                dict: jpeg_image_dict(width_px, height_px),
                content: raster.encoded,
                compress: false,
            },
            width: Some(Px(width_px as usize)),
            height: Some(Px(height_px as usize)),
            dpi: Some(PLACEMENT_DPI),
        };
        let xobject_id = self.document.add_xobject(&xobject);

        // PDF space has its origin bottom-left; geometry is top-left.
        let (_, page_h_mm) = page_dimensions_mm(self.page_size);
        let left = Mm(geometry.x as f32).into_pt();
        let bottom = Mm((page_h_mm - geometry.y - geometry.height) as f32).into_pt();
        let target_w = Mm(geometry.width as f32).into_pt();
        let target_h = Mm(geometry.height as f32).into_pt();

        let scale_x = target_w.0 / width_px as f32;
        let scale_y = target_h.0 / height_px as f32;

        let op = Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(left.0)),
                translate_y: Some(Pt(bottom.0)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        };

        let current = self
            .pages
            .last_mut()
            .ok_or_else(|| FolioError::Assembly("document has no current page".into()))?;
        current.push(op);

        debug!(
            x_mm = geometry.x,
            y_mm = geometry.y,
            width_mm = geometry.width,
            height_mm = geometry.height,
            scale_x,
            scale_y,
            "Image placed on page"
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[instrument(skip(self), fields(pages = self.pages.len()))]
    fn finish(mut self) -> Result<Vec<u8>, FolioError> {
        let (page_w, page_h) = self.page_dimensions();
        let pages: Vec<PdfPage> = self
            .pages
            .drain(..)
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        self.document.with_pages(pages);

        // printpdf's default image optimisation downsamples and re-encodes.
        let options = PdfSaveOptions {
            image_optimization: None,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.document.save(&options, &mut warnings);

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }
        if output.is_empty() {
            return Err(FolioError::Assembly("PDF serialisation produced no bytes".into()));
        }

        info!(
            paper = %self.page_size,
            pages = self.document.pages.len(),
            bytes = output.len(),
            "PDF finalised"
        );
        Ok(output)
    }
}

/// Read the pixel size from a JPEG header without decoding the scan data.
fn jpeg_dimensions(encoded: &[u8]) -> Result<(u32, u32), FolioError> {
    ::image::ImageReader::with_format(Cursor::new(encoded), ::image::ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|err| FolioError::Assembly(format!("failed to load raster: {}", err)))
}

/// Stream dictionary for an 8-bit RGB baseline JPEG image XObject.
fn jpeg_image_dict(width: u32, height: u32) -> BTreeMap<String, DictItem> {
    BTreeMap::from([
        ("Type".to_string(), DictItem::Name(b"XObject".to_vec())),
        ("Subtype".to_string(), DictItem::Name(b"Image".to_vec())),
        ("Width".to_string(), DictItem::Int(i64::from(width))),
        ("Height".to_string(), DictItem::Int(i64::from(height))),
        ("ColorSpace".to_string(), DictItem::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent".to_string(), DictItem::Int(8)),
        ("Filter".to_string(), DictItem::Name(b"DCTDecode".to_vec())),
    ])
}
