// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembler — drives a batch of images through the rasterizer and onto
// consecutive pages of a single document.
//
// Items are processed strictly in input order, one at a time: the sink is
// stateful and the order pages are appended in is the order they appear in.
// A bad image is recorded and skipped; it never leaves a blank page and never
// aborts the batch. Only call-level problems (empty batch, bad page size,
// every item failing, the sink itself failing) surface as errors.

use folio_core::error::{FolioError, Result};
use folio_core::{ImageInput, PageSize, PlacementGeometry};
use tracing::{debug, info, instrument, warn};

use crate::image::Rasterizer;
use crate::layout::compute_placement;
use crate::pdf::writer::{DocumentSink, PdfSink};
use crate::progress::ProgressCallback;

/// Why an item was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DecodeFailure,
}

/// A skipped input item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// 0-based position in the input batch.
    pub index: usize,
    pub name: String,
    pub kind: FailureKind,
    /// Technical detail, suitable for logs.
    pub reason: String,
}

/// What happened to one input item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Converted {
        index: usize,
        name: String,
        /// 1-based page number in the finished document.
        page: usize,
        geometry: PlacementGeometry,
    },
    Failed(ItemFailure),
}

impl ItemOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

/// Result of a conversion run that produced a document.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub page_size: PageSize,
    /// One entry per input item, in input order.
    pub items: Vec<ItemOutcome>,
    /// The finished document.
    pub document: Vec<u8>,
}

impl ConversionOutcome {
    /// Number of input items attempted.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of pages in the document (one per converted item).
    pub fn page_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_converted()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.items.iter().filter_map(|item| match item {
            ItemOutcome::Failed(failure) => Some(failure),
            ItemOutcome::Converted { .. } => None,
        })
    }

    /// Names of the skipped items, in input order.
    pub fn skipped_names(&self) -> Vec<&str> {
        self.failures().map(|failure| failure.name.as_str()).collect()
    }
}

/// Converts image batches into multi-page documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAssembler {
    rasterizer: Rasterizer,
}

impl PageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `images` into a PDF with one page per convertible image.
    ///
    /// A fresh [`PdfSink`] is created for the call and finalised at the end.
    pub fn assemble(
        &self,
        images: &[ImageInput],
        page_size: PageSize,
        progress: &dyn ProgressCallback,
    ) -> Result<ConversionOutcome> {
        if images.is_empty() {
            return Err(FolioError::EmptyBatch);
        }
        self.assemble_into(PdfSink::new(page_size), images, progress)
    }

    /// Like [`PageAssembler::assemble`], with the page size given by name
    /// (`a4`, `a3`, `letter`, `legal`).
    pub fn assemble_named(
        &self,
        images: &[ImageInput],
        page_size: &str,
        progress: &dyn ProgressCallback,
    ) -> Result<ConversionOutcome> {
        let page_size: PageSize = page_size.parse()?;
        self.assemble(images, page_size, progress)
    }

    /// Run the batch loop against a caller-supplied sink.
    ///
    /// The sink must be freshly created with its single initial page; its
    /// page size drives placement. It is consumed by this call. On any error
    /// the sink is dropped unfinished.
    #[instrument(skip_all, fields(images = images.len(), paper = %sink.page_size()))]
    pub fn assemble_into<S: DocumentSink>(
        &self,
        mut sink: S,
        images: &[ImageInput],
        progress: &dyn ProgressCallback,
    ) -> Result<ConversionOutcome> {
        if images.is_empty() {
            return Err(FolioError::EmptyBatch);
        }
        let page_size = sink.page_size();

        let total = images.len();
        info!(total, "Starting conversion");
        progress.on_start(total);

        let mut items = Vec::with_capacity(total);
        let mut pages_used = 0usize;

        for (index, image) in images.iter().enumerate() {
            match self.rasterizer.rasterize(image) {
                Ok(raster) => {
                    let geometry =
                        compute_placement(page_size, raster.pixel_width, raster.pixel_height);

                    // The sink starts with one page; the first success uses it.
                    if pages_used > 0 {
                        sink.add_page()?;
                    }
                    sink.place_image(raster, geometry)?;
                    pages_used += 1;

                    debug!(index, name = image.name(), page = pages_used, "Item converted");
                    items.push(ItemOutcome::Converted {
                        index,
                        name: image.name().to_string(),
                        page: pages_used,
                        geometry,
                    });
                }
                Err(err) => {
                    let reason = err.to_string();
                    warn!(index, name = image.name(), %reason, "Skipping image");
                    progress.on_item_failed(index + 1, total, image.name(), &reason);
                    items.push(ItemOutcome::Failed(ItemFailure {
                        index,
                        name: image.name().to_string(),
                        kind: FailureKind::DecodeFailure,
                        reason,
                    }));
                }
            }

            progress.on_item_complete(index + 1, total);
        }

        progress.on_finish(total, pages_used);

        if pages_used == 0 {
            warn!(total, "No image could be converted");
            return Err(FolioError::TotalFailure { attempted: total });
        }

        let document = sink.finish()?;
        info!(
            total,
            converted = pages_used,
            skipped = total - pages_used,
            bytes = document.len(),
            "Conversion complete"
        );

        Ok(ConversionOutcome {
            page_size,
            items,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RasterResult;
    use crate::pdf::PdfReader;
    use crate::progress::NoopProgressCallback;
    use std::io::Cursor;
    use std::sync::Mutex;

    // -- Fixtures -------------------------------------------------------------

    fn png(name: &str, width: u32, height: u32) -> ImageInput {
        let img = ::image::DynamicImage::ImageRgb8(::image::RgbImage::from_pixel(
            width,
            height,
            ::image::Rgb([90, 160, 30]),
        ));
        let mut data = Vec::new();
        img.write_to(&mut Cursor::new(&mut data), ::image::ImageFormat::Png)
            .unwrap();
        ImageInput::new(name, "image/png", data)
    }

    fn corrupt(name: &str) -> ImageInput {
        ImageInput::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0x00, 0x13, 0x37])
    }

    /// Sink call log.
    #[derive(Debug, Clone, PartialEq)]
    enum SinkCall {
        AddPage,
        Place { width_px: u32, geometry: PlacementGeometry },
        Finish,
    }

    /// Records calls; optionally fails on the n-th placement.
    struct RecordingSink<'a> {
        calls: Option<&'a Mutex<Vec<SinkCall>>>,
        page_size: PageSize,
        pages: usize,
        fail_on_place: Option<usize>,
        placed: usize,
    }

    impl<'a> RecordingSink<'a> {
        fn new(calls: &'a Mutex<Vec<SinkCall>>, page_size: PageSize) -> Self {
            Self {
                calls: Some(calls),
                page_size,
                pages: 1,
                fail_on_place: None,
                placed: 0,
            }
        }

        fn record(&self, call: SinkCall) {
            if let Some(calls) = self.calls {
                calls.lock().unwrap().push(call);
            }
        }
    }

    impl DocumentSink for RecordingSink<'_> {
        fn page_size(&self) -> PageSize {
            self.page_size
        }

        fn add_page(&mut self) -> Result<()> {
            self.pages += 1;
            self.record(SinkCall::AddPage);
            Ok(())
        }

        fn place_image(&mut self, raster: RasterResult, geometry: PlacementGeometry) -> Result<()> {
            self.placed += 1;
            if self.fail_on_place == Some(self.placed) {
                return Err(FolioError::Assembly("sink exhausted".into()));
            }
            self.record(SinkCall::Place {
                width_px: raster.pixel_width.get(),
                geometry,
            });
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn finish(self) -> Result<Vec<u8>> {
            self.record(SinkCall::Finish);
            Ok(vec![self.pages as u8])
        }
    }

    #[derive(Default)]
    struct TrackingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressCallback for TrackingProgress {
        fn on_start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }
        fn on_item_complete(&self, completed: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{completed}/{total}"));
        }
        fn on_item_failed(&self, position: usize, _total: usize, name: &str, _reason: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failed {position} {name}"));
        }
        fn on_finish(&self, total: usize, succeeded: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("finish {succeeded}/{total}"));
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- Call-level errors ----------------------------------------------------

    #[test]
    fn empty_batch_fails_for_every_page_size() {
        for page in PageSize::ALL {
            let result = PageAssembler::new().assemble(&[], page, &NoopProgressCallback);
            assert!(matches!(result, Err(FolioError::EmptyBatch)));
        }
    }

    #[test]
    fn empty_batch_never_touches_the_sink() {
        let calls = Mutex::new(Vec::new());
        let progress = TrackingProgress::default();
        let result = PageAssembler::new().assemble_into(
            RecordingSink::new(&calls, PageSize::A4),
            &[],
            &progress,
        );
        assert!(matches!(result, Err(FolioError::EmptyBatch)));
        assert!(calls.lock().unwrap().is_empty());
        assert!(progress.events.lock().unwrap().is_empty());
    }

    #[test]
    fn unknown_page_size_name_is_invalid_config() {
        let result =
            PageAssembler::new().assemble_named(&[png("a.png", 4, 4)], "B5", &NoopProgressCallback);
        assert!(matches!(result, Err(FolioError::InvalidConfig(_))));
    }

    #[test]
    fn all_failures_is_total_failure_without_finishing() {
        let calls = Mutex::new(Vec::new());
        let images = [corrupt("a.jpg"), corrupt("b.jpg")];
        let result = PageAssembler::new().assemble_into(
            RecordingSink::new(&calls, PageSize::Legal),
            &images,
            &NoopProgressCallback,
        );
        assert!(matches!(result, Err(FolioError::TotalFailure { attempted: 2 })));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn sink_failure_aborts_the_run() {
        let calls = Mutex::new(Vec::new());
        let mut sink = RecordingSink::new(&calls, PageSize::A4);
        sink.fail_on_place = Some(2);
        let images = [png("a.png", 4, 3), png("b.png", 3, 4), png("c.png", 5, 5)];
        let progress = TrackingProgress::default();

        let result = PageAssembler::new().assemble_into(sink, &images, &progress);
        assert!(matches!(result, Err(FolioError::Assembly(_))));

        let calls = calls.lock().unwrap();
        assert!(!calls.contains(&SinkCall::Finish));
        // Nothing after the failing item was attempted.
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start 3".to_string(), "1/3".to_string()]
        );
    }

    // -- Batch behaviour ------------------------------------------------------

    #[test]
    fn mixed_batch_matches_worked_example() {
        let calls = Mutex::new(Vec::new());
        let images = [
            png("landscape.png", 800, 600),
            corrupt("portrait.jpg"),
            png("square.png", 1200, 1200),
        ];
        let progress = TrackingProgress::default();

        let outcome = PageAssembler::new()
            .assemble_into(RecordingSink::new(&calls, PageSize::A4), &images, &progress)
            .unwrap();

        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.page_count(), 2);
        assert_eq!(outcome.document, vec![2u8]);

        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].name, "portrait.jpg");
        assert_eq!(failures[0].kind, FailureKind::DecodeFailure);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        let SinkCall::Place { width_px, geometry } = &calls[0] else {
            panic!("expected placement, got {:?}", calls[0]);
        };
        assert_eq!(*width_px, 800);
        assert!(approx(geometry.width, 190.0));
        assert!(approx(geometry.height, 142.5));
        assert_eq!(calls[1], SinkCall::AddPage);
        let SinkCall::Place { width_px, geometry } = &calls[2] else {
            panic!("expected placement, got {:?}", calls[2]);
        };
        assert_eq!(*width_px, 1200);
        assert!(approx(geometry.width, 190.0));
        assert!(approx(geometry.height, 190.0));
        assert!(approx(geometry.x, 10.0));
        assert!(approx(geometry.y, 53.5));
        assert_eq!(calls[3], SinkCall::Finish);

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "start 3",
                "1/3",
                "failed 2 portrait.jpg",
                "2/3",
                "3/3",
                "finish 2/3",
            ]
        );
    }

    #[test]
    fn leading_failure_does_not_add_a_blank_page() {
        let calls = Mutex::new(Vec::new());
        let images = [corrupt("bad.jpg"), png("good.png", 6, 4)];
        let outcome = PageAssembler::new()
            .assemble_into(
                RecordingSink::new(&calls, PageSize::A3),
                &images,
                &NoopProgressCallback,
            )
            .unwrap();

        assert_eq!(outcome.page_count(), 1);
        let calls = calls.lock().unwrap();
        assert!(!calls.contains(&SinkCall::AddPage));
        assert_eq!(outcome.skipped_names(), vec!["bad.jpg"]);
    }

    #[test]
    fn converted_items_keep_input_order() {
        let calls = Mutex::new(Vec::new());
        let images = [
            png("one.png", 10, 7),
            corrupt("two.jpg"),
            png("three.png", 30, 7),
            corrupt("four.jpg"),
            png("five.png", 50, 7),
        ];
        let outcome = PageAssembler::new()
            .assemble_into(
                RecordingSink::new(&calls, PageSize::Letter),
                &images,
                &NoopProgressCallback,
            )
            .unwrap();

        let placed: Vec<u32> = calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Place { width_px, .. } => Some(*width_px),
                _ => None,
            })
            .collect();
        assert_eq!(placed, vec![10, 30, 50]);

        let pages: Vec<(usize, usize)> = outcome
            .items
            .iter()
            .filter_map(|item| match item {
                ItemOutcome::Converted { index, page, .. } => Some((*index, *page)),
                ItemOutcome::Failed(_) => None,
            })
            .collect();
        assert_eq!(pages, vec![(0, 1), (2, 2), (4, 3)]);
        assert_eq!(outcome.skipped_names(), vec!["two.jpg", "four.jpg"]);
    }

    #[test]
    fn closure_progress_sees_every_item_once() {
        let seen = Mutex::new(Vec::new());
        let callback = |completed: usize, total: usize| seen.lock().unwrap().push((completed, total));
        let images = [corrupt("a.jpg"), png("b.png", 2, 2), corrupt("c.jpg"), png("d.png", 2, 3)];

        let calls = Mutex::new(Vec::new());
        PageAssembler::new()
            .assemble_into(RecordingSink::new(&calls, PageSize::A4), &images, &callback)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    // -- End to end with the real PDF sink ------------------------------------

    #[test]
    fn pdf_page_count_equals_successes() {
        let images = [
            png("a.png", 40, 30),
            corrupt("b.jpg"),
            png("c.png", 30, 40),
            png("d.png", 20, 20),
        ];
        let outcome = PageAssembler::new()
            .assemble(&images, PageSize::A4, &NoopProgressCallback)
            .unwrap();

        assert_eq!(outcome.page_count(), 3);
        let reader = PdfReader::from_bytes(&outcome.document).unwrap();
        assert_eq!(reader.page_count(), 3);
        for (w, h) in reader.page_sizes_mm() {
            assert!((w - 210.0).abs() < 0.5 && (h - 297.0).abs() < 0.5);
        }
    }

    #[test]
    fn all_valid_batch_has_one_page_per_image() {
        let images: Vec<ImageInput> = (1..=4)
            .map(|i| png(&format!("img{i}.png"), 10 * i, 12))
            .collect();
        let outcome = PageAssembler::new()
            .assemble_named(&images, "legal", &NoopProgressCallback)
            .unwrap();

        assert_eq!(outcome.failures().count(), 0);
        let reader = PdfReader::from_bytes(&outcome.document).unwrap();
        assert_eq!(reader.page_count(), images.len());
    }

    #[test]
    fn single_square_on_letter() {
        let outcome = PageAssembler::new()
            .assemble(&[png("sq.png", 64, 64)], PageSize::Letter, &NoopProgressCallback)
            .unwrap();

        let ItemOutcome::Converted { geometry, page, .. } = &outcome.items[0] else {
            panic!("square image should convert");
        };
        assert_eq!(*page, 1);
        assert!(approx(geometry.width, 196.0));
        assert!(approx(geometry.height, 196.0));
        assert!(approx(geometry.x, 10.0));
        assert!(approx(geometry.y, 41.5));
    }

    #[test]
    fn placement_uses_the_sink_page_size() {
        let calls = Mutex::new(Vec::new());
        let outcome = PageAssembler::new()
            .assemble_into(
                RecordingSink::new(&calls, PageSize::Letter),
                &[png("sq.png", 8, 8)],
                &NoopProgressCallback,
            )
            .unwrap();

        assert_eq!(outcome.page_size, PageSize::Letter);
        let ItemOutcome::Converted { geometry, .. } = &outcome.items[0] else {
            panic!("square image should convert");
        };
        assert!(approx(geometry.width, 196.0));
        assert!(approx(geometry.y, 41.5));
    }

    #[test]
    fn large_photo_is_embedded_at_full_resolution() {
        // Busy content and more than 2 MB of raw pixels.
        let img = ::image::RgbImage::from_fn(1600, 1200, |x, y| {
            ::image::Rgb([(x * 7 ^ y * 13) as u8, (x * y) as u8, (x + y * 3) as u8])
        });
        let mut data = Vec::new();
        ::image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut data), ::image::ImageFormat::Png)
            .unwrap();
        let input = ImageInput::new("photo.png", "image/png", data);
        let expected_len = Rasterizer::new().rasterize(&input).unwrap().encoded.len();

        let outcome = PageAssembler::new()
            .assemble(&[input], PageSize::A4, &NoopProgressCallback)
            .unwrap();

        let images = PdfReader::from_bytes(&outcome.document)
            .unwrap()
            .embedded_images();
        assert_eq!(images.len(), 1);
        assert_eq!((images[0].width, images[0].height), (1600, 1200));
        assert_eq!(images[0].filter.as_deref(), Some("DCTDecode"));
        assert_eq!(images[0].stream_len, expected_len);
    }
}
