//! Page orchestration: analysis, recognition and box editing.
//!
//! A [`Page`] owns one image reference and its [`PageLayout`]. Everything
//! that needs pixels or a recognition engine is delegated to the
//! [`RecognitionBackend`] and [`ImagePreprocessor`] it is configured with.
//!
//! Precondition failures (bad index, missing image or backend) are logged
//! and returned as errors before anything is mutated. Empty analysis or
//! recognition output is not an error.

mod backend;
mod options;
pub mod progress;

pub use backend::{ImagePreprocessor, RecognitionBackend};
#[cfg(feature = "raster")]
pub use backend::RasterPreprocessor;
pub use options::{AnalyzeOptions, RecognizeOptions};
pub use progress::{ChannelProgress, ProgressEvent, ProgressSink};

use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, BoxType, OcrBox, PageBody, PageLayout, PageRecord, SOURCE_BACKEND,
};
use crate::render::PageExport;
use crate::settings::Settings;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A scanned page and its box layout.
pub struct Page {
    /// Path of the page image
    pub image_path: Option<PathBuf>,

    /// Position among sibling pages
    pub order: u32,

    /// Boxes in reading order
    pub layout: PageLayout,

    backend: Option<Arc<dyn RecognitionBackend>>,
    preprocessor: Option<Arc<dyn ImagePreprocessor>>,
}

impl Page {
    /// Create a page without image or backend.
    pub fn new() -> Self {
        Self {
            image_path: None,
            order: 0,
            layout: PageLayout::new(),
            backend: None,
            preprocessor: default_preprocessor(),
        }
    }

    /// Set the image path (builder style).
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Set the page order (builder style).
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Set the recognition backend (builder style).
    pub fn with_backend(mut self, backend: Arc<dyn RecognitionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the image preprocessor (builder style).
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn ImagePreprocessor>) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Replace the recognition backend.
    pub fn set_backend(&mut self, backend: Arc<dyn RecognitionBackend>) {
        self.backend = Some(backend);
    }

    /// Replace the image preprocessor.
    pub fn set_preprocessor(&mut self, preprocessor: Arc<dyn ImagePreprocessor>) {
        self.preprocessor = Some(preprocessor);
    }

    /// Check if a recognition backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Set the header band height.
    pub fn set_header(&mut self, header_y: i32) {
        self.layout.set_header(header_y);
    }

    /// Set the footer band height.
    pub fn set_footer(&mut self, footer_y: i32) {
        self.layout.set_footer(footer_y);
    }

    // ---- analysis ----

    /// Run layout analysis and store the resulting boxes.
    ///
    /// Returns copies of the boxes that were added to the layout.
    pub fn analyze(&mut self, options: &AnalyzeOptions, settings: &Settings) -> Result<Vec<OcrBox>> {
        let image = self.require_image()?.to_path_buf();
        let backend = self.require_backend()?;

        let region = match options.region {
            Some(region) => region,
            None => self.derive_region(&image)?,
        };

        let mut boxes = backend
            .analyze_layout(&image, region)
            .map_err(|e| backend_failure("Layout analysis failed", e))?;
        let found = boxes.len();

        if options.filter_by_type {
            if let Some(allowed) = &settings.box_types {
                boxes.retain(|b| allowed.contains(&b.box_type()));
            }
        }

        if options.filter_by_size
            && (settings.x_size_threshold > 0 || settings.y_size_threshold > 0)
        {
            boxes.retain(|b| {
                b.bbox.width >= settings.x_size_threshold
                    && b.bbox.height >= settings.y_size_threshold
            });
        }

        log::debug!(
            "Analysis found {} boxes, {} left after filtering",
            found,
            boxes.len()
        );

        let next_order = self.layout.max_order().map_or(0, |max| max + 1);
        for (offset, ocr_box) in boxes.iter_mut().enumerate() {
            ocr_box.order = next_order + offset;
        }

        let added = boxes.len();
        if options.keep_existing {
            self.layout.extend(boxes);
        } else {
            self.layout.set_boxes(boxes);
        }
        self.layout.sort_by_order();

        let start = self.layout.len() - added;
        Ok(self.layout.boxes()[start..].to_vec())
    }

    /// Re-run analysis on one box's region.
    ///
    /// A single result refines the box in place, keeping its identity, order,
    /// user data and observers. Zero or several results replace the box and
    /// are inserted at its position.
    pub fn analyze_single_box(&mut self, index: usize) -> Result<()> {
        let candidates = self.analyze_box_region(index)?;

        match <[OcrBox; 1]>::try_from(candidates) {
            Ok([refined]) => {
                if let Some(ocr_box) = self.layout.get_mut(index) {
                    ocr_box.refine_from(refined);
                    ocr_box.notify(Some(SOURCE_BACKEND));
                }
            }
            Err(candidates) => {
                let removed = self.layout.remove(index)?;
                log::info!(
                    "Replacing box {} with {} boxes",
                    removed.id,
                    candidates.len()
                );
                for (offset, ocr_box) in candidates.into_iter().enumerate() {
                    self.layout.add(ocr_box, Some(index + offset))?;
                }
            }
        }

        Ok(())
    }

    /// Snap a box to the most similar box found by re-analyzing its region.
    ///
    /// The box is removed when analysis finds nothing.
    pub fn align_single_box(&mut self, index: usize) -> Result<()> {
        let candidates = self.analyze_box_region(index)?;

        let best = {
            let current = &self.layout.boxes()[index];
            let mut best: Option<(BoundingBox, f64)> = None;
            for candidate in &candidates {
                let score = candidate.similarity(current);
                match best {
                    Some((_, best_score)) if score <= best_score => {}
                    _ => best = Some((candidate.bbox, score)),
                }
            }
            best.map(|(bbox, _)| bbox)
        };

        match best {
            Some(bbox) => {
                if let Some(ocr_box) = self.layout.get_mut(index) {
                    ocr_box.set_geometry(bbox, Some(SOURCE_BACKEND));
                }
            }
            None => {
                let removed = self.layout.remove(index)?;
                log::info!("No box found in region of {}, removed it", removed.id);
            }
        }

        Ok(())
    }

    // ---- recognition ----

    /// Recognize one box or the whole page.
    ///
    /// Ignored regions are painted over on a scratch copy of the image before
    /// the backend sees it. After recognition every processed text box has
    /// its user text cleared and each processed box is notified with the
    /// `"Backend"` source.
    pub fn recognize(
        &mut self,
        options: &RecognizeOptions,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<()> {
        let image = self.require_image()?.to_path_buf();
        if let Some(index) = options.box_index {
            self.check_index(index)?;
        }
        let backend = self.require_backend()?;

        let targets: Vec<usize> = match options.box_index {
            Some(index) => vec![index],
            None => (0..self.layout.len()).collect(),
        }
        .into_iter()
        .filter(|&i| self.layout.boxes()[i].is_recognizable())
        .collect();

        if targets.is_empty() {
            log::debug!("Nothing to recognize");
            return Ok(());
        }

        let ignored: Vec<BoundingBox> = self
            .layout
            .iter()
            .filter(|b| b.box_type() == BoxType::Ignore)
            .map(|b| b.bbox)
            .collect();

        let scratch = if ignored.is_empty() {
            None
        } else {
            Some(tempfile::tempdir()?)
        };
        let source = match &scratch {
            None => image,
            Some(dir) => self
                .require_preprocessor()?
                .erase_regions(&image, &ignored, dir.path())
                .map_err(|e| {
                    log::error!("Failed to erase ignored regions: {}", e);
                    e
                })?,
        };

        {
            let mut boxes: Vec<&mut OcrBox> = self
                .layout
                .iter_mut()
                .enumerate()
                .filter(|(i, _)| targets.binary_search(i).is_ok())
                .map(|(_, b)| b)
                .collect();

            log::info!("Recognizing {} boxes", boxes.len());
            backend
                .recognize(&source, &mut boxes, progress)
                .map_err(|e| backend_failure("Recognition failed", e))?;
        }
        drop(scratch);

        if options.convert_empty_to_image && options.box_index.is_none() {
            for &index in &targets {
                let ocr_box = &self.layout.boxes()[index];
                if ocr_box.is_text_box() && !ocr_box.has_text() {
                    log::debug!("Box {} has no text, converting to image", ocr_box.id);
                    let converted = ocr_box.convert_to(BoxType::FlowingImage);
                    self.layout.replace(index, converted)?;
                }
            }
        }

        for &index in &targets {
            if let Some(ocr_box) = self.layout.get_mut(index) {
                if ocr_box.is_text_box() {
                    ocr_box.set_user_text(String::new());
                }
                ocr_box.notify(Some(SOURCE_BACKEND));
            }
        }

        Ok(())
    }

    // ---- editing ----

    /// Merge the box at `index2` into the box at `index1`.
    pub fn merge(&mut self, index1: usize, index2: usize) -> Result<()> {
        self.check_index(index1)?;
        self.check_index(index2)?;
        if index1 == index2 {
            let err = Error::Other(format!("Cannot merge box {} with itself", index1));
            log::error!("{}", err);
            return Err(err);
        }

        let other = self.layout.remove(index2)?;
        let target = if index2 < index1 { index1 - 1 } else { index1 };

        if let Some(ocr_box) = self.layout.get_mut(target) {
            log::info!("Merged box {} into {}", other.id, ocr_box.id);
            ocr_box.absorb(other);
            ocr_box.notify(Some(SOURCE_BACKEND));
        }

        Ok(())
    }

    /// Convert the box at `index` to another type in place.
    pub fn convert(&mut self, index: usize, box_type: BoxType) -> Result<()> {
        self.check_index(index)?;
        let current = &self.layout.boxes()[index];
        log::info!(
            "Converting box {} from {} to {}",
            current.id,
            current.box_type(),
            box_type
        );
        let converted = current.convert_to(box_type);
        self.layout.replace(index, converted)?;
        Ok(())
    }

    // ---- export & records ----

    /// Per-page payload for exporters.
    pub fn export_data(&self, settings: &Settings) -> PageExport {
        PageExport::new(self.image_path_string(), self.order, &self.layout, settings)
    }

    /// Structural record of the page.
    pub fn to_record(&self) -> PageRecord {
        PageRecord {
            page: PageBody {
                image_path: self.image_path_string(),
                order: self.order,
                layout: self.layout.to_record(),
            },
        }
    }

    /// Rebuild a page from its record. Backend and preprocessor are not persisted.
    pub fn from_record(record: PageRecord) -> Result<Page> {
        let body = record.page;
        let mut page = Page::new().with_order(body.order);
        page.image_path = body.image_path.map(PathBuf::from);
        page.layout = PageLayout::from_record(body.layout)?;
        Ok(page)
    }

    // ---- helpers ----

    fn image_path_string(&self) -> Option<String> {
        self.image_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.layout.len() {
            return Ok(());
        }
        let err = Error::InvalidIndex {
            index,
            len: self.layout.len(),
        };
        log::error!("{}", err);
        Err(err)
    }

    fn require_image(&self) -> Result<&Path> {
        self.image_path.as_deref().ok_or_else(|| {
            log::error!("{}", Error::NoImage);
            Error::NoImage
        })
    }

    fn require_backend(&self) -> Result<Arc<dyn RecognitionBackend>> {
        self.backend.clone().ok_or_else(|| {
            log::error!("{}", Error::NoBackend);
            Error::NoBackend
        })
    }

    fn require_preprocessor(&self) -> Result<Arc<dyn ImagePreprocessor>> {
        self.preprocessor.clone().ok_or_else(|| {
            let err = Error::Image("No image preprocessor set for page".to_string());
            log::error!("{}", err);
            err
        })
    }

    fn derive_region(&mut self, image: &Path) -> Result<BoundingBox> {
        let (width, height) = self.require_preprocessor()?.image_size(image)?;
        self.layout
            .set_region(BoundingBox::new(0, 0, width as i32, height as i32));
        Ok(self.layout.page_region())
    }

    fn analyze_box_region(&self, index: usize) -> Result<Vec<OcrBox>> {
        self.check_index(index)?;
        let image = self.require_image()?;
        let backend = self.require_backend()?;
        let region = self.layout.boxes()[index].bbox;

        backend
            .analyze_layout(image, region)
            .map_err(|e| backend_failure("Box analysis failed", e))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("image_path", &self.image_path)
            .field("order", &self.order)
            .field("layout", &self.layout)
            .field("has_backend", &self.backend.is_some())
            .field("has_preprocessor", &self.preprocessor.is_some())
            .finish()
    }
}

#[cfg(feature = "raster")]
fn default_preprocessor() -> Option<Arc<dyn ImagePreprocessor>> {
    Some(Arc::new(RasterPreprocessor::new()))
}

#[cfg(not(feature = "raster"))]
fn default_preprocessor() -> Option<Arc<dyn ImagePreprocessor>> {
    None
}

fn backend_failure(context: &str, err: Error) -> Error {
    log::warn!("{}: {}", context, err);
    match err {
        Error::Backend(_) => err,
        other => Error::Backend(other.to_string()),
    }
}
