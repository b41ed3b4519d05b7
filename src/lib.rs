//! # pagescan
//!
//! Page layout model and text reconstruction for OCR editing tools.
//!
//! A scanned page is represented as a [`Page`]: an image reference plus an
//! ordered [`PageLayout`] of classified boxes. Layout analysis and text
//! recognition are delegated to a pluggable [`RecognitionBackend`]; the
//! recognized text is turned back into readable, confidence-annotated text
//! by the hyphenation-aware [`ResultWriter`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagescan::{load_page, render, Settings};
//!
//! fn main() -> pagescan::Result<()> {
//!     let page = load_page("page_001.json")?;
//!     let settings = Settings::default();
//!
//!     // Plain text of the whole page
//!     println!("{}", render::page_text(&page.layout));
//!
//!     // Rich text of the first box with confidence highlights
//!     let writer = render::ResultWriter::new(render::ReconstructOptions::from_settings(&settings));
//!     if let Some(text) = render::reconstruct_flow(&page.layout, 0, &writer) {
//!         println!("{}", text.plain_text());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Box model**: seventeen box types mapped onto text, image, line and other variants
//! - **Reading order**: layouts keep `order` equal to position after every edit
//! - **Change notification**: per-box observers with a source-tag re-entrancy guard
//! - **Hyphenation**: words split over line breaks are merged or kept apart
//! - **Records**: JSON page records compatible with existing project files

pub mod error;
pub mod model;
pub mod page;
pub mod render;
pub mod settings;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    BoundingBox, BoxType, BoxVariant, OcrBox, PageLayout, PageRecord, ResultBlock, ResultLine,
    ResultParagraph, ResultSymbol, ResultWord, SOURCE_BACKEND,
};
pub use page::{
    AnalyzeOptions, ImagePreprocessor, Page, ProgressSink, RecognitionBackend, RecognizeOptions,
};
pub use render::{JsonFormat, ReconstructOptions, ResultWriter, RichText};
pub use settings::Settings;

use std::fs;
use std::path::Path;

/// Load a page from a JSON page record file.
///
/// # Example
///
/// ```no_run
/// use pagescan::load_page;
///
/// let page = load_page("page_001.json").unwrap();
/// println!("Boxes: {}", page.layout.len());
/// ```
pub fn load_page<P: AsRef<Path>>(path: P) -> Result<Page> {
    let path = path.as_ref();
    log::debug!("Loading page record from {}", path.display());
    let data = fs::read_to_string(path)?;
    let record: PageRecord = serde_json::from_str(&data)
        .map_err(|e| Error::Record(format!("{}: {}", path.display(), e)))?;
    Page::from_record(record)
}

/// Save a page as a pretty-printed JSON page record.
pub fn save_page<P: AsRef<Path>>(page: &Page, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = render::to_json(&page.to_record(), JsonFormat::Pretty)?;
    fs::write(path, json)?;
    log::debug!("Saved page record to {}", path.display());
    Ok(())
}

/// Extract the plain text of a page record file.
///
/// # Example
///
/// ```no_run
/// use pagescan::extract_text;
///
/// let text = extract_text("page_001.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let page = load_page(path)?;
    Ok(render::page_text(&page.layout))
}

/// Convert a page record file to normalized JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let page = load_page(path)?;
    render::to_json(&page.to_record(), format)
}

/// Get the library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
    }

    #[test]
    fn test_save_and_load_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");

        let mut page = Page::new().with_image("scan.png").with_order(2);
        let mut caption = OcrBox::with_geometry(100, 750, 230, 50, BoxType::CaptionText)
            .with_confidence(0.9);
        caption.set_user_text("Figure 1");
        page.layout.add(caption, None).unwrap();

        save_page(&page, &path).unwrap();
        let loaded = load_page(&path).unwrap();

        assert_eq!(loaded.order, 2);
        assert_eq!(loaded.layout, page.layout);
        assert_eq!(extract_text(&path).unwrap(), "Figure 1");
    }

    #[test]
    fn test_load_page_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        match load_page(&path) {
            Err(Error::Record(msg)) => assert!(msg.contains("broken.json")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_page("/nonexistent/page.json"),
            Err(Error::Io(_))
        ));
    }
}
