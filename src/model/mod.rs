//! Box and layout model for scanned pages.
//!
//! This module defines the geometric primitives, the box type taxonomy, the
//! boxes themselves, the recognition result tree they carry, and the ordered
//! layout that owns them. The structural records used for persistence live
//! here as well.

mod box_type;
mod geometry;
mod layout;
mod ocr_box;
mod record;
mod result;

pub use box_type::{BoxType, BoxVariant};
pub use geometry::BoundingBox;
pub use layout::PageLayout;
pub use ocr_box::{BoxContent, Observer, OcrBox, TextContent, UserData, SOURCE_BACKEND};
pub use record::{BoxRecord, LayoutRecord, PageBody, PageRecord};
pub use result::{Baseline, ResultBlock, ResultLine, ResultParagraph, ResultSymbol, ResultWord};
