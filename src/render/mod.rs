//! Text reconstruction and output rendering.
//!
//! The [`ResultWriter`] turns recognition results into [`RichText`]: plain
//! text plus styled runs that flag low-confidence symbols and resolved
//! hyphenations. Page-level helpers join boxes into one text, and the JSON
//! renderer serializes page records and export payloads.

mod dictionary;
mod export;
mod json;
mod rich;
mod text;
mod writer;

pub use dictionary::{Dictionary, WordListDictionary};
pub use export::{BoxExport, PageExport};
pub use json::{to_json, JsonFormat};
pub use rich::{confidence_color, Color, HyphenDecision, Hyphenation, RichText, RunStyle, TextRun};
pub use text::{page_text, reconstruct_boxes, reconstruct_flow};
pub use writer::{reconstruct, ReconstructOptions, ResultWriter};
