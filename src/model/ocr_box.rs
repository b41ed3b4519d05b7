//! Classified page regions ("boxes") and their change notification.

use super::{BoundingBox, BoxType, BoxVariant, ResultBlock};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Source tag used for notifications raised by page analysis and recognition.
pub const SOURCE_BACKEND: &str = "Backend";

/// Change callback registered on a box.
///
/// Receives the box after the change and the source tag of whoever
/// committed it.
pub type Observer = Arc<dyn Fn(&OcrBox, Option<&str>) + Send + Sync>;

#[derive(Clone)]
struct ObserverEntry {
    tag: Option<String>,
    callback: Observer,
}

/// Free-form per-box data attached by the editing surface or exporters.
pub type UserData = BTreeMap<String, Value>;

/// State carried only by text boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextContent {
    /// Operator-edited text, authoritative over recognized text once non-empty
    pub user_text: String,

    /// Text continues into the next box in reading order
    pub flows_into_next: bool,
}

/// Variant-specific payload of a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxContent {
    /// Unclassified or ignored region
    Generic,
    /// Text region
    Text(TextContent),
    /// Image region
    Image,
    /// Rule line
    Line,
    /// Standalone equation
    Equation,
    /// Table
    Table,
    /// Noise
    Noise,
    /// Count region
    Count,
}

impl BoxContent {
    /// Fresh payload for a variant.
    pub fn for_variant(variant: BoxVariant) -> Self {
        match variant {
            BoxVariant::Generic => BoxContent::Generic,
            BoxVariant::Text => BoxContent::Text(TextContent::default()),
            BoxVariant::Image => BoxContent::Image,
            BoxVariant::Line => BoxContent::Line,
            BoxVariant::Equation => BoxContent::Equation,
            BoxVariant::Table => BoxContent::Table,
            BoxVariant::Noise => BoxContent::Noise,
            BoxVariant::Count => BoxContent::Count,
        }
    }

    /// The variant of this payload.
    pub fn variant(&self) -> BoxVariant {
        match self {
            BoxContent::Generic => BoxVariant::Generic,
            BoxContent::Text(_) => BoxVariant::Text,
            BoxContent::Image => BoxVariant::Image,
            BoxContent::Line => BoxVariant::Line,
            BoxContent::Equation => BoxVariant::Equation,
            BoxContent::Table => BoxVariant::Table,
            BoxContent::Noise => BoxVariant::Noise,
            BoxContent::Count => BoxVariant::Count,
        }
    }
}

/// A classified rectangular region on a page.
///
/// The `order` field is maintained by the owning
/// [`PageLayout`](super::PageLayout); a box never renumbers itself.
#[derive(Clone)]
pub struct OcrBox {
    /// Stable identity, kept across conversions and refinements
    pub id: String,

    /// Reading order position within the page
    pub order: usize,

    /// Geometry on the page image
    pub bbox: BoundingBox,

    /// Classification tag
    pub class: String,

    /// Free-form tag (e.g. export hints such as `h1`)
    pub tag: String,

    /// Box confidence (0.0-1.0), meaningful once recognition has run
    pub confidence: f64,

    /// Recognition result, if recognition has run
    pub results: Option<ResultBlock>,

    /// Arbitrary user data
    pub user_data: UserData,

    box_type: BoxType,
    content: BoxContent,
    observers: Vec<ObserverEntry>,
    update_source: Option<String>,
}

impl OcrBox {
    /// Create a box of the variant mapped from `box_type`, with a fresh id.
    pub fn new(bbox: BoundingBox, box_type: BoxType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order: 0,
            bbox,
            class: String::new(),
            tag: String::new(),
            confidence: 0.0,
            results: None,
            user_data: UserData::new(),
            box_type,
            content: BoxContent::for_variant(box_type.variant()),
            observers: Vec::new(),
            update_source: None,
        }
    }

    /// Create a box from raw coordinates.
    pub fn with_geometry(x: i32, y: i32, width: i32, height: i32, box_type: BoxType) -> Self {
        Self::new(BoundingBox::new(x, y, width, height), box_type)
    }

    /// Set the order (builder style).
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set the confidence (builder style).
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attach a recognition result (builder style).
    pub fn with_results(mut self, results: ResultBlock) -> Self {
        self.results = Some(results);
        self
    }

    /// The box type.
    pub fn box_type(&self) -> BoxType {
        self.box_type
    }

    /// The variant the box is stored as.
    pub fn variant(&self) -> BoxVariant {
        self.content.variant()
    }

    /// Variant payload.
    pub fn content(&self) -> &BoxContent {
        &self.content
    }

    // ---- geometry ----

    /// Grow the box by `amount` on every side. Does not notify.
    pub fn expand(&mut self, amount: i32) {
        self.bbox.expand(amount);
    }

    /// Shrink the box by `amount` on every side, clamping at zero size. Does not notify.
    pub fn shrink(&mut self, amount: i32) {
        self.bbox.shrink(amount);
    }

    /// Check whether `other` lies fully inside this box.
    pub fn contains(&self, other: &OcrBox) -> bool {
        self.bbox.contains(&other.bbox)
    }

    /// Check whether the two boxes overlap.
    pub fn intersects(&self, other: &OcrBox) -> bool {
        self.bbox.intersects(&other.bbox)
    }

    /// Geometric similarity score relative to this box.
    pub fn similarity(&self, other: &OcrBox) -> f64 {
        self.bbox.similarity(&other.bbox)
    }

    /// Move the box by `(dx, dy)` and notify observers.
    pub fn update_position(&mut self, dx: i32, dy: i32, source: Option<&str>) {
        let (new_x, new_y) = (self.bbox.x + dx, self.bbox.y + dy);
        log::info!(
            "Updating box position: {} ({}, {}) -> ({}, {})",
            self.id,
            self.bbox.x,
            self.bbox.y,
            new_x,
            new_y
        );

        self.bbox.x = new_x;
        self.bbox.y = new_y;
        self.notify(source);
    }

    /// Resize the box and notify observers.
    pub fn update_size(&mut self, width: i32, height: i32, source: Option<&str>) {
        log::info!(
            "Updating box size: {} ({}, {}) -> ({}, {})",
            self.id,
            self.bbox.width,
            self.bbox.height,
            width,
            height
        );

        self.bbox.width = width.max(0);
        self.bbox.height = height.max(0);
        self.notify(source);
    }

    /// Replace the whole geometry and notify observers.
    pub fn set_geometry(&mut self, bbox: BoundingBox, source: Option<&str>) {
        self.bbox = bbox;
        self.notify(source);
    }

    // ---- observers ----

    /// Register a change callback.
    ///
    /// `tag` names the party the callback belongs to; notifications committed
    /// with that same source skip it, so a surface never hears back about its
    /// own edits.
    pub fn add_observer<F>(&mut self, tag: Option<&str>, callback: F)
    where
        F: Fn(&OcrBox, Option<&str>) + Send + Sync + 'static,
    {
        self.observers.push(ObserverEntry {
            tag: tag.map(str::to_string),
            callback: Arc::new(callback),
        });
    }

    /// Remove all change callbacks.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Number of registered callbacks.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Source of the notification currently being delivered, if any.
    pub fn update_source(&self) -> Option<&str> {
        self.update_source.as_deref()
    }

    /// Call observers in registration order, skipping those tagged `source`.
    pub fn notify(&mut self, source: Option<&str>) {
        self.update_source = source.map(str::to_string);

        let this: &OcrBox = self;
        for entry in &this.observers {
            if source.is_some() && entry.tag.as_deref() == source {
                continue;
            }
            (entry.callback)(this, source);
        }

        self.update_source = None;
    }

    /// Take over the observers of another box.
    pub(crate) fn adopt_observers(&mut self, other: &OcrBox) {
        self.observers = other.observers.clone();
    }

    // ---- text ----

    /// Check if the box is a text box.
    pub fn is_text_box(&self) -> bool {
        matches!(self.content, BoxContent::Text(_))
    }

    /// Text payload, for text boxes.
    pub fn text_content(&self) -> Option<&TextContent> {
        match &self.content {
            BoxContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text payload, for text boxes.
    pub fn text_content_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            BoxContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Operator-edited text (empty for non-text boxes).
    pub fn user_text(&self) -> &str {
        self.text_content().map_or("", |t| t.user_text.as_str())
    }

    /// Set the operator-edited text. Ignored for non-text boxes.
    pub fn set_user_text(&mut self, text: impl Into<String>) {
        match self.text_content_mut() {
            Some(content) => content.user_text = text.into(),
            None => log::warn!("Box {} is not a text box, user text ignored", self.id),
        }
    }

    /// Whether the text continues into the next box.
    pub fn flows_into_next(&self) -> bool {
        self.text_content().is_some_and(|t| t.flows_into_next)
    }

    /// Mark the text as continuing into the next box. Ignored for non-text boxes.
    pub fn set_flows_into_next(&mut self, flows: bool) {
        if let Some(content) = self.text_content_mut() {
            content.flows_into_next = flows;
        }
    }

    /// Plain text of the recognition result.
    pub fn recognized_text(&self) -> String {
        self.results.as_ref().map(ResultBlock::text).unwrap_or_default()
    }

    /// Check if recognition produced any text.
    pub fn has_text(&self) -> bool {
        self.results.as_ref().is_some_and(|r| !r.text().is_empty())
    }

    /// User text when set, recognized text otherwise.
    pub fn display_text(&self) -> String {
        let user_text = self.user_text();
        if user_text.is_empty() {
            self.recognized_text()
        } else {
            user_text.to_string()
        }
    }

    /// Check if text recognition should run on this box.
    pub fn is_recognizable(&self) -> bool {
        !matches!(
            self.variant(),
            BoxVariant::Image | BoxVariant::Line | BoxVariant::Noise
        ) && self.box_type != BoxType::Ignore
    }

    // ---- conversion ----

    /// Produce a box of the variant mapped from `box_type` taking over this
    /// box's identity.
    ///
    /// Id, order, class, tag, confidence, geometry, user data and observers are
    /// carried over. Recognition results are dropped when converting to an
    /// image or line type. Text payload survives text-to-text conversions.
    pub fn convert_to(&self, box_type: BoxType) -> OcrBox {
        let content = match (&self.content, box_type.variant()) {
            (BoxContent::Text(text), BoxVariant::Text) => BoxContent::Text(text.clone()),
            (_, variant) => BoxContent::for_variant(variant),
        };

        let results = if box_type.discards_results() {
            None
        } else {
            self.results.clone()
        };

        OcrBox {
            id: self.id.clone(),
            order: self.order,
            bbox: self.bbox,
            class: self.class.clone(),
            tag: self.tag.clone(),
            confidence: self.confidence,
            results,
            user_data: self.user_data.clone(),
            box_type,
            content,
            observers: self.observers.clone(),
            update_source: None,
        }
    }

    /// Merge `other` into this box.
    ///
    /// Geometry becomes the union, confidence the maximum; user data of
    /// `other` wins on conflicting keys; paragraphs of `other` are appended
    /// when both boxes carry results; for two text boxes the user text is
    /// joined with a space and the flow flag is taken from `other`.
    pub fn absorb(&mut self, other: OcrBox) {
        self.bbox = self.bbox.union(&other.bbox);
        self.confidence = self.confidence.max(other.confidence);
        self.user_data.extend(other.user_data);

        if let (Some(results), Some(other_results)) = (self.results.as_mut(), other.results) {
            results.paragraphs.extend(other_results.paragraphs);
        }

        if let (BoxContent::Text(text), BoxContent::Text(other_text)) =
            (&mut self.content, other.content)
        {
            text.user_text = match (text.user_text.is_empty(), other_text.user_text.is_empty()) {
                (_, true) => std::mem::take(&mut text.user_text),
                (true, false) => other_text.user_text,
                (false, false) => format!("{} {}", text.user_text, other_text.user_text),
            };
            text.flows_into_next = other_text.flows_into_next;
        }
    }

    /// Replace geometry, type, payload and results with those of `refined`,
    /// keeping this box's identity, order, user data and observers.
    pub(crate) fn refine_from(&mut self, refined: OcrBox) {
        self.bbox = refined.bbox;
        self.box_type = refined.box_type;
        self.content = refined.content;
        self.results = refined.results;
        self.confidence = refined.confidence;
        self.class = refined.class;
        self.tag = refined.tag;
    }

    pub(crate) fn from_parts(
        id: String,
        box_type: BoxType,
        bbox: BoundingBox,
        content: BoxContent,
    ) -> Self {
        let mut ocr_box = Self::new(bbox, box_type);
        ocr_box.id = id;
        ocr_box.content = content;
        ocr_box
    }
}

impl PartialEq for OcrBox {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.order == other.order
            && self.bbox == other.bbox
            && self.box_type == other.box_type
            && self.class == other.class
            && self.tag == other.tag
            && self.confidence == other.confidence
            && self.results == other.results
            && self.user_data == other.user_data
            && self.content == other.content
    }
}

impl fmt::Debug for OcrBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrBox")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("bbox", &self.bbox)
            .field("type", &self.box_type)
            .field("class", &self.class)
            .field("tag", &self.tag)
            .field("confidence", &self.confidence)
            .field("content", &self.content)
            .field("has_results", &self.results.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}
