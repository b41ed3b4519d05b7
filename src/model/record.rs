//! Structural records used to persist boxes, layouts and pages.
//!
//! Records are plain serde structs; JSON is the persisted form. Fields added
//! after the first record version carry defaults so older files still load.

use super::{BoundingBox, BoxContent, BoxType, OcrBox, PageLayout, ResultBlock, TextContent, UserData};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted form of a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    /// Box identity
    pub id: String,

    /// Reading order position
    #[serde(default)]
    pub order: usize,

    /// Geometry
    pub position: BoundingBox,

    /// Box type name (e.g. `"FLOWING_TEXT"`)
    #[serde(rename = "type")]
    pub box_type: String,

    /// Classification tag
    #[serde(default)]
    pub class: String,

    /// Free-form tag
    #[serde(default)]
    pub tag: String,

    /// Box confidence
    #[serde(default)]
    pub confidence: f64,

    /// Recognition result
    #[serde(default)]
    pub ocr_results: Option<ResultBlock>,

    /// Operator-edited text (text boxes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,

    /// Flow marker (text boxes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows_into_next: Option<bool>,

    /// Arbitrary user data
    #[serde(default, skip_serializing_if = "UserData::is_empty")]
    pub user_data: UserData,
}

impl BoxRecord {
    /// Decode a record from a generic JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Record(e.to_string()))
    }

    /// Encode the record as a generic JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl OcrBox {
    /// Structural record of the box.
    pub fn to_record(&self) -> BoxRecord {
        let text = self.text_content();
        BoxRecord {
            id: self.id.clone(),
            order: self.order,
            position: self.bbox,
            box_type: self.box_type().name().to_string(),
            class: self.class.clone(),
            tag: self.tag.clone(),
            confidence: self.confidence,
            ocr_results: self.results.clone(),
            user_text: text.map(|t| t.user_text.clone()),
            flows_into_next: text.map(|t| t.flows_into_next),
            user_data: self.user_data.clone(),
        }
    }

    /// Rebuild a box from its record.
    ///
    /// Fails with [`Error::UnknownBoxType`] when the type name is not known.
    pub fn from_record(record: BoxRecord) -> Result<OcrBox> {
        let box_type: BoxType = record.box_type.parse()?;
        let content = match BoxContent::for_variant(box_type.variant()) {
            BoxContent::Text(_) => BoxContent::Text(TextContent {
                user_text: record.user_text.unwrap_or_default(),
                flows_into_next: record.flows_into_next.unwrap_or(false),
            }),
            other => other,
        };

        let position = record.position;
        let mut ocr_box = OcrBox::from_parts(
            record.id,
            box_type,
            BoundingBox::new(position.x, position.y, position.width, position.height),
            content,
        );
        ocr_box.order = record.order;
        ocr_box.class = record.class;
        ocr_box.tag = record.tag;
        ocr_box.confidence = record.confidence;
        ocr_box.results = record.ocr_results;
        ocr_box.user_data = record.user_data;
        Ok(ocr_box)
    }
}

/// Persisted form of a page layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Boxes in reading order
    #[serde(default)]
    pub boxes: Vec<BoxRecord>,

    /// Page region as `[x, y, width, height]`
    #[serde(default)]
    pub region: [i32; 4],

    /// Header band height
    #[serde(default)]
    pub header_y: i32,

    /// Footer band height
    #[serde(default)]
    pub footer_y: i32,
}

impl PageLayout {
    /// Structural record of the layout.
    pub fn to_record(&self) -> LayoutRecord {
        LayoutRecord {
            boxes: self.iter().map(OcrBox::to_record).collect(),
            region: self.region.to_array(),
            header_y: self.header_y,
            footer_y: self.footer_y,
        }
    }

    /// Rebuild a layout from its record. Boxes are renumbered by position.
    pub fn from_record(record: LayoutRecord) -> Result<PageLayout> {
        let boxes = record
            .boxes
            .into_iter()
            .map(OcrBox::from_record)
            .collect::<Result<Vec<_>>>()?;

        let mut layout = PageLayout::from_boxes(boxes);
        layout.region = BoundingBox::from_array(record.region);
        layout.header_y = record.header_y;
        layout.footer_y = record.footer_y;
        Ok(layout)
    }
}

/// Persisted form of a page: `{"page": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page body
    pub page: PageBody,
}

/// Body of a [`PageRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
    /// Image reference
    #[serde(default)]
    pub image_path: Option<String>,

    /// Position among sibling pages
    #[serde(default)]
    pub order: u32,

    /// Box layout
    #[serde(default)]
    pub layout: LayoutRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResultLine, ResultParagraph, ResultWord};
    use serde_json::json;

    #[test]
    fn test_box_record_round_trip_every_type() {
        for box_type in BoxType::ALL {
            let mut ocr_box = OcrBox::with_geometry(100, 750, 230, 50, box_type)
                .with_order(1)
                .with_confidence(0.9);
            ocr_box.class = "c".into();
            ocr_box.tag = "t".into();
            ocr_box.set_flows_into_next(true);
            ocr_box.user_data.insert("note".into(), json!("checked"));
            if box_type.is_text() {
                ocr_box.set_user_text("corrected");
                ocr_box.results = Some(ResultBlock::new(vec![ResultParagraph::new(vec![
                    ResultLine::new(vec![ResultWord::from_text("word", 80.0)]),
                ])]));
            }

            let loaded = OcrBox::from_record(ocr_box.to_record()).unwrap();
            assert_eq!(loaded, ocr_box, "round trip failed for {}", box_type);
            assert_eq!(loaded.to_record(), ocr_box.to_record());
        }
    }

    #[test]
    fn test_legacy_defaults() {
        let record = BoxRecord::from_value(json!({
            "id": "abc",
            "position": {"x": 1, "y": 2, "width": 3, "height": 4},
            "type": "FLOWING_TEXT"
        }))
        .unwrap();
        let ocr_box = OcrBox::from_record(record).unwrap();

        assert_eq!(ocr_box.order, 0);
        assert_eq!(ocr_box.class, "");
        assert_eq!(ocr_box.tag, "");
        assert_eq!(ocr_box.confidence, 0.0);
        assert_eq!(ocr_box.user_text(), "");
        assert!(ocr_box.results.is_none());
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let result = BoxRecord::from_value(json!({
            "id": "abc",
            "type": "TABLE"
        }));
        assert!(matches!(result, Err(Error::Record(_))));
    }

    #[test]
    fn test_unknown_type_is_error() {
        let record = BoxRecord::from_value(json!({
            "id": "abc",
            "position": {"x": 0, "y": 0, "width": 1, "height": 1},
            "type": "SIDEBAR"
        }))
        .unwrap();
        assert!(matches!(
            OcrBox::from_record(record),
            Err(Error::UnknownBoxType(_))
        ));
    }

    #[test]
    fn test_layout_record_round_trip() {
        let mut layout = PageLayout::from_boxes(vec![
            OcrBox::with_geometry(0, 0, 10, 10, BoxType::HeadingText),
            OcrBox::with_geometry(0, 20, 10, 10, BoxType::FlowingImage),
        ]);
        layout.set_region(BoundingBox::new(0, 0, 100, 200));
        layout.set_header(10);
        layout.set_footer(20);

        let record = layout.to_record();
        assert_eq!(record.region, [0, 0, 100, 200]);

        let json = serde_json::to_string(&record).unwrap();
        let parsed: LayoutRecord = serde_json::from_str(&json).unwrap();
        let loaded = PageLayout::from_record(parsed).unwrap();
        assert_eq!(loaded, layout);
    }
}
