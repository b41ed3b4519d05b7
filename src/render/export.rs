//! Per-page export payload handed to format writers.

use crate::model::{BoundingBox, BoxType, PageLayout, ResultBlock, UserData};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// Everything an exporter needs to know about one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExport {
    /// Image reference
    pub image_path: Option<String>,

    /// Position among sibling pages
    pub order: u32,

    /// Document language
    pub lang: String,

    /// Boxes in reading order
    pub boxes: Vec<BoxExport>,
}

/// Export view of one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxExport {
    /// Box identity
    pub id: String,

    /// Reading order position
    pub order: usize,

    /// Geometry
    pub position: BoundingBox,

    /// Box type
    #[serde(rename = "type")]
    pub box_type: BoxType,

    /// User data
    pub user_data: UserData,

    /// Box confidence
    pub confidence: f64,

    /// Recognition result
    pub ocr_results: Option<ResultBlock>,

    /// Trimmed operator text (text boxes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,

    /// Flow marker (text boxes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows_into_next: Option<bool>,
}

impl PageExport {
    /// Build the export payload for a page layout.
    pub fn new(
        image_path: Option<String>,
        order: u32,
        layout: &PageLayout,
        settings: &Settings,
    ) -> Self {
        let boxes = layout
            .iter()
            .map(|ocr_box| {
                let text = ocr_box.text_content();
                BoxExport {
                    id: ocr_box.id.clone(),
                    order: ocr_box.order,
                    position: ocr_box.bbox,
                    box_type: ocr_box.box_type(),
                    user_data: ocr_box.user_data.clone(),
                    confidence: ocr_box.confidence,
                    ocr_results: ocr_box.results.clone(),
                    user_text: text.map(|t| t.user_text.trim().to_string()),
                    flows_into_next: text.map(|t| t.flows_into_next),
                }
            })
            .collect();

        Self {
            image_path,
            order,
            lang: settings.language().to_string(),
            boxes,
        }
    }

    /// Boxes whose type carries text.
    pub fn text_boxes(&self) -> impl Iterator<Item = &BoxExport> {
        self.boxes.iter().filter(|b| b.box_type.is_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OcrBox;

    #[test]
    fn test_export_payload() {
        let mut text = OcrBox::with_geometry(0, 0, 10, 10, BoxType::CaptionText);
        text.set_user_text("  caption  ");
        text.set_flows_into_next(true);
        let image = OcrBox::with_geometry(0, 20, 10, 10, BoxType::FlowingImage);
        let layout = PageLayout::from_boxes(vec![text, image]);

        let export = PageExport::new(
            Some("scan.png".into()),
            2,
            &layout,
            &Settings::new().with_langs(["deu"]),
        );

        assert_eq!(export.lang, "deu");
        assert_eq!(export.boxes.len(), 2);
        assert_eq!(export.boxes[0].user_text.as_deref(), Some("caption"));
        assert_eq!(export.boxes[0].flows_into_next, Some(true));
        assert_eq!(export.boxes[1].user_text, None);
        assert_eq!(export.text_boxes().count(), 1);
    }
}
