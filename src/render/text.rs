//! Page-level text extraction that honours boxes flowing into each other.

use super::{ResultWriter, RichText};
use crate::model::{OcrBox, PageLayout, ResultBlock};

/// Plain text of all text boxes on the page, in reading order.
///
/// Boxes are separated by a newline, unless the earlier box flows into the
/// next one: then they are joined by a space, or directly when the earlier
/// text ends in a hyphen.
pub fn page_text(layout: &PageLayout) -> String {
    let mut output = String::new();
    let mut flows = false;

    for ocr_box in layout.iter().filter(|b| b.is_text_box()) {
        let text = ocr_box.display_text();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if !output.is_empty() {
            if !flows {
                output.push('\n');
            } else if !output.ends_with('-') {
                output.push(' ');
            }
        }

        output.push_str(text);
        flows = ocr_box.flows_into_next();
    }

    output
}

/// Reconstruct several boxes as one text.
///
/// When a box flows into the next, its last paragraph and the next box's
/// first paragraph are treated as one paragraph, so hyphenation across the
/// box boundary is resolved like any other line break.
pub fn reconstruct_boxes(boxes: &[&OcrBox], writer: &ResultWriter) -> RichText {
    let mut blocks: Vec<ResultBlock> = Vec::new();
    let mut joins_previous = false;

    for ocr_box in boxes {
        let Some(results) = ocr_box.results.as_ref() else {
            joins_previous = false;
            continue;
        };

        match blocks.last_mut() {
            Some(last) if joins_previous => append_flowing(last, results),
            _ => blocks.push(results.clone()),
        }
        joins_previous = ocr_box.flows_into_next();
    }

    let refs: Vec<&ResultBlock> = blocks.iter().collect();
    writer.write(&refs)
}

/// Reconstruct the chain of flowing boxes that contains the box at `index`.
///
/// Returns `None` when the index is out of range.
pub fn reconstruct_flow(layout: &PageLayout, index: usize, writer: &ResultWriter) -> Option<RichText> {
    layout.get(index)?;
    let boxes = layout.boxes();

    let mut start = index;
    while start > 0 && boxes[start - 1].flows_into_next() {
        start -= 1;
    }
    let mut end = index;
    while end + 1 < boxes.len() && boxes[end].flows_into_next() {
        end += 1;
    }

    let chain: Vec<&OcrBox> = boxes[start..=end].iter().collect();
    Some(reconstruct_boxes(&chain, writer))
}

fn append_flowing(target: &mut ResultBlock, next: &ResultBlock) {
    let mut paragraphs = next.paragraphs.iter();

    if let (Some(last), Some(first)) = (target.paragraphs.last_mut(), next.paragraphs.first()) {
        last.lines.extend(first.lines.iter().cloned());
        paragraphs.next();
    }

    target.paragraphs.extend(paragraphs.cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxType, ResultLine, ResultParagraph, ResultWord};
    use crate::render::{HyphenDecision, ReconstructOptions};

    fn block(lines: &[&[&str]]) -> ResultBlock {
        ResultBlock::new(vec![ResultParagraph::new(
            lines
                .iter()
                .map(|words| {
                    ResultLine::new(words.iter().map(|w| ResultWord::from_text(*w, 95.0)).collect())
                })
                .collect(),
        )])
    }

    fn text_box(lines: &[&[&str]], flows: bool) -> OcrBox {
        let mut ocr_box =
            OcrBox::with_geometry(0, 0, 100, 20, BoxType::FlowingText).with_results(block(lines));
        ocr_box.set_flows_into_next(flows);
        ocr_box
    }

    #[test]
    fn test_page_text_separators() {
        let image = OcrBox::with_geometry(0, 0, 10, 10, BoxType::FlowingImage);
        let layout = PageLayout::from_boxes(vec![
            text_box(&[&["Heading"]], false),
            image,
            text_box(&[&["first", "half"]], true),
            text_box(&[&["second", "half"]], false),
            text_box(&[&["Broken", "exam-"]], true),
            text_box(&[&["ple"]], false),
        ]);

        assert_eq!(
            page_text(&layout),
            "Heading\nfirst half second half\nBroken exam-ple"
        );
    }

    #[test]
    fn test_page_text_uses_user_text() {
        let mut corrected = text_box(&[&["teh"]], false);
        corrected.set_user_text("the");
        let layout = PageLayout::from_boxes(vec![corrected]);
        assert_eq!(page_text(&layout), "the");
    }

    #[test]
    fn test_reconstruct_flow_merges_across_boxes() {
        let layout = PageLayout::from_boxes(vec![
            text_box(&[&["Title"]], false),
            text_box(&[&["an", "exam-"]], true),
            text_box(&[&["ple", "here"]], false),
        ]);
        let writer = ResultWriter::new(ReconstructOptions::default());

        let text = reconstruct_flow(&layout, 2, &writer).unwrap();
        assert_eq!(text.plain_text(), "an example here");
        assert_eq!(text.hyphenations.len(), 1);
        assert_eq!(text.hyphenations[0].decision, HyphenDecision::Merge);

        assert!(reconstruct_flow(&layout, 7, &writer).is_none());
    }
}
