//! Integration tests for boxes and page layouts.

use std::sync::{Arc, Mutex};

use pagescan::{
    BoundingBox, BoxType, BoxVariant, OcrBox, PageLayout, ResultBlock, ResultLine,
    ResultParagraph, ResultWord,
};

fn results() -> ResultBlock {
    ResultBlock::new(vec![ResultParagraph::new(vec![ResultLine::new(vec![
        ResultWord::from_text("recognized", 88.0),
    ])])])
}

fn assert_contiguous(layout: &PageLayout) {
    let orders: Vec<usize> = layout.iter().map(|b| b.order).collect();
    let expected: Vec<usize> = (0..layout.len()).collect();
    assert_eq!(orders, expected);
}

#[test]
fn test_order_stays_contiguous_under_edits() {
    let mut layout = PageLayout::new();
    // Deterministic mix of inserts, moves and removals
    let mut seed: usize = 17;
    for step in 0..200 {
        seed = (seed * 31 + 7) % 1009;
        let len = layout.len();
        match seed % 4 {
            0 | 1 => {
                let at = if len == 0 { None } else { Some(seed % (len + 1)) };
                let ocr_box =
                    OcrBox::with_geometry(0, step, 10, 10, BoxType::FlowingText).with_order(999);
                layout.add(ocr_box, at).unwrap();
            }
            2 if len > 1 => layout.move_box(seed % len, (seed / 3) % len).unwrap(),
            3 if len > 0 => {
                layout.remove(seed % len).unwrap();
            }
            _ => {}
        }
        assert_contiguous(&layout);
    }
}

#[test]
fn test_invalid_indices_are_rejected() {
    let mut layout = PageLayout::from_boxes(vec![
        OcrBox::with_geometry(0, 0, 10, 10, BoxType::FlowingText),
        OcrBox::with_geometry(0, 20, 10, 10, BoxType::Table),
    ]);
    let before = layout.clone();

    assert!(layout.remove(2).is_err());
    assert!(layout.move_box(0, 2).is_err());
    assert!(layout
        .add(OcrBox::with_geometry(0, 0, 1, 1, BoxType::Noise), Some(3))
        .is_err());
    assert!(layout
        .replace(5, OcrBox::with_geometry(0, 0, 1, 1, BoxType::Noise))
        .is_err());
    assert!(layout.remove_by_id("missing").is_err());

    assert_eq!(layout, before);
}

#[test]
fn test_shrink_then_expand_restores_geometry() {
    for (width, height, amount) in [(100, 50, 10), (30, 30, 15), (7, 200, 3)] {
        let mut ocr_box = OcrBox::with_geometry(40, 60, width, height, BoxType::FlowingText);
        let original = ocr_box.bbox;
        ocr_box.shrink(amount);
        ocr_box.expand(amount);
        assert_eq!(ocr_box.bbox, original);
    }
}

#[test]
fn test_shrink_clamps_at_zero() {
    let mut ocr_box = OcrBox::with_geometry(0, 0, 10, 40, BoxType::FlowingText);
    ocr_box.shrink(8);
    assert_eq!(ocr_box.bbox.width, 0);
    assert_eq!(ocr_box.bbox.height, 24);
}

#[test]
fn test_conversion_between_text_types_keeps_results() {
    let text_types: Vec<BoxType> = BoxType::ALL
        .into_iter()
        .filter(|t| t.variant() == BoxVariant::Text)
        .collect();
    let image_types: Vec<BoxType> = BoxType::ALL
        .into_iter()
        .filter(|t| t.is_image())
        .collect();

    for &from in &text_types {
        let source = OcrBox::with_geometry(0, 0, 10, 10, from).with_results(results());

        for &to in &text_types {
            let converted = source.convert_to(to);
            assert_eq!(converted.results, source.results, "{} -> {}", from, to);
            assert!(converted.is_text_box());
        }
        for &to in &image_types {
            let converted = source.convert_to(to);
            assert!(converted.results.is_none(), "{} -> {}", from, to);
            assert_eq!(converted.id, source.id);
        }
    }
}

#[test]
fn test_geometry_updates_notify_other_parties() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut ocr_box = OcrBox::with_geometry(10, 10, 100, 100, BoxType::FlowingText);

    for party in ["editor", "minimap"] {
        let log = Arc::clone(&log);
        ocr_box.add_observer(Some(party), move |b: &OcrBox, source: Option<&str>| {
            log.lock()
                .unwrap()
                .push(format!("{}:{}:{}", party, source.unwrap_or("-"), b.bbox.x));
        });
    }

    ocr_box.update_position(5, 0, Some("editor"));
    ocr_box.update_size(50, 50, None);

    assert_eq!(
        log.lock().unwrap().as_slice(),
        &["minimap:editor:15", "editor:-:15", "minimap:-:15"]
    );
    assert_eq!(ocr_box.bbox, BoundingBox::new(15, 10, 50, 50));
    assert_eq!(ocr_box.update_source(), None);
}

#[test]
fn test_observer_sees_update_source_during_notification() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let mut ocr_box = OcrBox::with_geometry(0, 0, 10, 10, BoxType::Table);
    ocr_box.add_observer(None, move |b: &OcrBox, _source: Option<&str>| {
        *sink.lock().unwrap() = b.update_source().map(str::to_string);
    });

    ocr_box.set_geometry(BoundingBox::new(1, 1, 5, 5), Some("Backend"));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Backend"));
}

#[test]
fn test_lookup_by_id_and_reorder() {
    let boxes: Vec<OcrBox> = (0..4)
        .map(|i| OcrBox::with_geometry(0, i * 10, 10, 10, BoxType::FlowingText))
        .collect();
    let ids: Vec<String> = boxes.iter().map(|b| b.id.clone()).collect();
    let mut layout = PageLayout::from_boxes(boxes);

    layout.move_box(3, 0).unwrap();
    assert_eq!(layout.index_of(&ids[3]), Some(0));
    assert_eq!(layout.get_by_id(&ids[0]).unwrap().order, 1);

    let removed = layout.remove_by_id(&ids[1]).unwrap();
    assert_eq!(removed.id, ids[1]);
    assert_eq!(layout.len(), 3);
    assert_contiguous(&layout);
}
