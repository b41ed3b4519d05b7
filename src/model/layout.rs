//! Ordered box collection for a single page.

use super::{BoundingBox, OcrBox};
use crate::error::{Error, Result};

/// The boxes of one page in reading order.
///
/// After every public mutation the `order` of each box equals its position
/// in the sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    boxes: Vec<OcrBox>,

    /// Analyzable page region
    pub region: BoundingBox,

    /// Height of the header band excluded from analysis
    pub header_y: i32,

    /// Height of the footer band excluded from analysis
    pub footer_y: i32,
}

impl PageLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout from boxes, renumbering them by position.
    pub fn from_boxes(boxes: Vec<OcrBox>) -> Self {
        let mut layout = Self {
            boxes,
            ..Default::default()
        };
        layout.renumber();
        layout
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if the layout has no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes in reading order.
    pub fn boxes(&self) -> &[OcrBox] {
        &self.boxes
    }

    /// Iterate over boxes in reading order.
    pub fn iter(&self) -> std::slice::Iter<'_, OcrBox> {
        self.boxes.iter()
    }

    /// Iterate mutably over boxes in reading order.
    ///
    /// Callers must not rely on changing `order` through this iterator; the
    /// next structural mutation renumbers.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, OcrBox> {
        self.boxes.iter_mut()
    }

    /// Highest order value, or `None` for an empty layout.
    pub fn max_order(&self) -> Option<usize> {
        self.boxes.iter().map(|b| b.order).max()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.boxes.len() {
            Ok(())
        } else {
            Err(Error::InvalidIndex {
                index,
                len: self.boxes.len(),
            })
        }
    }

    /// Get a box by position.
    pub fn get(&self, index: usize) -> Option<&OcrBox> {
        self.boxes.get(index)
    }

    /// Get a box by position, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut OcrBox> {
        self.boxes.get_mut(index)
    }

    /// Get a box by id.
    pub fn get_by_id(&self, id: &str) -> Option<&OcrBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Get a box by id, mutably.
    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut OcrBox> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    /// Position of the box with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == id)
    }

    /// Insert a box at `index`, or append it when `index` is `None`.
    pub fn add(&mut self, ocr_box: OcrBox, index: Option<usize>) -> Result<()> {
        match index {
            None => self.boxes.push(ocr_box),
            Some(i) if i <= self.boxes.len() => self.boxes.insert(i, ocr_box),
            Some(i) => {
                return Err(Error::InvalidIndex {
                    index: i,
                    len: self.boxes.len(),
                })
            }
        }
        self.renumber();
        Ok(())
    }

    /// Append several boxes, keeping their relative order.
    pub fn extend(&mut self, boxes: impl IntoIterator<Item = OcrBox>) {
        self.boxes.extend(boxes);
        self.renumber();
    }

    /// Remove and return the box at `index`.
    pub fn remove(&mut self, index: usize) -> Result<OcrBox> {
        self.check_index(index)?;
        let removed = self.boxes.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Remove and return the box with the given id.
    pub fn remove_by_id(&mut self, id: &str) -> Result<OcrBox> {
        let index = self
            .index_of(id)
            .ok_or_else(|| Error::BoxNotFound(id.to_string()))?;
        self.remove(index)
    }

    /// Move the box at `from` so that it ends up at position `to`.
    pub fn move_box(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let ocr_box = self.boxes.remove(from);
        self.boxes.insert(to, ocr_box);
        self.renumber();
        Ok(())
    }

    /// Replace the box at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, ocr_box: OcrBox) -> Result<OcrBox> {
        self.check_index(index)?;
        let old = std::mem::replace(&mut self.boxes[index], ocr_box);
        self.renumber();
        Ok(old)
    }

    /// Replace all boxes.
    pub fn set_boxes(&mut self, boxes: Vec<OcrBox>) {
        self.boxes = boxes;
        self.renumber();
    }

    /// Stable sort by the current `order` values, then renumber.
    pub fn sort_by_order(&mut self) {
        self.boxes.sort_by_key(|b| b.order);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (index, ocr_box) in self.boxes.iter_mut().enumerate() {
            ocr_box.order = index;
        }
    }

    /// Set the full page region (usually the image extent).
    pub fn set_region(&mut self, region: BoundingBox) {
        self.region = region;
    }

    /// Set the header band height.
    pub fn set_header(&mut self, header_y: i32) {
        self.header_y = header_y;
    }

    /// Set the footer band height.
    pub fn set_footer(&mut self, footer_y: i32) {
        self.footer_y = footer_y;
    }

    /// Region used for analysis: the page region without header and footer bands.
    pub fn page_region(&self) -> BoundingBox {
        BoundingBox::new(
            self.region.x,
            self.header_y,
            self.region.width,
            self.region.height - self.header_y - self.footer_y,
        )
    }
}

impl<'a> IntoIterator for &'a PageLayout {
    type Item = &'a OcrBox;
    type IntoIter = std::slice::Iter<'a, OcrBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoxType;

    fn layout_with(n: usize) -> PageLayout {
        PageLayout::from_boxes(
            (0..n)
                .map(|i| OcrBox::with_geometry(0, i as i32 * 10, 10, 10, BoxType::FlowingText))
                .collect(),
        )
    }

    fn orders(layout: &PageLayout) -> Vec<usize> {
        layout.iter().map(|b| b.order).collect()
    }

    #[test]
    fn test_add_renumbers() {
        let mut layout = layout_with(2);
        let inserted = OcrBox::with_geometry(0, 0, 1, 1, BoxType::Table).with_order(99);
        let id = inserted.id.clone();
        layout.add(inserted, Some(0)).unwrap();

        assert_eq!(orders(&layout), vec![0, 1, 2]);
        assert_eq!(layout.index_of(&id), Some(0));
    }

    #[test]
    fn test_move_box() {
        let mut layout = layout_with(4);
        let id = layout.get(0).unwrap().id.clone();
        layout.move_box(0, 3).unwrap();

        assert_eq!(layout.index_of(&id), Some(3));
        assert_eq!(layout.get(3).unwrap().order, 3);
        assert_eq!(orders(&layout), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut layout = layout_with(3);
        let id = layout.get(1).unwrap().id.clone();
        let removed = layout.remove_by_id(&id).unwrap();

        assert_eq!(removed.id, id);
        assert_eq!(orders(&layout), vec![0, 1]);
        assert!(layout.get_by_id(&id).is_none());
        assert!(matches!(
            layout.remove_by_id("missing"),
            Err(Error::BoxNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_index_leaves_layout_untouched() {
        let mut layout = layout_with(2);
        let before = layout.clone();

        assert!(matches!(
            layout.remove(5),
            Err(Error::InvalidIndex { index: 5, len: 2 })
        ));
        assert!(layout.move_box(0, 2).is_err());
        assert!(layout
            .add(OcrBox::with_geometry(0, 0, 1, 1, BoxType::Noise), Some(7))
            .is_err());
        assert_eq!(layout, before);
    }

    #[test]
    fn test_sort_by_order_is_stable() {
        let mut layout = layout_with(3);
        let ids: Vec<String> = layout.iter().map(|b| b.id.clone()).collect();
        for (ocr_box, order) in layout.iter_mut().zip([5, 1, 5]) {
            ocr_box.order = order;
        }
        layout.sort_by_order();

        let sorted: Vec<String> = layout.iter().map(|b| b.id.clone()).collect();
        assert_eq!(sorted, vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]);
        assert_eq!(orders(&layout), vec![0, 1, 2]);
    }

    #[test]
    fn test_page_region_excludes_header_and_footer() {
        let mut layout = PageLayout::new();
        layout.set_region(BoundingBox::new(0, 0, 2480, 3508));
        layout.set_header(200);
        layout.set_footer(300);
        assert_eq!(layout.page_region(), BoundingBox::new(0, 200, 2480, 3008));
    }
}
