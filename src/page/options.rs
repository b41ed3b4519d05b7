//! Per-call options for page analysis and recognition.

use crate::model::BoundingBox;

/// Options for [`Page::analyze`](super::Page::analyze).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOptions {
    /// Region to analyze; derived from the image and header/footer when `None`
    pub region: Option<BoundingBox>,

    /// Append to the existing boxes instead of replacing them
    pub keep_existing: bool,

    /// Drop boxes whose type is not in the settings allow-list
    pub filter_by_type: bool,

    /// Drop boxes smaller than the settings size thresholds
    pub filter_by_size: bool,
}

impl AnalyzeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze only this region.
    pub fn with_region(mut self, region: BoundingBox) -> Self {
        self.region = Some(region);
        self
    }

    /// Keep existing boxes and append the new ones.
    pub fn keep_existing(mut self, keep: bool) -> Self {
        self.keep_existing = keep;
        self
    }

    /// Enable or disable the box type filter.
    pub fn filter_by_type(mut self, enabled: bool) -> Self {
        self.filter_by_type = enabled;
        self
    }

    /// Enable or disable the minimum size filter.
    pub fn filter_by_size(mut self, enabled: bool) -> Self {
        self.filter_by_size = enabled;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            region: None,
            keep_existing: false,
            filter_by_type: true,
            filter_by_size: true,
        }
    }
}

/// Options for [`Page::recognize`](super::Page::recognize).
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizeOptions {
    /// Recognize only the box at this index
    pub box_index: Option<usize>,

    /// After whole-page recognition, turn text boxes without text into images
    pub convert_empty_to_image: bool,
}

impl RecognizeOptions {
    /// Create options with defaults (whole page, convert empty boxes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize a single box.
    pub fn single(index: usize) -> Self {
        Self::default().with_box_index(index)
    }

    /// Restrict recognition to one box.
    pub fn with_box_index(mut self, index: usize) -> Self {
        self.box_index = Some(index);
        self
    }

    /// Enable or disable conversion of empty text boxes.
    pub fn convert_empty_to_image(mut self, enabled: bool) -> Self {
        self.convert_empty_to_image = enabled;
        self
    }
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            box_index: None,
            convert_empty_to_image: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let options = AnalyzeOptions::new();
        assert!(options.region.is_none());
        assert!(!options.keep_existing);
        assert!(options.filter_by_type);
        assert!(options.filter_by_size);
    }

    #[test]
    fn test_analyze_builder() {
        let options = AnalyzeOptions::new()
            .with_region(BoundingBox::new(0, 0, 10, 10))
            .keep_existing(true)
            .filter_by_size(false);
        assert_eq!(options.region, Some(BoundingBox::new(0, 0, 10, 10)));
        assert!(options.keep_existing);
        assert!(!options.filter_by_size);
    }

    #[test]
    fn test_recognize_options() {
        let whole = RecognizeOptions::new();
        assert_eq!(whole.box_index, None);
        assert!(whole.convert_empty_to_image);

        let single = RecognizeOptions::single(3).convert_empty_to_image(false);
        assert_eq!(single.box_index, Some(3));
        assert!(!single.convert_empty_to_image);
    }
}
