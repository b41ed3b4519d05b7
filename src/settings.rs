//! Project settings passed explicitly to pages and the text reconstructor.

use crate::error::{Error, Result};
use crate::model::BoxType;
use crate::render::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings that influence analysis filtering and text reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recognition languages, first one is the document language
    pub langs: Vec<String>,

    /// Box types kept after layout analysis (`None` keeps all)
    pub box_types: Option<Vec<BoxType>>,

    /// Minimum width of analyzed boxes (0 = no limit)
    pub x_size_threshold: i32,

    /// Minimum height of analyzed boxes (0 = no limit)
    pub y_size_threshold: i32,

    /// Words and symbols below this confidence are highlighted
    pub confidence_color_threshold: f32,

    /// Foreground for hyphenated words that were merged
    pub merged_word_in_dict_color: Color,

    /// Foreground for hyphenated words that were kept split
    pub merged_word_not_in_dict_color: Color,

    /// Continuations that never merge with a preceding hyphenated fragment
    pub hyphenation_reject_list: Vec<String>,

    /// Consult the dictionary before merging hyphenated words
    pub spell_check_hyphenation: bool,
}

impl Settings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(data: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(data).map_err(|e| Error::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.x_size_threshold < 0 || self.y_size_threshold < 0 {
            return Err(Error::Settings(
                "size thresholds must not be negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.confidence_color_threshold) {
            return Err(Error::Settings(format!(
                "confidence_color_threshold {} is outside 0-100",
                self.confidence_color_threshold
            )));
        }
        Ok(())
    }

    /// Primary document language.
    pub fn language(&self) -> &str {
        self.langs.first().map_or("eng", String::as_str)
    }

    /// Set recognition languages.
    pub fn with_langs<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.langs = langs.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only these box types after analysis.
    pub fn with_box_types(mut self, box_types: Vec<BoxType>) -> Self {
        self.box_types = Some(box_types);
        self
    }

    /// Set minimum box size kept after analysis.
    pub fn with_size_threshold(mut self, width: i32, height: i32) -> Self {
        self.x_size_threshold = width;
        self.y_size_threshold = height;
        self
    }

    /// Set the confidence highlight threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_color_threshold = threshold;
        self
    }

    /// Set the hyphenation reject list.
    pub fn with_reject_list<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hyphenation_reject_list = words.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the dictionary check for hyphenated words.
    pub fn with_spell_check(mut self, enabled: bool) -> Self {
        self.spell_check_hyphenation = enabled;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            langs: vec!["eng".to_string()],
            box_types: None,
            x_size_threshold: 0,
            y_size_threshold: 0,
            confidence_color_threshold: 50.0,
            merged_word_in_dict_color: Color::rgba(0, 255, 0, 255),
            merged_word_not_in_dict_color: Color::rgba(255, 0, 0, 255),
            hyphenation_reject_list: Vec::new(),
            spell_check_hyphenation: false,
        }
    }
}
