//! Styled text produced by the reconstructor.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// An RGBA color, serialized as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Create a color from components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hex form `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::Other(format!("Invalid color: {}", s));

        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let component = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { component(6)? } else { 255 };
        Ok(Color::rgba(component(0)?, component(2)?, component(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Background color for a unit whose confidence is below `threshold`.
///
/// Ramps from red (confidence 0) to yellow (confidence at the threshold).
pub fn confidence_color(confidence: f32, threshold: f32) -> Color {
    let ratio = if threshold > 0.0 {
        (confidence / threshold).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Color::rgba(255, (255.0 * ratio).round() as u8, 0, 128)
}

/// Styling of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Text color (hyphenation outcome)
    pub color: Option<Color>,

    /// Background color (low confidence)
    pub background_color: Option<Color>,
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Run styling
    pub style: RunStyle,
}

impl TextRun {
    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    /// Create a run with the given background.
    pub fn with_background(text: impl Into<String>, background: Option<Color>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle {
                color: None,
                background_color: background,
            },
        }
    }

    /// Check if the run is flagged as low confidence.
    pub fn is_flagged(&self) -> bool {
        self.style.background_color.is_some()
    }
}

/// How a hyphenated line break was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyphenDecision {
    /// Fragments joined into one word without the hyphen
    Merge,
    /// Fragments kept apart with the hyphen
    KeepSplit,
}

/// A resolved hyphenation point in the reconstructed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyphenation {
    /// Character range of the rendered word(s) in the plain text
    pub range: Range<usize>,

    /// Outcome
    pub decision: HyphenDecision,

    /// Fragment before the line break, including the hyphen
    pub first_part: String,

    /// Fragment after the line break
    pub second_part: String,
}

/// Reconstructed text: styled runs plus the hyphenation decisions taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// Styled runs in reading order
    pub runs: Vec<TextRun>,

    /// Hyphenation points in reading order
    pub hyphenations: Vec<Hyphenation>,
}

impl RichText {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text without styling.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Number of characters in the plain text.
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    /// Check if the document has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    /// Append a run, coalescing it with the previous one when styles match.
    pub fn push(&mut self, run: TextRun) {
        if run.text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == run.style => last.text.push_str(&run.text),
            _ => self.runs.push(run),
        }
    }

    /// Append plain text.
    pub fn push_str(&mut self, text: &str) {
        self.push(TextRun::plain(text));
    }

    /// Character ranges of low-confidence runs, adjacent ranges joined.
    pub fn flagged_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut offset = 0;

        for run in &self.runs {
            let len = run.text.chars().count();
            if run.is_flagged() {
                match ranges.last_mut() {
                    Some(last) if last.end == offset => last.end = offset + len,
                    _ => ranges.push(offset..offset + len),
                }
            }
            offset += len;
        }

        ranges
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!("#00FF00".parse::<Color>().unwrap(), Color::rgba(0, 255, 0, 255));
        assert_eq!(
            "ff000080".parse::<Color>().unwrap(),
            Color::rgba(255, 0, 0, 128)
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_serde() {
        let json = serde_json::to_string(&Color::rgba(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let parsed: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Color::rgba(1, 2, 3, 4));
    }

    #[test]
    fn test_confidence_color_ramp() {
        assert_eq!(confidence_color(0.0, 50.0), Color::rgba(255, 0, 0, 128));
        assert_eq!(confidence_color(50.0, 50.0), Color::rgba(255, 255, 0, 128));
        assert_eq!(confidence_color(25.0, 50.0).g, 128);
    }

    #[test]
    fn test_push_coalesces_equal_styles() {
        let mut text = RichText::new();
        text.push_str("ab");
        text.push_str("c");
        text.push(TextRun::with_background("d", Some(Color::rgba(1, 1, 1, 1))));
        assert_eq!(text.runs.len(), 2);
        assert_eq!(text.plain_text(), "abcd");
    }

    #[test]
    fn test_flagged_ranges() {
        let low = Some(Color::rgba(255, 0, 0, 128));
        let lower = Some(Color::rgba(255, 10, 0, 128));
        let mut text = RichText::new();
        text.push_str("ok ");
        text.push(TextRun::with_background("ba", low));
        text.push(TextRun::with_background("d", lower));
        text.push_str(" fine ");
        text.push(TextRun::with_background("x", low));

        assert_eq!(text.flagged_ranges(), vec![3..6, 12..13]);
    }
}
