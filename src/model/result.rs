//! Recognition result tree produced by the text recognition backend.
//!
//! The tree is `block -> paragraph -> line -> word -> symbol`. Confidence is
//! only attached to words and symbols, on the 0-100 scale the recognition
//! engine reports.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// Recognition result for one box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBlock {
    /// Paragraphs in reading order
    #[serde(default)]
    pub paragraphs: Vec<ResultParagraph>,
}

/// A paragraph of recognized lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultParagraph {
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<ResultLine>,
}

/// A recognized text line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultLine {
    /// Words in reading order
    #[serde(default)]
    pub words: Vec<ResultWord>,

    /// Baseline geometry for display, if the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
}

/// Line baseline as a start and end point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    /// Start x
    pub x1: i32,
    /// Start y
    pub y1: i32,
    /// End x
    pub x2: i32,
    /// End y
    pub y2: i32,
}

/// A recognized word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultWord {
    /// Word text
    pub text: String,

    /// Word confidence (0-100)
    #[serde(default)]
    pub confidence: f32,

    /// Word bounding box on the page
    #[serde(default)]
    pub bbox: BoundingBox,

    /// Per-character results
    #[serde(default)]
    pub symbols: Vec<ResultSymbol>,
}

/// A single recognized character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSymbol {
    /// Character text
    pub text: String,

    /// Symbol confidence (0-100)
    #[serde(default)]
    pub confidence: f32,
}

impl ResultBlock {
    /// Create a block from paragraphs.
    pub fn new(paragraphs: Vec<ResultParagraph>) -> Self {
        Self { paragraphs }
    }

    /// Plain text of the block.
    ///
    /// Words are joined by single spaces, lines of a paragraph by one space
    /// unless the line ends at a hyphenation point, paragraphs by a newline.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(ResultParagraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the block contains no recognized characters.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Number of words in the block.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Mean word confidence, or `None` for a block without words.
    pub fn mean_confidence(&self) -> Option<f32> {
        let (sum, count) = self
            .words()
            .fold((0.0f32, 0usize), |(sum, n), w| (sum + w.confidence, n + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Iterate over every word in reading order.
    pub fn words(&self) -> impl Iterator<Item = &ResultWord> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.lines.iter())
            .flat_map(|l| l.words.iter())
    }
}

impl ResultParagraph {
    /// Create a paragraph from lines.
    pub fn new(lines: Vec<ResultLine>) -> Self {
        Self { lines }
    }

    /// Plain text of the paragraph.
    pub fn text(&self) -> String {
        let mut output = String::new();
        let last = self.lines.len().saturating_sub(1);

        for (i, line) in self.lines.iter().enumerate() {
            output.push_str(&line.text());
            if i < last && !line.ends_with_hyphen() {
                output.push(' ');
            }
        }

        output
    }
}

impl ResultLine {
    /// Create a line from words.
    pub fn new(words: Vec<ResultWord>) -> Self {
        Self {
            words,
            baseline: None,
        }
    }

    /// Plain text of the line.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the line's last word ends in a hyphen symbol.
    pub fn ends_with_hyphen(&self) -> bool {
        self.words.last().is_some_and(ResultWord::ends_with_hyphen)
    }
}

impl ResultWord {
    /// Create a word with one symbol per character, all at the word's confidence.
    pub fn from_text(text: impl Into<String>, confidence: f32) -> Self {
        let text = text.into();
        let symbols = text
            .chars()
            .map(|c| ResultSymbol::new(c.to_string(), confidence))
            .collect();
        Self {
            text,
            confidence,
            bbox: BoundingBox::default(),
            symbols,
        }
    }

    /// Check if the last symbol is a literal hyphen.
    ///
    /// Words without symbols are checked on their text.
    pub fn ends_with_hyphen(&self) -> bool {
        match self.symbols.last() {
            Some(symbol) => symbol.text == "-",
            None => self.text.ends_with('-'),
        }
    }
}

impl ResultSymbol {
    /// Create a symbol.
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}
