//! Hyphenation-aware reconstruction of recognized text.
//!
//! The writer walks `block -> paragraph -> line -> word -> symbol` and emits
//! one styled run per symbol. Words split over a line break by a trailing
//! hyphen are collected into a separate part and resolved afterwards: either
//! merged into one word or kept apart with the hyphen.

use super::{confidence_color, Color, Dictionary, HyphenDecision, Hyphenation, RichText, TextRun};
use crate::model::{ResultBlock, ResultWord};
use crate::settings::Settings;
use std::sync::Arc;

/// Options for text reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructOptions {
    /// Document language passed to the dictionary
    pub language: String,

    /// Units below this confidence get a background highlight
    pub confidence_threshold: f32,

    /// Foreground for merged hyphenated words
    pub merged_color: Color,

    /// Foreground for hyphenated words kept split
    pub split_color: Color,

    /// Continuations that never merge (compared case-insensitively)
    pub reject_list: Vec<String>,

    /// Veto merges of words the dictionary does not know
    pub spell_check: bool,
}

impl ReconstructOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive options from project settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            language: settings.language().to_string(),
            confidence_threshold: settings.confidence_color_threshold,
            merged_color: settings.merged_word_in_dict_color,
            split_color: settings.merged_word_not_in_dict_color,
            reject_list: settings.hyphenation_reject_list.clone(),
            spell_check: settings.spell_check_hyphenation,
        }
    }

    /// Set the document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the confidence highlight threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the reject list.
    pub fn with_reject_list<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reject_list = words.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the dictionary veto.
    pub fn with_spell_check(mut self, enabled: bool) -> Self {
        self.spell_check = enabled;
        self
    }
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Intermediate segment of the reconstructed text.
#[derive(Debug, Clone, PartialEq)]
enum TextPart {
    Text(Vec<TextRun>),
    Hyphenated {
        with_hyphen: Vec<TextRun>,
        without_hyphen: Vec<TextRun>,
        continuation: Vec<TextRun>,
    },
}

struct OpenHyphen {
    with_hyphen: Vec<TextRun>,
    without_hyphen: Vec<TextRun>,
}

/// Turns recognition results into confidence-annotated rich text.
#[derive(Clone, Default)]
pub struct ResultWriter {
    options: ReconstructOptions,
    dictionary: Option<Arc<dyn Dictionary>>,
}

impl ResultWriter {
    /// Create a writer.
    pub fn new(options: ReconstructOptions) -> Self {
        Self {
            options,
            dictionary: None,
        }
    }

    /// Attach a dictionary, consulted only when spell checking is enabled.
    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// The writer's options.
    pub fn options(&self) -> &ReconstructOptions {
        &self.options
    }

    /// Reconstruct the text of one block.
    pub fn write_block(&self, block: &ResultBlock) -> RichText {
        self.write(&[block])
    }

    /// Reconstruct the concatenated text of several blocks.
    pub fn write(&self, blocks: &[&ResultBlock]) -> RichText {
        let parts = self.to_parts(blocks);
        self.resolve(parts)
    }

    /// Decide whether a word split over a line break should be merged.
    ///
    /// `first` is the fragment before the break including its hyphen,
    /// `second` the fragment after it.
    pub fn decide(&self, first: &str, second: &str) -> HyphenDecision {
        let first = first.trim();
        let second = second.trim();
        let folded = second.to_lowercase();

        if self
            .options
            .reject_list
            .iter()
            .any(|w| w.to_lowercase() == folded)
        {
            return HyphenDecision::KeepSplit;
        }

        if second.chars().next().is_some_and(char::is_uppercase) {
            return HyphenDecision::KeepSplit;
        }

        if self.options.spell_check {
            if let Some(dictionary) = &self.dictionary {
                let word: String = first
                    .chars()
                    .chain(second.chars())
                    .filter(|c| c.is_alphanumeric())
                    .collect();
                if !dictionary.is_known(&word, &self.options.language) {
                    return HyphenDecision::KeepSplit;
                }
            }
        }

        HyphenDecision::Merge
    }

    fn highlight(&self, confidence: f32) -> Option<Color> {
        (confidence < self.options.confidence_threshold)
            .then(|| confidence_color(confidence, self.options.confidence_threshold))
    }

    /// One run per symbol; a word without symbols is a single run.
    fn word_runs(&self, word: &ResultWord) -> Vec<TextRun> {
        let word_background = self.highlight(word.confidence);

        if word.symbols.is_empty() {
            return vec![TextRun::with_background(word.text.clone(), word_background)];
        }

        word.symbols
            .iter()
            .map(|symbol| {
                let background = self.highlight(symbol.confidence).or(word_background);
                TextRun::with_background(symbol.text.clone(), background)
            })
            .collect()
    }

    fn to_parts(&self, blocks: &[&ResultBlock]) -> Vec<TextPart> {
        let mut parts = Vec::new();
        let mut current: Vec<TextRun> = Vec::new();
        let mut open: Option<OpenHyphen> = None;

        for (b, block) in blocks.iter().enumerate() {
            if b > 0 {
                current.push(TextRun::plain("\n"));
            }

            for (p, paragraph) in block.paragraphs.iter().enumerate() {
                if p > 0 {
                    current.push(TextRun::plain("\n"));
                }

                let last_line = paragraph.lines.len().saturating_sub(1);
                for (l, line) in paragraph.lines.iter().enumerate() {
                    let last_word = line.words.len().saturating_sub(1);

                    for (w, word) in line.words.iter().enumerate() {
                        let runs = self.word_runs(word);

                        if let Some(hyphen) = open.take() {
                            parts.push(TextPart::Text(std::mem::take(&mut current)));
                            parts.push(TextPart::Hyphenated {
                                with_hyphen: hyphen.with_hyphen,
                                without_hyphen: hyphen.without_hyphen,
                                continuation: runs,
                            });
                        } else if w == last_word && l < last_line && word.ends_with_hyphen() {
                            parts.push(TextPart::Text(std::mem::take(&mut current)));
                            let without_hyphen = strip_hyphen(&runs);
                            open = Some(OpenHyphen {
                                with_hyphen: runs,
                                without_hyphen,
                            });
                        } else {
                            current.extend(runs);
                        }

                        if w < last_word {
                            current.push(TextRun::plain(" "));
                        }
                    }

                    if l < last_line && open.is_none() {
                        current.push(TextRun::plain(" "));
                    }
                }

                // Nothing followed the break inside this paragraph
                if let Some(hyphen) = open.take() {
                    current.extend(hyphen.with_hyphen);
                }
            }
        }

        parts.push(TextPart::Text(current));
        parts
    }

    fn resolve(&self, parts: Vec<TextPart>) -> RichText {
        let mut text = RichText::new();
        let mut offset = 0usize;

        for part in parts {
            match part {
                TextPart::Text(runs) => {
                    for run in runs {
                        append(&mut text, &mut offset, run);
                    }
                }
                TextPart::Hyphenated {
                    with_hyphen,
                    without_hyphen,
                    continuation,
                } => {
                    let first_part = plain(&with_hyphen);
                    let second_part = plain(&continuation);
                    let decision = self.decide(&first_part, &second_part);
                    log::debug!(
                        "Hyphenated word '{}' + '{}': {:?}",
                        first_part,
                        second_part,
                        decision
                    );

                    let (color, runs) = match decision {
                        HyphenDecision::Merge => (
                            self.options.merged_color,
                            without_hyphen.into_iter().chain(continuation).collect::<Vec<_>>(),
                        ),
                        HyphenDecision::KeepSplit => (
                            self.options.split_color,
                            with_hyphen
                                .into_iter()
                                .chain(std::iter::once(TextRun::plain(" ")))
                                .chain(continuation)
                                .collect(),
                        ),
                    };

                    let start = offset;
                    for mut run in runs {
                        run.style.color = Some(color);
                        append(&mut text, &mut offset, run);
                    }

                    text.hyphenations.push(Hyphenation {
                        range: start..offset,
                        decision,
                        first_part,
                        second_part,
                    });
                }
            }
        }

        text
    }
}

fn append(text: &mut RichText, offset: &mut usize, run: TextRun) {
    *offset += run.text.chars().count();
    text.push(run);
}

fn strip_hyphen(runs: &[TextRun]) -> Vec<TextRun> {
    let mut stripped = runs.to_vec();
    if let Some(last) = stripped.last_mut() {
        if last.text == "-" {
            stripped.pop();
        } else if let Some(text) = last.text.strip_suffix('-') {
            last.text = text.to_string();
        }
    }
    stripped
}

fn plain(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Reconstruct blocks with the given options and no dictionary.
pub fn reconstruct(blocks: &[&ResultBlock], options: &ReconstructOptions) -> RichText {
    ResultWriter::new(options.clone()).write(blocks)
}
