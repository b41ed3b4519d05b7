//! Spelling lookup used when resolving hyphenated words.

use std::collections::{HashMap, HashSet};

/// Spelling capability: is `word` a known word of `language`?
pub trait Dictionary: Send + Sync {
    /// Check whether the word is known.
    fn is_known(&self, word: &str, language: &str) -> bool;
}

impl<F> Dictionary for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_known(&self, word: &str, language: &str) -> bool {
        self(word, language)
    }
}

/// In-memory word lists keyed by language.
///
/// Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct WordListDictionary {
    words: HashMap<String, HashSet<String>>,
}

impl WordListDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add words for a language.
    pub fn with_words<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .entry(language.to_string())
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Load a newline-separated word list for a language.
    pub fn load_word_list(&mut self, language: &str, contents: &str) {
        self.words.entry(language.to_string()).or_default().extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_lowercase),
        );
    }

    /// Number of words known for a language.
    pub fn len(&self, language: &str) -> usize {
        self.words.get(language).map_or(0, HashSet::len)
    }
}

impl Dictionary for WordListDictionary {
    fn is_known(&self, word: &str, language: &str) -> bool {
        self.words
            .get(language)
            .is_some_and(|set| set.contains(&word.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_list_lookup() {
        let dict = WordListDictionary::new().with_words("eng", ["Example", "word"]);
        assert!(dict.is_known("example", "eng"));
        assert!(dict.is_known("WORD", "eng"));
        assert!(!dict.is_known("example", "deu"));
        assert!(!dict.is_known("missing", "eng"));
    }

    #[test]
    fn test_load_word_list_skips_comments() {
        let mut dict = WordListDictionary::new();
        dict.load_word_list("deu", "# comment\nHaus\n\n  Baum \n");
        assert_eq!(dict.len("deu"), 2);
        assert!(dict.is_known("baum", "deu"));
    }

    #[test]
    fn test_closure_dictionary() {
        let dict = |word: &str, _lang: &str| word.len() > 3;
        assert!(dict.is_known("long", "eng"));
        assert!(!dict.is_known("no", "eng"));
    }
}
