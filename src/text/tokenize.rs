//! Word-boundary tokenization with emoticon glyph support.

use crate::error::Result;
use crate::text::Tokenizer;

/// Emoticon and punctuation glyphs recognized as atomic tokens, so symbols
/// like `:-)` are not shredded into punctuation noise. Matched longest-first
/// at each position.
const EMOTICON_GLYPHS: &[&str] = &[
    ":-)", ":-(", ":-D", ":-P", ":-p", ":-|", ":-/", ":-O", ":-o", ":-*", ";-)", ":')", ":'(",
    "</3", ":)", ":(", ":D", ":P", ":p", ":|", ":/", ":O", ":o", ":*", ";)", ";(", "=)", "=(",
    "<3", "^^", "!!", "??", "?!",
];

/// Tokenizer that splits on word boundaries and additionally recognizes a
/// curated table of emoticon glyphs as atomic tokens.
///
/// Word characters are alphanumerics plus the apostrophe, so contractions
/// stay together. Tokens keep their original surface form; case folding is
/// the vectorizer's job.
///
/// # Examples
///
/// ```
/// use clasificar::text::{Tokenizer, tokenize::WordBoundaryTokenizer};
///
/// let tokenizer = WordBoundaryTokenizer::new();
///
/// let tokens = tokenizer.tokenize("Loved it :-) really!").unwrap();
/// assert_eq!(tokens, vec!["Loved", "it", ":-)", "really"]);
///
/// let tokens = tokenizer.tokenize("don't stop").unwrap();
/// assert_eq!(tokens, vec!["don't", "stop"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordBoundaryTokenizer;

impl WordBoundaryTokenizer {
    /// Create a new word-boundary tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '\''
    }

    /// Longest emoticon glyph starting at the head of `rest`, if any.
    fn match_glyph(rest: &str) -> Option<&'static str> {
        EMOTICON_GLYPHS
            .iter()
            .copied()
            .filter(|glyph| rest.starts_with(glyph))
            .max_by_key(|glyph| glyph.len())
    }
}

impl Tokenizer for WordBoundaryTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut rest = text;

        while let Some(ch) = rest.chars().next() {
            if Self::is_word_char(ch) {
                word.push(ch);
                rest = &rest[ch.len_utf8()..];
                continue;
            }

            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }

            if let Some(glyph) = Self::match_glyph(rest) {
                tokens.push(glyph.to_string());
                rest = &rest[glyph.len()..];
            } else {
                rest = &rest[ch.len_utf8()..];
            }
        }

        if !word.is_empty() {
            tokens.push(word);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
#[path = "tokenize_tests.rs"]
mod tests;
