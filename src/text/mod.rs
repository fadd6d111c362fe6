//! Text processing: tokenization, stop words, one-hot vectorization.
//!
//! This module turns raw documents into the numeric feature rows the solver
//! consumes:
//! - [`tokenize`]: word-boundary tokenization with emoticon glyph support
//! - [`stopwords`]: optional stop-word removal
//! - [`vectorize`]: filtered vocabulary construction and 0/1 feature rows

pub mod stopwords;
pub mod tokenize;
pub mod vectorize;

use crate::error::Result;

/// Trait for text tokenizers.
///
/// The vectorizer is generic over this seam so a host can substitute its own
/// tokenization rule.
pub trait Tokenizer {
    /// Split text into surface-form tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization fails.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

pub use stopwords::StopWordsFilter;
pub use tokenize::WordBoundaryTokenizer;
pub use vectorize::{OneHotVectorizer, VectorizedCorpus};
