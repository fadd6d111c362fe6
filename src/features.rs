//! Feature descriptors and their host-facing formulas.
//!
//! A training run is handed a list of [`FeatureSpec`] values describing which
//! feature families to extract: the unigram bag-of-words family, constructed
//! search features, and boolean columns already present on each document.
//! Each resulting model column carries a [`FeatureFormula`] that the stored
//! model keeps, so the same feature value can be re-evaluated against unseen
//! documents at classification time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Document;
use crate::text::Tokenizer;

/// How a search feature matches against a document's folded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Text contains the pattern anywhere.
    Contains,
    /// Text does not contain the pattern.
    NotContains,
    /// Text starts with the pattern.
    StartsWith,
    /// Text ends with the pattern.
    EndsWith,
}

impl SearchMode {
    /// Evaluate this mode against already-folded text and pattern.
    #[must_use]
    pub fn matches(self, folded_text: &str, folded_pattern: &str) -> bool {
        match self {
            Self::Contains => folded_text.contains(folded_pattern),
            Self::NotContains => !folded_text.contains(folded_pattern),
            Self::StartsWith => folded_text.starts_with(folded_pattern),
            Self::EndsWith => folded_text.ends_with(folded_pattern),
        }
    }
}

/// A feature family requested for a training run.
///
/// # Examples
///
/// ```
/// use clasificar::features::{FeatureSpec, SearchMode};
///
/// let specs = vec![
///     FeatureSpec::Unigrams,
///     FeatureSpec::search("!!", SearchMode::Contains),
///     FeatureSpec::column("has_attachment"),
/// ];
/// assert_eq!(specs.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSpec {
    /// Unigram bag-of-words over the fitted vocabulary.
    Unigrams,
    /// Constructed boolean feature: pattern match against document text.
    Search {
        /// Pattern to look for (folded to lowercase for matching)
        pattern: String,
        /// Match mode
        mode: SearchMode,
    },
    /// Boolean column already present on each document.
    Column {
        /// Column name
        name: String,
    },
}

impl FeatureSpec {
    /// Shorthand for a search feature.
    #[must_use]
    pub fn search(pattern: impl Into<String>, mode: SearchMode) -> Self {
        Self::Search {
            pattern: pattern.into(),
            mode,
        }
    }

    /// Shorthand for a column feature.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column { name: name.into() }
    }
}

/// The evaluatable formula behind one model column.
///
/// Stored alongside each weight in the durable model, and matched
/// exhaustively when a document is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureFormula {
    /// Presence of a vocabulary token in the document.
    Unigram {
        /// Folded token text
        token: String,
    },
    /// Pattern match against the document text.
    Search {
        /// Pattern to look for
        pattern: String,
        /// Match mode
        mode: SearchMode,
    },
    /// Boolean column lookup.
    Column {
        /// Column name
        name: String,
    },
}

impl FeatureFormula {
    /// Human-readable rendering for display next to feature weights.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Unigram { token } => format!("contains(\"{token}\")"),
            Self::Search { pattern, mode } => match mode {
                SearchMode::Contains => format!("textContains(\"{pattern}\")"),
                SearchMode::NotContains => format!("!textContains(\"{pattern}\")"),
                SearchMode::StartsWith => format!("textStartsWith(\"{pattern}\")"),
                SearchMode::EndsWith => format!("textEndsWith(\"{pattern}\")"),
            },
            Self::Column { name } => format!("column(\"{name}\")"),
        }
    }

    /// Evaluate the formula against a prepared document view.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a column formula names a column the
    /// document does not carry.
    pub fn evaluate(&self, view: &DocumentView<'_>) -> Result<bool> {
        match self {
            Self::Unigram { token } => Ok(view.folded_tokens.contains(token)),
            Self::Search { pattern, mode } => {
                Ok(mode.matches(&view.folded_text, &pattern.to_lowercase()))
            }
            Self::Column { name } => view.document.column(name).ok_or_else(|| {
                crate::error::ClasificarError::validation(format!(
                    "document {} has no boolean column \"{name}\"",
                    view.document.id
                ))
            }),
        }
    }
}

/// A document prepared for feature evaluation: folded text plus the set of
/// folded tokens, computed once per document.
#[derive(Debug)]
pub struct DocumentView<'a> {
    document: &'a Document,
    folded_text: String,
    folded_tokens: HashSet<String>,
}

impl<'a> DocumentView<'a> {
    /// Tokenize and fold a document once, for any number of formula
    /// evaluations.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    pub fn new(document: &'a Document, tokenizer: &dyn Tokenizer) -> Result<Self> {
        let folded_tokens = tokenizer
            .tokenize(&document.text)?
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        Ok(Self {
            document,
            folded_text: document.text.to_lowercase(),
            folded_tokens,
        })
    }

    /// Assemble a view from already-folded parts, skipping re-tokenization.
    pub(crate) fn from_parts(
        document: &'a Document,
        folded_text: String,
        folded_tokens: HashSet<String>,
    ) -> Self {
        Self {
            document,
            folded_text,
            folded_tokens,
        }
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.document
    }

    /// The document's folded (lowercased) token set.
    #[must_use]
    pub fn folded_tokens(&self) -> &HashSet<String> {
        &self.folded_tokens
    }
}
