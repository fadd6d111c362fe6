//! One-hot vectorization over a filtered vocabulary plus constructed
//! features.
//!
//! [`OneHotVectorizer::fit`] scans the training documents once, builds the
//! filtered unigram [`Vocabulary`] merged with constructed search/column
//! features, and produces the training matrix: one 0/1 row per document
//! (presence, not frequency) with the 0/1 class label appended as the final
//! column. Per-token usages and class-split counts are kept on each
//! [`Token`] for downstream feature-weight display and traceability.

use std::collections::HashMap;

use crate::error::{ClasificarError, Result};
use crate::features::{DocumentView, FeatureFormula, FeatureSpec};
use crate::model::{Document, Token, TokenKind, Vocabulary};
use crate::primitives::Matrix;
use crate::text::stopwords::StopWordsFilter;
use crate::text::tokenize::WordBoundaryTokenizer;
use crate::text::Tokenizer;

/// Builder for one-hot text vectorization.
///
/// # Examples
///
/// ```
/// use clasificar::model::Document;
/// use clasificar::features::FeatureSpec;
/// use clasificar::text::vectorize::OneHotVectorizer;
///
/// let docs = vec![
///     Document::new(1, "fun fun game", "positive"),
///     Document::new(2, "dull story", "negative"),
/// ];
///
/// let corpus = OneHotVectorizer::new()
///     .fit(&docs, &[FeatureSpec::Unigrams], None)
///     .unwrap();
///
/// // 4 unigrams plus the label column
/// assert_eq!(corpus.matrix().shape(), (2, 5));
/// assert_eq!(corpus.vocabulary().get("fun").map(|t| t.count), Some(2));
/// ```
#[allow(missing_debug_implementations)]
pub struct OneHotVectorizer {
    tokenizer: Box<dyn Tokenizer>,
    frequency_threshold: usize,
    stop_words: Option<StopWordsFilter>,
}

impl OneHotVectorizer {
    /// Create a vectorizer with the default word-boundary tokenizer, no
    /// frequency filtering, and no stop-word removal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(WordBoundaryTokenizer::new()),
            frequency_threshold: 0,
            stop_words: None,
        }
    }

    /// Keep only unigrams whose total occurrence count exceeds `threshold`.
    #[must_use]
    pub fn with_frequency_threshold(mut self, threshold: usize) -> Self {
        self.frequency_threshold = threshold;
        self
    }

    /// Remove stop words before a token can enter the vocabulary.
    #[must_use]
    pub fn with_stop_words(mut self, filter: StopWordsFilter) -> Self {
        self.stop_words = Some(filter);
        self
    }

    /// Substitute a custom tokenizer.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Build the vocabulary and the training matrix from `documents`.
    ///
    /// `positive_class` may name the label to treat as positive; it must be
    /// one of the two labels observed in the documents. When `None`, the
    /// label of the first document is positive.
    ///
    /// The unigram family is included when `features` is empty or contains
    /// [`FeatureSpec::Unigrams`]; search and column specs contribute
    /// constructed features in declaration order.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the document set is empty, the
    /// documents do not carry exactly two distinct labels, a column feature
    /// is missing on some document, or no feature survives filtering.
    pub fn fit(
        &self,
        documents: &[Document],
        features: &[FeatureSpec],
        positive_class: Option<&str>,
    ) -> Result<VectorizedCorpus> {
        if documents.is_empty() {
            return Err(ClasificarError::validation("no training documents supplied"));
        }

        let (positive, negative) = resolve_classes(documents, positive_class)?;

        // Tokenize every document once; fold for matching, keep surfaces for
        // first-seen display forms.
        let mut folded_docs: Vec<Vec<(String, String)>> = Vec::with_capacity(documents.len());
        for doc in documents {
            let surfaces = self.tokenizer.tokenize(&doc.text)?;
            let pairs = surfaces
                .into_iter()
                .map(|surface| (surface.to_lowercase(), surface))
                .filter(|(folded, _)| {
                    self.stop_words
                        .as_ref()
                        .map_or(true, |sw| !sw.is_stop_word(folded))
                })
                .collect();
            folded_docs.push(pairs);
        }

        // The same prepared views the classify path uses, so a stored
        // formula is guaranteed to reproduce the training-time feature value.
        let views: Vec<DocumentView<'_>> = documents
            .iter()
            .zip(&folded_docs)
            .map(|(doc, pairs)| {
                DocumentView::from_parts(
                    doc,
                    doc.text.to_lowercase(),
                    pairs.iter().map(|(folded, _)| folded.clone()).collect(),
                )
            })
            .collect();

        let include_unigrams =
            features.is_empty() || features.iter().any(|f| matches!(f, FeatureSpec::Unigrams));

        // Unigram vocabulary in first-appearance order.
        let mut entries: Vec<Token> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        if include_unigrams {
            for (doc, pairs) in documents.iter().zip(&folded_docs) {
                let is_positive = doc.label == positive;
                for (folded, surface) in pairs {
                    let slot = *index.entry(folded.clone()).or_insert_with(|| {
                        entries.push(Token::new(
                            folded.clone(),
                            surface.clone(),
                            TokenKind::Unigram,
                        ));
                        entries.len() - 1
                    });
                    entries[slot].record_occurrence(doc.id, is_positive);
                }
            }
        }

        // Frequency filter: strictly greater than the threshold.
        let kept: Vec<Token> = entries
            .into_iter()
            .filter(|t| t.count > self.frequency_threshold)
            .collect();

        let mut formulas: Vec<FeatureFormula> = kept
            .iter()
            .map(|t| FeatureFormula::Unigram {
                token: t.text.clone(),
            })
            .collect();
        let mut tokens = kept;

        // Constructed features in declaration order, evaluated per document.
        let mut constructed_values: Vec<Vec<bool>> = Vec::new();
        for spec in features {
            let formula = match spec {
                FeatureSpec::Unigrams => continue,
                FeatureSpec::Search { pattern, mode } => FeatureFormula::Search {
                    pattern: pattern.clone(),
                    mode: *mode,
                },
                FeatureSpec::Column { name } => FeatureFormula::Column { name: name.clone() },
            };

            let name = match spec {
                FeatureSpec::Column { name } => name.clone(),
                _ => formula.render(),
            };
            let mut token = Token::new(name.clone(), name, TokenKind::Constructed);
            let mut values = Vec::with_capacity(documents.len());
            for (doc, view) in documents.iter().zip(&views) {
                let value = formula.evaluate(view)?;
                if value {
                    token.record_occurrence(doc.id, doc.label == positive);
                }
                values.push(value);
            }
            tokens.push(token);
            formulas.push(formula);
            constructed_values.push(values);
        }

        if tokens.is_empty() {
            return Err(ClasificarError::validation(
                "vocabulary is empty after filtering; at least one informative feature is required",
            ));
        }

        // One 0/1 row per document: unigram presence, constructed values,
        // then the class label in the final column.
        let n_unigrams = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Unigram)
            .count();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(documents.len());
        for (doc_idx, doc) in documents.iter().enumerate() {
            let present = views[doc_idx].folded_tokens();

            let mut row = Vec::with_capacity(tokens.len() + 1);
            for token in tokens.iter().take(n_unigrams) {
                row.push(if present.contains(token.text.as_str()) {
                    1.0
                } else {
                    0.0
                });
            }
            for values in &constructed_values {
                row.push(if values[doc_idx] { 1.0 } else { 0.0 });
            }
            row.push(if doc.label == positive { 1.0 } else { 0.0 });
            rows.push(row);
        }

        Ok(VectorizedCorpus {
            vocabulary: Vocabulary::from_entries(tokens),
            matrix: Matrix::from_rows(rows)?,
            formulas,
            positive_class: positive,
            negative_class: negative,
        })
    }
}

impl Default for OneHotVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Exactly two distinct labels, resolved into (positive, negative).
fn resolve_classes(documents: &[Document], positive_class: Option<&str>) -> Result<(String, String)> {
    let mut labels: Vec<&str> = Vec::new();
    for doc in documents {
        if !labels.contains(&doc.label.as_str()) {
            labels.push(&doc.label);
        }
    }
    if labels.len() != 2 {
        return Err(ClasificarError::validation(format!(
            "training requires exactly two distinct labels, found {}",
            labels.len()
        )));
    }

    match positive_class {
        None => Ok((labels[0].to_string(), labels[1].to_string())),
        Some(p) if p == labels[0] => Ok((labels[0].to_string(), labels[1].to_string())),
        Some(p) if p == labels[1] => Ok((labels[1].to_string(), labels[0].to_string())),
        Some(p) => Err(ClasificarError::validation(format!(
            "positive class \"{p}\" does not appear in the training labels"
        ))),
    }
}

/// The product of one vectorization pass: vocabulary, training matrix, and
/// the formula behind each model column.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizedCorpus {
    vocabulary: Vocabulary,
    matrix: Matrix,
    formulas: Vec<FeatureFormula>,
    positive_class: String,
    negative_class: String,
}

impl VectorizedCorpus {
    /// Feature tokens in model-column order.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Training matrix: one row per document, features then label.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Formula behind each model column.
    #[must_use]
    pub fn feature_formulas(&self) -> &[FeatureFormula] {
        &self.formulas
    }

    /// Number of feature columns (excluding the label column).
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.formulas.len()
    }

    /// Label treated as positive.
    #[must_use]
    pub fn positive_class(&self) -> &str {
        &self.positive_class
    }

    /// Label treated as negative.
    #[must_use]
    pub fn negative_class(&self) -> &str {
        &self.negative_class
    }

    pub(crate) fn into_parts(self) -> (Vocabulary, Vec<FeatureFormula>, String, String) {
        (
            self.vocabulary,
            self.formulas,
            self.positive_class,
            self.negative_class,
        )
    }
}

#[cfg(test)]
#[path = "vectorize_tests.rs"]
mod tests;
