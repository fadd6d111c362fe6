//! Data model: documents in, vocabulary during a run, stored model out.
//!
//! A [`Document`] set is supplied per training or classification call and is
//! never owned long-term. The [`Vocabulary`] and feature rows exist for one
//! training run and are discarded after the fit. The [`StoredModel`] is the
//! only artifact that outlives the run; its shape is the contract a host must
//! preserve across save/restore cycles for later classification to remain
//! correct.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::FeatureFormula;

/// One training or classification example.
///
/// # Examples
///
/// ```
/// use clasificar::model::Document;
///
/// let doc = Document::new(3, "what a great movie", "positive")
///     .with_column("verified", true);
/// assert_eq!(doc.column("verified"), Some(true));
/// assert_eq!(doc.column("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Host-assigned identifier.
    pub id: u64,
    /// Raw text.
    pub text: String,
    /// Class label; a training set must contain exactly two distinct labels.
    pub label: String,
    columns: BTreeMap<String, bool>,
}

impl Document {
    /// Create a document with no boolean columns.
    #[must_use]
    pub fn new(id: u64, text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            label: label.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Attach an externally supplied boolean column value.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, value: bool) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    /// Look up a boolean column value.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<bool> {
        self.columns.get(name).copied()
    }
}

/// Whether a vocabulary entry came from unigram tokenization or was
/// constructed from a search/column feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Single-word token from the document text.
    Unigram,
    /// Search or column feature.
    Constructed,
}

/// A vocabulary entry or constructed feature, with the bookkeeping the host
/// needs for feature-weight display and traceability.
///
/// Invariant: `count == num_positive + num_negative`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Folded (lowercased) token text, the vocabulary key.
    pub text: String,
    /// First-seen surface form, preserved for display.
    pub surface: String,
    /// Unigram or constructed.
    pub kind: TokenKind,
    /// Total occurrence count across all training documents.
    pub count: usize,
    /// Occurrences in positive-class documents.
    pub num_positive: usize,
    /// Occurrences in negative-class documents.
    pub num_negative: usize,
    /// Ids of the documents the token occurs in, in scan order.
    pub document_ids: Vec<u64>,
    /// Fitted weight, backfilled after training.
    pub weight: Option<f64>,
    /// Opaque host-assigned slot; never interpreted by this crate.
    pub feature_case_id: Option<u64>,
}

impl Token {
    pub(crate) fn new(text: String, surface: String, kind: TokenKind) -> Self {
        Self {
            text,
            surface,
            kind,
            count: 0,
            num_positive: 0,
            num_negative: 0,
            document_ids: Vec::new(),
            weight: None,
            feature_case_id: None,
        }
    }

    pub(crate) fn record_occurrence(&mut self, document_id: u64, positive: bool) {
        self.count += 1;
        if positive {
            self.num_positive += 1;
        } else {
            self.num_negative += 1;
        }
        if self.document_ids.last() != Some(&document_id) {
            self.document_ids.push(document_id);
        }
    }
}

/// The ordered collection of feature tokens for one training run: unigram
/// vocabulary entries first, constructed features after, in model-column
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    entries: Vec<Token>,
}

impl Vocabulary {
    pub(crate) fn from_entries(entries: Vec<Token>) -> Self {
        Self { entries }
    }

    /// Number of feature tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no feature tokens survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Token at model-column position `index`.
    #[must_use]
    pub fn token_at(&self, index: usize) -> Option<&Token> {
        self.entries.get(index)
    }

    /// Look up a token by its folded text.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<&Token> {
        self.entries.iter().find(|t| t.text == text)
    }

    /// Iterate tokens in model-column order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter()
    }

    pub(crate) fn set_weights(&mut self, weights: &[f64]) {
        for (token, weight) in self.entries.iter_mut().zip(weights) {
            token.weight = Some(*weight);
        }
    }
}

/// One feature of the durable model: display name, evaluatable formula, and
/// fitted weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    /// Display name.
    pub name: String,
    /// Formula re-evaluated against unseen documents at classification time.
    pub formula: FeatureFormula,
    /// Fitted weight.
    pub weight: f64,
}

/// The durable result of a successful training run.
///
/// Decoupled from all training state so a trained classifier can be replayed
/// long after the run's vocabulary and feature rows are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredModel {
    /// One entry per model column, in weight order.
    pub stored_tokens: Vec<StoredToken>,
    /// Label treated as the positive class.
    pub positive_class_name: String,
    /// Label treated as the negative class.
    pub negative_class_name: String,
    /// Discrimination threshold on the predicted probability.
    pub threshold: f64,
    /// Intercept term, reported separately from the feature weights.
    pub constant_weight_term: f64,
    /// Training-set accuracy at the chosen threshold.
    pub accuracy: f64,
    /// Training-set Cohen's kappa at the chosen threshold.
    pub kappa: f64,
}

impl StoredModel {
    /// Feature weights in stored-token order.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.stored_tokens.iter().map(|t| t.weight).collect()
    }
}

/// Outcome of one forward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// True when the probability exceeds the stored threshold.
    pub positive: bool,
    /// Predicted probability of the positive class.
    pub probability: f64,
}

/// Per-document classification output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPrediction {
    /// The document's id.
    pub id: u64,
    /// Predicted class label.
    pub predicted_label: String,
    /// Predicted probability of the positive class.
    pub probability: f64,
}
