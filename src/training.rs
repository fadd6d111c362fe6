//! Orchestration: one training run from documents to stored model, and
//! classification of unseen documents against it.
//!
//! [`train`] wires the pipeline together: vectorize, fit, pick the
//! threshold, evaluate, then build the durable [`StoredModel`] and discard
//! every piece of ephemeral state. Each stage is a pure helper returning an
//! aggregate; this module only composes them. [`train_observed`] runs the
//! same pipeline with a per-iteration observer for step feedback and
//! cooperative cancellation.

use log::debug;

use crate::error::{ClasificarError, Result};
use crate::features::{DocumentView, FeatureSpec};
use crate::model::{Document, DocumentPrediction, StoredModel, StoredToken, Vocabulary};
use crate::predictor::Predictor;
use crate::solver::{GradientDescent, IterationOutcome, SolverConfig};
use crate::text::stopwords::StopWordsFilter;
use crate::text::tokenize::WordBoundaryTokenizer;
use crate::text::vectorize::OneHotVectorizer;
use crate::threshold::optimize_threshold;

/// Knobs for one training run: vectorizer settings, solver hyperparameters,
/// and the threshold policy.
///
/// # Examples
///
/// ```
/// use clasificar::training::TrainingConfig;
/// use clasificar::solver::SolverConfig;
///
/// let config = TrainingConfig::new()
///     .with_frequency_threshold(1)
///     .with_ignore_stop_words(true)
///     .with_solver(SolverConfig::new().with_iterations(100));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Unigrams must occur more often than this to enter the vocabulary.
    pub frequency_threshold: usize,
    /// Remove English stop words before vocabulary construction.
    pub ignore_stop_words: bool,
    /// Fix the discrimination threshold at 0.5 instead of searching.
    pub lock_prob_threshold: bool,
    /// Label to treat as positive; defaults to the first document's label.
    pub positive_class: Option<String>,
    /// Solver hyperparameters.
    pub solver: SolverConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            frequency_threshold: 0,
            ignore_stop_words: false,
            lock_prob_threshold: false,
            positive_class: None,
            solver: SolverConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unigram frequency threshold.
    #[must_use]
    pub fn with_frequency_threshold(mut self, threshold: usize) -> Self {
        self.frequency_threshold = threshold;
        self
    }

    /// Enables or disables stop-word removal.
    #[must_use]
    pub fn with_ignore_stop_words(mut self, ignore: bool) -> Self {
        self.ignore_stop_words = ignore;
        self
    }

    /// Locks the discrimination threshold at 0.5.
    #[must_use]
    pub fn with_lock_prob_threshold(mut self, lock: bool) -> Self {
        self.lock_prob_threshold = lock;
        self
    }

    /// Names the label to treat as the positive class.
    #[must_use]
    pub fn with_positive_class(mut self, label: impl Into<String>) -> Self {
        self.positive_class = Some(label.into());
        self
    }

    /// Replaces the solver hyperparameters.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Reject malformed configurations before any work runs.
    ///
    /// # Errors
    ///
    /// Propagates solver hyperparameter errors.
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()
    }
}

/// Train a binary classifier over `documents` with the requested features.
///
/// # Errors
///
/// Returns hyperparameter errors for a malformed configuration and
/// validation errors for unusable training input; in either case no
/// partial state is produced.
///
/// # Examples
///
/// ```
/// use clasificar::model::Document;
/// use clasificar::features::FeatureSpec;
/// use clasificar::training::{train, TrainingConfig};
/// use clasificar::solver::SolverConfig;
///
/// let documents = vec![
///     Document::new(1, "fun fun game", "positive"),
///     Document::new(2, "dull dull story", "negative"),
///     Document::new(3, "great fun", "positive"),
///     Document::new(4, "dull and flat", "negative"),
/// ];
/// let config = TrainingConfig::new()
///     .with_solver(SolverConfig::new().with_iterations(200).with_learning_rate(1.0));
///
/// let classifier = train(&documents, &[FeatureSpec::Unigrams], &config).unwrap();
/// assert!(classifier.accuracy() > 0.99);
/// ```
pub fn train(
    documents: &[Document],
    features: &[FeatureSpec],
    config: &TrainingConfig,
) -> Result<TrainedClassifier> {
    train_observed(documents, features, config, |_| true)
}

/// Train with a per-iteration observer.
///
/// The observer is invoked once per completed iteration, in iteration
/// order. Returning `false` cancels the run cooperatively: the next
/// iteration is never invoked, no stored model is produced, and the call
/// reports a validation error.
///
/// # Errors
///
/// As [`train`], plus a validation error when the observer cancels.
pub fn train_observed<F>(
    documents: &[Document],
    features: &[FeatureSpec],
    config: &TrainingConfig,
    observer: F,
) -> Result<TrainedClassifier>
where
    F: FnMut(&IterationOutcome) -> bool,
{
    config.validate()?;

    let mut vectorizer = OneHotVectorizer::new().with_frequency_threshold(config.frequency_threshold);
    if config.ignore_stop_words {
        vectorizer = vectorizer.with_stop_words(StopWordsFilter::english());
    }
    let corpus = vectorizer.fit(documents, features, config.positive_class.as_deref())?;

    let mut solver = GradientDescent::new(corpus.matrix(), config.solver)?;
    let fit = solver.run_with_observer(observer).ok_or_else(|| {
        ClasificarError::validation("training canceled before completion")
    })?;

    // Training-set probabilities through the same forward pass the stored
    // model will replay.
    let scorer = Predictor::new(fit.constant_weight_term, fit.weights.clone(), 0.5)?;
    let n_docs = documents.len();
    let mut outcomes = Vec::with_capacity(n_docs);
    for r in 0..n_docs {
        let row = corpus.matrix().row(r);
        let (features_part, label_part) = row.split_at(row.len() - 1);
        let probability = scorer.probability(features_part)?;
        outcomes.push((probability, label_part[0] == 1.0));
    }

    let search = optimize_threshold(&outcomes, config.lock_prob_threshold);
    let accuracy = search.accuracy(n_docs);
    let kappa = search.kappa(n_docs);

    let (mut vocabulary, formulas, positive_class, negative_class) = corpus.into_parts();
    vocabulary.set_weights(&fit.weights);

    let stored_tokens = vocabulary
        .iter()
        .zip(formulas)
        .zip(&fit.weights)
        .map(|((token, formula), weight)| StoredToken {
            name: token.surface.clone(),
            formula,
            weight: *weight,
        })
        .collect();

    let stored_model = StoredModel {
        stored_tokens,
        positive_class_name: positive_class,
        negative_class_name: negative_class,
        threshold: search.threshold,
        constant_weight_term: fit.constant_weight_term,
        accuracy,
        kappa,
    };

    debug!(
        target: "clasificar::training",
        "trained on {} documents, {} features, threshold={:.4} accuracy={:.4} kappa={:.4}",
        n_docs,
        stored_model.stored_tokens.len(),
        stored_model.threshold,
        accuracy,
        kappa
    );

    Ok(TrainedClassifier {
        stored_model,
        vocabulary,
    })
}

/// Classify documents against a stored model, long after the training run
/// that produced it.
///
/// Each stored token's formula is re-evaluated against the document, then
/// the probability comes from the stateless forward pass. No retraining.
///
/// # Errors
///
/// Returns validation errors for missing column values and hyperparameter
/// errors for a corrupted stored threshold.
pub fn classify_documents(
    model: &StoredModel,
    documents: &[Document],
) -> Result<Vec<DocumentPrediction>> {
    let predictor = Predictor::from_stored_model(model)?;
    let tokenizer = WordBoundaryTokenizer::new();

    let mut predictions = Vec::with_capacity(documents.len());
    for doc in documents {
        let view = DocumentView::new(doc, &tokenizer)?;
        let mut features = Vec::with_capacity(model.stored_tokens.len());
        for stored in &model.stored_tokens {
            let hit = stored.formula.evaluate(&view)?;
            features.push(if hit { 1.0 } else { 0.0 });
        }
        let prediction = predictor.predict(&features)?;
        predictions.push(DocumentPrediction {
            id: doc.id,
            predicted_label: if prediction.positive {
                model.positive_class_name.clone()
            } else {
                model.negative_class_name.clone()
            },
            probability: prediction.probability,
        });
    }

    debug!(
        target: "clasificar::training",
        "classified {} documents against {} stored features",
        predictions.len(),
        model.stored_tokens.len()
    );
    Ok(predictions)
}

/// The result of a successful training run: the durable stored model plus
/// the run's vocabulary for feature-weight display.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedClassifier {
    stored_model: StoredModel,
    vocabulary: Vocabulary,
}

impl TrainedClassifier {
    /// The durable model.
    #[must_use]
    pub fn stored_model(&self) -> &StoredModel {
        &self.stored_model
    }

    /// The run's vocabulary, weights backfilled, for display.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Training-set accuracy at the chosen threshold.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.stored_model.accuracy
    }

    /// Training-set Cohen's kappa at the chosen threshold.
    #[must_use]
    pub fn kappa(&self) -> f64 {
        self.stored_model.kappa
    }

    /// Surrender the stored model for host persistence.
    #[must_use]
    pub fn into_stored_model(self) -> StoredModel {
        self.stored_model
    }

    /// Classify a batch of unseen documents.
    ///
    /// # Errors
    ///
    /// As [`classify_documents`].
    pub fn classify(&self, documents: &[Document]) -> Result<Vec<DocumentPrediction>> {
        classify_documents(&self.stored_model, documents)
    }

    /// Classify a single document.
    ///
    /// # Errors
    ///
    /// As [`classify_documents`].
    pub fn classify_one(&self, document: &Document) -> Result<DocumentPrediction> {
        let mut predictions = classify_documents(&self.stored_model, std::slice::from_ref(document))?;
        predictions.pop().ok_or_else(|| {
            ClasificarError::validation("classification produced no prediction")
        })
    }
}

#[cfg(test)]
#[path = "training_tests.rs"]
mod tests;
