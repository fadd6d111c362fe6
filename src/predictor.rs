//! Stateless forward pass over stored weights.
//!
//! The predictor is the only component invoked at classification time. It
//! holds no training state: a constant weight term, a feature-weight vector,
//! and a threshold, usually lifted from a [`StoredModel`]. It shares the
//! solver's sigmoid so a model trained here and replayed later yields
//! identical probabilities for identical feature vectors.

use log::trace;

use crate::error::{ClasificarError, Result};
use crate::model::{Prediction, StoredModel};
use crate::solver::sigmoid;

/// Forward pass: σ(θ · [1, x]) against a fixed threshold.
///
/// # Examples
///
/// ```
/// use clasificar::predictor::Predictor;
///
/// let predictor = Predictor::new(-1.0, vec![2.0, 0.5], 0.5).unwrap();
/// let prediction = predictor.predict(&[1.0, 0.0]).unwrap();
/// assert!((prediction.probability - 0.731).abs() < 0.001);
/// assert!(prediction.positive);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Predictor {
    constant_weight_term: f64,
    weights: Vec<f64>,
    threshold: f64,
}

impl Predictor {
    /// Build a predictor from a constant weight term, per-feature weights,
    /// and a probability threshold.
    ///
    /// # Errors
    ///
    /// Rejects a threshold outside [0, 1].
    pub fn new(constant_weight_term: f64, weights: Vec<f64>, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) || !threshold.is_finite() {
            return Err(ClasificarError::hyperparameter(
                "threshold",
                threshold,
                "within [0, 1]",
            ));
        }
        Ok(Self {
            constant_weight_term,
            weights,
            threshold,
        })
    }

    /// Build a predictor from a stored model, weights in stored-token order.
    ///
    /// # Errors
    ///
    /// Rejects a stored threshold outside [0, 1].
    pub fn from_stored_model(model: &StoredModel) -> Result<Self> {
        Self::new(model.constant_weight_term, model.weights(), model.threshold)
    }

    /// The stored probability threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of features the predictor expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Probability of the positive class for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch when the vector length differs from the
    /// weight vector length.
    pub fn probability(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(ClasificarError::dimension_mismatch(
                "features",
                self.weights.len(),
                features.len(),
            ));
        }
        let mut z = self.constant_weight_term;
        for (w, x) in self.weights.iter().zip(features) {
            z += w * x;
        }
        Ok(sigmoid(z))
    }

    /// Classify one feature vector: positive iff the probability exceeds
    /// the stored threshold.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch for a wrong-length feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        let probability = self.probability(features)?;
        let positive = probability > self.threshold;
        trace!(
            target: "clasificar::predictor",
            "probability={:.4} threshold={:.4} positive={}",
            probability,
            self.threshold,
            positive
        );
        Ok(Prediction {
            positive,
            probability,
        })
    }
}
