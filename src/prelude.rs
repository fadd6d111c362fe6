//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use clasificar::prelude::*;
//! ```

pub use crate::error::{ClasificarError, Result};
pub use crate::features::{FeatureSpec, SearchMode};
pub use crate::model::{Document, DocumentPrediction, Prediction, StoredModel, Token, Vocabulary};
pub use crate::predictor::Predictor;
pub use crate::primitives::Matrix;
pub use crate::solver::{FitResult, GradientDescent, IterationOutcome, SolverConfig};
pub use crate::text::{OneHotVectorizer, StopWordsFilter, WordBoundaryTokenizer};
pub use crate::threshold::{optimize_threshold, ThresholdSearch};
pub use crate::training::{classify_documents, train, train_observed, TrainedClassifier, TrainingConfig};
