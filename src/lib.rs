//! Clasificar: binary text classification in pure Rust.
//!
//! Clasificar turns labeled documents into a trained binary classifier and
//! applies it to new text: a from-scratch one-hot vectorizer, a batch
//! gradient-descent logistic-regression solver driven as a steppable state
//! machine, a discrimination-threshold optimizer, accuracy and Cohen's kappa
//! evaluation, and a stateless predictor that replays a stored model.
//!
//! # Quick Start
//!
//! ```
//! use clasificar::prelude::*;
//!
//! let documents = vec![
//!     Document::new(1, "fun fun game", "positive"),
//!     Document::new(2, "dull dull story", "negative"),
//!     Document::new(3, "great fun", "positive"),
//!     Document::new(4, "so dull and flat", "negative"),
//! ];
//!
//! let config = TrainingConfig::new()
//!     .with_solver(SolverConfig::new().with_iterations(200).with_learning_rate(1.0));
//! let classifier = train(&documents, &[FeatureSpec::Unigrams], &config).unwrap();
//! assert!(classifier.accuracy() > 0.99);
//!
//! let prediction = classifier
//!     .classify_one(&Document::new(9, "such a fun game", "unlabeled"))
//!     .unwrap();
//! assert_eq!(prediction.predicted_label, "positive");
//! ```
//!
//! # Modules
//!
//! - [`text`]: tokenization, stop words, one-hot vectorization
//! - [`features`]: feature descriptors and stored formulas
//! - [`solver`]: steppable batch gradient-descent logistic regression
//! - [`threshold`]: discrimination-threshold search
//! - [`metrics`]: accuracy and Cohen's kappa from confusion counts
//! - [`predictor`]: stateless forward pass over stored weights
//! - [`training`]: the orchestrated train/classify pipeline
//! - [`model`]: documents, vocabulary tokens, and the stored model
//! - [`primitives`]: the row-major `f64` matrix the pipeline exchanges

pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod prelude;
pub mod primitives;
pub mod solver;
pub mod text;
pub mod threshold;
pub mod training;

pub use error::{ClasificarError, Result};
pub use model::{Document, StoredModel};
pub use training::{train, TrainedClassifier, TrainingConfig};
