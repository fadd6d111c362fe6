//! Core numeric primitives.
//!
//! The [`Matrix`] type is the interchange format between the vectorizer and
//! the solver: one row per document, one column per feature, and the 0/1
//! class label stored in the final column of every training row.

mod matrix;

pub use matrix::Matrix;
