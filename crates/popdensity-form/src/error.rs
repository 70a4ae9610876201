//! Error types for popdensity-form.

use std::path::PathBuf;

use popdensity_rf::RfError;

use crate::field::FieldId;

/// Errors that stop the form before a prediction can be attempted.
///
/// `ModelNotFound` and `ModelLoad` are fatal: no prediction can be served
/// until the artifact is fixed and the process restarted.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Returned when the model artifact does not exist.
    #[error("model file ({path}) not found; make sure the artifact is in place")]
    ModelNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Returned when the model artifact exists but cannot be read or decoded.
    #[error("an error occurred while loading the model from {path}")]
    ModelLoad {
        /// Path to the artifact.
        path: PathBuf,
        /// The underlying artifact error.
        source: RfError,
    },

    /// Returned when a field value is NaN or infinite.
    #[error("field \"{field}\" must be a finite number, got {value}")]
    NonFiniteField {
        /// The offending field.
        field: FieldId,
        /// The rejected value.
        value: f64,
    },
}

/// Errors raised while running a single prediction.
///
/// All variants are recoverable: the form stays usable for another attempt.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Returned when the classifier itself rejects the record.
    #[error("model rejected the record")]
    Model {
        /// The underlying classifier error.
        #[from]
        source: RfError,
    },

    /// Returned when the artifact was trained on different columns.
    #[error("model expects columns {expected:?}, record has {found:?}")]
    SchemaMismatch {
        /// Column names recorded in the artifact.
        expected: Vec<String>,
        /// Column names of the record.
        found: Vec<String>,
    },

    /// Returned when the classifier predicts a class outside {0, 1}.
    #[error("model predicted class {class}, expected 0 or 1")]
    UnexpectedClass {
        /// The class index the model returned.
        class: usize,
    },

    /// Returned when the probability vector has no entry for the predicted class.
    #[error("model returned {n_probabilities} probabilities, none for class {class}")]
    MissingProbability {
        /// The predicted class index.
        class: usize,
        /// Length of the probability vector.
        n_probabilities: usize,
    },
}
