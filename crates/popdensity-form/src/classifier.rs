//! The seam between the form and whatever model answers it.

use popdensity_rf::RandomForest;

use crate::error::InferenceError;
use crate::record::{COLUMNS, Record};

/// A binary classifier over [`Record`]s.
///
/// Implemented by [`RandomForest`] for real artifacts; tests substitute
/// stubs.
pub trait Classifier {
    /// Predict the class index for `record`.
    ///
    /// # Errors
    ///
    /// Any [`InferenceError`] the model raises.
    fn predict(&self, record: &Record) -> Result<usize, InferenceError>;

    /// Return one probability per class for `record`.
    ///
    /// # Errors
    ///
    /// Any [`InferenceError`] the model raises.
    fn predict_proba(&self, record: &Record) -> Result<Vec<f64>, InferenceError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, record: &Record) -> Result<usize, InferenceError> {
        (**self).predict(record)
    }

    fn predict_proba(&self, record: &Record) -> Result<Vec<f64>, InferenceError> {
        (**self).predict_proba(record)
    }
}

/// Return `true` if an artifact's recorded feature names equal [`COLUMNS`].
///
/// Artifacts without names are accepted; only their feature count is checked
/// at prediction time.
#[must_use]
pub fn schema_matches(feature_names: &[String]) -> bool {
    feature_names.is_empty() || feature_names.iter().map(String::as_str).eq(COLUMNS)
}

fn check_schema(feature_names: &[String]) -> Result<(), InferenceError> {
    if schema_matches(feature_names) {
        return Ok(());
    }
    Err(InferenceError::SchemaMismatch {
        expected: feature_names.to_vec(),
        found: COLUMNS.iter().map(|c| (*c).to_string()).collect(),
    })
}

impl Classifier for RandomForest {
    fn predict(&self, record: &Record) -> Result<usize, InferenceError> {
        check_schema(self.feature_names())?;
        Ok(RandomForest::predict(self, record.values())?)
    }

    fn predict_proba(&self, record: &Record) -> Result<Vec<f64>, InferenceError> {
        check_schema(self.feature_names())?;
        Ok(RandomForest::predict_proba(self, record.values())?.into_vec())
    }
}
