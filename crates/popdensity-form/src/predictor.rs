//! The prediction handler: validated input in, labelled prediction out.

use tracing::{debug, info, instrument};

use crate::classifier::Classifier;
use crate::error::InferenceError;
use crate::input::{FormInput, ValidatedInput};
use crate::record::Record;

/// The two classes the model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityClass {
    /// Class 0.
    NotDenselyPopulated,
    /// Class 1.
    DenselyPopulated,
}

impl DensityClass {
    /// Map a model class index to a label. Only 0 and 1 are meaningful.
    #[must_use]
    pub fn from_index(class: usize) -> Option<Self> {
        match class {
            0 => Some(DensityClass::NotDenselyPopulated),
            1 => Some(DensityClass::DenselyPopulated),
            _ => None,
        }
    }

    /// The model class index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            DensityClass::NotDenselyPopulated => 0,
            DensityClass::DenselyPopulated => 1,
        }
    }

    /// Full sentence shown above the confidence.
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            DensityClass::NotDenselyPopulated => {
                "This country is predicted to be NOT DENSELY POPULATED."
            }
            DensityClass::DenselyPopulated => "This country is predicted to be DENSELY POPULATED.",
        }
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub(crate) class: DensityClass,
    pub(crate) confidence: f64,
    pub(crate) probabilities: Vec<f64>,
    pub(crate) record: Record,
    pub(crate) input: FormInput,
}

impl Prediction {
    /// Predicted class.
    #[must_use]
    pub fn class(&self) -> DensityClass {
        self.class
    }

    /// Probability of the predicted class, in [0, 1].
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a percentage with two decimals, e.g. `80.00%`.
    #[must_use]
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }

    /// Probability of every class, indexed by class.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The exact record sent to the model.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The clamped form values the record was built from.
    #[must_use]
    pub fn input(&self) -> &FormInput {
        &self.input
    }
}

/// Runs predictions against an injected classifier.
///
/// Each call is independent; the predictor holds nothing but the model.
#[derive(Debug)]
pub struct Predictor<C> {
    classifier: C,
}

impl<C: Classifier> Predictor<C> {
    /// Wrap a loaded classifier.
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Build the record, classify it and pick the winning class probability.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`InferenceError::Model`] | the classifier rejected the record |
    /// | [`InferenceError::SchemaMismatch`] | the artifact was trained on other columns |
    /// | [`InferenceError::UnexpectedClass`] | predicted class is neither 0 nor 1 |
    /// | [`InferenceError::MissingProbability`] | no probability for the predicted class |
    #[instrument(skip_all)]
    pub fn predict(&self, input: &ValidatedInput) -> Result<Prediction, InferenceError> {
        let record = Record::from_input(input);
        debug!(record = ?record.values(), "record assembled");

        let class_index = self.classifier.predict(&record)?;
        let probabilities = self.classifier.predict_proba(&record)?;

        let class = DensityClass::from_index(class_index)
            .ok_or(InferenceError::UnexpectedClass { class: class_index })?;
        let confidence = probabilities.get(class_index).copied().ok_or(
            InferenceError::MissingProbability {
                class: class_index,
                n_probabilities: probabilities.len(),
            },
        )?;

        info!(?class, confidence, "prediction complete");

        Ok(Prediction {
            class,
            confidence,
            probabilities,
            record,
            input: input.values().clone(),
        })
    }
}
