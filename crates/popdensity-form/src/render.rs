//! Text and JSON renderings of a [`Prediction`].

use std::fmt;

use crate::input::FormInput;
use crate::predictor::{DensityClass, Prediction};
use crate::record::Record;

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.class.headline())?;
        writeln!(f)?;
        writeln!(f, "Confidence: {}", self.confidence_label())?;
        writeln!(f)?;
        writeln!(f, "Data sent to the model (after processing):")?;
        let width = self.record.columns().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
        for (name, value) in self.record.columns() {
            writeln!(f, "  {name:<width$} = {value}")?;
        }
        Ok(())
    }
}

/// Serializable view of a [`Prediction`].
#[derive(Debug, serde::Serialize)]
pub struct PredictionReport<'a> {
    /// Headline sentence.
    pub label: &'static str,
    /// Predicted class.
    pub class: DensityClass,
    /// Probability of the predicted class.
    pub confidence: f64,
    /// Same, formatted as a percentage.
    pub confidence_pct: String,
    /// Probability of every class.
    pub probabilities: &'a [f64],
    /// Record sent to the model.
    pub record: &'a Record,
    /// Clamped form values.
    pub input: &'a FormInput,
}

impl Prediction {
    /// Borrow a serializable view of this prediction.
    #[must_use]
    pub fn report(&self) -> PredictionReport<'_> {
        PredictionReport {
            label: self.class.headline(),
            class: self.class,
            confidence: self.confidence,
            confidence_pct: self.confidence_label(),
            probabilities: &self.probabilities,
            record: &self.record,
            input: &self.input,
        }
    }
}
