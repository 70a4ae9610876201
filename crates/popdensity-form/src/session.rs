//! Interactive line-based form driving a [`Predictor`].

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::field::{FIELDS, FieldKind, FieldSpec};
use crate::input::{FieldValue, FormInput};
use crate::predictor::Predictor;

/// Counts reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Predictions rendered successfully.
    pub predictions: usize,
    /// Attempts that ended in an inline error.
    pub failures: usize,
}

/// A text form over any reader/writer pair.
///
/// Prompts for each field in form order, then runs the prediction. Empty
/// answers keep the shown value, out-of-range answers are clamped, and
/// prediction errors are printed without ending the session.
pub struct FormSession<'p, C, R, W> {
    predictor: &'p Predictor<C>,
    reader: R,
    writer: W,
    values: FormInput,
    repeat: bool,
}

enum Answer {
    Value(FieldValue),
    Eof,
}

impl<'p, C, R, W> FormSession<'p, C, R, W>
where
    C: Classifier,
    R: BufRead,
    W: Write,
{
    /// Create a session starting from the form defaults.
    pub fn new(predictor: &'p Predictor<C>, reader: R, writer: W) -> Self {
        Self {
            predictor,
            reader,
            writer,
            values: FormInput::default(),
            repeat: true,
        }
    }

    /// Whether to offer another prediction after each result.
    #[must_use]
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Current field values.
    pub fn values(&self) -> &FormInput {
        &self.values
    }

    /// Consume the session and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run until the user declines another prediction or input ends.
    ///
    /// # Errors
    ///
    /// Only I/O errors on the underlying streams.
    pub fn run(&mut self) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        writeln!(self.writer, "Population Density Predictor")?;
        writeln!(
            self.writer,
            "Predict whether a country is densely populated from its population data, land area and other factors."
        )?;

        loop {
            writeln!(self.writer)?;
            writeln!(self.writer, "Enter Country Data (press Enter to keep the value in brackets)")?;
            for spec in &FIELDS {
                match self.ask_field(spec)? {
                    Answer::Value(value) => self.values.set(spec.id, value),
                    Answer::Eof => return Ok(summary),
                }
            }
            writeln!(self.writer)?;

            let outcome = self
                .values
                .validate()
                .map_err(|e| error_chain(&e))
                .and_then(|input| self.predictor.predict(&input).map_err(|e| error_chain(&e)));
            match outcome {
                Ok(prediction) => {
                    summary.predictions += 1;
                    write!(self.writer, "{prediction}")?;
                }
                Err(message) => {
                    summary.failures += 1;
                    warn!(error = %message, "prediction failed");
                    writeln!(self.writer, "Error during prediction: {message}")?;
                }
            }

            if !self.repeat || !self.confirm("Predict another? [y/N] ")? {
                return Ok(summary);
            }
        }
    }

    fn ask_field(&mut self, spec: &FieldSpec) -> io::Result<Answer> {
        let current = self.values.get(spec.id);
        loop {
            write!(
                self.writer,
                "{} {} [{}]: ",
                spec.label,
                spec.bounds_label(),
                spec.format(current.as_f64())
            )?;
            self.writer.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(Answer::Eof);
            };
            let text = line.trim();
            if text.is_empty() {
                return Ok(Answer::Value(current));
            }

            match parse_answer(spec, text) {
                Ok(value) => {
                    let clamped = clamp_answer(spec, value);
                    if clamped != value {
                        writeln!(
                            self.writer,
                            "  out of range, using {}",
                            spec.format(clamped.as_f64())
                        )?;
                    }
                    debug!(field = %spec.id, value = clamped.as_f64(), "field set");
                    return Ok(Answer::Value(clamped));
                }
                Err(reason) => writeln!(self.writer, "  {reason}, try again")?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        writeln!(self.writer)?;
        write!(self.writer, "{question}")?;
        self.writer.flush()?;
        Ok(self
            .read_line()?
            .is_some_and(|l| matches!(l.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn parse_answer(spec: &FieldSpec, text: &str) -> Result<FieldValue, &'static str> {
    match spec.kind {
        FieldKind::Integer => {
            // Accept digit grouping such as 10,000 or 10_000.
            let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
            cleaned
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| "not a whole number")
        }
        // A comma here is ambiguous between grouping and a decimal comma.
        FieldKind::Slider if text.contains(',') => Err("use '.' as the decimal separator"),
        FieldKind::Slider => match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(FieldValue::Real(v)),
            _ => Err("not a finite number"),
        },
    }
}

fn clamp_answer(spec: &FieldSpec, value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Integer(v) => FieldValue::Integer(spec.clamp_int(v)),
        FieldValue::Real(v) => FieldValue::Real(spec.clamp(v)),
    }
}

/// Join an error and its sources with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use popdensity_rf::RfError;

    use super::{FormSession, SessionSummary};
    use crate::classifier::Classifier;
    use crate::error::InferenceError;
    use crate::predictor::Predictor;
    use crate::record::Record;

    /// Dense with p = 0.8 whenever fertility (column 5) is below 3.
    struct FertilityStub;

    impl Classifier for FertilityStub {
        fn predict(&self, record: &Record) -> Result<usize, InferenceError> {
            Ok(usize::from(record.values()[5] < 3.0))
        }

        fn predict_proba(&self, record: &Record) -> Result<Vec<f64>, InferenceError> {
            Ok(if record.values()[5] < 3.0 {
                vec![0.2, 0.8]
            } else {
                vec![0.8, 0.2]
            })
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _record: &Record) -> Result<usize, InferenceError> {
            Err(RfError::PredictionFeatureMismatch {
                expected: 8,
                got: 9,
            }
            .into())
        }

        fn predict_proba(&self, _record: &Record) -> Result<Vec<f64>, InferenceError> {
            Ok(vec![0.5, 0.5])
        }
    }

    fn run<C: Classifier>(classifier: C, script: &str) -> (SessionSummary, String) {
        let predictor = Predictor::new(classifier);
        let mut session = FormSession::new(&predictor, Cursor::new(script.to_string()), Vec::new());
        let summary = session.run().unwrap();
        let output = String::from_utf8(session.into_writer()).unwrap();
        (summary, output)
    }

    const ALL_DEFAULTS: &str = "\n\n\n\n\n\n\n\n\n";

    #[test]
    fn defaults_then_decline() {
        let (summary, out) = run(FertilityStub, &format!("{ALL_DEFAULTS}n\n"));
        assert_eq!(summary, SessionSummary { predictions: 1, failures: 0 });
        assert!(out.contains("predicted to be DENSELY POPULATED."));
        assert!(out.contains("Confidence: 80.00%"));
        assert!(out.contains("Fert. Rate [0.0, 8.0] [2.0]: "));
    }

    #[test]
    fn second_round_keeps_previous_answers() {
        // Round 1 sets fertility to 5 (sparse), round 2 keeps it.
        let script = format!("\n\n\n\n\n5\n\n\n\ny\n{ALL_DEFAULTS}n\n");
        let (summary, out) = run(FertilityStub, &script);
        assert_eq!(summary.predictions, 2);
        assert_eq!(out.matches("NOT DENSELY POPULATED").count(), 2);
        assert!(out.contains("Fert. Rate [0.0, 8.0] [5.0]: "));
    }

    #[test]
    fn out_of_range_answer_is_clamped() {
        let script = "\n\n\n\n\n42\n\n\n\n";
        let predictor = Predictor::new(FertilityStub);
        let mut session = FormSession::new(&predictor, Cursor::new(script), Vec::new())
            .with_repeat(false);
        session.run().unwrap();
        assert_eq!(session.values().fert_rate, 8.0);
        let out = String::from_utf8(session.into_writer()).unwrap();
        assert!(out.contains("out of range, using 8.0"));
    }

    #[test]
    fn garbage_answer_reprompts() {
        let script = "lots\n1,234,567\n\n\n\n\n\n\n\n\n";
        let predictor = Predictor::new(FertilityStub);
        let mut session =
            FormSession::new(&predictor, Cursor::new(script), Vec::new()).with_repeat(false);
        session.run().unwrap();
        assert_eq!(session.values().population, 1_234_567);
        let out = String::from_utf8(session.into_writer()).unwrap();
        assert!(out.contains("not a whole number, try again"));
    }

    #[test]
    fn decimal_comma_on_slider_reprompts() {
        // Urban Pop is the eighth prompt.
        let script = "\n\n\n\n\n\n\n5,5\n5.5\n\n";
        let predictor = Predictor::new(FertilityStub);
        let mut session =
            FormSession::new(&predictor, Cursor::new(script), Vec::new()).with_repeat(false);
        session.run().unwrap();
        assert_eq!(session.values().urban_pop_pct, 5.5);
        let out = String::from_utf8(session.into_writer()).unwrap();
        assert!(out.contains("use '.' as the decimal separator, try again"));
        assert_eq!(out.matches("Urban Pop (%)").count(), 2);
    }

    #[test]
    fn nan_answer_reprompts() {
        let script = "\n\n\nNaN\n1.5\n\n\n\n\n\n";
        let predictor = Predictor::new(FertilityStub);
        let mut session =
            FormSession::new(&predictor, Cursor::new(script), Vec::new()).with_repeat(false);
        session.run().unwrap();
        assert_eq!(session.values().yearly_change_pct, 1.5);
    }

    #[test]
    fn inference_error_keeps_form_usable() {
        let script = format!("{ALL_DEFAULTS}y\n{ALL_DEFAULTS}n\n");
        let (summary, out) = run(Broken, &script);
        assert_eq!(summary, SessionSummary { predictions: 0, failures: 2 });
        assert!(out.contains(
            "Error during prediction: model rejected the record: prediction input has 9 features, expected 8"
        ));
    }

    #[test]
    fn eof_mid_form_ends_quietly() {
        let (summary, out) = run(FertilityStub, "\n\n\n");
        assert_eq!(summary, SessionSummary::default());
        assert!(!out.contains("Confidence"));
    }
}
