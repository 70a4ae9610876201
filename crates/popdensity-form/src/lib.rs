//! Population density prediction form.
//!
//! Nine demographic fields go in; three percentages are turned into
//! fractions and the resulting record is classified by an injected
//! [`Classifier`] (normally a [`popdensity_rf::RandomForest`] loaded with
//! [`load_model`]). [`Predictor::predict`] is the pure core; [`FormSession`]
//! and the CLI are thin adapters around it.

mod classifier;
mod error;
mod field;
mod input;
mod loader;
mod predictor;
mod record;
mod render;
mod session;

pub use classifier::{Classifier, schema_matches};
pub use error::{FormError, InferenceError};
pub use field::{FIELDS, FieldId, FieldKind, FieldSpec};
pub use input::{FieldValue, FormInput, ValidatedInput};
pub use loader::{DEFAULT_MODEL_PATH, load_model};
pub use predictor::{DensityClass, Prediction, Predictor};
pub use record::{COLUMNS, Record, percent_to_fraction};
pub use render::PredictionReport;
pub use session::{FormSession, SessionSummary};
