//! Startup loading of the classifier artifact.

use std::path::Path;

use popdensity_rf::{RandomForest, RfError};
use tracing::{info, instrument, warn};

use crate::classifier::schema_matches;
use crate::error::FormError;

/// Artifact file name looked up relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "random_forest_classifier_model.bin";

/// Load the classifier artifact once at startup.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`FormError::ModelNotFound`] | no file at `path` |
/// | [`FormError::ModelLoad`] | file unreadable, corrupt, wrong version or structurally invalid |
#[instrument(fields(path = %path.as_ref().display()))]
pub fn load_model(path: impl AsRef<Path>) -> Result<RandomForest, FormError> {
    let path = path.as_ref();
    let forest = RandomForest::load(path).map_err(|e| match e {
        RfError::ModelNotFound { path } => FormError::ModelNotFound { path },
        other => FormError::ModelLoad {
            path: path.to_path_buf(),
            source: other,
        },
    })?;

    if !schema_matches(forest.feature_names()) {
        // Not fatal: every prediction will report the mismatch inline.
        warn!(
            feature_names = ?forest.feature_names(),
            "model was trained on different columns"
        );
    }

    info!(
        n_trees = forest.n_trees(),
        n_features = forest.n_features(),
        n_classes = forest.n_classes(),
        "model loaded successfully"
    );
    Ok(forest)
}
