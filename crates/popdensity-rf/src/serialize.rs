//! Model serialization and deserialization via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::RfError;
use crate::forest::RandomForest;

/// Current binary format version.
pub const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Number of trees in the forest.
    n_trees: usize,
    /// Number of features the model was trained on.
    n_features: usize,
    /// Number of classes.
    n_classes: usize,
    /// Feature column names.
    feature_names: Vec<String>,
    /// The serialized forest.
    forest: RandomForest,
}

impl RandomForest {
    /// Save the model to a binary file.
    ///
    /// Uses bincode encoding wrapped in a versioned envelope.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::SerializeModel`] | bincode encoding failed |
    /// | [`RfError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RfError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees: self.trees.len(),
            n_features: self.n_features,
            n_classes: self.n_classes,
            feature_names: self.feature_names.clone(),
            forest: self.clone(),
        };

        let bytes = bincode::serialize(&envelope).map_err(|e| RfError::SerializeModel {
            source: e,
        })?;

        std::fs::write(path, &bytes).map_err(|e| RfError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_trees = self.trees.len(),
            "model saved"
        );

        Ok(())
    }

    /// Load a model from a binary file.
    ///
    /// Checks the format version, then re-validates every tree so a
    /// hand-edited or truncated artifact cannot produce an out-of-bounds
    /// traversal.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::ModelNotFound`] | file does not exist |
    /// | [`RfError::ReadModel`] | file read failed for another reason |
    /// | [`RfError::DeserializeModel`] | bincode decoding failed |
    /// | [`RfError::IncompatibleModelVersion`] | format version mismatch |
    /// | [`RfError::InvalidModel`] | decoded forest fails validation |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RfError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RfError::ModelNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RfError::ReadModel {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let envelope: ModelEnvelope = bincode::deserialize(&bytes).map_err(|e| {
            RfError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(RfError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        let invalid = |source: RfError| RfError::InvalidModel {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let forest = envelope.forest;
        forest.validate().map_err(invalid)?;
        if forest.n_features != envelope.n_features {
            return Err(invalid(RfError::PredictionFeatureMismatch {
                expected: envelope.n_features,
                got: forest.n_features,
            }));
        }
        if forest.feature_names != envelope.feature_names {
            return Err(invalid(RfError::FeatureNameMismatch {
                header: envelope.feature_names,
                forest: forest.feature_names,
            }));
        }
        if forest.n_classes != envelope.n_classes || forest.trees.len() != envelope.n_trees {
            return Err(invalid(RfError::InconsistentTree {
                tree_index: 0,
                expected_features: envelope.n_features,
                expected_classes: envelope.n_classes,
                got_features: forest.n_features,
                got_classes: forest.n_classes,
            }));
        }

        debug!(
            n_trees = envelope.n_trees,
            n_features = envelope.n_features,
            n_classes = envelope.n_classes,
            feature_names = ?envelope.feature_names,
            "model loaded"
        );

        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{FORMAT_VERSION, ModelEnvelope};
    use crate::{DecisionTree, Node, RandomForest, RfError};

    fn simple_model() -> RandomForest {
        let tree = DecisionTree::from_nodes(
            vec![
                Node::split(0, 5.0, 1, 2),
                Node::leaf(vec![0.9, 0.1]),
                Node::leaf(vec![0.3, 0.7]),
            ],
            2,
            2,
        )
        .unwrap();
        RandomForest::from_trees(vec![tree], vec!["x".to_string(), "y".to_string()]).unwrap()
    }

    #[test]
    fn round_trip_identical_predictions() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("test_model.bin");

        let forest = simple_model();
        forest.save(&model_path).unwrap();
        let loaded = RandomForest::load(&model_path).unwrap();

        assert_eq!(forest, loaded);
        for sample in [[1.5, 0.0], [11.0, 0.0]] {
            assert_eq!(
                forest.predict_proba(&sample).unwrap(),
                loaded.predict_proba(&sample).unwrap()
            );
        }
    }

    #[test]
    fn load_nonexistent_file_error() {
        let dir = TempDir::new().unwrap();
        let err = RandomForest::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, RfError::ModelNotFound { .. }));
    }

    #[test]
    fn load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = RandomForest::load(dir.path()).unwrap_err();
        assert!(matches!(err, RfError::ReadModel { .. }));
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a valid bincode file").unwrap();
        let err = RandomForest::load(&path).unwrap_err();
        assert!(matches!(err, RfError::DeserializeModel { .. }));
    }

    #[test]
    fn load_wrong_version_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v99.bin");
        let forest = simple_model();
        let envelope = ModelEnvelope {
            format_version: 99,
            n_trees: 1,
            n_features: 2,
            n_classes: 2,
            feature_names: forest.feature_names.clone(),
            forest,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = RandomForest::load(&path).unwrap_err();
        assert!(matches!(
            err,
            RfError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: 99,
                ..
            }
        ));
    }

    #[test]
    fn load_feature_names_disagreeing_with_header_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("renamed.bin");
        let forest = simple_model();
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees: 1,
            n_features: 2,
            n_classes: 2,
            feature_names: vec!["y".to_string(), "x".to_string()],
            forest,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = RandomForest::load(&path).unwrap_err();
        match err {
            RfError::InvalidModel { source, .. } => {
                assert!(matches!(*source, RfError::FeatureNameMismatch { .. }));
            }
            other => panic!("expected InvalidModel, got {other:?}"),
        }
    }

    #[test]
    fn load_structurally_invalid_forest_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cyclic.bin");
        let mut forest = simple_model();
        // Point the root back at itself; from_nodes would refuse this.
        forest.trees[0].nodes[0] = Node::split(0, 5.0, 0, 2);
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            n_trees: 1,
            n_features: 2,
            n_classes: 2,
            feature_names: forest.feature_names.clone(),
            forest,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = RandomForest::load(&path).unwrap_err();
        assert!(matches!(err, RfError::InvalidModel { .. }));
    }
}
