use std::path::PathBuf;

/// Errors from Random Forest artifact handling and inference.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when a forest is built from zero trees.
    #[error("forest must contain at least 1 tree")]
    EmptyForest,

    /// Returned when a tree is built from an empty node arena.
    #[error("decision tree must contain at least 1 node")]
    EmptyTree,

    /// Returned when a tree declares zero feature columns.
    #[error("decision tree must have at least 1 feature column")]
    ZeroFeatures,

    /// Returned when a tree declares zero classes.
    #[error("decision tree must have at least 1 class")]
    ZeroClasses,

    /// Returned when a node in the arena is structurally invalid.
    #[error("invalid node {node_index}: {reason}")]
    InvalidNode {
        /// Zero-based arena index of the offending node.
        node_index: usize,
        /// Human-readable description of what is wrong with the node.
        reason: String,
    },

    /// Returned when a tree disagrees with the forest on its input or output shape.
    #[error(
        "tree {tree_index} has {got_features} features and {got_classes} classes, \
         expected {expected_features} and {expected_classes}"
    )]
    InconsistentTree {
        /// Zero-based index of the offending tree.
        tree_index: usize,
        /// Feature count declared by the forest.
        expected_features: usize,
        /// Class count declared by the forest.
        expected_classes: usize,
        /// Feature count declared by the tree.
        got_features: usize,
        /// Class count declared by the tree.
        got_classes: usize,
    },

    /// Returned when the feature name list does not cover every feature column.
    #[error("model has {n_features} features but {got} feature names")]
    FeatureNameCount {
        /// Number of features the trees expect.
        n_features: usize,
        /// Number of feature names supplied.
        got: usize,
    },

    /// Returned when an artifact header lists different feature names than its forest.
    #[error("artifact header names features {header:?}, forest names {forest:?}")]
    FeatureNameMismatch {
        /// Names recorded in the envelope header.
        header: Vec<String>,
        /// Names stored on the forest itself.
        forest: Vec<String>,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a prediction input value is NaN or infinite.
    #[error("non-finite prediction input at feature {feature_index}")]
    NonFiniteInput {
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the model file does not exist.
    #[error("model file not found: {path}")]
    ModelNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Returned when reading the model file fails for any reason other than absence.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },

    /// Returned when a decoded model fails structural validation.
    #[error("model in {path} is structurally invalid")]
    InvalidModel {
        /// Path to the model file.
        path: PathBuf,
        /// The validation failure.
        source: Box<RfError>,
    },
}
