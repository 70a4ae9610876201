use crate::{
    RfError,
    node::Node,
    predict::argmax,
};

/// A fitted CART decision tree.
///
/// Stored as an arena-based `Vec<Node>` with index references. Trees are
/// produced by an external trainer and exported node by node; this crate
/// only validates and evaluates them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
}

impl DecisionTree {
    /// Build a tree from an exported node arena.
    ///
    /// The root must be at index 0.
    ///
    /// # Errors
    ///
    /// | Variant                   | When                                                  |
    /// |---------------------------|-------------------------------------------------------|
    /// | [`RfError::EmptyTree`]    | `nodes` is empty                                      |
    /// | [`RfError::ZeroFeatures`] | `n_features` is zero                                  |
    /// | [`RfError::ZeroClasses`]  | `n_classes` is zero                                   |
    /// | [`RfError::InvalidNode`]  | a split or leaf violates the arena invariants         |
    pub fn from_nodes(
        nodes: Vec<Node>,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, RfError> {
        let tree = Self {
            nodes,
            n_features,
            n_classes,
        };
        tree.validate()?;
        Ok(tree)
    }

    /// Check the arena invariants.
    ///
    /// Every split references an in-range feature and two children stored
    /// after it, and no node has two parents, so traversal from the root
    /// always terminates at a leaf.
    /// Every leaf carries `n_classes` finite, non-negative probabilities.
    pub(crate) fn validate(&self) -> Result<(), RfError> {
        if self.nodes.is_empty() {
            return Err(RfError::EmptyTree);
        }
        if self.n_features == 0 {
            return Err(RfError::ZeroFeatures);
        }
        if self.n_classes == 0 {
            return Err(RfError::ZeroClasses);
        }

        let n_nodes = self.nodes.len();
        let mut has_parent = vec![false; n_nodes];
        for (node_index, node) in self.nodes.iter().enumerate() {
            let invalid = |reason: String| RfError::InvalidNode { node_index, reason };
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature.index() >= self.n_features {
                        return Err(invalid(format!(
                            "split feature {feature} out of range for {} features",
                            self.n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid("split threshold is not finite".to_string()));
                    }
                    for child in [left, right] {
                        if child.index() <= node_index || child.index() >= n_nodes {
                            return Err(invalid(format!(
                                "child {child} must be in ({node_index}, {n_nodes})"
                            )));
                        }
                        if has_parent[child.index()] {
                            return Err(invalid(format!("child {child} already has a parent")));
                        }
                        has_parent[child.index()] = true;
                    }
                }
                Node::Leaf { distribution } => {
                    if distribution.len() != self.n_classes {
                        return Err(invalid(format!(
                            "leaf distribution has {} entries, expected {}",
                            distribution.len(),
                            self.n_classes
                        )));
                    }
                    if distribution.iter().any(|p| !p.is_finite() || *p < 0.0) {
                        return Err(invalid(
                            "leaf distribution must be finite and non-negative".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Predict the class label for a single sample.
    ///
    /// Traverses from the root (index 0): at each `Split`, goes left when
    /// `sample[feature] <= threshold`, right otherwise. Returns the first
    /// class with the highest leaf probability.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        Ok(argmax(self.leaf_distribution(sample)?))
    }

    /// Return the class probability distribution for a single sample.
    ///
    /// The returned `Vec` has length `n_classes`.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>, RfError> {
        Ok(self.leaf_distribution(sample)?.to_vec())
    }

    fn leaf_distribution(&self, sample: &[f64]) -> Result<&[f64], RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return Ok(distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if sample[feature.index()] <= *threshold {
                        idx = left.index();
                    } else {
                        idx = right.index();
                    }
                }
            }
        }
    }
}
