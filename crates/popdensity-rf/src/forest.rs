//! Random Forest ensemble assembly and validation.

use tracing::debug;

use crate::error::RfError;
use crate::tree::DecisionTree;

/// A fitted Random Forest ensemble.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
    pub(crate) feature_names: Vec<String>,
}

impl RandomForest {
    /// Assemble a forest from exported trees.
    ///
    /// `feature_names` may be empty when the exporter did not record column
    /// names; otherwise it must name every feature column in training order.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                          |
    /// |-------------------------------------|-----------------------------------------------|
    /// | [`RfError::EmptyForest`]            | `trees` is empty                              |
    /// | [`RfError::InconsistentTree`]       | trees disagree on feature or class count      |
    /// | [`RfError::FeatureNameCount`]       | names given but not one per feature           |
    /// | any [`DecisionTree`] validation     | a tree violates the arena invariants          |
    pub fn from_trees(
        trees: Vec<DecisionTree>,
        feature_names: Vec<String>,
    ) -> Result<Self, RfError> {
        let first = trees.first().ok_or(RfError::EmptyForest)?;
        let forest = Self {
            n_features: first.n_features,
            n_classes: first.n_classes,
            trees,
            feature_names,
        };
        forest.validate()?;
        debug!(
            n_trees = forest.trees.len(),
            n_features = forest.n_features,
            n_classes = forest.n_classes,
            "forest assembled"
        );
        Ok(forest)
    }

    /// Check that every tree is valid and agrees with the forest's shape.
    pub(crate) fn validate(&self) -> Result<(), RfError> {
        if self.trees.is_empty() {
            return Err(RfError::EmptyForest);
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            tree.validate()?;
            if tree.n_features != self.n_features || tree.n_classes != self.n_classes {
                return Err(RfError::InconsistentTree {
                    tree_index,
                    expected_features: self.n_features,
                    expected_classes: self.n_classes,
                    got_features: tree.n_features,
                    got_classes: tree.n_classes,
                });
            }
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.n_features {
            return Err(RfError::FeatureNameCount {
                n_features: self.n_features,
                got: self.feature_names.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{DecisionTree, Node, RandomForest, RfError};

    fn leaf_tree(n_features: usize, distribution: Vec<f64>) -> DecisionTree {
        let n_classes = distribution.len();
        DecisionTree::from_nodes(vec![Node::leaf(distribution)], n_features, n_classes).unwrap()
    }

    #[test]
    fn from_trees_takes_shape_from_first_tree() {
        let forest = RandomForest::from_trees(
            vec![leaf_tree(3, vec![1.0, 0.0]), leaf_tree(3, vec![0.0, 1.0])],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap();
        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.n_features(), 3);
        assert_eq!(forest.n_classes(), 2);
        assert_eq!(forest.feature_names(), ["a", "b", "c"]);
    }

    #[test]
    fn empty_forest_rejected() {
        let err = RandomForest::from_trees(vec![], vec![]).unwrap_err();
        assert!(matches!(err, RfError::EmptyForest));
    }

    #[test]
    fn mismatched_feature_count_rejected() {
        let err = RandomForest::from_trees(
            vec![leaf_tree(3, vec![1.0, 0.0]), leaf_tree(4, vec![1.0, 0.0])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RfError::InconsistentTree { tree_index: 1, .. }));
    }

    #[test]
    fn mismatched_class_count_rejected() {
        let err = RandomForest::from_trees(
            vec![leaf_tree(2, vec![1.0, 0.0]), leaf_tree(2, vec![1.0, 0.0, 0.0])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RfError::InconsistentTree { tree_index: 1, .. }));
    }

    #[test]
    fn partial_feature_names_rejected() {
        let err =
            RandomForest::from_trees(vec![leaf_tree(3, vec![1.0])], vec!["a".into()]).unwrap_err();
        assert!(matches!(
            err,
            RfError::FeatureNameCount {
                n_features: 3,
                got: 1
            }
        ));
    }

    #[test]
    fn unnamed_features_allowed() {
        let forest = RandomForest::from_trees(vec![leaf_tree(3, vec![1.0])], vec![]).unwrap();
        assert!(forest.feature_names().is_empty());
    }
}
