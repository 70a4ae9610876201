//! Random Forest classifier artifacts: load, validate, predict.
//!
//! Holds a pre-trained Random Forest as an arena of CART decision trees,
//! stored in a versioned bincode envelope. Training happens elsewhere;
//! this crate validates exported trees and evaluates single samples.

mod error;
mod forest;
mod node;
mod predict;
mod serialize;
mod tree;

pub use error::RfError;
pub use forest::RandomForest;
pub use node::{FeatureIndex, Node, NodeIndex};
pub use predict::ClassDistribution;
pub use serialize::FORMAT_VERSION;
pub use tree::DecisionTree;
