//! Error type shared by grid construction, classification and refinement.

use thiserror::Error;

use crate::cell::CellId;
use crate::node_db::NodeId;

/// Errors raised by the refinement engine.
///
/// All failures are deterministic and reported before any state is changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
  /// The structured input mesh is malformed.
  #[error("invalid grid input: {0}")]
  InvalidGridInput(String),

  /// A node was queried before the boundary function classified it.
  #[error("node {node:?} at {coords:?} has not been classified")]
  UnclassifiedNode { node: NodeId, coords: Vec<f64> },

  /// The boundary function returned NaN.
  #[error("boundary function returned NaN at node {node:?} ({coords:?})")]
  NonFiniteValue { node: NodeId, coords: Vec<f64> },

  /// Cell homogeneity has not been computed for this level.
  #[error("cells of level {level} have not been classified")]
  NotClassified { level: usize },

  /// Refinement would exceed the configured depth limit.
  #[error("refinement depth limit {max_level} reached")]
  MaxLevelReached { max_level: usize },

  /// A cell handle does not belong to this grid.
  #[error("unknown cell {0:?}")]
  UnknownCell(CellId),

  /// A node handle does not belong to this database.
  #[error("unknown node {0:?}")]
  UnknownNode(NodeId),
}

/// Result alias for refinement operations.
pub type Result<T> = std::result::Result<T, MeshError>;
