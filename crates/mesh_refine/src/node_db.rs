//! NodeDatabase - owner of every mesh node across refinement levels.
//!
//! Nodes are identified by their coordinate. Registering a coordinate that
//! already exists (created by a neighbouring cell, or at a coarser level)
//! returns the existing node, so each distinct point exists exactly once.
//! Nodes are never removed.
//!
//! # Classification
//!
//! A node's field value is computed at most once: [`NodeDatabase::apply_func`]
//! only evaluates nodes that have no value yet, which makes repeated calls
//! after each refinement round cheap. [`NodeDatabase::reapply_func`] forces a
//! full re-evaluation when the boundary itself changes and bumps the
//! [generation](NodeDatabase::generation), which invalidates any cell
//! classification computed from the old values.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::{GridConfig, Side};
use crate::error::{MeshError, Result};
use crate::field::ScalarField;
use crate::space::Space;

/// Handle of a node inside its [`NodeDatabase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
  /// Position in creation order.
  #[inline]
  pub fn index(self) -> usize {
    self.0
  }
}

/// A deduplicated mesh point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node<S: Space> {
  /// Coordinates of the point.
  pub coords: S::Vector,
  /// Refinement level that created the node.
  pub level: usize,
  /// Field value, `None` until the boundary function was applied.
  value: Option<f64>,
}

impl<S: Space> Node<S> {
  fn new(coords: S::Vector, level: usize) -> Self {
    Self {
      coords,
      level,
      value: None,
    }
  }

  /// Field value, if classified.
  #[inline]
  pub fn value(&self) -> Option<f64> {
    self.value
  }

  /// Whether the boundary function has been applied to this node.
  #[inline]
  pub fn is_classified(&self) -> bool {
    self.value.is_some()
  }
}

/// Owner of all nodes, with an exact coordinate index and per-level lists.
#[derive(Clone, Debug)]
pub struct NodeDatabase<S: Space> {
  nodes: Vec<Node<S>>,
  index: HashMap<S::Key, NodeId>,
  levels: Vec<Vec<NodeId>>,
  generation: u64,
  config: GridConfig,
}

impl<S: Space> NodeDatabase<S> {
  /// Create an empty database.
  pub fn new(config: GridConfig) -> Self {
    Self {
      nodes: Vec::new(),
      index: HashMap::new(),
      levels: vec![Vec::new()],
      generation: 0,
      config,
    }
  }

  /// Classification settings.
  #[inline]
  pub fn config(&self) -> &GridConfig {
    &self.config
  }

  /// Look up the node at `coords`, creating it at `level` if none exists.
  ///
  /// Matching is exact: refinement only ever halves intervals, so shared
  /// points are bit-identical no matter which cell computes them. An
  /// existing node keeps the level it was created at.
  pub fn register_or_get(&mut self, coords: S::Vector, level: usize) -> NodeId {
    let key = S::key(coords);
    if let Some(&id) = self.index.get(&key) {
      return id;
    }

    let id = NodeId(self.nodes.len());
    self.nodes.push(Node::new(coords, level));
    self.index.insert(key, id);

    if self.levels.len() <= level {
      self.levels.resize_with(level + 1, Vec::new);
    }
    self.levels[level].push(id);
    id
  }

  /// Find the node at exactly `coords`.
  #[inline]
  pub fn find(&self, coords: S::Vector) -> Option<NodeId> {
    self.index.get(&S::key(coords)).copied()
  }

  /// Get a node.
  ///
  /// # Panics
  /// Panics if `id` comes from another database. Use [`get`](Self::get) for
  /// foreign handles.
  #[inline]
  pub fn node(&self, id: NodeId) -> &Node<S> {
    &self.nodes[id.0]
  }

  /// Get a node, `None` for a foreign handle.
  #[inline]
  pub fn get(&self, id: NodeId) -> Option<&Node<S>> {
    self.nodes.get(id.0)
  }

  /// Coordinates of a node.
  ///
  /// # Panics
  /// Panics if `id` comes from another database.
  #[inline]
  pub fn coords(&self, id: NodeId) -> S::Vector {
    self.nodes[id.0].coords
  }

  /// Total number of nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Check if empty.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Number of levels holding at least the level-0 list.
  #[inline]
  pub fn level_count(&self) -> usize {
    self.levels.len()
  }

  /// Per-level node lists, in creation order.
  #[inline]
  pub fn levels(&self) -> &[Vec<NodeId>] {
    &self.levels
  }

  /// Nodes created at `level` (empty if the level does not exist).
  pub fn level(&self, level: usize) -> &[NodeId] {
    self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Coordinates of the nodes created at `level`.
  pub fn level_points(&self, level: usize) -> Vec<S::Vector> {
    self.level(level).iter().map(|&id| self.coords(id)).collect()
  }

  /// Coordinates of every node, in creation order.
  pub fn all_points(&self) -> Vec<S::Vector> {
    self.nodes.iter().map(|n| n.coords).collect()
  }

  /// Iterate over all nodes with their handles.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
    self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
  }

  /// Counter bumped every time existing values are overwritten.
  ///
  /// Classifying new nodes leaves it unchanged.
  #[inline]
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Number of nodes still waiting for a field value.
  pub fn unclassified_count(&self) -> usize {
    self.nodes.iter().filter(|n| !n.is_classified()).count()
  }

  /// Side of a node under the configured sign convention.
  pub fn side(&self, id: NodeId) -> Result<Side> {
    let node = self.get(id).ok_or(MeshError::UnknownNode(id))?;
    match node.value {
      Some(value) => Ok(self.config.side_of(value)),
      None => Err(MeshError::UnclassifiedNode {
        node: id,
        coords: S::components(node.coords),
      }),
    }
  }

  /// Evaluate `field` on every node that has no value yet.
  ///
  /// Returns the number of nodes evaluated. On a NaN result nothing is
  /// stored.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "node_db::apply_func"))]
  pub fn apply_func<F: ScalarField<S>>(&mut self, field: &F) -> Result<usize> {
    let values: Vec<(NodeId, f64)> = self
      .pending()
      .map(|id| (id, field.eval(self.coords(id))))
      .collect();
    self.store(values)
  }

  /// Evaluate `field` on every node, replacing previous values.
  ///
  /// Advances the generation once the new values are stored.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "node_db::reapply_func"))]
  pub fn reapply_func<F: ScalarField<S>>(&mut self, field: &F) -> Result<usize> {
    let values: Vec<(NodeId, f64)> = self
      .iter()
      .map(|(id, node)| (id, field.eval(node.coords)))
      .collect();
    let count = self.store(values)?;
    self.generation += 1;
    Ok(count)
  }

  /// Parallel [`apply_func`](Self::apply_func).
  ///
  /// The field is evaluated on the rayon pool; values are written back
  /// afterwards, so the database itself is never shared mutably.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "node_db::par_apply_func"))]
  pub fn par_apply_func<F: ScalarField<S> + Sync>(&mut self, field: &F) -> Result<usize> {
    let pending: Vec<NodeId> = self.pending().collect();
    let nodes = &self.nodes;
    let values: Vec<(NodeId, f64)> = pending
      .into_par_iter()
      .map(|id| (id, field.eval(nodes[id.0].coords)))
      .collect();
    self.store(values)
  }

  /// Coordinates of every node on the inner side, all levels.
  pub fn get_inner(&self) -> Result<Vec<S::Vector>> {
    self.points_on(Side::Inner)
  }

  /// Coordinates of every node on the outer side, all levels.
  pub fn get_outer(&self) -> Result<Vec<S::Vector>> {
    self.points_on(Side::Outer)
  }

  /// Coordinates of every node on `side`, in creation order.
  ///
  /// Fails if any node is still unclassified.
  pub fn points_on(&self, side: Side) -> Result<Vec<S::Vector>> {
    let mut points = Vec::new();
    for (id, node) in self.iter() {
      if self.side(id)? == side {
        points.push(node.coords);
      }
    }
    Ok(points)
  }

  fn pending(&self) -> impl Iterator<Item = NodeId> + '_ {
    self
      .iter()
      .filter(|(_, node)| !node.is_classified())
      .map(|(id, _)| id)
  }

  fn store(&mut self, values: Vec<(NodeId, f64)>) -> Result<usize> {
    if let Some(&(id, _)) = values.iter().find(|(_, v)| v.is_nan()) {
      return Err(MeshError::NonFiniteValue {
        node: id,
        coords: S::components(self.coords(id)),
      });
    }

    let count = values.len();
    for (id, value) in values {
      self.nodes[id.0].value = Some(value);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(classified = count, total = self.nodes.len(), "applied boundary function");

    Ok(count)
  }
}

impl<S: Space> Default for NodeDatabase<S> {
  fn default() -> Self {
    Self::new(GridConfig::default())
  }
}

#[cfg(test)]
#[path = "node_db_test.rs"]
mod node_db_test;
