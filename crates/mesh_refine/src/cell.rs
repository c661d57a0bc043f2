//! Cell - axis-aligned hyper-rectangle at one refinement level.
//!
//! A cell references its `2^D` corner nodes in the fixed hypercube order of
//! [`crate::topology`] and links to its parent and children by arena handle.
//! Cells know nothing about the boundary function; homogeneity is computed
//! by the grid from node classifications.

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::bounds::Bounds;
use crate::node_db::{NodeDatabase, NodeId};
use crate::space::Space;

/// Handle of a cell inside its grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
  /// Position in creation order.
  #[inline]
  pub fn index(self) -> usize {
    self.0
  }
}

/// Corner points of one cell, in vertex order.
pub type CornerCoords<S> = SmallVec<[<S as Space>::Vector; 8]>;

/// Axis-aligned cell of the refinement tree.
#[derive(Clone, Debug)]
pub struct Cell<S: Space> {
  id: CellId,
  level: usize,
  vertices: SmallVec<[NodeId; 8]>,
  parent: Option<CellId>,
  children: SmallVec<[CellId; 8]>,
  _space: PhantomData<S>,
}

impl<S: Space> Cell<S> {
  pub(crate) fn new(
    id: CellId,
    level: usize,
    vertices: SmallVec<[NodeId; 8]>,
    parent: Option<CellId>,
  ) -> Self {
    debug_assert_eq!(vertices.len(), S::VERTEX_COUNT, "cell needs 2^D corners");
    Self {
      id,
      level,
      vertices,
      parent,
      children: SmallVec::new(),
      _space: PhantomData,
    }
  }

  /// Handle of this cell.
  #[inline]
  pub fn id(&self) -> CellId {
    self.id
  }

  /// Refinement level (0 = initial grid).
  #[inline]
  pub fn level(&self) -> usize {
    self.level
  }

  /// Corner nodes in vertex order.
  #[inline]
  pub fn vertex_nodes(&self) -> &[NodeId] {
    &self.vertices
  }

  /// Cell this one was split from, `None` at level 0.
  #[inline]
  pub fn parent_cell(&self) -> Option<CellId> {
    self.parent
  }

  /// Children in creation order, empty until subdivided.
  #[inline]
  pub fn child_cells(&self) -> &[CellId] {
    &self.children
  }

  /// Not subdivided yet.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  /// Part of the initial grid.
  #[inline]
  pub fn is_root(&self) -> bool {
    self.parent.is_none()
  }

  pub(crate) fn set_children(&mut self, children: SmallVec<[CellId; 8]>) {
    debug_assert!(self.children.is_empty(), "cell {:?} subdivided twice", self.id);
    self.children = children;
  }

  /// Corner coordinates in vertex order.
  pub fn get_vertex_coords(&self, nodes: &NodeDatabase<S>) -> CornerCoords<S> {
    self.vertices.iter().map(|&id| nodes.coords(id)).collect()
  }

  /// Corner node pairs of every edge, in edge-table order.
  pub fn edge_nodes(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
    S::EDGES
      .iter()
      .map(move |&(a, b)| (self.vertices[a], self.vertices[b]))
  }

  /// `(start, end)` coordinates of every edge, in edge-table order.
  pub fn get_edge_coords(&self, nodes: &NodeDatabase<S>) -> Vec<(S::Vector, S::Vector)> {
    self
      .edge_nodes()
      .map(|(a, b)| (nodes.coords(a), nodes.coords(b)))
      .collect()
  }

  /// Region covered by the cell.
  pub fn bounds(&self, nodes: &NodeDatabase<S>) -> Bounds<S> {
    let (first, last) = self.diagonal(nodes);
    Bounds::from_corners(first, last)
  }

  /// Corner coordinates of the `2^D` sub-cells, in child order.
  ///
  /// Child `c` occupies the half of the cell selected by the bits of `c`
  /// (same convention as vertices). Every component of every returned point
  /// is either a corner component of this cell or the midpoint of two, so
  /// points shared with neighbouring cells come out bit-identical.
  pub fn child_corner_coords(&self, nodes: &NodeDatabase<S>) -> Vec<CornerCoords<S>> {
    let (first, last) = self.diagonal(nodes);
    let mid = S::midpoint(first, last);

    (0..S::VERTEX_COUNT)
      .map(|child| {
        let child_first = S::vertex(first, mid, child);
        let child_last = S::vertex(mid, last, child);
        (0..S::VERTEX_COUNT)
          .map(|v| S::vertex(child_first, child_last, v))
          .collect()
      })
      .collect()
  }

  /// Vertex 0 and vertex `2^D - 1`, the two ends of the main diagonal.
  #[inline]
  fn diagonal(&self, nodes: &NodeDatabase<S>) -> (S::Vector, S::Vector) {
    (
      nodes.coords(self.vertices[0]),
      nodes.coords(self.vertices[S::VERTEX_COUNT - 1]),
    )
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
