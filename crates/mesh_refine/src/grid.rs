//! Grid - structured base mesh plus the adaptive refinement tree.
//!
//! The grid owns the [`NodeDatabase`] and a flat arena of every [`Cell`]
//! ever created. Level 0 is built from structured coordinate axes; deeper
//! levels appear by subdividing cells that straddle the boundary.
//!
//! # Refinement Round
//!
//! 1. `apply_func`: classify new nodes with the boundary field
//! 2. `classify_cells_by_homogenity`: find cells whose corners disagree
//! 3. `divide_boundary_cells`: split the inhomogeneous cells of `max_level`
//!
//! Homogeneous cells are never split again, so only the band around the
//! boundary gets deeper.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::cell::{Cell, CellId, CornerCoords};
use crate::config::{GridConfig, Side};
use crate::error::{MeshError, Result};
use crate::field::ScalarField;
use crate::node_db::{NodeDatabase, NodeId};
use crate::space::{Dim2, Dim3, Space};
use crate::stats::RefinementStats;
use crate::topology;

/// Quadtree grid.
pub type Grid2 = Grid<Dim2>;

/// Octree grid.
pub type Grid3 = Grid<Dim3>;

/// Corner agreement of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Homogeneity {
  /// All corners on the same side.
  Homogeneous(Side),
  /// Corners on both sides: the boundary passes through the cell.
  Inhomogeneous,
}

/// Adaptive refinement grid over `S`.
#[derive(Clone, Debug)]
pub struct Grid<S: Space> {
  nodes: NodeDatabase<S>,
  cells: Vec<Cell<S>>,
  levels: Vec<Vec<CellId>>,
  inhomogeneous: Vec<Vec<CellId>>,
  /// Number of cells covered by the last classification pass.
  classified_cells: usize,
  /// Node generation the last classification pass was computed from.
  classified_generation: u64,
  max_level: usize,
  config: GridConfig,
}

impl<S: Space> Grid<S> {
  /// Build the level-0 grid from one coordinate array per axis.
  ///
  /// Axes combine in "ij" order: the first axis varies slowest. Each axis
  /// needs at least two finite, strictly monotonic values.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "grid::new"))]
  pub fn new<A: AsRef<[f64]>>(axes: &[A], config: GridConfig) -> Result<Self> {
    let axes: Vec<&[f64]> = axes.iter().map(|a| a.as_ref()).collect();
    validate_axes(&axes, S::DIM)?;

    let shape: Vec<usize> = axes.iter().map(|a| a.len()).collect();
    let strides = strides(&shape);
    let mut nodes = NodeDatabase::new(config);

    // Level-0 nodes first, so node order equals structured-grid order.
    let point_count: usize = shape.iter().product();
    let mut index = vec![0usize; S::DIM];
    let mut components = vec![0.0; S::DIM];
    let mut grid_nodes = Vec::with_capacity(point_count);
    for flat in 0..point_count {
      unravel(flat, &shape, &mut index);
      for (axis, &i) in index.iter().enumerate() {
        components[axis] = axes[axis][i];
      }
      grid_nodes.push(nodes.register_or_get(S::from_components(&components), 0));
    }

    // Slide a 2^D corner window over every cell position.
    let cell_shape: Vec<usize> = shape.iter().map(|n| n - 1).collect();
    let cell_count: usize = cell_shape.iter().product();
    let corner_offsets: SmallVec<[usize; 8]> = (0..S::VERTEX_COUNT)
      .map(|v| {
        (0..S::DIM)
          .filter(|&axis| topology::vertex_on_upper(v, axis, S::DIM))
          .map(|axis| strides[axis])
          .sum()
      })
      .collect();

    let mut cells = Vec::with_capacity(cell_count);
    let mut level0 = Vec::with_capacity(cell_count);
    for flat in 0..cell_count {
      unravel(flat, &cell_shape, &mut index);
      let base: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
      let vertices = corner_offsets
        .iter()
        .map(|offset| grid_nodes[base + offset])
        .collect();
      let id = CellId(cells.len());
      cells.push(Cell::new(id, 0, vertices, None));
      level0.push(id);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(nodes = nodes.len(), cells = cells.len(), "built level-0 grid");

    Ok(Self {
      nodes,
      cells,
      levels: vec![level0],
      inhomogeneous: Vec::new(),
      classified_cells: 0,
      classified_generation: 0,
      max_level: 0,
      config,
    })
  }

  /// [`Grid::new`] with the default configuration.
  pub fn from_axes<A: AsRef<[f64]>>(axes: &[A]) -> Result<Self> {
    Self::new(axes, GridConfig::default())
  }

  /// Configuration the grid was built with.
  #[inline]
  pub fn config(&self) -> &GridConfig {
    &self.config
  }

  /// The node database.
  #[inline]
  pub fn nodes(&self) -> &NodeDatabase<S> {
    &self.nodes
  }

  /// Mutable access to the node database, e.g. to apply a field.
  #[inline]
  pub fn nodes_mut(&mut self) -> &mut NodeDatabase<S> {
    &mut self.nodes
  }

  /// Every cell, all levels, in creation order.
  #[inline]
  pub fn cells(&self) -> &[Cell<S>] {
    &self.cells
  }

  /// Get a cell.
  ///
  /// # Panics
  /// Panics if `id` comes from another grid. Use [`get_cell`](Self::get_cell)
  /// for foreign handles.
  #[inline]
  pub fn cell(&self, id: CellId) -> &Cell<S> {
    &self.cells[id.0]
  }

  /// Get a cell, `None` for a foreign handle.
  #[inline]
  pub fn get_cell(&self, id: CellId) -> Option<&Cell<S>> {
    self.cells.get(id.0)
  }

  /// Cells per level, in creation order.
  #[inline]
  pub fn levels(&self) -> &[Vec<CellId>] {
    &self.levels
  }

  /// Cells created at `level` (empty if the level does not exist).
  pub fn level(&self, level: usize) -> &[CellId] {
    self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Cells that have not been subdivided.
  pub fn leaf_cells(&self) -> impl Iterator<Item = &Cell<S>> {
    self.cells.iter().filter(|c| c.is_leaf())
  }

  /// Number of completed `divide_boundary_cells` rounds.
  #[inline]
  pub fn max_level(&self) -> usize {
    self.max_level
  }

  /// Corner index pairs forming the edges of every cell.
  #[inline]
  pub fn idx_edge_pairs(&self) -> &'static [(usize, usize)] {
    S::EDGES
  }

  /// Coordinates of the original structured grid points.
  pub fn all_mg_points(&self) -> Vec<S::Vector> {
    self.nodes.level_points(0)
  }

  /// Corner coordinates of a cell.
  pub fn get_vertex_coords(&self, id: CellId) -> Result<CornerCoords<S>> {
    let cell = self.get_cell(id).ok_or(MeshError::UnknownCell(id))?;
    Ok(cell.get_vertex_coords(&self.nodes))
  }

  /// Edge coordinates of a cell.
  pub fn get_edge_coords(&self, id: CellId) -> Result<Vec<(S::Vector, S::Vector)>> {
    let cell = self.get_cell(id).ok_or(MeshError::UnknownCell(id))?;
    Ok(cell.get_edge_coords(&self.nodes))
  }

  /// Inhomogeneous cells per level from the last classification pass.
  #[inline]
  pub fn inhomogeneous_cells(&self) -> &[Vec<CellId>] {
    &self.inhomogeneous
  }

  /// Apply a boundary field to every unclassified node.
  pub fn apply_func<F: ScalarField<S>>(&mut self, field: &F) -> Result<usize> {
    self.nodes.apply_func(field)
  }

  /// Split a cell into `2^D` children at `level + 1`.
  ///
  /// Idempotent: a cell that already has children returns them and nothing
  /// is created. Corner nodes are looked up before being created, so
  /// midpoints shared with neighbours exist once.
  pub fn make_childs(&mut self, id: CellId) -> Result<SmallVec<[CellId; 8]>> {
    self.subdivide(id).map(|(children, _)| children)
  }

  /// Corner agreement of one cell.
  pub fn cell_homogeneity(&self, id: CellId) -> Result<Homogeneity> {
    let cell = self.get_cell(id).ok_or(MeshError::UnknownCell(id))?;

    let mut first: Option<Side> = None;
    let mut mixed = false;
    for &node in cell.vertex_nodes() {
      let side = self.nodes.side(node)?;
      match first {
        None => first = Some(side),
        Some(s) if s != side => mixed = true,
        Some(_) => {}
      }
    }

    Ok(match first {
      Some(side) if !mixed => Homogeneity::Homogeneous(side),
      _ => Homogeneity::Inhomogeneous,
    })
  }

  /// Recompute which cells straddle the boundary, for every cell.
  ///
  /// Returns the number of inhomogeneous cells. Fails without touching the
  /// previous result if any corner node is unclassified.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "grid::classify_cells_by_homogenity"))]
  pub fn classify_cells_by_homogenity(&mut self) -> Result<usize> {
    let mut inhomogeneous = vec![Vec::new(); self.levels.len()];
    let mut count = 0;
    for cell in &self.cells {
      if self.cell_homogeneity(cell.id())? == Homogeneity::Inhomogeneous {
        inhomogeneous[cell.level()].push(cell.id());
        count += 1;
      }
    }

    self.inhomogeneous = inhomogeneous;
    self.classified_cells = self.cells.len();
    self.classified_generation = self.nodes.generation();

    #[cfg(feature = "tracing")]
    tracing::debug!(inhomogeneous = count, cells = self.cells.len(), "classified cells");

    Ok(count)
  }

  /// Subdivide every inhomogeneous cell of `max_level`, then advance
  /// `max_level` by one.
  ///
  /// Requires a classification covering all current cells and the current
  /// node values. `max_level` advances even when no cell needed splitting.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "grid::divide_boundary_cells"))]
  pub fn divide_boundary_cells(&mut self) -> Result<RefinementStats> {
    self.ensure_classified()?;
    if self.max_level >= self.config.max_level {
      return Err(MeshError::MaxLevelReached {
        max_level: self.config.max_level,
      });
    }

    // A previous empty round leaves no classification entry for this level.
    let targets = self
      .inhomogeneous
      .get(self.max_level)
      .cloned()
      .unwrap_or_default();
    let mut stats = RefinementStats {
      rounds: 1,
      ..Default::default()
    };
    for id in targets {
      let nodes_before = self.nodes.len();
      let (children, created) = self.subdivide(id)?;
      if created {
        stats.cells_subdivided += 1;
        stats.cells_created += children.len();
        stats.nodes_created += self.nodes.len() - nodes_before;
      }
    }

    self.max_level += 1;
    if self.levels.len() <= self.max_level {
      self.levels.resize_with(self.max_level + 1, Vec::new);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
      level = self.max_level,
      subdivided = stats.cells_subdivided,
      nodes = stats.nodes_created,
      "divided boundary cells"
    );

    Ok(stats)
  }

  /// Run `rounds` refinement rounds against `field`, then classify the
  /// final level so boundary queries are ready.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "grid::refine"))]
  pub fn refine<F: ScalarField<S>>(&mut self, field: &F, rounds: usize) -> Result<RefinementStats> {
    let mut stats = RefinementStats::default();
    for _ in 0..rounds {
      self.nodes.apply_func(field)?;
      self.classify_cells_by_homogenity()?;
      stats += self.divide_boundary_cells()?;
    }
    self.nodes.apply_func(field)?;
    self.classify_cells_by_homogenity()?;
    Ok(stats)
  }

  /// Inner corner nodes of inhomogeneous cells created at the newest level.
  pub fn get_inner_boundary(&self) -> Result<Vec<S::Vector>> {
    self.boundary_points(Side::Inner, self.newest_node_level())
  }

  /// Outer corner nodes of inhomogeneous cells created at the newest level.
  pub fn get_outer_boundary(&self) -> Result<Vec<S::Vector>> {
    self.boundary_points(Side::Outer, self.newest_node_level())
  }

  /// Inner boundary nodes created at `level`.
  pub fn inner_boundary_at(&self, level: usize) -> Result<Vec<S::Vector>> {
    self.boundary_points(Side::Inner, level)
  }

  /// Outer boundary nodes created at `level`.
  pub fn outer_boundary_at(&self, level: usize) -> Result<Vec<S::Vector>> {
    self.boundary_points(Side::Outer, level)
  }

  /// Nodes created at `level` that are corners of an inhomogeneous cell and
  /// lie on `side`, in node creation order.
  pub fn boundary_points(&self, side: Side, level: usize) -> Result<Vec<S::Vector>> {
    self.ensure_classified()?;

    let mut found = BTreeSet::new();
    for &id in self.inhomogeneous.iter().flatten() {
      for &node in self.cell(id).vertex_nodes() {
        if self.nodes.node(node).level == level && self.nodes.side(node)? == side {
          found.insert(node);
        }
      }
    }
    Ok(self.points_of(found))
  }

  /// Endpoints on `side` of every cell edge whose endpoints lie on opposite
  /// sides, all levels, in node creation order.
  pub fn crossing_points(&self, side: Side) -> Result<Vec<S::Vector>> {
    let mut found = BTreeSet::new();
    for cell in &self.cells {
      for (a, b) in cell.edge_nodes() {
        let (side_a, side_b) = (self.nodes.side(a)?, self.nodes.side(b)?);
        if side_a == side_b {
          continue;
        }
        found.insert(if side_a == side { a } else { b });
      }
    }
    Ok(self.points_of(found))
  }

  fn points_of(&self, ids: BTreeSet<NodeId>) -> Vec<S::Vector> {
    ids.into_iter().map(|id| self.nodes.coords(id)).collect()
  }

  fn newest_node_level(&self) -> usize {
    self.nodes.level_count().saturating_sub(1)
  }

  /// The last classification covers every cell and was computed from the
  /// current node values.
  fn ensure_classified(&self) -> Result<()> {
    if self.classified_generation != self.nodes.generation() {
      return Err(MeshError::NotClassified { level: 0 });
    }
    match self.cells.get(self.classified_cells) {
      None => Ok(()),
      Some(cell) => Err(MeshError::NotClassified {
        level: cell.level(),
      }),
    }
  }

  /// Split `id` if it is a leaf. Returns the children and whether they were
  /// created by this call.
  fn subdivide(&mut self, id: CellId) -> Result<(SmallVec<[CellId; 8]>, bool)> {
    let cell = self.get_cell(id).ok_or(MeshError::UnknownCell(id))?;
    if !cell.is_leaf() {
      return Ok((SmallVec::from_slice(cell.child_cells()), false));
    }

    let level = cell.level() + 1;
    if level > self.config.max_level {
      return Err(MeshError::MaxLevelReached {
        max_level: self.config.max_level,
      });
    }

    let corner_sets = cell.child_corner_coords(&self.nodes);
    let mut children = SmallVec::new();
    for corners in corner_sets {
      let vertices = corners
        .into_iter()
        .map(|p| self.nodes.register_or_get(p, level))
        .collect();
      let child = CellId(self.cells.len());
      self.cells.push(Cell::new(child, level, vertices, Some(id)));
      if self.levels.len() <= level {
        self.levels.resize_with(level + 1, Vec::new);
      }
      self.levels[level].push(child);
      children.push(child);
    }

    self.cells[id.0].set_children(children.clone());
    Ok((children, true))
  }
}

/// Check axis count, lengths, finiteness and strict monotonicity.
fn validate_axes(axes: &[&[f64]], dim: usize) -> Result<()> {
  if axes.len() != dim {
    return Err(MeshError::InvalidGridInput(format!(
      "expected {} coordinate axes, got {}",
      dim,
      axes.len()
    )));
  }

  for (axis, values) in axes.iter().enumerate() {
    if values.len() < 2 {
      return Err(MeshError::InvalidGridInput(format!(
        "axis {} needs at least 2 points, got {}",
        axis,
        values.len()
      )));
    }
    if values.iter().any(|v| !v.is_finite()) {
      return Err(MeshError::InvalidGridInput(format!(
        "axis {} contains a non-finite coordinate",
        axis
      )));
    }
    let increasing = values.windows(2).all(|w| w[0] < w[1]);
    let decreasing = values.windows(2).all(|w| w[0] > w[1]);
    if !increasing && !decreasing {
      return Err(MeshError::InvalidGridInput(format!(
        "axis {} is not strictly monotonic",
        axis
      )));
    }
  }

  Ok(())
}

/// Row-major strides: the last axis is contiguous.
fn strides(shape: &[usize]) -> Vec<usize> {
  let mut strides = vec![1; shape.len()];
  for axis in (0..shape.len().saturating_sub(1)).rev() {
    strides[axis] = strides[axis + 1] * shape[axis + 1];
  }
  strides
}

/// Split a row-major flat index into per-axis indices.
fn unravel(mut flat: usize, shape: &[usize], index: &mut [usize]) {
  for axis in (0..shape.len()).rev() {
    index[axis] = flat % shape[axis];
    flat /= shape[axis];
  }
}

/// Evenly spaced values from `start` to `end` inclusive.
///
/// Returns `start` alone when `n == 1` and nothing when `n == 0`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
  match n {
    0 => Vec::new(),
    1 => vec![start],
    _ => {
      let step = (end - start) / (n - 1) as f64;
      (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
    }
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
