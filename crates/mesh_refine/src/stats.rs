//! Statistics from refinement rounds.

use std::ops::AddAssign;

/// Counts produced by subdividing cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementStats {
  /// Cells that were split.
  pub cells_subdivided: usize,
  /// Child cells created.
  pub cells_created: usize,
  /// Nodes newly registered (shared nodes are counted once).
  pub nodes_created: usize,
  /// Refinement rounds performed.
  pub rounds: usize,
}

impl RefinementStats {
  /// Whether a round changed nothing.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells_subdivided == 0 && self.cells_created == 0 && self.nodes_created == 0
  }
}

impl AddAssign for RefinementStats {
  fn add_assign(&mut self, rhs: Self) {
    self.cells_subdivided += rhs.cells_subdivided;
    self.cells_created += rhs.cells_created;
    self.nodes_created += rhs.nodes_created;
    self.rounds += rhs.rounds;
  }
}
