//! GridConfig - classification sign convention and refinement limits.

/// Which side of the boundary a node lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
  /// Inside the boundary.
  Inner,
  /// Outside the boundary.
  Outer,
}

impl Side {
  /// The other side.
  #[inline]
  pub fn opposite(self) -> Self {
    match self {
      Side::Inner => Side::Outer,
      Side::Outer => Side::Inner,
    }
  }
}

/// Sign of the scalar field that marks the inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignConvention {
  /// Negative values are inside (signed distance convention).
  #[default]
  NegativeInside,
  /// Positive values are inside.
  PositiveInside,
}

/// Configuration for grid classification and refinement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
  /// Which sign of the field value counts as inside.
  pub sign_convention: SignConvention,

  /// Side assigned to nodes where the field is exactly zero.
  pub zero_side: Side,

  /// Deepest level `divide_boundary_cells` may create.
  pub max_level: usize,
}

impl GridConfig {
  /// Deepest level allowed by default. Halving a unit cell 32 times is still
  /// far above f64 resolution.
  pub const DEFAULT_MAX_LEVEL: usize = 32;

  /// Set the sign convention.
  pub fn with_sign_convention(mut self, sign_convention: SignConvention) -> Self {
    self.sign_convention = sign_convention;
    self
  }

  /// Set the side for zero-valued nodes.
  pub fn with_zero_side(mut self, zero_side: Side) -> Self {
    self.zero_side = zero_side;
    self
  }

  /// Set the refinement depth limit.
  pub fn with_max_level(mut self, max_level: usize) -> Self {
    self.max_level = max_level;
    self
  }

  /// Map a field value to a side.
  #[inline]
  pub fn side_of(&self, value: f64) -> Side {
    if value == 0.0 {
      return self.zero_side;
    }
    let side = if value < 0.0 { Side::Inner } else { Side::Outer };
    match self.sign_convention {
      SignConvention::NegativeInside => side,
      SignConvention::PositiveInside => side.opposite(),
    }
  }
}

impl Default for GridConfig {
  fn default() -> Self {
    Self {
      sign_convention: SignConvention::NegativeInside,
      zero_side: Side::Inner,
      max_level: Self::DEFAULT_MAX_LEVEL,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
