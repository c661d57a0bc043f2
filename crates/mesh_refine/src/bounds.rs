//! Axis-aligned bounding box over any [`Space`].

use crate::space::Space;

/// Double-precision axis-aligned bounding box.
///
/// Describes the region covered by a cell, independent of the order in
/// which the grid axes were given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<S: Space> {
  /// Minimum corner (inclusive).
  pub min: S::Vector,
  /// Maximum corner (inclusive).
  pub max: S::Vector,
}

impl<S: Space> Bounds<S> {
  /// Create a box from two opposite corners in any order.
  pub fn from_corners(a: S::Vector, b: S::Vector) -> Self {
    Self {
      min: S::min(a, b),
      max: S::max(a, b),
    }
  }

  /// Check if this box contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: S::Vector) -> bool {
    S::all_le(self.min, point) && S::all_le(point, self.max)
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> S::Vector {
    self.max - self.min
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> S::Vector {
    S::midpoint(self.min, self.max)
  }
}

#[cfg(test)]
mod tests {
  use glam::{DVec2, DVec3};

  use super::*;
  use crate::space::{Dim2, Dim3};

  #[test]
  fn test_from_corners_orders_axes() {
    let b = Bounds::<Dim2>::from_corners(DVec2::new(1.0, -2.0), DVec2::new(-1.0, 2.0));
    assert_eq!(b.min, DVec2::new(-1.0, -2.0));
    assert_eq!(b.max, DVec2::new(1.0, 2.0));
  }

  #[test]
  fn test_contains_point() {
    let b = Bounds::<Dim2>::from_corners(DVec2::ZERO, DVec2::splat(1.0));
    assert!(b.contains_point(DVec2::splat(0.5)));
    assert!(b.contains_point(DVec2::ZERO));
    assert!(b.contains_point(DVec2::splat(1.0)));
    assert!(!b.contains_point(DVec2::new(1.5, 0.5)));
  }

  #[test]
  fn test_size_and_center() {
    let b = Bounds::<Dim3>::from_corners(DVec3::new(-1.0, -2.0, -3.0), DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(b.size(), DVec3::new(2.0, 4.0, 6.0));
    assert_eq!(b.center(), DVec3::ZERO);
  }
}
