//! Dimension markers.
//!
//! Grids, cells and node databases are generic over a [`Space`], which fixes
//! the point type and the hypercube topology at compile time. Only [`Dim2`]
//! (quadtree refinement) and [`Dim3`] (octree refinement) exist.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Mul, Sub};

use glam::{BVec2, BVec3, DVec2, DVec3};

use crate::topology::{self, EDGES_2D, EDGES_3D};

mod sealed {
  pub trait Sealed {}
  impl Sealed for super::Dim2 {}
  impl Sealed for super::Dim3 {}
}

/// Two-dimensional space, points are [`DVec2`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dim2;

/// Three-dimensional space, points are [`DVec3`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dim3;

/// Exact lookup key of a coordinate: the bit pattern of every component.
pub type CoordKey<const D: usize> = [u64; D];

/// Dimension-specific geometry and topology.
pub trait Space: sealed::Sealed + Copy + Debug + Send + Sync + 'static {
  /// Number of axes.
  const DIM: usize;
  /// Corners per cell (`2^DIM`).
  const VERTEX_COUNT: usize;
  /// Corner index pairs forming the cell edges.
  const EDGES: &'static [(usize, usize)];

  /// Point / vector type.
  type Vector: Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self::Vector>
    + Sub<Output = Self::Vector>
    + Mul<f64, Output = Self::Vector>;

  /// Hashable key used for exact coordinate deduplication.
  type Key: Copy + Eq + Hash + Debug + Send + Sync;

  /// Exact key of a point. `-0.0` and `+0.0` map to the same key.
  fn key(p: Self::Vector) -> Self::Key;

  /// Corner `vertex` of the box spanned by `lo` and `hi`.
  fn vertex(lo: Self::Vector, hi: Self::Vector, vertex: usize) -> Self::Vector;

  /// Build a point from `DIM` components.
  ///
  /// # Panics
  /// Panics if `c` holds fewer than `DIM` values.
  fn from_components(c: &[f64]) -> Self::Vector;

  /// Components of a point, first axis first.
  fn components(p: Self::Vector) -> Vec<f64>;

  /// Component-wise minimum.
  fn min(a: Self::Vector, b: Self::Vector) -> Self::Vector;

  /// Component-wise maximum.
  fn max(a: Self::Vector, b: Self::Vector) -> Self::Vector;

  /// `a <= b` on every axis.
  fn all_le(a: Self::Vector, b: Self::Vector) -> bool;

  /// Midpoint of two points.
  ///
  /// Always evaluated as `(a + b) * 0.5`, so neighbouring cells produce
  /// bit-identical midpoints along shared edges and faces.
  #[inline]
  fn midpoint(a: Self::Vector, b: Self::Vector) -> Self::Vector {
    (a + b) * 0.5
  }
}

/// Fold negative zero into positive zero before taking the bit pattern.
#[inline(always)]
fn canonical_bits(v: f64) -> u64 {
  (v + 0.0).to_bits()
}

impl Space for Dim2 {
  const DIM: usize = 2;
  const VERTEX_COUNT: usize = topology::vertex_count(2);
  const EDGES: &'static [(usize, usize)] = &EDGES_2D;

  type Vector = DVec2;
  type Key = CoordKey<2>;

  #[inline]
  fn key(p: DVec2) -> Self::Key {
    [canonical_bits(p.x), canonical_bits(p.y)]
  }

  #[inline]
  fn vertex(lo: DVec2, hi: DVec2, vertex: usize) -> DVec2 {
    let upper = BVec2::new(
      topology::vertex_on_upper(vertex, 0, 2),
      topology::vertex_on_upper(vertex, 1, 2),
    );
    DVec2::select(upper, hi, lo)
  }

  fn from_components(c: &[f64]) -> DVec2 {
    DVec2::new(c[0], c[1])
  }

  fn components(p: DVec2) -> Vec<f64> {
    p.to_array().to_vec()
  }

  #[inline]
  fn min(a: DVec2, b: DVec2) -> DVec2 {
    a.min(b)
  }

  #[inline]
  fn max(a: DVec2, b: DVec2) -> DVec2 {
    a.max(b)
  }

  #[inline]
  fn all_le(a: DVec2, b: DVec2) -> bool {
    a.cmple(b).all()
  }
}

impl Space for Dim3 {
  const DIM: usize = 3;
  const VERTEX_COUNT: usize = topology::vertex_count(3);
  const EDGES: &'static [(usize, usize)] = &EDGES_3D;

  type Vector = DVec3;
  type Key = CoordKey<3>;

  #[inline]
  fn key(p: DVec3) -> Self::Key {
    [canonical_bits(p.x), canonical_bits(p.y), canonical_bits(p.z)]
  }

  #[inline]
  fn vertex(lo: DVec3, hi: DVec3, vertex: usize) -> DVec3 {
    let upper = BVec3::new(
      topology::vertex_on_upper(vertex, 0, 3),
      topology::vertex_on_upper(vertex, 1, 3),
      topology::vertex_on_upper(vertex, 2, 3),
    );
    DVec3::select(upper, hi, lo)
  }

  fn from_components(c: &[f64]) -> DVec3 {
    DVec3::new(c[0], c[1], c[2])
  }

  fn components(p: DVec3) -> Vec<f64> {
    p.to_array().to_vec()
  }

  #[inline]
  fn min(a: DVec3, b: DVec3) -> DVec3 {
    a.min(b)
  }

  #[inline]
  fn max(a: DVec3, b: DVec3) -> DVec3 {
    a.max(b)
  }

  #[inline]
  fn all_le(a: DVec3, b: DVec3) -> bool {
    a.cmple(b).all()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_negative_zero_shares_key() {
    assert_eq!(Dim2::key(DVec2::new(-0.0, 1.0)), Dim2::key(DVec2::new(0.0, 1.0)));
    assert_eq!(
      Dim3::key(DVec3::new(0.0, -0.0, 2.5)),
      Dim3::key(DVec3::new(0.0, 0.0, 2.5))
    );
  }

  #[test]
  fn test_distinct_points_distinct_keys() {
    assert_ne!(Dim2::key(DVec2::new(1.0, 2.0)), Dim2::key(DVec2::new(2.0, 1.0)));
  }

  #[test]
  fn test_vertex_2d() {
    let lo = DVec2::new(-4.0, -4.0);
    let hi = DVec2::new(-3.0, -3.0);
    let corners: Vec<_> = (0..Dim2::VERTEX_COUNT).map(|v| Dim2::vertex(lo, hi, v)).collect();
    assert_eq!(
      corners,
      vec![
        DVec2::new(-4.0, -4.0),
        DVec2::new(-4.0, -3.0),
        DVec2::new(-3.0, -4.0),
        DVec2::new(-3.0, -3.0),
      ]
    );
  }

  #[test]
  fn test_vertex_3d() {
    let lo = DVec3::splat(-4.0);
    let hi = DVec3::splat(-3.0);
    assert_eq!(Dim3::vertex(lo, hi, 0), lo);
    assert_eq!(Dim3::vertex(lo, hi, 3), DVec3::new(-4.0, -3.0, -3.0));
    assert_eq!(Dim3::vertex(lo, hi, 4), DVec3::new(-3.0, -4.0, -4.0));
    assert_eq!(Dim3::vertex(lo, hi, 7), hi);
  }

  #[test]
  fn test_midpoint_is_exact() {
    let a = DVec3::new(-4.0, -3.5, 1.25);
    let b = DVec3::new(-3.0, -3.25, 1.5);
    assert_eq!(Dim3::midpoint(a, b), DVec3::new(-3.5, -3.375, 1.375));
    assert_eq!(Dim3::midpoint(a, b), Dim3::midpoint(b, a));
  }

  #[test]
  fn test_components_roundtrip() {
    let p = DVec3::new(1.0, -2.0, 3.0);
    assert_eq!(Dim3::from_components(&Dim3::components(p)), p);
    assert_eq!(Dim3::DIM, 3);
    assert_eq!(Dim3::EDGES.len(), 12);
    assert_eq!(Dim2::EDGES.len(), 4);
  }
}
