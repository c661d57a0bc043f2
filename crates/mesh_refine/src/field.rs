//! Scalar boundary fields.
//!
//! A [`ScalarField`] maps a point to a value whose sign places the point
//! inside or outside the boundary (see [`crate::config::SignConvention`]).
//! Any closure `Fn(S::Vector) -> f64` is a field; the analytic fields below
//! are easy to verify by hand and are used by the tests and benchmarks.

use glam::{DVec2, DVec3};

use crate::space::{Dim2, Dim3, Space};

/// Scalar function of a point.
pub trait ScalarField<S: Space> {
  /// Evaluate the field at `point`.
  fn eval(&self, point: S::Vector) -> f64;
}

impl<S: Space, F> ScalarField<S> for F
where
  F: Fn(S::Vector) -> f64,
{
  #[inline]
  fn eval(&self, point: S::Vector) -> f64 {
    self(point)
  }
}

/// Circle field: `|p - center|² - radius²`.
///
/// Negative inside the circle, zero on it, positive outside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
  /// Center of the circle.
  pub center: DVec2,
  /// Radius of the circle.
  pub radius: f64,
}

impl Circle {
  pub fn new(radius: f64) -> Self {
    Self {
      center: DVec2::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: DVec2) -> Self {
    self.center = center;
    self
  }
}

impl ScalarField<Dim2> for Circle {
  #[inline]
  fn eval(&self, point: DVec2) -> f64 {
    point.distance_squared(self.center) - self.radius * self.radius
  }
}

/// Sphere field: `|p - center|² - radius²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
  /// Center of the sphere.
  pub center: DVec3,
  /// Radius of the sphere.
  pub radius: f64,
}

impl Sphere {
  pub fn new(radius: f64) -> Self {
    Self {
      center: DVec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: DVec3) -> Self {
    self.center = center;
    self
  }
}

impl ScalarField<Dim3> for Sphere {
  #[inline]
  fn eval(&self, point: DVec3) -> f64 {
    point.distance_squared(self.center) - self.radius * self.radius
  }
}

/// Half-space field: `n · p - offset`.
///
/// Negative on the side opposite to the normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane<V> {
  /// Plane normal (not required to be unit length).
  pub normal: V,
  /// Signed offset along the normal.
  pub offset: f64,
}

impl<V> Plane<V> {
  pub fn new(normal: V, offset: f64) -> Self {
    Self { normal, offset }
  }
}

impl ScalarField<Dim2> for Plane<DVec2> {
  #[inline]
  fn eval(&self, point: DVec2) -> f64 {
    self.normal.dot(point) - self.offset
  }
}

impl ScalarField<Dim3> for Plane<DVec3> {
  #[inline]
  fn eval(&self, point: DVec3) -> f64 {
    self.normal.dot(point) - self.offset
  }
}
