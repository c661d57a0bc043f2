use glam::{DVec2, DVec3};

use super::*;
use crate::config::SignConvention;
use crate::field::Circle;
use crate::space::{Dim2, Dim3};

// =========================================================================
// Registration and deduplication
// =========================================================================

/// Registering the same coordinate twice returns the same handle.
#[test]
fn test_register_same_coords_same_node() {
  let mut ndb = NodeDatabase::<Dim2>::default();
  let a = ndb.register_or_get(DVec2::new(1.0, 2.0), 0);
  let b = ndb.register_or_get(DVec2::new(1.0, 2.0), 0);

  assert_eq!(a, b);
  assert_eq!(ndb.len(), 1);
  assert_eq!(ndb.level(0).len(), 1);
}

/// A coordinate that already exists at a coarser level is reused, and the
/// node keeps its original level.
#[test]
fn test_register_reuses_coarser_node() {
  let mut ndb = NodeDatabase::<Dim2>::default();
  let a = ndb.register_or_get(DVec2::new(-4.0, -4.0), 0);
  let b = ndb.register_or_get(DVec2::new(-4.0, -4.0), 1);

  assert_eq!(a, b);
  assert_eq!(ndb.node(b).level, 0);
  assert!(ndb.level(1).is_empty());
}

#[test]
fn test_register_negative_zero() {
  let mut ndb = NodeDatabase::<Dim3>::default();
  let a = ndb.register_or_get(DVec3::new(0.0, 1.0, 0.0), 0);
  let b = ndb.register_or_get(DVec3::new(-0.0, 1.0, -0.0), 0);
  assert_eq!(a, b);
}

/// Distinct coordinates produce distinct nodes in creation order.
#[test]
fn test_register_distinct_nodes() {
  let mut ndb = NodeDatabase::<Dim2>::default();
  let ids: Vec<_> = (0..5)
    .map(|i| ndb.register_or_get(DVec2::new(i as f64, 0.0), 0))
    .collect();

  for (i, id) in ids.iter().enumerate() {
    assert_eq!(id.index(), i);
  }
  assert_eq!(ndb.all_points()[3], DVec2::new(3.0, 0.0));
}

/// Skipping levels creates the intermediate empty lists.
#[test]
fn test_register_at_deep_level() {
  let mut ndb = NodeDatabase::<Dim2>::default();
  ndb.register_or_get(DVec2::new(0.5, 0.5), 3);

  assert_eq!(ndb.level_count(), 4);
  assert!(ndb.level(1).is_empty());
  assert!(ndb.level(2).is_empty());
  assert_eq!(ndb.level_points(3), vec![DVec2::new(0.5, 0.5)]);
  assert!(ndb.level(17).is_empty());
}

#[test]
fn test_find() {
  let mut ndb = NodeDatabase::<Dim2>::default();
  let id = ndb.register_or_get(DVec2::new(0.25, 0.75), 2);
  assert_eq!(ndb.find(DVec2::new(0.25, 0.75)), Some(id));
  assert_eq!(ndb.find(DVec2::new(0.25, 0.7500000001)), None);
}

// =========================================================================
// Classification
// =========================================================================

fn line_db() -> NodeDatabase<Dim2> {
  let mut ndb = NodeDatabase::<Dim2>::default();
  for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
    ndb.register_or_get(DVec2::new(x, 0.0), 0);
  }
  ndb
}

#[test]
fn test_apply_func_classifies_all() {
  let mut ndb = line_db();
  assert_eq!(ndb.unclassified_count(), 5);

  let count = ndb.apply_func(&Circle::new(1.5)).unwrap();

  assert_eq!(count, 5);
  assert_eq!(ndb.unclassified_count(), 0);
  assert_eq!(ndb.node(NodeId(2)).value(), Some(-2.25));
}

/// Re-applying only evaluates nodes added since the last call.
#[test]
fn test_apply_func_is_memoized() {
  let mut ndb = line_db();
  ndb.apply_func(&Circle::new(1.5)).unwrap();

  assert_eq!(ndb.apply_func(&Circle::new(1.5)).unwrap(), 0);

  ndb.register_or_get(DVec2::new(0.5, 0.0), 1);
  assert_eq!(ndb.unclassified_count(), 1);
  assert_eq!(ndb.apply_func(&Circle::new(1.5)).unwrap(), 1);
}

/// A different field does not override memoized values, `reapply_func` does.
#[test]
fn test_reapply_func_overrides() {
  let mut ndb = line_db();
  ndb.apply_func(&Circle::new(1.5)).unwrap();
  ndb.apply_func(&Circle::new(10.0)).unwrap();
  assert_eq!(ndb.get_inner().unwrap().len(), 3);

  assert_eq!(ndb.reapply_func(&Circle::new(10.0)).unwrap(), 5);
  assert_eq!(ndb.get_inner().unwrap().len(), 5);
}

#[test]
fn test_par_apply_func_matches_serial() {
  let mut serial = line_db();
  let mut parallel = line_db();
  serial.apply_func(&Circle::new(1.5)).unwrap();
  parallel.par_apply_func(&Circle::new(1.5)).unwrap();

  for (id, node) in serial.iter() {
    assert_eq!(node.value(), parallel.node(id).value());
  }
}

#[test]
fn test_get_inner_outer() {
  let mut ndb = line_db();
  ndb.apply_func(&Circle::new(1.5)).unwrap();

  assert_eq!(
    ndb.get_inner().unwrap(),
    vec![DVec2::new(-1.0, 0.0), DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)]
  );
  assert_eq!(
    ndb.get_outer().unwrap(),
    vec![DVec2::new(-2.0, 0.0), DVec2::new(2.0, 0.0)]
  );
}

/// Inner/outer swap under the positive-inside convention.
#[test]
fn test_positive_inside_convention() {
  let config = GridConfig::default().with_sign_convention(SignConvention::PositiveInside);
  let mut ndb = NodeDatabase::<Dim2>::new(config);
  for x in [-2.0, 0.0, 2.0] {
    ndb.register_or_get(DVec2::new(x, 0.0), 0);
  }
  ndb.apply_func(&Circle::new(1.5)).unwrap();

  assert_eq!(ndb.get_inner().unwrap().len(), 2);
  assert_eq!(ndb.get_outer().unwrap(), vec![DVec2::ZERO]);
}

/// Nodes exactly on the boundary follow `zero_side`.
#[test]
fn test_zero_value_side() {
  let mut ndb = NodeDatabase::<Dim2>::new(GridConfig::default().with_zero_side(Side::Outer));
  let id = ndb.register_or_get(DVec2::new(1.0, 0.0), 0);
  ndb.apply_func(&Circle::new(1.0)).unwrap();
  assert_eq!(ndb.side(id).unwrap(), Side::Outer);
}

/// Queries fail while any node is unclassified.
#[test]
fn test_query_before_apply_fails() {
  let mut ndb = line_db();
  assert!(matches!(
    ndb.get_inner(),
    Err(MeshError::UnclassifiedNode { .. })
  ));

  ndb.apply_func(&Circle::new(1.5)).unwrap();
  ndb.register_or_get(DVec2::new(0.5, 0.0), 1);

  match ndb.get_outer() {
    Err(MeshError::UnclassifiedNode { node, coords }) => {
      assert_eq!(node.index(), 5);
      assert_eq!(coords, vec![0.5, 0.0]);
    }
    other => panic!("expected UnclassifiedNode, got {:?}", other),
  }
}

/// NaN values are rejected and nothing is stored.
#[test]
fn test_nan_rejected() {
  let mut ndb = line_db();
  let field = |p: DVec2| if p.x > 1.5 { f64::NAN } else { p.x };

  assert!(matches!(
    ndb.apply_func(&field),
    Err(MeshError::NonFiniteValue { .. })
  ));
  assert_eq!(ndb.unclassified_count(), 5);
}

/// Only overwriting existing values advances the generation.
#[test]
fn test_generation_tracks_reapply() {
  let mut ndb = line_db();
  assert_eq!(ndb.generation(), 0);

  ndb.apply_func(&Circle::new(1.5)).unwrap();
  ndb.register_or_get(DVec2::new(0.5, 0.0), 1);
  ndb.apply_func(&Circle::new(1.5)).unwrap();
  assert_eq!(ndb.generation(), 0, "classifying new nodes keeps the generation");

  ndb.reapply_func(&Circle::new(2.5)).unwrap();
  assert_eq!(ndb.generation(), 1);

  let nan = |_: DVec2| f64::NAN;
  assert!(ndb.reapply_func(&nan).is_err());
  assert_eq!(ndb.generation(), 1, "a rejected reapply changes nothing");
}

#[test]
fn test_side_unknown_node() {
  let ndb = line_db();
  assert_eq!(ndb.side(NodeId(99)), Err(MeshError::UnknownNode(NodeId(99))));
}
