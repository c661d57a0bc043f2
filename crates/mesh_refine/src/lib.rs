//! mesh_refine - Adaptive quadtree/octree refinement of structured grids
//!
//! This crate refines a structured 2D or 3D grid around an implicit
//! boundary. Nodes are classified by the sign of a scalar field, cells whose
//! corners disagree are split into `2^D` children, and the rounds repeat
//! until the band around the boundary is fine enough.
//!
//! # Features
//!
//! - **Shared nodes**: every coordinate is stored once, so neighbouring
//!   cells reuse edge midpoints and face centers
//! - **Dimension generic**: [`Grid2`] and [`Grid3`] share one implementation
//!   through the sealed [`Space`] trait
//! - **Parallel classification**: [`NodeDatabase::par_apply_func`] evaluates
//!   the field with rayon
//!
//! # Example
//!
//! ```
//! use mesh_refine::{linspace, Circle, Grid2};
//!
//! let axis = linspace(-4.0, 4.0, 9);
//! let mut grid = Grid2::from_axes(&[axis.clone(), axis]).unwrap();
//!
//! let stats = grid.refine(&Circle::new(1.3), 1).unwrap();
//! assert_eq!(stats.cells_subdivided, 12);
//!
//! let inner = grid.get_inner_boundary().unwrap();
//! let outer = grid.get_outer_boundary().unwrap();
//! assert_eq!((inner.len(), outer.len()), (12, 20));
//! ```

pub mod bounds;
pub mod cell;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod node_db;
pub mod space;
pub mod stats;
pub mod topology;

// Re-export commonly used items
pub use bounds::Bounds;
pub use cell::{Cell, CellId, CornerCoords};
pub use config::{GridConfig, SignConvention, Side};
pub use error::{MeshError, Result};
pub use field::{Circle, Plane, ScalarField, Sphere};
pub use grid::{linspace, Grid, Grid2, Grid3, Homogeneity};
pub use node_db::{Node, NodeDatabase, NodeId};
pub use space::{Dim2, Dim3, Space};
pub use stats::RefinementStats;
