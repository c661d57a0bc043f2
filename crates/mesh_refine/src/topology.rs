//! Hypercube topology shared by every cell of a given dimension.
//!
//! # Vertex Convention
//!
//! Vertex `i` of a D-dimensional cell takes the upper bound along axis `k`
//! when bit `D - 1 - k` of `i` is set, i.e. the first axis is the most
//! significant bit:
//!
//! ```text
//!   2D (bits: XY)            3D (bits: XYZ)
//!
//!   1──────3                 0=(0,0,0)  1=(0,0,1)  2=(0,1,0)  3=(0,1,1)
//!   │      │  +Y             4=(1,0,0)  5=(1,0,1)  6=(1,1,0)  7=(1,1,1)
//!   │      │   │
//!   0──────2   └──+X
//! ```
//!
//! # Edge Layout
//!
//! An edge joins two vertices whose indices differ in exactly one bit. Edges
//! are listed as `(i, j)` with `i < j` in lexicographic order:
//!
//! ```text
//! 2D:  (0,1) (0,2) (1,3) (2,3)
//! 3D:  (0,1) (0,2) (0,4) (1,3) (1,5) (2,3)
//!      (2,6) (3,7) (4,5) (4,6) (5,7) (6,7)
//! ```

/// Number of vertices of a D-cube.
#[inline(always)]
pub const fn vertex_count(dim: usize) -> usize {
  1 << dim
}

/// Number of edges of a D-cube: `D * 2^(D-1)`.
#[inline(always)]
pub const fn edge_count(dim: usize) -> usize {
  if dim == 0 {
    0
  } else {
    dim << (dim - 1)
  }
}

/// Whether `vertex` sits on the upper bound of `axis`.
#[inline(always)]
pub const fn vertex_on_upper(vertex: usize, axis: usize, dim: usize) -> bool {
  (vertex >> (dim - 1 - axis)) & 1 == 1
}

/// Edge list of a 2D cell.
pub const EDGES_2D: [(usize, usize); 4] = generate_edges::<4>(2);

/// Edge list of a 3D cell.
pub const EDGES_3D: [(usize, usize); 12] = generate_edges::<12>(3);

/// Generate the edge list of a `dim`-cube at compile time.
///
/// `E` must equal `edge_count(dim)`.
const fn generate_edges<const E: usize>(dim: usize) -> [(usize, usize); E] {
  assert!(E == edge_count(dim), "edge table size does not match dimension");

  let mut edges = [(0usize, 0usize); E];
  let vertices = vertex_count(dim);
  let mut n = 0;
  let mut i = 0;

  while i < vertices {
    let mut j = i + 1;
    while j < vertices {
      if (i ^ j).count_ones() == 1 {
        edges[n] = (i, j);
        n += 1;
      }
      j += 1;
    }
    i += 1;
  }

  edges
}

#[cfg(test)]
#[path = "topology_test.rs"]
mod topology_test;
