//! Static vertex and sub-entity tables of the reference shapes.
//!
//! Everything here is a pure function of the shape, so the catalog can be
//! built from it without looking itself up.

use super::ReferenceShape;
use crate::{
  combinatorics::{AlternatingPermutations, Permutation},
  linalg::{Matrix, Vector},
  Codim, Dim,
};

use itertools::Itertools as _;

const TRIANGLE_FACES: &[&[usize]] = &[&[0, 1], &[0, 2], &[1, 2]];

const TETRAHEDRON_FACES: &[&[usize]] = &[&[0, 3, 2], &[0, 1, 3], &[0, 2, 1], &[1, 2, 3]];
const TETRAHEDRON_EDGES: &[&[usize]] = &[&[0, 1], &[0, 2], &[0, 3], &[2, 3], &[1, 3], &[1, 2]];

const PRISM_FACES: &[&[usize]] = &[
  &[0, 2, 1],
  &[3, 4, 5],
  &[2, 0, 5, 3],
  &[0, 1, 3, 4],
  &[1, 2, 4, 5],
];
const PRISM_EDGES: &[&[usize]] = &[
  &[0, 1],
  &[0, 2],
  &[1, 2],
  &[3, 4],
  &[3, 5],
  &[4, 5],
  &[0, 3],
  &[1, 4],
  &[2, 5],
];

const PYRAMID_FACES: &[&[usize]] = &[&[3, 4, 1, 2], &[3, 1, 0], &[2, 4, 0], &[1, 2, 0], &[4, 3, 0]];
const PYRAMID_EDGES: &[&[usize]] = &[
  &[0, 1],
  &[0, 2],
  &[0, 3],
  &[0, 4],
  &[1, 2],
  &[1, 3],
  &[2, 4],
  &[3, 4],
];

/// Vertices, one per column.
pub(super) fn reference_vertices(shape: ReferenceShape) -> Matrix {
  use ReferenceShape as S;
  let dim = shape.dim();
  let n = shape.nvertices();
  match shape {
    S::Point => Matrix::zeros(0, 1),
    S::Triangle | S::Tetrahedron => {
      let mut m = Matrix::zeros(dim, n);
      for a in 0..dim {
        m[(a, a + 1)] = 1.0;
      }
      m
    }
    S::Line | S::Square | S::Cube | S::Hypercube => {
      Matrix::from_fn(dim, n, |a, v| if v >> a & 1 == 1 { 1.0 } else { -1.0 })
    }
    S::TriangularPrism => Matrix::from_column_slice(
      3,
      6,
      &[
        0.0, 0.0, -1.0, //
        1.0, 0.0, -1.0, //
        0.0, 1.0, -1.0, //
        0.0, 0.0, 1.0, //
        1.0, 0.0, 1.0, //
        0.0, 1.0, 1.0,
      ],
    ),
    S::Pyramid => Matrix::from_column_slice(
      3,
      5,
      &[
        0.0, 0.0, 1.0, //
        -1.0, -1.0, 0.0, //
        1.0, -1.0, 0.0, //
        -1.0, 1.0, 0.0, //
        1.0, 1.0, 0.0,
      ],
    ),
  }
}

/// Centroid of the reference domain.
pub(super) fn reference_center(shape: ReferenceShape) -> Vector {
  match shape {
    ReferenceShape::Pyramid => Vector::from_column_slice(&[0.0, 0.0, 0.25]),
    _ => reference_vertices(shape).column_mean(),
  }
}

/// `dim + 1` vertices that determine an affine map of the shape.
pub(super) fn affine_frame(shape: ReferenceShape) -> &'static [usize] {
  use ReferenceShape as S;
  match shape {
    S::Point => &[0],
    S::Line => &[0, 1],
    S::Triangle => &[0, 1, 2],
    S::Tetrahedron => &[0, 1, 2, 3],
    S::Square => &[0, 1, 2],
    S::Cube => &[0, 1, 2, 4],
    S::Hypercube => &[0, 1, 2, 4, 8],
    S::TriangularPrism => &[0, 1, 2, 3],
    S::Pyramid => &[1, 2, 3, 0],
  }
}

/// Local vertex lists of all sub-entities of codimension `codim`.
///
/// `codim` must lie in `1..=shape.dim()`.
pub(super) fn subentity_vertices(shape: ReferenceShape, codim: Codim) -> Vec<Vec<usize>> {
  use ReferenceShape as S;
  let dim = shape.dim();
  debug_assert!((1..=dim).contains(&codim));
  if codim == dim {
    return (0..shape.nvertices()).map(|v| vec![v]).collect();
  }
  let table = match (shape, codim) {
    (S::Line | S::Square | S::Cube | S::Hypercube, _) => return tensor_subentities(dim, codim),
    (S::Triangle, 1) => TRIANGLE_FACES,
    (S::Tetrahedron, 1) => TETRAHEDRON_FACES,
    (S::Tetrahedron, 2) => TETRAHEDRON_EDGES,
    (S::TriangularPrism, 1) => PRISM_FACES,
    (S::TriangularPrism, 2) => PRISM_EDGES,
    (S::Pyramid, 1) => PYRAMID_FACES,
    (S::Pyramid, 2) => PYRAMID_EDGES,
    _ => unreachable!("{shape} has no sub-entities of codimension {codim}"),
  };
  table.iter().map(|e| e.to_vec()).collect()
}

/// Vertex of a tensor shape with coordinate bits `free[j] = bit j of local`
/// and `fixed[j] = bit j of assignment`.
fn tensor_entity(free: &[Dim], fixed: &[Dim], assignment: usize) -> Vec<usize> {
  let fixed_part = fixed
    .iter()
    .enumerate()
    .fold(0, |v, (j, &axis)| v | (assignment >> j & 1) << axis);
  (0..1usize << free.len())
    .map(|local| {
      free
        .iter()
        .enumerate()
        .fold(fixed_part, |v, (j, &axis)| v | (local >> j & 1) << axis)
    })
    .collect()
}

/// Faces are the lower faces for the axes `dim-1` down to `0`, followed by
/// the upper faces for the axes `0` up to `dim-1`.
/// Lower dimensional entities are grouped by their free axes and then by the
/// binary value of their fixed axes.
fn tensor_subentities(dim: Dim, codim: Codim) -> Vec<Vec<usize>> {
  if codim == 1 {
    let face = |axis: Dim, side: usize| {
      let free: Vec<_> = (0..dim).filter(|&a| a != axis).collect();
      tensor_entity(&free, &[axis], side)
    };
    let lower = (0..dim).rev().map(|axis| face(axis, 0));
    let upper = (0..dim).map(|axis| face(axis, 1));
    return lower.chain(upper).collect();
  }

  (0..dim)
    .combinations(dim - codim)
    .flat_map(|free| {
      let fixed: Vec<_> = (0..dim).filter(|a| !free.contains(a)).collect();
      (0..1usize << fixed.len())
        .map(|assignment| tensor_entity(&free, &fixed, assignment))
        .collect::<Vec<_>>()
    })
    .collect()
}

/// All vertex permutations realized by symmetries of the shape, identity first.
pub(super) fn self_mapping_permutations(shape: ReferenceShape) -> Vec<Permutation> {
  use ReferenceShape as S;
  match shape {
    S::Point => vec![Permutation::identity(1)],
    S::Triangle | S::Tetrahedron => simplex_symmetries(shape.nvertices()),
    S::Line | S::Square | S::Cube | S::Hypercube => tensor_symmetries(shape.dim()),
    S::TriangularPrism => simplex_symmetries(3)
      .into_iter()
      .flat_map(|triangle| {
        [false, true].map(|flip| {
          let images = (0..6)
            .map(|v| {
              let layer = usize::from((v >= 3) != flip);
              3 * layer + triangle[v % 3]
            })
            .collect();
          Permutation::try_new(images)
        })
      })
      .flatten()
      .collect(),
    S::Pyramid => tensor_symmetries(2)
      .into_iter()
      .filter_map(|base| {
        let images = std::iter::once(0)
          .chain(base.as_slice().iter().map(|&v| v + 1))
          .collect();
        Permutation::try_new(images)
      })
      .collect(),
  }
}

fn simplex_symmetries(nvertices: usize) -> Vec<Permutation> {
  AlternatingPermutations::new((0..nvertices).collect())
    .filter_map(Permutation::try_new)
    .collect()
}

/// Axis permutations combined with axis reflections.
fn tensor_symmetries(dim: Dim) -> Vec<Permutation> {
  (0..dim)
    .permutations(dim)
    .flat_map(|axes| {
      (0..1usize << dim)
        .filter_map(|flips| {
          let images = (0..1usize << dim)
            .map(|v| {
              (0..dim).fold(0, |w, a| w | ((v >> a & 1) ^ (flips >> a & 1)) << axes[a])
            })
            .collect();
          Permutation::try_new(images)
        })
        .collect::<Vec<_>>()
    })
    .collect()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn cube_tables() {
    let faces = subentity_vertices(ReferenceShape::Cube, 1);
    let expected: [&[usize]; 6] = [
      &[0, 1, 2, 3],
      &[0, 1, 4, 5],
      &[0, 2, 4, 6],
      &[1, 3, 5, 7],
      &[2, 3, 6, 7],
      &[4, 5, 6, 7],
    ];
    assert_eq!(faces, expected);

    let edges = subentity_vertices(ReferenceShape::Cube, 2);
    let expected: [&[usize]; 12] = [
      &[0, 1],
      &[2, 3],
      &[4, 5],
      &[6, 7],
      &[0, 2],
      &[1, 3],
      &[4, 6],
      &[5, 7],
      &[0, 4],
      &[1, 5],
      &[2, 6],
      &[3, 7],
    ];
    assert_eq!(edges, expected);
  }

  #[test]
  fn square_and_line_tables() {
    let faces = subentity_vertices(ReferenceShape::Square, 1);
    let expected: [&[usize]; 4] = [&[0, 1], &[0, 2], &[1, 3], &[2, 3]];
    assert_eq!(faces, expected);
    let points = subentity_vertices(ReferenceShape::Line, 1);
    let expected: [&[usize]; 2] = [&[0], &[1]];
    assert_eq!(points, expected);
  }

  #[test]
  fn hypercube_faces() {
    let faces = subentity_vertices(ReferenceShape::Hypercube, 1);
    assert_eq!(faces[0], (0..8).collect::<Vec<_>>());
    assert_eq!(faces[1], [0, 1, 2, 3, 8, 9, 10, 11]);
    assert_eq!(faces[2], [0, 1, 4, 5, 8, 9, 12, 13]);
    assert_eq!(faces[3], [0, 2, 4, 6, 8, 10, 12, 14]);
    assert_eq!(faces[4], [1, 3, 5, 7, 9, 11, 13, 15]);
    assert_eq!(faces[5], [2, 3, 6, 7, 10, 11, 14, 15]);
    assert_eq!(faces[6], [4, 5, 6, 7, 12, 13, 14, 15]);
    assert_eq!(faces[7], (8..16).collect::<Vec<_>>());
  }

  #[test]
  fn line_symmetries() {
    let perms = self_mapping_permutations(ReferenceShape::Line);
    assert_eq!(perms.len(), 2);
    assert!(perms[0].is_identity());
    assert_eq!(perms[1].as_slice(), &[1, 0]);
  }

  #[test]
  fn pyramid_fixes_apex() {
    let perms = self_mapping_permutations(ReferenceShape::Pyramid);
    assert_eq!(perms.len(), 8);
    assert!(perms.iter().all(|p| p[0] == 0));
  }
}
