//! The catalog of reference shapes.
//!
//! Every shape is described once, in a process-wide immutable table that is
//! built on first use. [`ReferenceShape`] is a plain `Copy` handle into it.

mod catalog;
mod topology;

pub use catalog::SubEntity;

use crate::{
  combinatorics::Sign,
  error::{GeometryError, Result},
  linalg::{Matrix, Vector, VectorView},
  mapping::{AffineMap, SelfMapping},
  Codim, Dim,
};

/// Slack for points on the boundary of a reference domain.
const INTERNAL_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceShape {
  Point,
  Line,
  Triangle,
  Square,
  Tetrahedron,
  Cube,
  TriangularPrism,
  Pyramid,
  Hypercube,
}

impl ReferenceShape {
  pub const ALL: [Self; 9] = [
    Self::Point,
    Self::Line,
    Self::Triangle,
    Self::Square,
    Self::Tetrahedron,
    Self::Cube,
    Self::TriangularPrism,
    Self::Pyramid,
    Self::Hypercube,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Point => "point",
      Self::Line => "line",
      Self::Triangle => "triangle",
      Self::Square => "square",
      Self::Tetrahedron => "tetrahedron",
      Self::Cube => "cube",
      Self::TriangularPrism => "triangular prism",
      Self::Pyramid => "pyramid",
      Self::Hypercube => "hypercube",
    }
  }

  pub fn dim(self) -> Dim {
    match self {
      Self::Point => 0,
      Self::Line => 1,
      Self::Triangle | Self::Square => 2,
      Self::Tetrahedron | Self::Cube | Self::TriangularPrism | Self::Pyramid => 3,
      Self::Hypercube => 4,
    }
  }

  pub fn nvertices(self) -> usize {
    match self {
      Self::Point => 1,
      Self::Line => 2,
      Self::Triangle => 3,
      Self::Square => 4,
      Self::Tetrahedron => 4,
      Self::Cube => 8,
      Self::TriangularPrism => 6,
      Self::Pyramid => 5,
      Self::Hypercube => 16,
    }
  }

  /// The shape of an element with `nvertices` vertices in dimension `dim`.
  pub fn from_vertex_count(dim: Dim, nvertices: usize) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|s| s.dim() == dim && s.nvertices() == nvertices)
      .ok_or(GeometryError::UnknownShape { dim, nvertices })
  }

  pub fn is_simplex(self) -> bool {
    matches!(
      self,
      Self::Point | Self::Line | Self::Triangle | Self::Tetrahedron
    )
  }
  pub fn is_tensor_product(self) -> bool {
    matches!(
      self,
      Self::Point | Self::Line | Self::Square | Self::Cube | Self::Hypercube
    )
  }

  /// Measure of the reference domain. The point has counting measure one.
  pub fn reference_volume(self) -> f64 {
    match self {
      Self::Point => 1.0,
      Self::Line => 2.0,
      Self::Triangle => 0.5,
      Self::Square => 4.0,
      Self::Tetrahedron => 1.0 / 6.0,
      Self::Cube => 8.0,
      Self::TriangularPrism => 1.0,
      Self::Pyramid => 4.0 / 3.0,
      Self::Hypercube => 16.0,
    }
  }

  fn data(self) -> &'static catalog::ShapeData {
    catalog::data(self)
  }

  /// Reference coordinates of the vertices, one per column.
  pub fn vertices(self) -> &'static Matrix {
    &self.data().vertices
  }
  pub fn vertex(self, ivertex: usize) -> VectorView<'static> {
    self.vertices().column(ivertex)
  }
  pub fn center(self) -> &'static Vector {
    &self.data().center
  }

  /// Whether `p` lies in the closed reference domain. Meant for validation,
  /// not for deciding anything on a hot path.
  pub fn is_internal_point(self, p: VectorView) -> bool {
    if p.len() != self.dim() {
      return false;
    }
    let eps = INTERNAL_EPS;
    match self {
      Self::Point => true,
      Self::Line | Self::Square | Self::Cube | Self::Hypercube => {
        p.iter().all(|x| x.abs() <= 1.0 + eps)
      }
      Self::Triangle | Self::Tetrahedron => p.iter().all(|&x| x >= -eps) && p.sum() <= 1.0 + eps,
      Self::TriangularPrism => {
        p[0] >= -eps && p[1] >= -eps && p[0] + p[1] <= 1.0 + eps && p[2].abs() <= 1.0 + eps
      }
      Self::Pyramid => {
        let z = p[2];
        z >= -eps && z <= 1.0 + eps && p[0].abs() <= 1.0 - z + eps && p[1].abs() <= 1.0 - z + eps
      }
    }
  }

  /// Number of sub-entities of codimension `codim`, zero if there are none.
  pub fn nsubentities(self, codim: Codim) -> usize {
    match codim {
      0 => 0,
      c => self.data().subentities.get(c - 1).map_or(0, Vec::len),
    }
  }
  pub fn nfaces(self) -> usize {
    self.nsubentities(1)
  }

  pub fn subentity(self, codim: Codim, index: usize) -> Result<&'static SubEntity> {
    if codim == 0 || codim > self.dim() {
      return Err(GeometryError::InvalidCodim { shape: self, codim });
    }
    let entities = &self.data().subentities[codim - 1];
    entities
      .get(index)
      .ok_or(GeometryError::SubEntityOutOfRange {
        shape: self,
        codim,
        index,
        count: entities.len(),
      })
  }

  pub fn subentity_local_indices(self, codim: Codim, index: usize) -> Result<&'static [usize]> {
    self.subentity(codim, index).map(SubEntity::local_indices)
  }
  pub fn subentity_embedding(self, codim: Codim, index: usize) -> Result<&'static AffineMap> {
    self.subentity(codim, index).map(SubEntity::embedding)
  }
  pub fn subentity_shape(self, codim: Codim, index: usize) -> Result<ReferenceShape> {
    self.subentity(codim, index).map(SubEntity::shape)
  }

  /// Sign that makes the wedge of the face embedding's columns point out of
  /// the reference domain.
  pub fn outward_sign(self, face: usize) -> Result<Sign> {
    let signs = &self.data().outward_signs;
    signs
      .get(face)
      .copied()
      .ok_or(GeometryError::SubEntityOutOfRange {
        shape: self,
        codim: 1,
        index: face,
        count: signs.len(),
      })
  }

  pub fn nself_mappings(self) -> usize {
    self.data().self_mappings.len()
  }

  /// Entry `0` is the identity.
  pub fn self_mapping(self, index: usize) -> Result<&'static SelfMapping> {
    self
      .data()
      .self_mappings
      .get_index(index)
      .map(|(_, m)| m)
      .ok_or(GeometryError::SelfMappingOutOfRange {
        shape: self,
        index,
        count: self.nself_mappings(),
      })
  }

  pub fn self_mappings(self) -> impl ExactSizeIterator<Item = &'static SelfMapping> {
    self.data().self_mappings.values()
  }

  /// Index of the self-mapping that takes the reference coordinates of the
  /// ordering `first` to those of the ordering `second`.
  ///
  /// Both orderings list the same vertices, e.g. the global node numbers of a
  /// face as seen from two neighbouring elements. The mapping sends reference
  /// vertex `i` to the position of `first[i]` in `second`.
  pub fn self_mapping_index<T: PartialEq + Into<usize> + Copy>(
    self,
    first: &[T],
    second: &[T],
  ) -> Result<usize> {
    let raw = |s: &[T]| s.iter().map(|&i| i.into()).collect::<Vec<usize>>();
    for found in [first.len(), second.len()] {
      if found != self.nvertices() {
        return Err(GeometryError::WrongVertexCount {
          shape: self,
          expected: self.nvertices(),
          found,
        });
      }
    }
    let perm = crate::combinatorics::Permutation::from_orderings(first, second).ok_or_else(|| {
      GeometryError::NotAPermutation {
        shape: self,
        first: raw(first),
        second: raw(second),
      }
    })?;
    self
      .data()
      .self_mappings
      .get_index_of(&perm)
      .ok_or_else(|| GeometryError::NoSelfMapping {
        shape: self,
        first: raw(first),
        second: raw(second),
      })
  }
}

impl std::fmt::Display for ReferenceShape {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}
