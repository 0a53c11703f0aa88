//! Mappings out of reference domains.
//!
//! Reference-to-reference maps ([`AffineMap`], [`SelfMapping`],
//! [`ConcatenatedMap`]) relate sub-entities and orderings of reference shapes.
//! [`CoordinateMapping`] takes a reference shape into physical space.

mod affine;
mod physical;

pub use affine::AffineMap;
pub use physical::CoordinateMapping;

use crate::{
  combinatorics::{Permutation, Sign},
  jacobian::Jacobian,
  linalg::{Vector, VectorView},
  Dim,
};

/// Capability shared by every mapping that can be evaluated at a point of a
/// reference domain.
pub trait ReferenceMapping {
  fn dim_domain(&self) -> Dim;
  fn dim_image(&self) -> Dim;
  fn transform(&self, p: VectorView) -> Vector;
  fn jacobian(&self, p: VectorView) -> Jacobian;
}

/// A vertex permuting bijection of a reference shape onto itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfMapping {
  permutation: Permutation,
  map: AffineMap,
}

impl SelfMapping {
  pub(crate) fn new(permutation: Permutation, map: AffineMap) -> Self {
    Self { permutation, map }
  }

  /// Reference vertex `i` is sent to reference vertex `permutation[i]`.
  pub fn permutation(&self) -> &Permutation {
    &self.permutation
  }
  pub fn map(&self) -> &AffineMap {
    &self.map
  }

  /// Whether the mapping preserves or reverses the orientation of the shape.
  pub fn orientation(&self) -> Sign {
    Sign::try_from_f64(self.map.jacobian().determinant()).unwrap_or_default()
  }
}

impl ReferenceMapping for SelfMapping {
  fn dim_domain(&self) -> Dim {
    self.map.dim_domain()
  }
  fn dim_image(&self) -> Dim {
    self.map.dim_image()
  }
  fn transform(&self, p: VectorView) -> Vector {
    self.map.apply_forward(p)
  }
  fn jacobian(&self, _p: VectorView) -> Jacobian {
    self.map.jacobian()
  }
}

/// `second` after `first`.
#[derive(Clone, Copy)]
pub struct ConcatenatedMap<'a> {
  first: &'a (dyn ReferenceMapping + Sync),
  second: &'a (dyn ReferenceMapping + Sync),
}

impl<'a> ConcatenatedMap<'a> {
  pub fn new(
    first: &'a (dyn ReferenceMapping + Sync),
    second: &'a (dyn ReferenceMapping + Sync),
  ) -> Self {
    assert_eq!(
      first.dim_image(),
      second.dim_domain(),
      "Mappings cannot be concatenated."
    );
    Self { first, second }
  }
}

impl ReferenceMapping for ConcatenatedMap<'_> {
  fn dim_domain(&self) -> Dim {
    self.first.dim_domain()
  }
  fn dim_image(&self) -> Dim {
    self.second.dim_image()
  }
  fn transform(&self, p: VectorView) -> Vector {
    let mid = self.first.transform(p);
    self.second.transform(mid.as_view())
  }
  fn jacobian(&self, p: VectorView) -> Jacobian {
    let mid = self.first.transform(p);
    let inner = self.first.jacobian(p);
    self.second.jacobian(mid.as_view()).compose(&inner)
  }
}
