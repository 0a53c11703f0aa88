use crate::{
  error::Result,
  linalg::{wedge, DMatrixExt as _, Matrix, Vector},
  Dim,
};

/// Derivative of a mapping at a point.
///
/// Rows correspond to the image coordinates, columns to the domain coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Jacobian(Matrix);

impl Jacobian {
  pub fn new(matrix: Matrix) -> Self {
    Self(matrix)
  }

  pub fn dim_domain(&self) -> Dim {
    self.0.ncols()
  }
  pub fn dim_image(&self) -> Dim {
    self.0.nrows()
  }
  pub fn is_square(&self) -> bool {
    self.0.is_square()
  }

  pub fn matrix(&self) -> &Matrix {
    &self.0
  }
  pub fn into_matrix(self) -> Matrix {
    self.0
  }

  /// Jacobian of `self` after `inner`, by the chain rule.
  pub fn compose(&self, inner: &Jacobian) -> Jacobian {
    assert_eq!(
      self.dim_domain(),
      inner.dim_image(),
      "Jacobian dimensions do not chain."
    );
    Jacobian(&self.0 * &inner.0)
  }

  /// Signed determinant, or the Gram root for non-square jacobians.
  pub fn determinant(&self) -> f64 {
    self.0.volume_det()
  }

  pub fn wedge(&self) -> Result<Vector> {
    wedge(&self.0)
  }
}

impl std::ops::Index<(usize, usize)> for Jacobian {
  type Output = f64;
  fn index(&self, index: (usize, usize)) -> &Self::Output {
    &self.0[index]
  }
}

impl From<Matrix> for Jacobian {
  fn from(matrix: Matrix) -> Self {
    Self(matrix)
  }
}
