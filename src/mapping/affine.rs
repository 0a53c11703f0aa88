use super::ReferenceMapping;
use crate::{
  jacobian::Jacobian,
  linalg::{Matrix, Vector, VectorView},
  Dim,
};

/// `x -> linear * x + translation`
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMap {
  translation: Vector,
  linear: Matrix,
}

impl AffineMap {
  pub fn new(translation: Vector, linear: Matrix) -> Self {
    assert_eq!(translation.len(), linear.nrows(), "Affine map dimensions differ.");
    Self {
      translation,
      linear,
    }
  }

  pub fn identity(dim: Dim) -> Self {
    Self::new(Vector::zeros(dim), Matrix::identity(dim, dim))
  }

  /// The affine map taking the points in the columns of `domain` to the
  /// points in the columns of `image`.
  ///
  /// `domain` must contain `k+1` affinely independent points of `R^k`.
  pub fn from_frames(domain: &Matrix, image: &Matrix) -> Option<Self> {
    assert_eq!(domain.ncols(), image.ncols(), "Frames differ in size.");
    assert_eq!(domain.nrows() + 1, domain.ncols(), "Domain frame is not a simplex.");
    let k = domain.nrows();
    let d0 = domain.column(0);
    let i0 = image.column(0);
    if k == 0 {
      return Some(Self::new(i0.into_owned(), Matrix::zeros(image.nrows(), 0)));
    }

    let mut dspan = Matrix::zeros(k, k);
    let mut ispan = Matrix::zeros(image.nrows(), k);
    for j in 0..k {
      dspan.set_column(j, &(domain.column(j + 1) - d0));
      ispan.set_column(j, &(image.column(j + 1) - i0));
    }
    let linear = ispan * dspan.try_inverse()?;
    let translation = i0 - &linear * d0;
    Some(Self::new(translation, linear))
  }

  pub fn translation(&self) -> &Vector {
    &self.translation
  }
  pub fn linear(&self) -> &Matrix {
    &self.linear
  }

  pub fn dim_domain(&self) -> Dim {
    self.linear.ncols()
  }
  pub fn dim_image(&self) -> Dim {
    self.linear.nrows()
  }

  pub fn apply_forward(&self, coord: VectorView) -> Vector {
    if self.linear.ncols() == 0 {
      return self.translation.clone();
    }
    &self.linear * coord + &self.translation
  }

  /// Least squares preimage of `coord`.
  pub fn apply_backward(&self, coord: VectorView) -> Option<Vector> {
    if self.linear.ncols() == 0 {
      return Some(Vector::zeros(0));
    }
    self
      .linear
      .clone()
      .svd(true, true)
      .solve(&(coord - &self.translation), 1e-12)
      .ok()
  }

  /// `self` after `inner`.
  pub fn compose(&self, inner: &AffineMap) -> AffineMap {
    assert_eq!(self.dim_domain(), inner.dim_image(), "Affine maps do not chain.");
    let linear = &self.linear * &inner.linear;
    let translation = &self.linear * &inner.translation + &self.translation;
    AffineMap::new(translation, linear)
  }

  pub fn jacobian(&self) -> Jacobian {
    Jacobian::new(self.linear.clone())
  }
}

impl ReferenceMapping for AffineMap {
  fn dim_domain(&self) -> Dim {
    self.dim_domain()
  }
  fn dim_image(&self) -> Dim {
    self.dim_image()
  }
  fn transform(&self, p: VectorView) -> Vector {
    self.apply_forward(p)
  }
  fn jacobian(&self, _p: VectorView) -> Jacobian {
    self.jacobian()
  }
}
