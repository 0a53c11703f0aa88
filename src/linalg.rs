use crate::{error::GeometryError, Dim};

pub type Vector = na::DVector<f64>;
pub type Matrix = na::DMatrix<f64>;
pub type VectorView<'a> = na::DVectorView<'a, f64>;
pub type MatrixViewMut<'a> = na::DMatrixViewMut<'a, f64>;

pub trait DMatrixExt {
  fn gramian(&self) -> Self;
  fn gram_det(&self) -> f64;
  fn gram_det_sqrt(&self) -> f64;
  fn is_full_rank(&self, eps: f64) -> bool;
  /// Signed determinant for square matrices, the square root of the Gram
  /// determinant for tall ones.
  fn volume_det(&self) -> f64;
}
impl DMatrixExt for Matrix {
  fn gramian(&self) -> Self {
    self.transpose() * self
  }
  fn gram_det(&self) -> f64 {
    self.gramian().determinant()
  }
  fn gram_det_sqrt(&self) -> f64 {
    self.gram_det().sqrt()
  }
  fn is_full_rank(&self, eps: f64) -> bool {
    self.rank(eps) == self.nrows().min(self.ncols())
  }
  fn volume_det(&self) -> f64 {
    if self.ncols() == 0 {
      1.0
    } else if self.is_square() {
      self.determinant()
    } else {
      self.gram_det_sqrt()
    }
  }
}

/// Generalized cross product of the `D-1` columns of a `D x (D-1)` matrix.
///
/// Entry `i` is the determinant of the matrix with the unit vector `e_i`
/// appended as last column, so the result is orthogonal to every column and
/// its length is the `(D-1)`-volume spanned by them.
pub fn wedge(m: &Matrix) -> Result<Vector, GeometryError> {
  let dim: Dim = m.nrows();
  if dim == 0 || m.ncols() + 1 != dim {
    return Err(GeometryError::WedgeShape {
      rows: m.nrows(),
      cols: m.ncols(),
    });
  }
  if dim == 1 {
    return Ok(Vector::from_element(1, 1.0));
  }
  let last = dim - 1;
  Ok(Vector::from_iterator(
    dim,
    (0..dim).map(|i| {
      let minor = m.clone().remove_row(i).determinant();
      if (i + last) % 2 == 0 {
        minor
      } else {
        -minor
      }
    }),
  ))
}
