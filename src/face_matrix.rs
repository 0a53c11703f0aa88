//! Face-local matrices of a discontinuous Galerkin discretization.
//!
//! The matrix couples the degrees of freedom of the two elements adjacent to
//! a face. It is stored as four blocks keyed by (test side, trial side); the
//! dense form concatenates them with the left block first, consistent with
//! [`FaceIndexing`](crate::dof::FaceIndexing).

use crate::{
  dof::Side,
  error::{GeometryError, Result},
  linalg::{Matrix, MatrixViewMut},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatrix {
  /// Indexed by `2 * row side + col side`.
  blocks: [Matrix; 4],
}

fn block_index(row: Side, col: Side) -> usize {
  2 * row.index() + col.index()
}

impl FaceMatrix {
  /// Zero matrix for `nleft` and `nright` degrees of freedom.
  pub fn zeros(nleft: usize, nright: usize) -> Self {
    let n = |s: Side| match s {
      Side::Left => nleft,
      Side::Right => nright,
    };
    let block = |row, col| Matrix::zeros(n(row), n(col));
    Self {
      blocks: [
        block(Side::Left, Side::Left),
        block(Side::Left, Side::Right),
        block(Side::Right, Side::Left),
        block(Side::Right, Side::Right),
      ],
    }
  }

  pub fn ndofs(&self, side: Side) -> usize {
    self.blocks[block_index(side, side)].nrows()
  }
  pub fn ndofs_total(&self) -> usize {
    self.ndofs(Side::Left) + self.ndofs(Side::Right)
  }

  /// Discards all entries.
  pub fn resize(&mut self, nleft: usize, nright: usize) {
    *self = Self::zeros(nleft, nright);
  }

  pub fn block(&self, row: Side, col: Side) -> &Matrix {
    &self.blocks[block_index(row, col)]
  }
  /// Mutable view of a block; its shape is fixed.
  pub fn block_mut(&mut self, row: Side, col: Side) -> MatrixViewMut<'_> {
    self.blocks[block_index(row, col)].as_view_mut()
  }
  fn block_storage_mut(&mut self, row: Side, col: Side) -> &mut Matrix {
    &mut self.blocks[block_index(row, col)]
  }

  pub fn set_block(&mut self, row: Side, col: Side, block: Matrix) -> Result<()> {
    let (expected_rows, expected_cols) = (self.ndofs(row), self.ndofs(col));
    if block.shape() != (expected_rows, expected_cols) {
      return Err(GeometryError::BlockShapeMismatch {
        row_side: row,
        col_side: col,
        expected_rows,
        expected_cols,
        rows: block.nrows(),
        cols: block.ncols(),
      });
    }
    self.blocks[block_index(row, col)] = block;
    Ok(())
  }

  pub fn get(&self, row: Side, col: Side, i: usize, j: usize) -> Result<f64> {
    let (i, j) = self.check_entry(row, col, i, j)?;
    Ok(self.block(row, col)[(i, j)])
  }
  pub fn get_mut(&mut self, row: Side, col: Side, i: usize, j: usize) -> Result<&mut f64> {
    let (i, j) = self.check_entry(row, col, i, j)?;
    Ok(&mut self.block_storage_mut(row, col)[(i, j)])
  }

  fn check_entry(&self, row: Side, col: Side, i: usize, j: usize) -> Result<(usize, usize)> {
    for (side, index) in [(row, i), (col, j)] {
      if index >= self.ndofs(side) {
        return Err(GeometryError::DofOutOfRange {
          what: "face matrix entry",
          side,
          index,
          bound: self.ndofs(side),
        });
      }
    }
    Ok((i, j))
  }

  /// Side and block-local index of a flattened index.
  fn split(&self, index: usize) -> Option<(Side, usize)> {
    let nleft = self.ndofs(Side::Left);
    if index < nleft {
      Some((Side::Left, index))
    } else if index < self.ndofs_total() {
      Some((Side::Right, index - nleft))
    } else {
      None
    }
  }

  fn split_pair(&self, i: usize, j: usize) -> Result<(Side, usize, Side, usize)> {
    let out_of_range = |index| GeometryError::IndexOutOfRange {
      what: "face matrix row or column",
      index,
      count: self.ndofs_total(),
    };
    let (row, i) = self.split(i).ok_or_else(|| out_of_range(i))?;
    let (col, j) = self.split(j).ok_or_else(|| out_of_range(j))?;
    Ok((row, i, col, j))
  }

  /// Entry `(i, j)` of the dense form.
  pub fn get_flat(&self, i: usize, j: usize) -> Result<f64> {
    let (row, i, col, j) = self.split_pair(i, j)?;
    Ok(self.block(row, col)[(i, j)])
  }
  pub fn get_flat_mut(&mut self, i: usize, j: usize) -> Result<&mut f64> {
    let (row, i, col, j) = self.split_pair(i, j)?;
    Ok(&mut self.block_storage_mut(row, col)[(i, j)])
  }

  pub fn to_dense(&self) -> Matrix {
    let nleft = self.ndofs(Side::Left);
    let n = self.ndofs_total();
    let mut dense = Matrix::zeros(n, n);
    for row in Side::BOTH {
      for col in Side::BOTH {
        let r0 = if row == Side::Left { 0 } else { nleft };
        let c0 = if col == Side::Left { 0 } else { nleft };
        let block = self.block(row, col);
        dense
          .view_mut((r0, c0), block.shape())
          .copy_from(block);
      }
    }
    dense
  }

  /// Splits a square dense matrix after its first `nleft` rows and columns.
  pub fn from_dense(dense: &Matrix, nleft: usize) -> Result<Self> {
    if !dense.is_square() || nleft > dense.nrows() {
      return Err(GeometryError::BlockShapeMismatch {
        row_side: Side::Left,
        col_side: Side::Left,
        expected_rows: nleft,
        expected_cols: nleft,
        rows: dense.nrows(),
        cols: dense.ncols(),
      });
    }
    let mut matrix = Self::zeros(nleft, dense.nrows() - nleft);
    matrix.copy_blocks_from(dense);
    Ok(matrix)
  }

  /// Overwrites all blocks, keeping the current degree of freedom counts.
  pub fn set_from_dense(&mut self, dense: &Matrix) -> Result<()> {
    let n = self.ndofs_total();
    if dense.shape() != (n, n) {
      return Err(GeometryError::BlockShapeMismatch {
        row_side: Side::Left,
        col_side: Side::Right,
        expected_rows: n,
        expected_cols: n,
        rows: dense.nrows(),
        cols: dense.ncols(),
      });
    }
    self.copy_blocks_from(dense);
    Ok(())
  }

  fn copy_blocks_from(&mut self, dense: &Matrix) {
    let nleft = self.ndofs(Side::Left);
    for row in Side::BOTH {
      for col in Side::BOTH {
        let r0 = if row == Side::Left { 0 } else { nleft };
        let c0 = if col == Side::Left { 0 } else { nleft };
        let block = self.block_storage_mut(row, col);
        let shape = block.shape();
        block.copy_from(&dense.view((r0, c0), shape));
      }
    }
  }

  /// `self += factor * other`, block by block.
  pub fn scaled_accumulate(&mut self, factor: f64, other: &FaceMatrix) -> Result<()> {
    self.check_same_shape(other)?;
    for (mine, theirs) in self.blocks.iter_mut().zip(&other.blocks) {
      *mine += theirs * factor;
    }
    Ok(())
  }

  fn check_same_shape(&self, other: &FaceMatrix) -> Result<()> {
    for row in Side::BOTH {
      for col in Side::BOTH {
        let (mine, theirs) = (self.block(row, col), other.block(row, col));
        if mine.shape() != theirs.shape() {
          return Err(GeometryError::BlockShapeMismatch {
            row_side: row,
            col_side: col,
            expected_rows: mine.nrows(),
            expected_cols: mine.ncols(),
            rows: theirs.nrows(),
            cols: theirs.ncols(),
          });
        }
      }
    }
    Ok(())
  }
}

impl std::ops::AddAssign<&FaceMatrix> for FaceMatrix {
  fn add_assign(&mut self, other: &FaceMatrix) {
    if let Err(err) = self.check_same_shape(other) {
      panic!("Incompatible face matrices: {err}");
    }
    for (mine, theirs) in self.blocks.iter_mut().zip(&other.blocks) {
      *mine += theirs;
    }
  }
}

impl std::ops::MulAssign<f64> for FaceMatrix {
  fn mul_assign(&mut self, factor: f64) {
    for block in &mut self.blocks {
      *block *= factor;
    }
  }
}

impl std::ops::Index<(Side, Side, usize, usize)> for FaceMatrix {
  type Output = f64;
  fn index(&self, (row, col, i, j): (Side, Side, usize, usize)) -> &f64 {
    &self.block(row, col)[(i, j)]
  }
}
impl std::ops::IndexMut<(Side, Side, usize, usize)> for FaceMatrix {
  fn index_mut(&mut self, (row, col, i, j): (Side, Side, usize, usize)) -> &mut f64 {
    &mut self.block_storage_mut(row, col)[(i, j)]
  }
}

impl std::ops::Index<(usize, usize)> for FaceMatrix {
  type Output = f64;
  fn index(&self, (i, j): (usize, usize)) -> &f64 {
    let (row, i, col, j) = self
      .split_pair(i, j)
      .unwrap_or_else(|err| panic!("Invalid face matrix index: {err}"));
    &self.block(row, col)[(i, j)]
  }
}
impl std::ops::IndexMut<(usize, usize)> for FaceMatrix {
  fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
    let (row, i, col, j) = self
      .split_pair(i, j)
      .unwrap_or_else(|err| panic!("Invalid face matrix index: {err}"));
    &mut self.block_storage_mut(row, col)[(i, j)]
  }
}
