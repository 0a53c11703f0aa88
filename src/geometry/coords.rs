use crate::{
  error::{GeometryError, Result},
  linalg::{Matrix, VectorView},
  Dim, NodeIdx,
};

/// Physical coordinates of all mesh nodes, indexed by global node number.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCoords {
  /// The node coordinates in the columns of a matrix.
  matrix: Matrix,
}

impl NodeCoords {
  pub fn new(matrix: Matrix) -> Self {
    Self { matrix }
  }

  /// Nodes given as consecutive `dim`-tuples.
  pub fn from_column_slice(dim: Dim, coords: &[f64]) -> Self {
    assert!(dim > 0 && coords.len() % dim == 0, "Coordinates do not fit the dimension.");
    Self::new(Matrix::from_column_slice(dim, coords.len() / dim, coords))
  }

  pub fn dim(&self) -> Dim {
    self.matrix.nrows()
  }
  pub fn nnodes(&self) -> usize {
    self.matrix.ncols()
  }

  pub fn coord(&self, node: NodeIdx) -> VectorView<'_> {
    self.matrix.column(node)
  }

  pub fn matrix(&self) -> &Matrix {
    &self.matrix
  }

  pub fn check_node(&self, node: NodeIdx) -> Result<()> {
    if node < self.nnodes() {
      Ok(())
    } else {
      Err(GeometryError::NodeOutOfRange {
        node,
        nnodes: self.nnodes(),
      })
    }
  }

  /// Coordinates of `nodes`, one column each, in the given order.
  pub fn select(&self, nodes: &[NodeIdx]) -> Result<Matrix> {
    for &node in nodes {
      self.check_node(node)?;
    }
    Ok(self.matrix.select_columns(nodes))
  }
}
