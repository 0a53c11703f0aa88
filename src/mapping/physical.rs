use super::ReferenceMapping;
use crate::{
  config::GeometryConfig,
  error::{GeometryError, Result},
  jacobian::Jacobian,
  linalg::{Matrix, Vector, VectorView},
  shape::ReferenceShape,
  Dim,
};

/// Below this distance from the pyramid apex the rational terms of the
/// pyramid shape functions are dropped.
const APEX_EPS: f64 = 1e-12;

/// Reference-to-physical map of a cell with straight edges.
///
/// The physical point is the interpolation of the vertex coordinates with the
/// lowest order nodal shape functions of the shape: affine for simplices,
/// multilinear for line, square, cube and hypercube, linear times linear for
/// the prism and collapsed bilinear for the pyramid.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapping {
  shape: ReferenceShape,
  /// The vertex coordinates in the columns of a matrix.
  nodes: Matrix,
}

impl CoordinateMapping {
  pub fn new(shape: ReferenceShape, nodes: Matrix) -> Result<Self> {
    if nodes.ncols() != shape.nvertices() {
      return Err(GeometryError::WrongVertexCount {
        shape,
        expected: shape.nvertices(),
        found: nodes.ncols(),
      });
    }
    if nodes.nrows() < shape.dim() {
      return Err(GeometryError::CoordinateDimension {
        shape,
        required: shape.dim(),
        found: nodes.nrows(),
      });
    }
    Ok(Self { shape, nodes })
  }

  pub fn shape(&self) -> ReferenceShape {
    self.shape
  }
  pub fn nodes(&self) -> &Matrix {
    &self.nodes
  }
  pub fn dim_domain(&self) -> Dim {
    self.shape.dim()
  }
  pub fn dim_image(&self) -> Dim {
    self.nodes.nrows()
  }
  pub fn is_affine(&self) -> bool {
    self.shape.is_simplex()
  }

  pub fn transform(&self, p: VectorView) -> Vector {
    debug_assert_eq!(p.len(), self.dim_domain());
    &self.nodes * shape_values(self.shape, p)
  }

  pub fn jacobian(&self, p: VectorView) -> Jacobian {
    debug_assert_eq!(p.len(), self.dim_domain());
    Jacobian::new(&self.nodes * shape_gradients(self.shape, p))
  }

  pub fn determinant(&self, p: VectorView) -> f64 {
    self.jacobian(p).determinant()
  }

  /// Reference point mapped onto `x`, found by Newton iteration from the
  /// reference center.
  ///
  /// For embedded cells this is the preimage of the closest point on the cell.
  pub fn inverse_transform(&self, x: VectorView, config: &GeometryConfig) -> Result<Vector> {
    if x.len() != self.dim_image() {
      return Err(GeometryError::PointDimension {
        expected: self.dim_image(),
        found: x.len(),
      });
    }

    let scale = x.norm().max(1.0);
    let mut xi = self.shape.center().clone();
    let mut residual = f64::INFINITY;
    for iteration in 0..config.inverse_max_iterations {
      let r = self.transform(xi.as_view()) - x;
      residual = r.norm();
      if residual <= config.inverse_tolerance * scale {
        tracing::trace!(iteration, residual, "inverse transform converged");
        return Ok(xi);
      }
      let step = self
        .jacobian(xi.as_view())
        .into_matrix()
        .svd(true, true)
        .solve(&r, 1e-14)
        .map_err(|_| GeometryError::InverseNotConverged {
          iterations: iteration,
          residual,
        })?;
      xi -= step;
    }

    let r = self.transform(xi.as_view()) - x;
    if r.norm() <= config.inverse_tolerance * scale {
      return Ok(xi);
    }
    Err(GeometryError::InverseNotConverged {
      iterations: config.inverse_max_iterations,
      residual: residual.min(r.norm()),
    })
  }
}

impl ReferenceMapping for CoordinateMapping {
  fn dim_domain(&self) -> Dim {
    self.dim_domain()
  }
  fn dim_image(&self) -> Dim {
    self.dim_image()
  }
  fn transform(&self, p: VectorView) -> Vector {
    self.transform(p)
  }
  fn jacobian(&self, p: VectorView) -> Jacobian {
    self.jacobian(p)
  }
}

/// Sign of vertex `v` of a tensor product shape along `axis`.
fn tensor_sign(v: usize, axis: usize) -> f64 {
  if v >> axis & 1 == 1 {
    1.0
  } else {
    -1.0
  }
}

fn layer_sign(v: usize) -> f64 {
  if v < 3 {
    -1.0
  } else {
    1.0
  }
}

/// Base vertices of the pyramid in the order of the reference vertices 1..=4.
const PYRAMID_BASE: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

fn barycentric(p: VectorView) -> [f64; 3] {
  [1.0 - p[0] - p[1], p[0], p[1]]
}
const BARYCENTRIC_GRADIENTS: [[f64; 2]; 3] = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];

/// Nodal shape functions at `p`, one per vertex.
fn shape_values(shape: ReferenceShape, p: VectorView) -> Vector {
  use ReferenceShape as S;
  let n = shape.nvertices();
  match shape {
    S::Point => Vector::from_element(1, 1.0),
    S::Triangle | S::Tetrahedron => {
      let mut values = Vector::zeros(n);
      values[0] = 1.0 - p.sum();
      for i in 1..n {
        values[i] = p[i - 1];
      }
      values
    }
    S::Line | S::Square | S::Cube | S::Hypercube => Vector::from_iterator(
      n,
      (0..n).map(|v| {
        (0..shape.dim())
          .map(|a| 0.5 * (1.0 + tensor_sign(v, a) * p[a]))
          .product::<f64>()
      }),
    ),
    S::TriangularPrism => {
      let lambda = barycentric(p);
      Vector::from_iterator(
        n,
        (0..n).map(|v| lambda[v % 3] * 0.5 * (1.0 + layer_sign(v) * p[2])),
      )
    }
    S::Pyramid => {
      let (x, y, z) = (p[0], p[1], p[2]);
      let gap = 1.0 - z;
      let mut values = Vector::zeros(n);
      values[0] = z;
      for (i, &(sx, sy)) in PYRAMID_BASE.iter().enumerate() {
        let rational = if gap.abs() > APEX_EPS {
          sx * sy * x * y / (4.0 * gap)
        } else {
          0.0
        };
        values[i + 1] = 0.25 * gap + 0.25 * sx * x + 0.25 * sy * y + rational;
      }
      values
    }
  }
}

/// Gradients of the nodal shape functions at `p`, one row per vertex.
fn shape_gradients(shape: ReferenceShape, p: VectorView) -> Matrix {
  use ReferenceShape as S;
  let n = shape.nvertices();
  let dim = shape.dim();
  let mut grads = Matrix::zeros(n, dim);
  match shape {
    S::Point => {}
    S::Triangle | S::Tetrahedron => {
      for a in 0..dim {
        grads[(0, a)] = -1.0;
        grads[(a + 1, a)] = 1.0;
      }
    }
    S::Line | S::Square | S::Cube | S::Hypercube => {
      for v in 0..n {
        for b in 0..dim {
          grads[(v, b)] = (0..dim)
            .map(|a| {
              let s = tensor_sign(v, a);
              if a == b {
                0.5 * s
              } else {
                0.5 * (1.0 + s * p[a])
              }
            })
            .product();
        }
      }
    }
    S::TriangularPrism => {
      let lambda = barycentric(p);
      for v in 0..n {
        let t = v % 3;
        let s = layer_sign(v);
        let linear = 0.5 * (1.0 + s * p[2]);
        grads[(v, 0)] = BARYCENTRIC_GRADIENTS[t][0] * linear;
        grads[(v, 1)] = BARYCENTRIC_GRADIENTS[t][1] * linear;
        grads[(v, 2)] = 0.5 * s * lambda[t];
      }
    }
    S::Pyramid => {
      let (x, y, z) = (p[0], p[1], p[2]);
      let gap = 1.0 - z;
      grads[(0, 2)] = 1.0;
      for (i, &(sx, sy)) in PYRAMID_BASE.iter().enumerate() {
        let (rx, ry, rz) = if gap.abs() > APEX_EPS {
          let s = sx * sy / (4.0 * gap);
          (s * y, s * x, s * x * y / gap)
        } else {
          (0.0, 0.0, 0.0)
        };
        grads[(i + 1, 0)] = 0.25 * sx + rx;
        grads[(i + 1, 1)] = 0.25 * sy + ry;
        grads[(i + 1, 2)] = -0.25 + rz;
      }
    }
  }
  grads
}
