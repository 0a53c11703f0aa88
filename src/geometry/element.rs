use super::NodeCoords;
use crate::{
  config::GeometryConfig,
  error::{GeometryError, Result},
  jacobian::Jacobian,
  linalg::{Vector, VectorView},
  mapping::CoordinateMapping,
  shape::ReferenceShape,
  NodeIdx,
};

use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Geometric half of a mesh element.
///
/// The node order defines which reference vertex corresponds to which
/// global node. The coordinate mapping is built on first use.
#[derive(Debug, Clone)]
pub struct ElementGeometry {
  shape: ReferenceShape,
  nodes: Vec<NodeIdx>,
  coords: Arc<NodeCoords>,
  mapping: OnceCell<CoordinateMapping>,
}

impl ElementGeometry {
  /// Shape detected from the number of nodes and the coordinate dimension.
  pub fn new(nodes: Vec<NodeIdx>, coords: Arc<NodeCoords>) -> Result<Self> {
    let shape = ReferenceShape::from_vertex_count(coords.dim(), nodes.len())?;
    Self::with_shape(shape, nodes, coords)
  }

  /// Lower dimensional shapes may be embedded in a higher dimensional space.
  pub fn with_shape(shape: ReferenceShape, nodes: Vec<NodeIdx>, coords: Arc<NodeCoords>) -> Result<Self> {
    if nodes.len() != shape.nvertices() {
      return Err(GeometryError::WrongVertexCount {
        shape,
        expected: shape.nvertices(),
        found: nodes.len(),
      });
    }
    if coords.dim() < shape.dim() {
      return Err(GeometryError::CoordinateDimension {
        shape,
        required: shape.dim(),
        found: coords.dim(),
      });
    }
    for (i, &node) in nodes.iter().enumerate() {
      coords.check_node(node)?;
      if nodes[..i].contains(&node) {
        return Err(GeometryError::DuplicateNode {
          node,
          nodes: nodes.clone(),
        });
      }
    }
    Ok(Self {
      shape,
      nodes,
      coords,
      mapping: OnceCell::new(),
    })
  }

  pub fn reference_shape(&self) -> ReferenceShape {
    self.shape
  }
  pub fn nodes(&self) -> &[NodeIdx] {
    &self.nodes
  }
  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn coords(&self) -> &Arc<NodeCoords> {
    &self.coords
  }
  pub fn node_coord(&self, ilocal: usize) -> VectorView<'_> {
    self.coords.coord(self.nodes[ilocal])
  }

  pub fn mapping(&self) -> &CoordinateMapping {
    self.mapping.get_or_init(|| {
      // nodes and shape were validated on construction
      let nodes = self.coords.matrix().select_columns(&self.nodes);
      CoordinateMapping::new(self.shape, nodes)
        .unwrap_or_else(|err| unreachable!("validated element has invalid mapping: {err}"))
    })
  }

  pub fn reference_to_physical(&self, p: VectorView) -> Vector {
    self.mapping().transform(p)
  }
  pub fn jacobian(&self, p: VectorView) -> Jacobian {
    self.mapping().jacobian(p)
  }
  /// Signed, may vanish for degenerate cells.
  pub fn determinant(&self, p: VectorView) -> f64 {
    self.mapping().determinant(p)
  }

  /// Determinant of a cell that must be non-degenerate and positively
  /// oriented.
  pub fn checked_determinant(&self, p: VectorView) -> Result<f64> {
    let det = self.determinant(p);
    if det > 0.0 {
      Ok(det)
    } else {
      Err(self.invalid_jacobian(det))
    }
  }

  pub(crate) fn invalid_jacobian(&self, det: f64) -> GeometryError {
    GeometryError::InvalidJacobian {
      shape: self.shape,
      nodes: self.nodes.clone(),
      det,
    }
  }

  pub fn physical_to_reference(&self, x: VectorView, config: &GeometryConfig) -> Result<Vector> {
    self.mapping().inverse_transform(x, config)
  }

  /// Physical centroid of the reference center.
  pub fn center(&self) -> Vector {
    self.reference_to_physical(self.shape.center().as_view())
  }

  pub fn nfaces(&self) -> usize {
    self.shape.nfaces()
  }

  /// Global nodes of local face `face`, ordered like the vertices of the
  /// reference face.
  pub fn face_nodes(&self, face: usize) -> Result<Vec<NodeIdx>> {
    let local = self.shape.subentity_local_indices(1, face)?;
    Ok(local.iter().map(|&i| self.nodes[i]).collect())
  }
}
