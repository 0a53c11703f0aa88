use super::{
  matching::{match_face_nodes, MatchKind},
  ElementGeometry, ElementIdx,
};
use crate::{
  combinatorics::Sign,
  config::GeometryConfig,
  dof::Side,
  error::{GeometryError, Result},
  jacobian::Jacobian,
  linalg::{Vector, VectorView},
  mapping::{AffineMap, ConcatenatedMap, SelfMapping},
  shape::ReferenceShape,
};

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceType {
  Internal,
  Periodic,
  /// Internal face between two parts of a partitioned mesh.
  SubdomainBoundary,
  PeriodicSubdomain,
  Wall,
  Open,
}

impl FaceType {
  /// Whether the face couples two elements.
  pub fn is_internal(self) -> bool {
    matches!(
      self,
      Self::Internal | Self::Periodic | Self::SubdomainBoundary | Self::PeriodicSubdomain
    )
  }

  fn into_periodic(self) -> Self {
    match self {
      Self::Internal => Self::Periodic,
      Self::SubdomainBoundary => Self::PeriodicSubdomain,
      other => other,
    }
  }
}

/// One element incident to a face, seen from the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceSide {
  element: ElementIdx,
  local_face: usize,
  element_shape: ReferenceShape,
}

impl FaceSide {
  pub fn element(&self) -> ElementIdx {
    self.element
  }
  pub fn local_face(&self) -> usize {
    self.local_face
  }
  pub fn element_shape(&self) -> ReferenceShape {
    self.element_shape
  }
  /// Embedding of the reference face into the reference element.
  pub fn embedding(&self) -> &'static AffineMap {
    self
      .element_shape
      .subentity_embedding(1, self.local_face)
      .unwrap_or_else(|err| unreachable!("face side was validated: {err}"))
  }
}

/// Geometric half of a mesh face.
///
/// The orientation is the index of the self-mapping of the reference face
/// that takes the face coordinates seen from the left element to the face
/// coordinates seen from the right element. It is determined once, on
/// construction.
#[derive(Debug, Clone)]
pub struct FaceGeometry {
  left: FaceSide,
  right: Option<FaceSide>,
  face_type: FaceType,
  shape: ReferenceShape,
  orientation: usize,
}

fn face_side(elements: &[ElementGeometry], (element, local_face): (ElementIdx, usize)) -> Result<FaceSide> {
  let geometry = elements.get(element).ok_or(GeometryError::IndexOutOfRange {
    what: "element",
    index: element,
    count: elements.len(),
  })?;
  let element_shape = geometry.reference_shape();
  element_shape.subentity(1, local_face)?;
  Ok(FaceSide {
    element,
    local_face,
    element_shape,
  })
}

impl FaceGeometry {
  /// Face coupling two elements, given as `(element, local face)` pairs.
  pub fn new_internal(
    elements: &[ElementGeometry],
    left: (ElementIdx, usize),
    right: (ElementIdx, usize),
    face_type: FaceType,
    config: &GeometryConfig,
  ) -> Result<Self> {
    if !face_type.is_internal() {
      return Err(GeometryError::FaceTypeMismatch {
        face_type,
        has_right: true,
      });
    }
    if left == right {
      return Err(GeometryError::SelfCoupledFace {
        element: left.0,
        local_face: left.1,
      });
    }
    let left = face_side(elements, left)?;
    let right = face_side(elements, right)?;
    if !Arc::ptr_eq(elements[left.element].coords(), elements[right.element].coords()) {
      return Err(GeometryError::ForeignCoordinates {
        left: left.element,
        right: right.element,
      });
    }
    let shape = left.element_shape.subentity_shape(1, left.local_face)?;
    let right_shape = right.element_shape.subentity_shape(1, right.local_face)?;
    if shape != right_shape {
      return Err(GeometryError::FaceShapeMismatch {
        left: shape,
        right: right_shape,
      });
    }

    let left_element = &elements[left.element];
    let left_nodes = left_element.face_nodes(left.local_face)?;
    let right_nodes = elements[right.element].face_nodes(right.local_face)?;

    let conforming = left_nodes.iter().all(|n| right_nodes.contains(n));
    let (orientation, face_type) = if conforming {
      (shape.self_mapping_index(&left_nodes, &right_nodes)?, face_type)
    } else {
      let (matched, kind) = match_face_nodes(
        left_element.coords(),
        &left_nodes,
        &right_nodes,
        config.matching_tolerance,
      )?;
      let face_type = match kind {
        MatchKind::Hanging => {
          tracing::warn!(?left_nodes, ?right_nodes, "non-conforming face");
          face_type
        }
        MatchKind::Periodic { axis } => {
          tracing::warn!(?left_nodes, ?right_nodes, axis, "periodic face matched geometrically");
          face_type.into_periodic()
        }
      };
      (shape.self_mapping_index(&left_nodes, &matched)?, face_type)
    };

    tracing::debug!(
      left = left.element,
      right = right.element,
      %shape,
      orientation,
      "internal face"
    );
    Ok(Self {
      left,
      right: Some(right),
      face_type,
      shape,
      orientation,
    })
  }

  pub fn new_boundary(
    elements: &[ElementGeometry],
    left: (ElementIdx, usize),
    face_type: FaceType,
  ) -> Result<Self> {
    if face_type.is_internal() {
      return Err(GeometryError::FaceTypeMismatch {
        face_type,
        has_right: false,
      });
    }
    let left = face_side(elements, left)?;
    let shape = left.element_shape.subentity_shape(1, left.local_face)?;
    Ok(Self {
      left,
      right: None,
      face_type,
      shape,
      orientation: 0,
    })
  }

  pub fn left(&self) -> FaceSide {
    self.left
  }
  pub fn right(&self) -> Option<FaceSide> {
    self.right
  }
  pub fn has_right(&self) -> bool {
    self.right.is_some()
  }
  pub fn side(&self, side: Side) -> Result<FaceSide> {
    match side {
      Side::Left => Ok(self.left),
      Side::Right => self.right.ok_or(GeometryError::NoRightElement),
    }
  }

  pub fn face_type(&self) -> FaceType {
    self.face_type
  }
  pub fn is_internal(&self) -> bool {
    self.face_type.is_internal()
  }

  /// Always defined, also for boundary faces.
  pub fn reference_shape(&self) -> ReferenceShape {
    self.shape
  }

  /// Index into the self-mappings of the reference face, `0` on the boundary.
  pub fn orientation(&self) -> usize {
    self.orientation
  }
  pub fn orientation_mapping(&self) -> &'static SelfMapping {
    self
      .shape
      .self_mapping(self.orientation)
      .unwrap_or_else(|err| unreachable!("orientation was computed from the table: {err}"))
  }

  /// Face coordinates as seen from the right element.
  pub fn map_ref_face_to_ref_face(&self, p: VectorView) -> Result<Vector> {
    self.side(Side::Right)?;
    Ok(self.orientation_mapping().map().apply_forward(p))
  }

  pub fn map_ref_face_to_ref_elem(&self, side: Side, p: VectorView) -> Result<Vector> {
    let face_side = self.side(side)?;
    let p = match side {
      Side::Left => p.into_owned(),
      Side::Right => self.map_ref_face_to_ref_face(p)?,
    };
    Ok(face_side.embedding().apply_forward(p.as_view()))
  }

  /// [`Self::map_ref_face_to_ref_elem`] as a mapping object.
  pub fn face_to_element_map(&self, side: Side) -> Result<ConcatenatedMap<'static>> {
    let face_side = self.side(side)?;
    let reorientation = match side {
      Side::Left => self.shape.self_mapping(0)?,
      Side::Right => self.orientation_mapping(),
    };
    Ok(ConcatenatedMap::new(reorientation, face_side.embedding()))
  }

  fn element<'e>(&self, elements: &'e [ElementGeometry], side: Side) -> Result<&'e ElementGeometry> {
    let index = self.side(side)?.element;
    elements.get(index).ok_or(GeometryError::IndexOutOfRange {
      what: "element",
      index,
      count: elements.len(),
    })
  }

  /// Physical point of a reference face point, evaluated through the left element.
  pub fn reference_to_physical(&self, elements: &[ElementGeometry], p: VectorView) -> Result<Vector> {
    self.reference_to_physical_via(elements, Side::Left, p)
  }

  pub fn reference_to_physical_via(
    &self,
    elements: &[ElementGeometry],
    side: Side,
    p: VectorView,
  ) -> Result<Vector> {
    let q = self.map_ref_face_to_ref_elem(side, p)?;
    Ok(self.element(elements, side)?.reference_to_physical(q.as_view()))
  }

  /// Derivative of the physical face point with respect to the reference face
  /// coordinates, evaluated through the element on `side`.
  pub fn face_jacobian(&self, elements: &[ElementGeometry], side: Side, p: VectorView) -> Result<Jacobian> {
    let face_side = self.side(side)?;
    let q = self.map_ref_face_to_ref_elem(side, p)?;
    let element = self.element(elements, side)?.jacobian(q.as_view());
    let face = face_side.embedding().jacobian();
    let jacobian = element.compose(&face);
    Ok(match side {
      Side::Left => jacobian,
      Side::Right => jacobian.compose(&self.orientation_mapping().map().jacobian()),
    })
  }

  /// Normal at reference face point `p`, pointing from the left element to
  /// the right element (or out of the domain on the boundary).
  ///
  /// Its length is the ratio of physical to reference face measure.
  pub fn normal_vector(&self, elements: &[ElementGeometry], p: VectorView) -> Result<Vector> {
    self.normal_vector_via(elements, Side::Left, p)
  }

  /// [`Self::normal_vector`] derived from the jacobian of the element on `side`.
  pub fn normal_vector_via(
    &self,
    elements: &[ElementGeometry],
    side: Side,
    p: VectorView,
  ) -> Result<Vector> {
    let face_side = self.side(side)?;
    let element = self.element(elements, side)?;
    let q = self.map_ref_face_to_ref_elem(side, p)?;
    let jacobian = element.jacobian(q.as_view());
    let det = jacobian.determinant();
    let det_sign = Sign::try_from_f64(det).ok_or_else(|| element.invalid_jacobian(det))?;
    let towards_right = match side {
      Side::Left => Sign::Pos,
      Side::Right => Sign::Neg,
    };

    if face_side.element_shape.dim() == 1 {
      // The face is a point, the outward direction is the sign of the
      // reference coordinate.
      let tangent = jacobian.matrix().column(0);
      let scale = q[0] * towards_right.as_f64() / tangent.norm();
      return Ok(tangent * scale);
    }

    let outward = face_side.element_shape.outward_sign(face_side.local_face)?;
    let wedge = jacobian.compose(&face_side.embedding().jacobian()).wedge()?;
    Ok(wedge * (det_sign * outward * towards_right).as_f64())
  }
}
