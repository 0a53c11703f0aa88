use super::{ElementGeometry, FaceGeometry, FaceType, NodeCoords};
use crate::{
  config::GeometryConfig,
  dof::Side,
  error::{GeometryError, Result},
  jacobian::Jacobian,
  linalg::{Vector, VectorView},
  shape::ReferenceShape,
  NodeIdx,
};

use indexmap::{IndexMap, IndexSet};
use std::{ops::Deref, sync::Arc};

pub type ElementIdx = usize;
pub type FaceIdx = usize;

/// Element and face geometries sharing one coordinate store.
///
/// Faces refer to their elements by index into this arena.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
  coords: Arc<NodeCoords>,
  elements: Vec<ElementGeometry>,
  faces: Vec<FaceGeometry>,
  config: GeometryConfig,
}

impl MeshGeometry {
  pub fn new(coords: NodeCoords) -> Self {
    Self::with_config(coords, GeometryConfig::default())
  }
  pub fn with_config(coords: NodeCoords, config: GeometryConfig) -> Self {
    Self {
      coords: Arc::new(coords),
      elements: Vec::new(),
      faces: Vec::new(),
      config,
    }
  }

  pub fn coords(&self) -> &Arc<NodeCoords> {
    &self.coords
  }
  pub fn config(&self) -> &GeometryConfig {
    &self.config
  }
  pub fn dim(&self) -> usize {
    self.coords.dim()
  }

  pub fn elements(&self) -> &[ElementGeometry] {
    &self.elements
  }
  pub fn nelements(&self) -> usize {
    self.elements.len()
  }
  pub fn element(&self, ielement: ElementIdx) -> Result<&ElementGeometry> {
    self.elements.get(ielement).ok_or(GeometryError::IndexOutOfRange {
      what: "element",
      index: ielement,
      count: self.elements.len(),
    })
  }

  pub fn nfaces(&self) -> usize {
    self.faces.len()
  }
  pub fn face(&self, iface: FaceIdx) -> Result<FaceHandle<'_>> {
    if iface < self.faces.len() {
      Ok(FaceHandle { mesh: self, iface })
    } else {
      Err(GeometryError::IndexOutOfRange {
        what: "face",
        index: iface,
        count: self.faces.len(),
      })
    }
  }
  pub fn faces(&self) -> impl ExactSizeIterator<Item = FaceHandle<'_>> {
    (0..self.faces.len()).map(move |iface| FaceHandle { mesh: self, iface })
  }

  /// Element with its shape detected from the number of nodes.
  pub fn add_element(&mut self, nodes: Vec<NodeIdx>) -> Result<ElementIdx> {
    let element = ElementGeometry::new(nodes, self.coords.clone())?;
    self.elements.push(element);
    Ok(self.elements.len() - 1)
  }

  pub fn add_element_with_shape(&mut self, shape: ReferenceShape, nodes: Vec<NodeIdx>) -> Result<ElementIdx> {
    let element = ElementGeometry::with_shape(shape, nodes, self.coords.clone())?;
    self.elements.push(element);
    Ok(self.elements.len() - 1)
  }

  /// Face between local face `left.1` of element `left.0` and local face
  /// `right.1` of element `right.0`.
  pub fn add_internal_face(
    &mut self,
    left: (ElementIdx, usize),
    right: (ElementIdx, usize),
    face_type: FaceType,
  ) -> Result<FaceIdx> {
    let face = FaceGeometry::new_internal(&self.elements, left, right, face_type, &self.config)?;
    self.faces.push(face);
    Ok(self.faces.len() - 1)
  }

  pub fn add_boundary_face(&mut self, left: (ElementIdx, usize), face_type: FaceType) -> Result<FaceIdx> {
    let face = FaceGeometry::new_boundary(&self.elements, left, face_type)?;
    self.faces.push(face);
    Ok(self.faces.len() - 1)
  }

  /// Creates the faces of all element faces not yet covered by a face.
  ///
  /// Element faces with the same set of global nodes become an internal face,
  /// the first element encountered being the left one. Unmatched element faces
  /// become boundary faces of type `boundary`. On error no face is added.
  pub fn connect_faces(&mut self, boundary: FaceType) -> Result<()> {
    let covered: IndexSet<(ElementIdx, usize)> = self
      .faces
      .iter()
      .flat_map(|f| std::iter::once(f.left()).chain(f.right()))
      .map(|s| (s.element(), s.local_face()))
      .collect();

    let mut incidences: IndexMap<Vec<NodeIdx>, Vec<(ElementIdx, usize)>> = IndexMap::new();
    for (ielement, element) in self.elements.iter().enumerate() {
      for iface in 0..element.nfaces() {
        if covered.contains(&(ielement, iface)) {
          continue;
        }
        let mut key = element.face_nodes(iface)?;
        key.sort_unstable();
        incidences.entry(key).or_default().push((ielement, iface));
      }
    }

    let (mut ninternal, mut nboundary) = (0, 0);
    let mut faces = Vec::with_capacity(incidences.len());
    for (nodes, sides) in incidences {
      let face = match sides.as_slice() {
        &[left] => {
          nboundary += 1;
          FaceGeometry::new_boundary(&self.elements, left, boundary)?
        }
        &[left, right] => {
          ninternal += 1;
          FaceGeometry::new_internal(&self.elements, left, right, FaceType::Internal, &self.config)?
        }
        _ => {
          return Err(GeometryError::NonManifoldFace {
            nodes,
            count: sides.len(),
          })
        }
      };
      faces.push(face);
    }
    self.faces.extend(faces);
    tracing::info!(
      nelements = self.elements.len(),
      ninternal,
      nboundary,
      "connected faces"
    );
    Ok(())
  }
}

/// Fat pointer to a face of a [`MeshGeometry`].
///
/// Dereferences to the [`FaceGeometry`] and supplies the elements to its
/// geometric operations.
#[derive(Clone, Copy)]
pub struct FaceHandle<'m> {
  mesh: &'m MeshGeometry,
  iface: FaceIdx,
}

impl Deref for FaceHandle<'_> {
  type Target = FaceGeometry;

  fn deref(&self) -> &Self::Target {
    &self.mesh.faces[self.iface]
  }
}

impl<'m> FaceHandle<'m> {
  pub fn index(&self) -> FaceIdx {
    self.iface
  }
  pub fn mesh(&self) -> &'m MeshGeometry {
    self.mesh
  }

  pub fn element(&self, side: Side) -> Result<&'m ElementGeometry> {
    let side = self.side(side)?;
    self.mesh.element(side.element())
  }
  pub fn left_element(&self) -> &'m ElementGeometry {
    &self.mesh.elements[self.left().element()]
  }
  pub fn right_element(&self) -> Option<&'m ElementGeometry> {
    self.right().map(|s| &self.mesh.elements[s.element()])
  }

  /// Global nodes of the face, ordered as seen from the left element.
  pub fn nodes(&self) -> Vec<NodeIdx> {
    self
      .left_element()
      .face_nodes(self.left().local_face())
      .unwrap_or_else(|err| unreachable!("face refers to a valid element face: {err}"))
  }

  pub fn reference_to_physical(&self, p: VectorView) -> Result<Vector> {
    self.deref().reference_to_physical(&self.mesh.elements, p)
  }
  pub fn face_jacobian(&self, side: Side, p: VectorView) -> Result<Jacobian> {
    self.deref().face_jacobian(&self.mesh.elements, side, p)
  }
  pub fn normal_vector(&self, p: VectorView) -> Result<Vector> {
    self.deref().normal_vector(&self.mesh.elements, p)
  }
  pub fn normal_vector_via(&self, side: Side, p: VectorView) -> Result<Vector> {
    self.deref().normal_vector_via(&self.mesh.elements, side, p)
  }
}

impl std::fmt::Debug for FaceHandle<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FaceHandle")
      .field("iface", &self.iface)
      .field("face", self.deref())
      .finish()
  }
}
