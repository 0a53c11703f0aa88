use super::{topology, ReferenceShape};
use crate::{
  combinatorics::{Permutation, Sign},
  linalg::{wedge, Matrix, Vector},
  mapping::{AffineMap, SelfMapping},
};

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// A sub-entity of a reference shape together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct SubEntity {
  shape: ReferenceShape,
  local_indices: Vec<usize>,
  embedding: AffineMap,
}

impl SubEntity {
  pub fn shape(&self) -> ReferenceShape {
    self.shape
  }
  /// Parent-local vertices in the order of the sub-entity's own reference vertices.
  pub fn local_indices(&self) -> &[usize] {
    &self.local_indices
  }
  /// Map from the reference domain of the sub-entity into the reference domain of the parent.
  pub fn embedding(&self) -> &AffineMap {
    &self.embedding
  }
}

pub(super) struct ShapeData {
  pub vertices: Matrix,
  pub center: Vector,
  /// Indexed by `codim - 1`.
  pub subentities: Vec<Vec<SubEntity>>,
  pub self_mappings: IndexMap<Permutation, SelfMapping>,
  pub outward_signs: Vec<Sign>,
}

static CATALOG: Lazy<Vec<ShapeData>> = Lazy::new(|| {
  tracing::debug!("building reference shape catalog");
  ReferenceShape::ALL.map(ShapeData::build).into()
});

pub(super) fn data(shape: ReferenceShape) -> &'static ShapeData {
  &CATALOG[shape as usize]
}

/// Affine map taking the reference vertices of `shape` onto the columns of
/// `targets` selected by `images`.
fn frame_map(shape: ReferenceShape, targets: &Matrix, images: impl Fn(usize) -> usize) -> AffineMap {
  let frame = topology::affine_frame(shape);
  let domain = topology::reference_vertices(shape).select_columns(frame);
  let image_idxs: Vec<_> = frame.iter().map(|&f| images(f)).collect();
  let image = targets.select_columns(&image_idxs);
  AffineMap::from_frames(&domain, &image).expect("reference frames are affinely independent")
}

impl ShapeData {
  fn build(shape: ReferenceShape) -> Self {
    let dim = shape.dim();
    let vertices = topology::reference_vertices(shape);
    let center = topology::reference_center(shape);

    let subentities: Vec<Vec<SubEntity>> = (1..=dim)
      .map(|codim| {
        topology::subentity_vertices(shape, codim)
          .into_iter()
          .map(|local_indices| {
            let sub = ReferenceShape::from_vertex_count(dim - codim, local_indices.len())
              .expect("sub-entity tables only contain known shapes");
            let embedding = frame_map(sub, &vertices, |f| local_indices[f]);
            SubEntity {
              shape: sub,
              local_indices,
              embedding,
            }
          })
          .collect()
      })
      .collect();

    let self_mappings = topology::self_mapping_permutations(shape)
      .into_iter()
      .map(|perm| {
        let map = frame_map(shape, &vertices, |f| perm[f]);
        (perm.clone(), SelfMapping::new(perm, map))
      })
      .collect();

    let outward_signs = subentities
      .first()
      .map(|faces| {
        faces
          .iter()
          .map(|face| outward_sign(face, &center))
          .collect()
      })
      .unwrap_or_default();

    Self {
      vertices,
      center,
      subentities,
      self_mappings,
      outward_signs,
    }
  }
}

/// Sign turning the wedge of the face embedding into the outward normal.
fn outward_sign(face: &SubEntity, center: &Vector) -> Sign {
  let face_center = topology::reference_center(face.shape);
  let direction = face.embedding.apply_forward(face_center.as_view()) - center;
  let normal = wedge(face.embedding.linear()).expect("face embeddings have codimension one");
  Sign::try_from_f64(normal.dot(&direction)).expect("faces do not contain the center")
}
