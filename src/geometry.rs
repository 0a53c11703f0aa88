//! Physical geometry of elements and faces.
//!
//! Elements own the mapping from their reference shape into physical space.
//! Faces know which elements they separate and how the reference face is seen
//! from either side, which is all that is needed for normals and for mapping
//! face quadrature points into both neighbours.

mod coords;
mod element;
mod face;
pub mod matching;
mod mesh;

pub use coords::NodeCoords;
pub use element::ElementGeometry;
pub use face::{FaceGeometry, FaceSide, FaceType};
pub use mesh::{ElementIdx, FaceHandle, FaceIdx, MeshGeometry};
