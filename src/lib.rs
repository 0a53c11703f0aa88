//! Geometric and topological kernel for discontinuous Galerkin finite elements.
//!
//! Reference shapes with their sub-entities and symmetries, mappings from
//! reference to physical space, element and face geometry with normals and
//! orientation resolution, and the face-local degree of freedom layout.

extern crate nalgebra as na;

pub mod combinatorics;
pub mod config;
pub mod dof;
pub mod error;
pub mod face_matrix;
pub mod geometry;
pub mod jacobian;
pub mod linalg;
pub mod mapping;
pub mod shape;

pub use error::{GeometryError, Result};

pub type Dim = usize;
pub type Codim = usize;

/// Global node number.
pub type NodeIdx = usize;
