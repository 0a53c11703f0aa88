use crate::{dof::Side, geometry::FaceType, shape::ReferenceShape, Codim, Dim, NodeIdx};

pub type Result<T, E = GeometryError> = std::result::Result<T, E>;

/// Coarse classification of a [`GeometryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// Malformed input, detected while constructing a geometric entity.
  Configuration,
  /// An index outside of the valid range of a query.
  Range,
  /// A degenerate or inverted cell.
  Numerical,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
  #[error("{shape} requires {expected} vertices, but {found} were given")]
  WrongVertexCount {
    shape: ReferenceShape,
    expected: usize,
    found: usize,
  },
  #[error("there is no reference shape of dimension {dim} with {nvertices} vertices")]
  UnknownShape { dim: Dim, nvertices: usize },
  #[error("node {node} is not contained in the coordinate store of {nnodes} nodes")]
  NodeOutOfRange { node: NodeIdx, nnodes: usize },
  #[error("node {node} appears more than once in element {nodes:?}")]
  DuplicateNode { node: NodeIdx, nodes: Vec<NodeIdx> },
  #[error("{shape} needs coordinates of dimension at least {required}, but the store has dimension {found}")]
  CoordinateDimension {
    shape: ReferenceShape,
    required: Dim,
    found: Dim,
  },
  #[error("orderings {first:?} and {second:?} of a {shape} are not permutations of each other")]
  NotAPermutation {
    shape: ReferenceShape,
    first: Vec<usize>,
    second: Vec<usize>,
  },
  #[error("{shape} has no self-mapping taking {first:?} to {second:?}")]
  NoSelfMapping {
    shape: ReferenceShape,
    first: Vec<usize>,
    second: Vec<usize>,
  },
  #[error("face type {face_type:?} is inconsistent with a right element being present: {has_right}")]
  FaceTypeMismatch { face_type: FaceType, has_right: bool },
  #[error("left face is a {left} but right face is a {right}")]
  FaceShapeMismatch {
    left: ReferenceShape,
    right: ReferenceShape,
  },
  #[error("cannot match face nodes {left:?} and {right:?}: {reason}")]
  FaceMatching {
    left: Vec<NodeIdx>,
    right: Vec<NodeIdx>,
    reason: String,
  },
  #[error("no single periodic direction for face nodes {left:?} and {right:?} (candidates {candidates:?})")]
  PeriodicDirection {
    left: Vec<NodeIdx>,
    right: Vec<NodeIdx>,
    candidates: Vec<usize>,
  },
  #[error("face with nodes {nodes:?} is shared by {count} elements")]
  NonManifoldFace { nodes: Vec<NodeIdx>, count: usize },
  #[error("local face {local_face} of element {element} cannot be coupled to itself")]
  SelfCoupledFace { element: usize, local_face: usize },
  #[error("elements {left} and {right} do not share a coordinate store")]
  ForeignCoordinates { left: usize, right: usize },

  #[error("{shape} has no sub-entities of codimension {codim}")]
  InvalidCodim { shape: ReferenceShape, codim: Codim },
  #[error("{shape} has {count} sub-entities of codimension {codim}, index {index} is out of range")]
  SubEntityOutOfRange {
    shape: ReferenceShape,
    codim: Codim,
    index: usize,
    count: usize,
  },
  #[error("{shape} has {count} self-mappings, index {index} is out of range")]
  SelfMappingOutOfRange {
    shape: ReferenceShape,
    index: usize,
    count: usize,
  },
  #[error("{what} index {index} is out of range for the {side} side (bound {bound})")]
  DofOutOfRange {
    what: &'static str,
    side: Side,
    index: usize,
    bound: usize,
  },
  #[error("boundary face has no right element")]
  NoRightElement,
  #[error("block ({row_side}, {col_side}) must be {expected_rows}x{expected_cols}, got {rows}x{cols}")]
  BlockShapeMismatch {
    row_side: Side,
    col_side: Side,
    expected_rows: usize,
    expected_cols: usize,
    rows: usize,
    cols: usize,
  },
  #[error("{what} {index} is out of range ({count} available)")]
  IndexOutOfRange {
    what: &'static str,
    index: usize,
    count: usize,
  },
  #[error("point has dimension {found}, expected {expected}")]
  PointDimension { expected: Dim, found: Dim },

  #[error("invalid jacobian determinant {det} for {shape} with nodes {nodes:?}")]
  InvalidJacobian {
    shape: ReferenceShape,
    nodes: Vec<NodeIdx>,
    det: f64,
  },
  #[error("wedge product needs a D x (D-1) matrix, got {rows}x{cols}")]
  WedgeShape { rows: usize, cols: usize },
  #[error("inverse transform did not converge in {iterations} iterations (residual {residual})")]
  InverseNotConverged { iterations: usize, residual: f64 },
}

impl GeometryError {
  pub fn kind(&self) -> ErrorKind {
    use GeometryError as E;
    match self {
      E::WrongVertexCount { .. }
      | E::UnknownShape { .. }
      | E::NodeOutOfRange { .. }
      | E::DuplicateNode { .. }
      | E::CoordinateDimension { .. }
      | E::NotAPermutation { .. }
      | E::NoSelfMapping { .. }
      | E::FaceTypeMismatch { .. }
      | E::FaceShapeMismatch { .. }
      | E::FaceMatching { .. }
      | E::PeriodicDirection { .. }
      | E::NonManifoldFace { .. }
      | E::SelfCoupledFace { .. }
      | E::ForeignCoordinates { .. } => ErrorKind::Configuration,
      E::InvalidCodim { .. }
      | E::SubEntityOutOfRange { .. }
      | E::SelfMappingOutOfRange { .. }
      | E::DofOutOfRange { .. }
      | E::NoRightElement
      | E::BlockShapeMismatch { .. }
      | E::IndexOutOfRange { .. }
      | E::PointDimension { .. } => ErrorKind::Range,
      E::InvalidJacobian { .. } | E::WedgeShape { .. } | E::InverseNotConverged { .. } => {
        ErrorKind::Numerical
      }
    }
  }
}
