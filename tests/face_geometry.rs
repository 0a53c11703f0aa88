use approx::assert_relative_eq;
use dgkernel::{
  dof::Side,
  geometry::{FaceHandle, FaceType, MeshGeometry, NodeCoords},
  linalg::Vector,
  shape::ReferenceShape,
  GeometryError,
};

fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_max_level(tracing::Level::DEBUG)
    .try_init();
}

/// Sample points inside the reference face.
fn face_points(shape: ReferenceShape) -> Vec<Vector> {
  let points: &[&[f64]] = match shape {
    ReferenceShape::Point => &[&[]],
    ReferenceShape::Line => &[&[-0.7], &[0.0], &[0.4]],
    ReferenceShape::Triangle => &[&[0.2, 0.3], &[0.6, 0.1], &[1.0 / 3.0, 1.0 / 3.0]],
    ReferenceShape::Square => &[&[-0.3, 0.7], &[0.5, -0.2], &[0.0, 0.0], &[0.9, 0.9]],
    other => panic!("no sample points for {other}"),
  };
  points.iter().map(|p| Vector::from_column_slice(p)).collect()
}

/// Both sides of an internal face agree on the physical point, the face
/// jacobian and the normal, and the normal points from left to right.
fn assert_sides_agree(face: FaceHandle) {
  let left = face.left_element().center();
  let right = face.right_element().unwrap().center();
  for p in face_points(face.reference_shape()) {
    let x_left = face.reference_to_physical(p.as_view()).unwrap();
    let x_right = face
      .reference_to_physical_via(face.mesh().elements(), Side::Right, p.as_view())
      .unwrap();
    assert_relative_eq!(x_left, x_right, epsilon = 1e-12);

    let j_left = face.face_jacobian(Side::Left, p.as_view()).unwrap();
    let j_right = face.face_jacobian(Side::Right, p.as_view()).unwrap();
    assert_relative_eq!(j_left.matrix(), j_right.matrix(), epsilon = 1e-12);

    let normal = face.normal_vector(p.as_view()).unwrap();
    let via_right = face.normal_vector_via(Side::Right, p.as_view()).unwrap();
    assert_relative_eq!(normal, via_right, epsilon = 1e-12);
    assert!(normal.dot(&(&right - &left)) > 0.0);
  }
}

#[test]
fn squares_with_reversed_numbering() {
  init_logging();
  let coords = NodeCoords::from_column_slice(
    2,
    &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0],
  );
  let mut mesh = MeshGeometry::new(coords);
  let left = mesh.add_element(vec![0, 1, 3, 4]).unwrap();
  let right = mesh.add_element(vec![5, 4, 2, 1]).unwrap();
  let iface = mesh
    .add_internal_face((left, 2), (right, 2), FaceType::Internal)
    .unwrap();
  let face = mesh.face(iface).unwrap();

  assert_eq!(face.reference_shape(), ReferenceShape::Line);
  assert_eq!(face.orientation(), 1);
  assert!(face.orientation_mapping().orientation().is_neg());

  let midpoint = Vector::zeros(1);
  let normal = face.normal_vector(midpoint.as_view()).unwrap();
  assert_relative_eq!(normal, Vector::from_column_slice(&[0.5, 0.0]), epsilon = 1e-14);
  assert_relative_eq!(normal.norm() * ReferenceShape::Line.reference_volume(), 1.0);

  let p = Vector::from_element(1, 0.5);
  assert_relative_eq!(
    face.map_ref_face_to_ref_face(p.as_view()).unwrap(),
    Vector::from_element(1, -0.5)
  );
  assert_relative_eq!(
    face.map_ref_face_to_ref_elem(Side::Right, p.as_view()).unwrap(),
    Vector::from_column_slice(&[1.0, -0.5])
  );
  assert_relative_eq!(
    face.reference_to_physical(p.as_view()).unwrap(),
    Vector::from_column_slice(&[1.0, 0.75])
  );
  assert_sides_agree(face);
}

#[test]
fn face_to_element_map_matches_direct_mapping() {
  use dgkernel::mapping::ReferenceMapping;

  let coords = NodeCoords::from_column_slice(
    2,
    &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0],
  );
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 3, 4]).unwrap();
  mesh.add_element(vec![5, 4, 2, 1]).unwrap();
  mesh.connect_faces(FaceType::Wall).unwrap();
  let face = mesh.faces().find(|f| f.is_internal()).unwrap();

  let p = Vector::from_element(1, 0.25);
  for side in Side::BOTH {
    let map = face.face_to_element_map(side).unwrap();
    assert_eq!((map.dim_domain(), map.dim_image()), (1, 2));
    assert_relative_eq!(
      map.transform(p.as_view()),
      face.map_ref_face_to_ref_elem(side, p.as_view()).unwrap()
    );
  }
}

#[test]
fn boundary_face() {
  let coords = NodeCoords::from_column_slice(2, &[0.0, 0.0, 2.0, 0.0, 0.0, 2.0]);
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 2]).unwrap();
  let iface = mesh.add_boundary_face((0, 0), FaceType::Wall).unwrap();
  let face = mesh.face(iface).unwrap();

  assert!(!face.has_right());
  assert!(face.right_element().is_none());
  assert_eq!(face.reference_shape(), ReferenceShape::Line);
  assert_eq!(face.orientation(), 0);
  assert_eq!(
    face.normal_vector_via(Side::Right, Vector::zeros(1).as_view()),
    Err(GeometryError::NoRightElement)
  );

  // The hypotenuse x + y = 2 has outward normal along (1, 1).
  let element = mesh.element(0).unwrap();
  let hypotenuse = (0..3)
    .find(|&f| !element.face_nodes(f).unwrap().contains(&0))
    .unwrap();
  let iface = mesh.add_boundary_face((0, hypotenuse), FaceType::Open).unwrap();
  let normal = mesh.face(iface).unwrap().normal_vector(Vector::zeros(1).as_view()).unwrap();
  assert_relative_eq!(normal[0], normal[1], epsilon = 1e-14);
  assert!(normal[0] > 0.0);
  // The edge has length 2 * sqrt(2) and the reference line has measure 2.
  assert_relative_eq!(normal.norm(), 2f64.sqrt(), epsilon = 1e-14);
}

#[test]
fn tetrahedra_sharing_a_face() {
  init_logging();
  let coords = NodeCoords::from_column_slice(
    3,
    &[
      0.0, 0.0, 0.0, //
      1.0, 0.0, 0.0, //
      0.0, 1.0, 0.0, //
      0.0, 0.0, 1.0, //
      1.0, 1.0, 1.0, //
    ],
  );
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 2, 3]).unwrap();
  mesh.add_element(vec![4, 1, 3, 2]).unwrap();
  for element in mesh.elements() {
    assert!(element.checked_determinant(Vector::from_element(3, 0.25).as_view()).is_ok());
  }
  mesh.connect_faces(FaceType::Wall).unwrap();
  assert_eq!(mesh.nfaces(), 7);

  let internal: Vec<_> = mesh.faces().filter(|f| f.is_internal()).collect();
  assert_eq!(internal.len(), 1);
  let face = internal[0];
  assert_eq!(face.reference_shape(), ReferenceShape::Triangle);
  let mut nodes = face.nodes();
  nodes.sort_unstable();
  assert_eq!(nodes, vec![1, 2, 3]);
  assert_sides_agree(face);
}

#[test]
fn cubes_with_rotated_numbering() {
  // Nodes of a 3x2x2 grid, numbered x + 3y + 6z.
  let coords: Vec<f64> = (0..12)
    .flat_map(|i| [(i % 3) as f64, ((i / 3) % 2) as f64, (i / 6) as f64])
    .collect();
  let mut mesh = MeshGeometry::new(NodeCoords::from_column_slice(3, &coords));
  mesh.add_element(vec![0, 1, 3, 4, 6, 7, 9, 10]).unwrap();
  // Rotated a quarter turn about the x axis.
  mesh.add_element(vec![4, 5, 10, 11, 1, 2, 7, 8]).unwrap();
  mesh.connect_faces(FaceType::Wall).unwrap();
  assert_eq!(mesh.nfaces(), 11);

  let face = mesh.faces().find(|f| f.is_internal()).unwrap();
  assert_eq!(face.reference_shape(), ReferenceShape::Square);
  assert_ne!(face.orientation(), 0);
  assert_sides_agree(face);

  let normal = face.normal_vector(Vector::zeros(2).as_view()).unwrap();
  // Unit square face, reference square of measure 4.
  assert_relative_eq!(normal, Vector::from_column_slice(&[0.25, 0.0, 0.0]), epsilon = 1e-14);
}

#[test]
fn periodic_face() {
  let coords = NodeCoords::from_column_slice(
    2,
    &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0],
  );
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 3, 4]).unwrap();
  mesh.add_element(vec![1, 2, 4, 5]).unwrap();
  // x = 2 of the second element is identified with x = 0 of the first.
  let iface = mesh
    .add_internal_face((1, 2), (0, 1), FaceType::Internal)
    .unwrap();
  mesh.connect_faces(FaceType::Wall).unwrap();
  assert_eq!(mesh.nfaces(), 6);

  let face = mesh.face(iface).unwrap();
  assert_eq!(face.face_type(), FaceType::Periodic);
  assert!(face.is_internal());
  assert_eq!(face.orientation(), 0);

  let p = Vector::from_element(1, 0.3);
  let x_left = face.reference_to_physical(p.as_view()).unwrap();
  let x_right = face
    .reference_to_physical_via(mesh.elements(), Side::Right, p.as_view())
    .unwrap();
  assert_relative_eq!(x_left - x_right, Vector::from_column_slice(&[2.0, 0.0]), epsilon = 1e-14);
  let normal = face.normal_vector(p.as_view()).unwrap();
  assert_relative_eq!(normal, Vector::from_column_slice(&[0.5, 0.0]), epsilon = 1e-14);
  assert_relative_eq!(
    face.normal_vector_via(Side::Right, p.as_view()).unwrap(),
    normal,
    epsilon = 1e-14
  );
}

#[test]
fn subdomain_face_becomes_periodic_subdomain() {
  let coords = NodeCoords::from_column_slice(2, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 2, 3]).unwrap();
  let iface = mesh
    .add_internal_face((0, 2), (0, 1), FaceType::SubdomainBoundary)
    .unwrap();
  assert_eq!(mesh.face(iface).unwrap().face_type(), FaceType::PeriodicSubdomain);
}

#[test]
fn hanging_node() {
  let coords = NodeCoords::from_column_slice(
    2,
    &[
      0.0, 0.0, // 0
      2.0, 0.0, // 1
      0.0, 2.0, // 2
      2.0, 2.0, // 3
      2.0, 1.0, // 4
      3.0, 0.0, // 5
      3.0, 1.0, // 6
    ],
  );
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 2, 3]).unwrap();
  mesh.add_element(vec![1, 5, 4, 6]).unwrap();
  let iface = mesh
    .add_internal_face((0, 2), (1, 1), FaceType::Internal)
    .unwrap();
  let face = mesh.face(iface).unwrap();
  assert_eq!(face.face_type(), FaceType::Internal);
  assert_eq!(face.orientation(), 0);
}

#[test]
fn unmatched_faces_are_rejected() {
  let coords = NodeCoords::from_column_slice(
    2,
    &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 3.0, 0.5, 4.0, 0.5, 3.0, 2.5, 4.0, 2.5],
  );
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1, 2, 3]).unwrap();
  mesh.add_element(vec![4, 5, 6, 7]).unwrap();
  // Both faces are flat along x but their y ranges differ.
  let err = mesh
    .add_internal_face((0, 1), (1, 2), FaceType::Internal)
    .unwrap_err();
  assert!(matches!(err, GeometryError::FaceMatching { .. }));
  assert_eq!(err.kind(), dgkernel::error::ErrorKind::Configuration);

  let err = mesh
    .add_internal_face((0, 2), (1, 1), FaceType::Wall)
    .unwrap_err();
  assert_eq!(
    err,
    GeometryError::FaceTypeMismatch {
      face_type: FaceType::Wall,
      has_right: true
    }
  );
  assert_eq!(mesh.nfaces(), 0);
}

#[test]
fn triangle_and_square_faces_do_not_match() {
  let coords: Vec<f64> = (0..12)
    .flat_map(|i| [(i % 3) as f64, ((i / 3) % 2) as f64, (i / 6) as f64])
    .collect();
  let mut mesh = MeshGeometry::new(NodeCoords::from_column_slice(3, &coords));
  mesh.add_element(vec![0, 1, 3, 4, 6, 7, 9, 10]).unwrap();
  mesh
    .add_element_with_shape(ReferenceShape::Tetrahedron, vec![1, 2, 4, 7])
    .unwrap();
  let err = mesh
    .add_internal_face((0, 3), (1, 0), FaceType::Internal)
    .unwrap_err();
  assert_eq!(
    err,
    GeometryError::FaceShapeMismatch {
      left: ReferenceShape::Square,
      right: ReferenceShape::Triangle
    }
  );
}

#[test]
fn grid_normals_balance() {
  init_logging();
  // 2x2 unit squares on a 3x3 grid of nodes numbered x + 3y.
  let coords: Vec<f64> = (0..9).flat_map(|i| [(i % 3) as f64, (i / 3) as f64]).collect();
  let mut mesh = MeshGeometry::new(NodeCoords::from_column_slice(2, &coords));
  for j in 0..2 {
    for i in 0..2 {
      let n = i + 3 * j;
      mesh.add_element(vec![n, n + 1, n + 3, n + 4]).unwrap();
    }
  }
  mesh.connect_faces(FaceType::Wall).unwrap();
  assert_eq!(mesh.faces().filter(|f| f.is_internal()).count(), 4);
  assert_eq!(mesh.faces().filter(|f| !f.is_internal()).count(), 8);

  let midpoint = Vector::zeros(1);
  let weight = ReferenceShape::Line.reference_volume();
  let mut boundary_sum = Vector::zeros(2);
  let mut element_sums = vec![Vector::zeros(2); mesh.nelements()];
  for face in mesh.faces() {
    let normal = face.normal_vector(midpoint.as_view()).unwrap() * weight;
    assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-14);
    element_sums[face.left().element()] += &normal;
    match face.right() {
      Some(right) => element_sums[right.element()] -= &normal,
      None => boundary_sum += &normal,
    }
  }
  assert_relative_eq!(boundary_sum, Vector::zeros(2), epsilon = 1e-14);
  for sum in element_sums {
    assert_relative_eq!(sum, Vector::zeros(2), epsilon = 1e-14);
  }
}

#[test]
fn intervals() {
  let coords = NodeCoords::from_column_slice(1, &[0.0, 0.5, 1.5, 3.0]);
  let mut mesh = MeshGeometry::new(coords);
  mesh.add_element(vec![0, 1]).unwrap();
  mesh.add_element(vec![2, 1]).unwrap();
  mesh.add_element(vec![2, 3]).unwrap();
  mesh.connect_faces(FaceType::Open).unwrap();
  assert_eq!(mesh.nfaces(), 4);

  let p = Vector::zeros(0);
  for face in mesh.faces() {
    assert_eq!(face.reference_shape(), ReferenceShape::Point);
    let x = face.reference_to_physical(p.as_view()).unwrap()[0];
    let normal = face.normal_vector(p.as_view()).unwrap();
    let expected = if x == 0.0 { -1.0 } else { 1.0 };
    assert_relative_eq!(normal, Vector::from_element(1, expected));
    if face.has_right() {
      assert_relative_eq!(face.normal_vector_via(Side::Right, p.as_view()).unwrap(), normal);
    }
  }
}
