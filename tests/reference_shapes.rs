use approx::assert_relative_eq;
use dgkernel::{
  combinatorics::nhypercube_faces,
  linalg::Vector,
  mapping::{CoordinateMapping, ReferenceMapping},
  shape::ReferenceShape,
  GeometryError,
};
use indexmap::IndexSet;

#[test]
fn embeddings_reproduce_parent_vertices() {
  for shape in ReferenceShape::ALL {
    for codim in 1..=shape.dim() {
      for index in 0..shape.nsubentities(codim) {
        let entity = shape.subentity(codim, index).unwrap();
        let sub = entity.shape();
        assert_eq!(sub.dim() + codim, shape.dim(), "{shape} codim {codim}");
        assert_eq!(entity.local_indices().len(), sub.nvertices());
        for (ivertex, &iparent) in entity.local_indices().iter().enumerate() {
          let mapped = entity.embedding().apply_forward(sub.vertex(ivertex));
          assert_relative_eq!(mapped, shape.vertex(iparent).into_owned(), epsilon = 1e-14);
        }
      }
    }
  }
}

#[test]
fn face_centers_lie_on_reference_boundary() {
  for shape in ReferenceShape::ALL.into_iter().filter(|s| s.dim() > 0) {
    for face in 0..shape.nfaces() {
      let embedding = shape.subentity_embedding(1, face).unwrap();
      let sub = shape.subentity_shape(1, face).unwrap();
      let center = embedding.apply_forward(sub.center().as_view());
      assert!(shape.is_internal_point(center.as_view()), "{shape} face {face}");
    }
  }
}

#[test]
fn hypercube_subentity_counts() {
  for (shape, dim) in [
    (ReferenceShape::Line, 1),
    (ReferenceShape::Square, 2),
    (ReferenceShape::Cube, 3),
    (ReferenceShape::Hypercube, 4),
  ] {
    for codim in 1..=dim {
      assert_eq!(
        shape.nsubentities(codim),
        nhypercube_faces(dim, dim - codim),
        "{shape} codim {codim}"
      );
    }
  }
}

#[test]
fn self_mappings_permute_vertices() {
  for shape in ReferenceShape::ALL {
    let n = shape.nvertices();
    for mapping in shape.self_mappings() {
      let perm = mapping.permutation();
      let mut images = perm.as_slice().to_vec();
      images.sort_unstable();
      assert_eq!(images, (0..n).collect::<Vec<_>>(), "{shape}");

      for i in 0..n {
        let mapped = mapping.transform(shape.vertex(i));
        assert_relative_eq!(mapped, shape.vertex(perm[i]).into_owned(), epsilon = 1e-13);
      }
      if shape.dim() > 0 {
        let det = mapping.map().jacobian().determinant();
        assert_relative_eq!(det.abs(), 1.0, epsilon = 1e-13);
      }
    }
  }
}

#[test]
fn self_mappings_closed_under_composition() {
  for shape in ReferenceShape::ALL {
    let table: IndexSet<_> = shape.self_mappings().map(|m| m.permutation().clone()).collect();
    assert_eq!(table.len(), shape.nself_mappings(), "{shape}");
    for a in &table {
      for b in &table {
        assert!(table.contains(&a.compose(b)), "{shape}");
      }
      assert!(table.contains(&a.inverse()), "{shape}");
    }
  }
}

#[test]
fn self_mapping_index_recovers_entries() {
  for shape in ReferenceShape::ALL {
    let ordering: Vec<usize> = (0..shape.nvertices()).map(|i| 10 * i + 3).collect();
    for (index, mapping) in shape.self_mappings().enumerate() {
      // Place every vertex at its image.
      let mut second = vec![0; ordering.len()];
      for (i, &node) in ordering.iter().enumerate() {
        second[mapping.permutation()[i]] = node;
      }
      assert_eq!(shape.self_mapping_index(&ordering, &second), Ok(index), "{shape}");
    }
  }
}

#[test]
fn codim_outside_range_is_rejected() {
  assert_eq!(
    ReferenceShape::Triangle.subentity(3, 0).map(|_| ()),
    Err(GeometryError::InvalidCodim {
      shape: ReferenceShape::Triangle,
      codim: 3
    })
  );
  assert!(ReferenceShape::Point.subentity(1, 0).is_err());
  assert_eq!(ReferenceShape::Point.nfaces(), 0);
}

#[test]
fn identity_mapping_has_unit_determinant() {
  for shape in ReferenceShape::ALL.into_iter().filter(|s| s.dim() > 0) {
    let mapping = CoordinateMapping::new(shape, shape.vertices().clone()).unwrap();
    for ivertex in 0..shape.nvertices() {
      let p = (shape.vertex(ivertex) + shape.center()) * 0.5;
      assert_relative_eq!(mapping.determinant(p.as_view()), 1.0, epsilon = 1e-12);
      assert_relative_eq!(mapping.transform(p.as_view()), p, epsilon = 1e-12);
    }
  }
}

#[test]
fn sub_entity_embedding_jacobian_shape() {
  let cube = ReferenceShape::Cube;
  let edge = cube.subentity_embedding(2, 5).unwrap();
  let jacobian = edge.jacobian();
  assert_eq!((jacobian.dim_image(), jacobian.dim_domain()), (3, 1));
  let p = Vector::from_element(1, 0.3);
  assert_relative_eq!(
    ReferenceMapping::jacobian(edge, p.as_view()).into_matrix(),
    jacobian.into_matrix()
  );
}
