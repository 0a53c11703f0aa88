//! Geometric reconciliation of face node lists that do not consist of the
//! same global nodes.
//!
//! If the two lists share at least one node, the face is treated as
//! non-conforming: every unshared right node is replaced by the unused left
//! node lying on the ray from a shared node through it. Otherwise the face is
//! treated as periodic: the coordinate axis along which both faces are flat is
//! projected out and nodes are paired by their remaining coordinates.
//!
//! All comparisons of physical coordinates use the same absolute tolerance.

use super::NodeCoords;
use crate::{
  error::{GeometryError, Result},
  linalg::Vector,
  NodeIdx,
};

use itertools::Itertools as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
  /// Shared nodes plus collinear substitutes.
  Hanging,
  /// Pairing after projecting out the periodic axis.
  Periodic { axis: usize },
}

/// The right node list with every node replaced by the left node it
/// corresponds to.
pub fn match_face_nodes(
  coords: &NodeCoords,
  left: &[NodeIdx],
  right: &[NodeIdx],
  tolerance: f64,
) -> Result<(Vec<NodeIdx>, MatchKind)> {
  if left.len() != right.len() || left.is_empty() {
    return Err(matching_error(left, right, "faces have different numbers of nodes"));
  }
  if left.iter().any(|n| right.contains(n)) {
    match_hanging_nodes(coords, left, right, tolerance).map(|m| (m, MatchKind::Hanging))
  } else {
    match_periodic_nodes(coords, left, right, tolerance)
      .map(|(m, axis)| (m, MatchKind::Periodic { axis }))
  }
}

pub fn match_hanging_nodes(
  coords: &NodeCoords,
  left: &[NodeIdx],
  right: &[NodeIdx],
  tolerance: f64,
) -> Result<Vec<NodeIdx>> {
  let shared: Vec<NodeIdx> = left.iter().copied().filter(|n| right.contains(n)).collect();
  let mut unused: Vec<NodeIdx> = left.iter().copied().filter(|n| !right.contains(n)).collect();

  let mut matched = right.to_vec();
  for slot in matched.iter_mut().filter(|n| !shared.contains(&**n)) {
    let x = coords.coord(*slot);
    let found = shared
      .iter()
      .cartesian_product(unused.iter().enumerate())
      .find(|&(&anchor, (_, &candidate))| {
        let origin = coords.coord(anchor);
        is_on_ray(&(x - origin), &(coords.coord(candidate) - origin), tolerance)
      })
      .map(|(_, (i, &candidate))| (i, candidate));
    let Some((i, candidate)) = found else {
      return Err(matching_error(
        left,
        right,
        &format!("node {} is not collinear with any shared and unshared left node", slot),
      ));
    };
    *slot = candidate;
    unused.remove(i);
  }
  Ok(matched)
}

/// Whether `point` lies on the open ray spanned by `direction`.
fn is_on_ray(point: &Vector, direction: &Vector, tolerance: f64) -> bool {
  let len2 = direction.norm_squared();
  if len2 <= tolerance * tolerance {
    return false;
  }
  let t = point.dot(direction) / len2;
  t > 0.0 && (point - t * direction).norm() <= tolerance
}

/// Matched right list and the periodic axis.
pub fn match_periodic_nodes(
  coords: &NodeCoords,
  left: &[NodeIdx],
  right: &[NodeIdx],
  tolerance: f64,
) -> Result<(Vec<NodeIdx>, usize)> {
  let flat_axes = |nodes: &[NodeIdx]| -> Vec<usize> {
    (0..coords.dim())
      .filter(|&a| {
        let first = coords.coord(nodes[0])[a];
        nodes.iter().all(|&n| (coords.coord(n)[a] - first).abs() <= tolerance)
      })
      .collect()
  };
  let right_axes = flat_axes(right);
  let candidates: Vec<usize> = flat_axes(left)
    .into_iter()
    .filter(|a| right_axes.contains(a))
    .collect();
  if candidates.len() != 1 {
    return Err(GeometryError::PeriodicDirection {
      left: left.to_vec(),
      right: right.to_vec(),
      candidates,
    });
  }
  let axis = candidates[0];

  let coincide = |a: NodeIdx, b: NodeIdx| {
    let (xa, xb) = (coords.coord(a), coords.coord(b));
    (0..coords.dim())
      .filter(|&d| d != axis)
      .all(|d| (xa[d] - xb[d]).abs() <= tolerance)
  };

  let mut matched = Vec::with_capacity(right.len());
  for &r in right {
    let partners: Vec<NodeIdx> = left.iter().copied().filter(|&l| coincide(l, r)).collect();
    match partners.as_slice() {
      [l] if !matched.contains(l) => matched.push(*l),
      [l] => {
        return Err(matching_error(
          left,
          right,
          &format!("left node {l} is the partner of several right nodes"),
        ))
      }
      [] => {
        return Err(matching_error(
          left,
          right,
          &format!("right node {r} has no periodic partner along axis {axis}"),
        ))
      }
      _ => {
        return Err(matching_error(
          left,
          right,
          &format!("right node {r} has several periodic partners {partners:?}"),
        ))
      }
    }
  }
  Ok((matched, axis))
}

fn matching_error(left: &[NodeIdx], right: &[NodeIdx], reason: &str) -> GeometryError {
  GeometryError::FaceMatching {
    left: left.to_vec(),
    right: right.to_vec(),
    reason: reason.to_string(),
  }
}
