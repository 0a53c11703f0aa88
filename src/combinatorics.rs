//! Vertex permutations and their parity.

mod permutation;
mod sign;

pub use permutation::*;
pub use sign::*;

pub use num_integer::binomial;

/// Number of `k`-dimensional faces of the `d`-dimensional hypercube.
pub fn nhypercube_faces(d: usize, k: usize) -> usize {
  binomial(d, k) * (1 << (d - k))
}
