use super::{sort_signed, Sign};

pub fn factorial(num: usize) -> usize {
  (1..=num).product()
}

/// A bijection of `{0, ..., n-1}` onto itself, stored as its image list.
///
/// Vertex `i` is sent to vertex `self[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permutation(Vec<usize>);

impl Permutation {
  pub fn identity(n: usize) -> Self {
    Self((0..n).collect())
  }

  /// `None` if `images` is not a permutation of `0..images.len()`.
  pub fn try_new(images: Vec<usize>) -> Option<Self> {
    let n = images.len();
    let mut seen = vec![false; n];
    for &i in &images {
      if i >= n || std::mem::replace(&mut seen[i], true) {
        return None;
      }
    }
    Some(Self(images))
  }

  /// The permutation sending position `i` of `from` to the position of the
  /// same entry in `to`.
  ///
  /// `None` if the two sequences are not reorderings of the same distinct entries.
  pub fn from_orderings<T: PartialEq>(from: &[T], to: &[T]) -> Option<Self> {
    if from.len() != to.len() {
      return None;
    }
    let images = from
      .iter()
      .map(|a| to.iter().position(|b| a == b))
      .collect::<Option<Vec<_>>>()?;
    Self::try_new(images)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  pub fn apply(&self, i: usize) -> usize {
    self.0[i]
  }
  pub fn as_slice(&self) -> &[usize] {
    &self.0
  }
  pub fn into_vec(self) -> Vec<usize> {
    self.0
  }

  pub fn is_identity(&self) -> bool {
    self.0.iter().enumerate().all(|(i, &p)| i == p)
  }

  /// `self` after `first`.
  pub fn compose(&self, first: &Self) -> Self {
    assert_eq!(self.len(), first.len(), "Permutation lengths differ.");
    Self(first.0.iter().map(|&i| self.0[i]).collect())
  }

  pub fn inverse(&self) -> Self {
    let mut inv = vec![0; self.len()];
    for (i, &p) in self.0.iter().enumerate() {
      inv[p] = i;
    }
    Self(inv)
  }

  pub fn sign(&self) -> Sign {
    let mut images = self.0.clone();
    sort_signed(&mut images)
  }

  /// Reorders `items` such that `items[i]` ends up at position `self[i]`.
  pub fn permute<T: Clone>(&self, items: &[T]) -> Vec<T> {
    let inv = self.inverse();
    inv.0.iter().map(|&i| items[i].clone()).collect()
  }
}

impl std::ops::Index<usize> for Permutation {
  type Output = usize;
  fn index(&self, index: usize) -> &Self::Output {
    &self.0[index]
  }
}

/// Iterator of alternating permutations.
///
/// Iterator implementation of the Steinhaus–Johnson–Trotter algorithm.
/// This iterator produces all permutations of a `Vec<T>`, where two consecutive
/// permutations differ only by a single swap of two adjacent elements. This
/// property ensures that the parity (even/odd) of the permutations alternate.
/// The first item is the input itself.
pub struct AlternatingPermutations<T: Clone> {
  vec: Vec<T>,
  idxs: Vec<usize>,
  dirs: Vec<Sign>,
  first: bool,
}

impl<T: Clone> AlternatingPermutations<T> {
  pub fn new(vec: Vec<T>) -> Self {
    let n = vec.len();
    Self {
      vec,
      idxs: (0..n).collect(),
      dirs: vec![Sign::Neg; n],
      first: true,
    }
  }
}

impl<T: Clone> Iterator for AlternatingPermutations<T> {
  type Item = Vec<T>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.first {
      self.first = false;
      return Some(self.vec.clone());
    }

    let n = self.vec.len();
    let is_mobile = |i: usize| match self.dirs[i] {
      Sign::Neg => 0 < i && self.idxs[i - 1] < self.idxs[i],
      Sign::Pos => i + 1 < n && self.idxs[i] > self.idxs[i + 1],
    };
    let imobile = (0..n)
      .filter(|&i| is_mobile(i))
      .max_by_key(|&i| self.idxs[i])?;

    let iswap = match self.dirs[imobile] {
      Sign::Neg => imobile - 1,
      Sign::Pos => imobile + 1,
    };
    self.idxs.swap(imobile, iswap);
    self.dirs.swap(imobile, iswap);

    let moved = self.idxs[iswap];
    for i in 0..n {
      if self.idxs[i] > moved {
        self.dirs[i] = -self.dirs[i];
      }
    }

    Some(self.idxs.iter().map(|&i| self.vec[i].clone()).collect())
  }
}

#[cfg(test)]
mod test {
  use super::{factorial, AlternatingPermutations, Permutation};
  use crate::combinatorics::{sort_count_swaps, Sign};

  #[test]
  fn permutations_and_sort() {
    for n in 0..5 {
      let vec: Vec<_> = (0..n).collect();
      let pers = AlternatingPermutations::new(vec.clone());
      let mut max_nswaps = 0;
      let mut count = 0;
      for (i, p) in pers.enumerate() {
        let mut sorted = p.clone();
        let nswaps = sort_count_swaps(&mut sorted);
        max_nswaps = max_nswaps.max(nswaps);
        count += 1;

        // must be sorted
        assert_eq!(vec, sorted);
        // permutation parity must alternate
        assert_eq!(Sign::from_parity(i), Sign::from_parity(nswaps));
      }
      assert_eq!(count, factorial(n));

      if n > 0 {
        assert_eq!(max_nswaps, n * (n - 1) / 2);
      } else {
        assert_eq!(max_nswaps, 0);
      }
    }
  }

  #[test]
  fn orderings() {
    let p = Permutation::from_orderings(&[7, 3, 5], &[5, 7, 3]).unwrap();
    assert_eq!(p.as_slice(), &[1, 2, 0]);
    assert_eq!(p.permute(&[7, 3, 5]), vec![5, 7, 3]);
    assert!(Permutation::from_orderings(&[1, 2], &[2, 3]).is_none());
    assert!(Permutation::from_orderings(&[1, 1], &[1, 1]).is_none());
    assert!(Permutation::from_orderings(&[1, 2], &[1, 2, 3]).is_none());
  }

  #[test]
  fn group_operations() {
    let a = Permutation::try_new(vec![1, 2, 0, 3]).unwrap();
    let b = Permutation::try_new(vec![0, 1, 3, 2]).unwrap();
    assert!(a.compose(&a.inverse()).is_identity());
    assert_eq!(a.sign(), Sign::Pos);
    assert_eq!(b.sign(), Sign::Neg);
    assert_eq!(a.compose(&b).sign(), Sign::Neg);
    assert_eq!(a.compose(&b).apply(2), a[b[2]]);
    assert!(Permutation::try_new(vec![0, 0]).is_none());
  }
}
