//! Numbering of the degrees of freedom coupled through a face.
//!
//! The degrees of freedom of the left element come first, followed by those
//! of the right element. Within a side the unknown index varies slowest.

use crate::error::{GeometryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
  Left,
  Right,
}

impl Side {
  pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

  pub fn other(self) -> Self {
    match self {
      Side::Left => Side::Right,
      Side::Right => Side::Left,
    }
  }
  pub fn index(self) -> usize {
    self as usize
  }
}

impl std::fmt::Display for Side {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Side::Left => f.write_str("left"),
      Side::Right => f.write_str("right"),
    }
  }
}

/// Discrete space on one side of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideLayout {
  pub nbasis: usize,
  pub nunknowns: usize,
}

impl SideLayout {
  pub fn new(nbasis: usize, nunknowns: usize) -> Self {
    Self { nbasis, nunknowns }
  }
  pub fn ndofs(&self) -> usize {
    self.nbasis * self.nunknowns
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceIndexing {
  left: SideLayout,
  right: Option<SideLayout>,
}

impl FaceIndexing {
  pub fn internal(left: SideLayout, right: SideLayout) -> Self {
    Self {
      left,
      right: Some(right),
    }
  }
  pub fn boundary(left: SideLayout) -> Self {
    Self { left, right: None }
  }

  pub fn layout(&self, side: Side) -> Result<SideLayout> {
    match side {
      Side::Left => Ok(self.left),
      Side::Right => self.right.ok_or(GeometryError::NoRightElement),
    }
  }

  /// Zero for the missing side of a boundary face.
  pub fn ndofs(&self, side: Side) -> usize {
    self.layout(side).map_or(0, |l| l.ndofs())
  }
  pub fn ndofs_total(&self) -> usize {
    self.ndofs(Side::Left) + self.ndofs(Side::Right)
  }

  pub fn to_linear_index(&self, side: Side, basis: usize, unknown: usize) -> Result<usize> {
    let layout = self.layout(side)?;
    if basis >= layout.nbasis {
      return Err(GeometryError::DofOutOfRange {
        what: "basis function",
        side,
        index: basis,
        bound: layout.nbasis,
      });
    }
    if unknown >= layout.nunknowns {
      return Err(GeometryError::DofOutOfRange {
        what: "unknown",
        side,
        index: unknown,
        bound: layout.nunknowns,
      });
    }
    let offset = match side {
      Side::Left => 0,
      Side::Right => self.ndofs(Side::Left),
    };
    Ok(offset + unknown * layout.nbasis + basis)
  }

  /// Inverse of [`Self::to_linear_index`], as `(side, basis, unknown)`.
  pub fn from_linear_index(&self, index: usize) -> Result<(Side, usize, usize)> {
    let side = self.side_of(index)?;
    let local = match side {
      Side::Left => index,
      Side::Right => index - self.ndofs(Side::Left),
    };
    let nbasis = self.layout(side)?.nbasis;
    Ok((side, local % nbasis, local / nbasis))
  }

  pub fn side_of(&self, index: usize) -> Result<Side> {
    if index < self.ndofs(Side::Left) {
      Ok(Side::Left)
    } else if index < self.ndofs_total() {
      Ok(Side::Right)
    } else {
      Err(GeometryError::IndexOutOfRange {
        what: "face degree of freedom",
        index,
        count: self.ndofs_total(),
      })
    }
  }
}
