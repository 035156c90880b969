use crate::{Axis, Direction, Octant};

/// The deepest level a tree may be partitioned to.
///
/// Three location codes of `MAX_LEVEL` meaningful bits each interleave into the 60 low bits of a
/// [LocCode::morton] key.
pub const MAX_LEVEL: u32 = 20;

/// Per-axis location codes of a node, along with its depth.
///
/// Bit `d` of an axis code (for `d` in `1..=level`) records whether the ancestor at depth `d` took
/// the upper half of its parent along that axis. Bit 0 belongs to the root and is always 0, so the
/// root is `LocCode { axes: [0; 3], level: 0 }`.
///
/// # Example
/// A node at level 3 whose X path is lower, upper, upper has X bits `d1 = 0, d2 = 1, d3 = 1`, so
/// `axes[0] == 0b1100`. Read from the root down, those bits are the binary digits of its cell
/// index: `0b011 == 3`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocCode {
    pub axes: [u32; 3],
    pub level: u32,
}

impl LocCode {
    pub const ROOT: Self = Self {
        axes: [0; 3],
        level: 0,
    };

    /// The code of the `oct`th child of the node with this code.
    #[inline]
    pub fn child(&self, oct: Octant) -> Self {
        let level = self.level + 1;
        let mut axes = self.axes;
        for axis in Axis::ALL {
            if oct.upper(axis) {
                axes[axis.index()] |= 1 << level;
            }
        }
        Self { axes, level }
    }

    /// The octant taken by the ancestor at `depth` (or by `self`, if `depth == self.level`).
    ///
    /// `depth` must be in `1..=self.level`.
    #[inline]
    pub fn octant_at(&self, depth: u32) -> Octant {
        let bit = |a: usize| (self.axes[a] >> depth) & 1 == 1;
        Octant::new(bit(0), bit(1), bit(2))
    }

    /// The code of this node's ancestor at `level`, or `self` if `level >= self.level`.
    pub fn ancestor(&self, level: u32) -> Self {
        if level >= self.level {
            return *self;
        }
        let mask = (2u32 << level) - 1;
        Self {
            axes: self.axes.map(|a| a & mask),
            level,
        }
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.ancestor(self.level) == *self
    }

    /// Index of this node's cell along `axis`, on the regular grid of `2^level` cells per side.
    #[inline]
    pub fn cell_index(&self, axis: Axis) -> u32 {
        cell_index(self.axes[axis.index()], self.level)
    }

    /// Inverse of [Self::cell_index].
    ///
    /// # Panics
    /// * `level > MAX_LEVEL`
    /// * any index ∉ `0..2^level`
    pub fn from_cell(cell: [u32; 3], level: u32) -> Self {
        assert!(level <= MAX_LEVEL);
        Self {
            axes: cell.map(|c| {
                assert!(c >> level == 0, "cell index {c} out of range at level {level}");
                (1..=level).fold(0, |acc, d| acc | (((c >> (level - d)) & 1) << d))
            }),
            level,
        }
    }

    #[inline]
    pub fn is_on_top_boundary(&self, axis: Axis) -> bool {
        is_on_top_boundary(self.axes[axis.index()], self.level)
    }

    #[inline]
    pub fn is_on_bottom_boundary(&self, axis: Axis) -> bool {
        is_on_bottom_boundary(self.axes[axis.index()], self.level)
    }

    /// Whether this node touches the outside of the root along any axis.
    pub fn is_on_domain_boundary(&self) -> bool {
        Axis::ALL
            .into_iter()
            .any(|a| self.is_on_top_boundary(a) || self.is_on_bottom_boundary(a))
    }

    /// The code of the same-level node adjacent to `self` across the face in `dir`, or `None` if
    /// `self` lies on the root's boundary in that direction.
    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        let a = dir.axis().index();
        let code = neighbor_code(self.axes[a], self.level, dir.is_positive())?;
        let mut axes = self.axes;
        axes[a] = code;
        Some(Self {
            axes,
            level: self.level,
        })
    }

    /// Interleave the path of octants from the root down into one key.
    ///
    /// The octant taken at depth `d` occupies bits `3 * (MAX_LEVEL - d)..3 * (MAX_LEVEL - d + 1)`,
    /// so sorting by `(morton, level)` yields a pre-order traversal with children in [Octant]
    /// order.
    pub fn morton(&self) -> u64 {
        (1..=self.level).fold(0u64, |acc, d| {
            acc | (u64::from(self.octant_at(d).0) << (3 * (MAX_LEVEL - d)))
        })
    }
}

/// Whether an axis code at `level` has all its path bits set, such that the node it belongs to
/// touches the root's upper face along that axis.
#[inline]
pub fn is_on_top_boundary(code: u32, level: u32) -> bool {
    path_bits(code, level) == level
}

/// Whether an axis code at `level` has none of its path bits set, such that the node it belongs
/// to touches the root's lower face along that axis.
#[inline]
pub fn is_on_bottom_boundary(code: u32, level: u32) -> bool {
    path_bits(code, level) == 0
}

fn path_bits(code: u32, level: u32) -> u32 {
    (0..=level).map(|d| (code >> d) & 1).sum()
}

/// Grid cell index of an axis code.
#[inline]
pub fn cell_index(code: u32, level: u32) -> u32 {
    (1..=level).fold(0, |acc, d| acc | (((code >> d) & 1) << (level - d)))
}

/// Step an axis code at `level` one cell up (`upward`) or down, without leaving the root.
///
/// Ascend from `level` toward the root until reaching a depth whose bit can change in the
/// requested direction (0 when moving up, 1 when moving down). Flip it, then descend back to
/// `level`, giving every finer bit the opposite value to the one it's stepping toward. If the
/// ascent reaches the root, the node lies on the boundary and there's no neighbor.
///
/// # Example
/// At level 3 with bits `d1, d2, d3 = 0, 1, 1` (cell 3), stepping up skips `d3` and `d2` (already
/// upper), flips `d1` to 1, and clears `d2` and `d3`: `1, 0, 0`, or cell 4.
pub fn neighbor_code(code: u32, level: u32, upward: bool) -> Option<u32> {
    let mut depth = level;
    while depth > 0 {
        let bit = (code >> depth) & 1 == 1;
        if bit != upward {
            let finer = ((2u32 << level) - 1) & !((2u32 << depth) - 1);
            let flipped = code ^ (1 << depth);
            return Some(if upward {
                flipped & !finer
            } else {
                flipped | finer
            });
        }
        depth -= 1;
    }
    None
}
