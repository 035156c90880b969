/// A way to refer to octants in a 3D volume.
///
/// # Diagram
/// `IJK>A`, where `IJK` are the octant coords, and `A` is the corresponding child array index.
/// <pre>
/// Lower           Upper
/// -------------   -------------     2 - 6     J
/// |000>0|100>4|   |010>2|110>6|   3 - 7 |     |
/// |-----|-----|   |-----|-----|   |   | 4     ___ I
/// |001>1|101>5|   |011>3|111>7|   1 - 5      /
/// -------------   -------------             K
/// </pre>
///
/// `I`, `J` and `K` run along X, Y and Z respectively; a set bit means the upper half of the
/// parent along that axis.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Octant(pub u8);

impl Octant {
    /// Iterator through all possible octants, in child array order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
    }

    /// Construct an Octant from coordinates.
    #[inline]
    pub fn new(i: bool, j: bool, k: bool) -> Self {
        Self((i as u8 * 0b100) | (j as u8 * 0b010) | (k as u8))
    }

    /// Whether self lies in the upper half along X.
    #[inline]
    pub fn i(self) -> bool {
        self.0 & 0b100 != 0
    }
    /// Whether self lies in the upper half along Y.
    #[inline]
    pub fn j(self) -> bool {
        self.0 & 0b010 != 0
    }
    /// Whether self lies in the upper half along Z.
    #[inline]
    pub fn k(self) -> bool {
        self.0 & 0b001 != 0
    }

    /// Whether self lies in the upper half along `axis`.
    #[inline]
    pub fn upper(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.i(),
            Axis::Y => self.j(),
            Axis::Z => self.k(),
        }
    }
}

impl From<Octant> for usize {
    fn from(oct: Octant) -> Self {
        oct.0 as usize
    }
}

impl From<Octant> for u8 {
    fn from(oct: Octant) -> Self {
        oct.0
    }
}

/// One of the three coordinate axes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis within a point or vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One of the six face directions of an axis-aligned cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Direction {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NegX,
        Direction::PosX,
        Direction::NegY,
        Direction::PosY,
        Direction::NegZ,
        Direction::PosZ,
    ];

    #[inline]
    pub fn new(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, false) => Self::NegX,
            (Axis::X, true) => Self::PosX,
            (Axis::Y, false) => Self::NegY,
            (Axis::Y, true) => Self::PosY,
            (Axis::Z, false) => Self::NegZ,
            (Axis::Z, true) => Self::PosZ,
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Self::NegX | Self::PosX => Axis::X,
            Self::NegY | Self::PosY => Axis::Y,
            Self::NegZ | Self::PosZ => Axis::Z,
        }
    }

    /// Whether this direction points towards increasing coordinates.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self::new(self.axis(), !self.is_positive())
    }
}
