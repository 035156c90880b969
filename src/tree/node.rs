use crate::{
    spatial::{Aabb, ClosedMax},
    Axis, Error, FaceId, LocCode, NodeIndex, Octant, Point, Real, VertexId,
};

/// Classification of an [OctNode] relative to the surface it was partitioned from.
///
/// Leaves start out [Undefined](Self::Undefined); every other label is terminal.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum CellLabel {
    /// Reachable from the outside of the root without crossing the surface.
    Exterior = 0,
    /// Holds a point of the surface.
    Boundary = 1,
    /// Grazed by the surface, without holding any of its representative points.
    BoundarySpecial = 2,
    /// Enclosed by the surface.
    Interior = 3,
    #[default]
    Undefined = 4,
}

impl CellLabel {
    pub const ALL: [CellLabel; 5] = [
        CellLabel::Exterior,
        CellLabel::Boundary,
        CellLabel::BoundarySpecial,
        CellLabel::Interior,
        CellLabel::Undefined,
    ];

    /// Whether flood fill must stop at cells with this label.
    #[inline]
    pub fn is_membrane(self) -> bool {
        matches!(self, Self::Boundary | Self::BoundarySpecial)
    }
}

impl std::fmt::Display for CellLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CellLabel::Exterior => "exterior",
            CellLabel::Boundary => "boundary",
            CellLabel::BoundarySpecial => "boundary-special",
            CellLabel::Interior => "interior",
            CellLabel::Undefined => "undefined",
        })
    }
}

/// Per-vertex sub-label, as written by downstream tools.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexLabel {
    #[default]
    Undefined,
    Inside,
    Surface,
    Outside,
}

impl From<VertexLabel> for char {
    fn from(l: VertexLabel) -> Self {
        match l {
            VertexLabel::Undefined => 'U',
            VertexLabel::Inside => 'I',
            VertexLabel::Surface => 'S',
            VertexLabel::Outside => 'O',
        }
    }
}

impl TryFrom<char> for VertexLabel {
    type Error = Error;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'U' => Ok(Self::Undefined),
            'I' => Ok(Self::Inside),
            'S' => Ok(Self::Surface),
            'O' => Ok(Self::Outside),
            c => Err(Error::InvalidVertexLabel(c)),
        }
    }
}

/// The mesh elements whose geometry falls within a node.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeElements {
    pub(crate) vertices: Vec<(VertexId, VertexLabel)>,
    pub(crate) faces: Vec<FaceId>,
}

impl NodeElements {
    #[inline]
    pub fn vertices(&self) -> &[(VertexId, VertexLabel)] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    #[inline]
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    pub fn add_vertex(&mut self, v: VertexId) {
        self.vertices.push((v, VertexLabel::Undefined));
    }

    pub fn add_face(&mut self, f: FaceId) {
        self.faces.push(f);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }

    pub fn vertex_label(&self, v: VertexId) -> Option<VertexLabel> {
        self.vertices
            .iter()
            .find_map(|&(id, label)| (id == v).then_some(label))
    }

    /// Tag a vertex held by this node with one of `'I'`, `'S'` or `'O'`.
    ///
    /// # Errors
    /// * [Error::InvalidVertexLabel] if `label` is anything else; checked first.
    /// * [Error::VertexNotFound] if this node doesn't hold `v`.
    ///
    /// Nothing changes on error.
    pub fn set_vertex_label(&mut self, v: VertexId, label: char) -> Result<(), Error> {
        let label = match VertexLabel::try_from(label)? {
            VertexLabel::Undefined => return Err(Error::InvalidVertexLabel(label)),
            l => l,
        };
        let (_, slot) = self
            .vertices
            .iter_mut()
            .find(|(id, _)| *id == v)
            .ok_or(Error::VertexNotFound(v))?;
        *slot = label;
        Ok(())
    }
}

/// A node within an [Octree](crate::Octree).
///
/// Nodes refer to each other by [NodeIndex]; `parent` is a plain back-reference into the same
/// arena, and the root is its own parent.
#[derive(Debug, Clone, PartialEq)]
pub struct OctNode {
    pub(crate) index: NodeIndex,
    pub(crate) parent: NodeIndex,
    pub(crate) children: Option<[NodeIndex; 8]>,
    pub(crate) bounds: Aabb,
    pub(crate) code: LocCode,
    pub(crate) label: CellLabel,
    pub(crate) elements: NodeElements,
    pub(crate) strain: Real,
}

impl OctNode {
    pub(crate) fn new(index: NodeIndex, parent: NodeIndex, bounds: Aabb, code: LocCode) -> Self {
        Self {
            index,
            parent,
            children: None,
            bounds,
            code,
            label: CellLabel::Undefined,
            elements: NodeElements::default(),
            strain: 0.0,
        }
    }

    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// The index of this node's parent; `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        (self.parent != self.index).then_some(self.parent)
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent == self.index
    }

    #[inline]
    pub fn children(&self) -> Option<&[NodeIndex; 8]> {
        self.children.as_ref()
    }

    #[inline]
    pub fn child(&self, oct: Octant) -> Option<NodeIndex> {
        self.children.map(|c| c[usize::from(oct)])
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn code(&self) -> &LocCode {
        &self.code
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.code.level
    }

    #[inline]
    pub fn morton(&self) -> u64 {
        self.code.morton()
    }

    #[inline]
    pub fn label(&self) -> CellLabel {
        self.label
    }

    #[inline]
    pub fn elements(&self) -> &NodeElements {
        &self.elements
    }

    #[inline]
    pub fn strain(&self) -> Real {
        self.strain
    }

    /// Faces along which this node's box is closed; see [ClosedMax].
    pub fn closed_max(&self) -> ClosedMax {
        ClosedMax(Axis::ALL.map(|a| self.code.is_on_top_boundary(a)))
    }

    /// Whether `p` lies within this node, such that it lies in exactly one leaf of the tree.
    pub fn contains(&self, p: &Point) -> bool {
        self.bounds.contains_half_open(p, self.closed_max())
    }
}
