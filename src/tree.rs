mod classify;
mod code;
mod debug;
mod flood;
mod iter;
mod neighbor;
mod node;
mod partition;

pub use classify::*;
pub use code::*;
pub use flood::*;
pub use iter::*;
pub use node::*;
pub use partition::*;

use num_traits::AsPrimitive;

use crate::{
    spatial::{Aabb, Aabc},
    Error, FaceId, NodeIndex, Real, SurfaceMesh, TriMesh, VertexId,
};

/// Settings fixed for the lifetime of an [Octree].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionConfig {
    /// Depth every leaf is partitioned down to.
    pub max_level: u32,
    /// Padding added to every side of the root cube, as a fraction of the mesh's largest extent.
    pub margin: Real,
}

impl PartitionConfig {
    pub const DEFAULT_MARGIN: Real = 0.25;

    pub fn new(max_level: u32) -> Self {
        Self {
            max_level,
            margin: Self::DEFAULT_MARGIN,
        }
    }

    pub fn with_margin(self, margin: Real) -> Self {
        Self { margin, ..self }
    }

    /// # Errors
    /// * [Error::LevelTooDeep] if `max_level > MAX_LEVEL`
    /// * [Error::InvalidMargin] if `margin` is negative or not finite
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_level > MAX_LEVEL {
            return Err(Error::LevelTooDeep(self.max_level));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Error::InvalidMargin(self.margin));
        }
        Ok(())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::new(4)
    }
}

/// How many leaves carry each [CellLabel].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabelCounts(pub [usize; 5]);

impl LabelCounts {
    #[inline]
    pub fn get(&self, label: CellLabel) -> usize {
        self.0[label as usize]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl std::ops::Index<CellLabel> for LabelCounts {
    type Output = usize;
    fn index(&self, label: CellLabel) -> &usize {
        &self.0[label as usize]
    }
}

/// A classified spatial decomposition of the bounding cube of a [SurfaceMesh].
///
/// Nodes are stored in a single arena and refer to each other by [NodeIndex]; dropping or
/// [clearing](Self::clear) the tree releases all of them at once.
#[derive(Debug)]
pub struct Octree<M: SurfaceMesh = TriMesh> {
    mesh: M,
    config: PartitionConfig,
    cube: Aabc,
    nodes: Vec<OctNode>,
    root: NodeIndex,
    height: u32,
    boundary_leaves: Vec<NodeIndex>,
    interior_leaves: Vec<NodeIndex>,
    degeneracy: Option<Degeneracy>,
}

impl<M: SurfaceMesh> Octree<M> {
    /// Construct an unpartitioned tree: a single root leaf holding every element of `mesh`.
    ///
    /// # Errors
    /// * see [PartitionConfig::validate]
    pub fn new(mesh: M, config: PartitionConfig) -> Result<Self, Error> {
        config.validate()?;
        let cube = match mesh.bounding_box() {
            Some(bb) => Aabc::around(&bb, config.margin),
            None => Aabc::new(crate::Point::origin(), 1.0),
        };
        let mut res = Self {
            mesh,
            config,
            cube,
            nodes: Vec::new(),
            root: 0,
            height: 0,
            boundary_leaves: Vec::new(),
            interior_leaves: Vec::new(),
            degeneracy: None,
        };
        res.reset_root();
        Ok(res)
    }

    /// Build a tree and run the whole pipeline over it: [partition](Self::partition),
    /// [classify](Self::classify), [seed](Self::label_boundary_neighbors) and
    /// [flood fill](Self::flood_fill).
    #[tracing::instrument(skip(mesh))]
    pub fn voxelize(mesh: M, config: PartitionConfig) -> Result<Self, Error> {
        let mut tree = Self::new(mesh, config)?;
        if let Partition::Subdivided { leaves } = tree.partition() {
            let stats = tree.classify();
            let seeds = tree.label_boundary_neighbors();
            let flood = tree.flood_fill();
            tracing::debug!(leaves, ?stats, seeds, ?flood, "voxelized mesh");
        }
        Ok(tree)
    }

    /// Discard every node, leaving a single unclassified root leaf holding the whole mesh.
    pub fn clear(&mut self) {
        self.reset_root();
    }

    fn reset_root(&mut self) {
        let mut root = OctNode::new(0, 0, Aabb::from(self.cube), LocCode::ROOT);
        root.elements.vertices = self
            .mesh
            .vertices()
            .map(|v| (v, VertexLabel::Undefined))
            .collect();
        root.elements.faces = self.mesh.faces().collect();
        self.nodes.clear();
        self.nodes.push(root);
        self.root = 0;
        self.height = 0;
        self.boundary_leaves.clear();
        self.interior_leaves.clear();
        self.degeneracy = None;
    }

    #[inline]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    #[inline]
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// The bounding cube of the root node.
    #[inline]
    pub fn cube(&self) -> &Aabc {
        &self.cube
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The level of the deepest node.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of nodes, branches included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, in creation order.
    #[inline]
    pub fn nodes(&self) -> &[OctNode] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&OctNode> {
        let i: usize = index.as_();
        self.nodes.get(i)
    }

    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `index`
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Result<&OctNode, Error> {
        self.node(index).ok_or(Error::InvalidIndex(index))
    }

    /// # Panics
    /// * `index` ∉ `self.nodes`
    #[inline]
    pub(crate) fn node_unchecked(&self, index: NodeIndex) -> &OctNode {
        let i: usize = index.as_();
        &self.nodes[i]
    }

    #[inline]
    pub(crate) fn node_mut_unchecked(&mut self, index: NodeIndex) -> &mut OctNode {
        let i: usize = index.as_();
        &mut self.nodes[i]
    }

    fn get_mut(&mut self, index: NodeIndex) -> Result<&mut OctNode, Error> {
        let i: usize = index.as_();
        self.nodes.get_mut(i).ok_or(Error::InvalidIndex(index))
    }

    /// Leaves labelled [CellLabel::Boundary] or [CellLabel::BoundarySpecial], as collected by
    /// [Self::label_boundary_neighbors] and extended by [Self::partition_to_level].
    #[inline]
    pub fn boundary_leaves(&self) -> &[NodeIndex] {
        &self.boundary_leaves
    }

    /// Leaves labelled [CellLabel::Interior], as collected by [Self::flood_fill] and extended by
    /// [Self::partition_to_level].
    #[inline]
    pub fn interior_leaves(&self) -> &[NodeIndex] {
        &self.interior_leaves
    }

    /// Why the last [partition](Self::partition) left the root undivided, if it did.
    #[inline]
    pub fn degeneracy(&self) -> Option<Degeneracy> {
        self.degeneracy
    }

    pub fn label_counts(&self) -> LabelCounts {
        let mut res = LabelCounts::default();
        for leaf in self.leaves() {
            res.0[leaf.label as usize] += 1;
        }
        res
    }

    /// Attach a scalar strain value to a node, for export.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    pub fn set_strain(&mut self, node: NodeIndex, strain: Real) -> Result<(), Error> {
        self.get_mut(node)?.strain = strain;
        Ok(())
    }

    /// Tag a vertex held by `node`; see [NodeElements::set_vertex_label].
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    /// * as [NodeElements::set_vertex_label]
    pub fn set_vertex_label(
        &mut self,
        node: NodeIndex,
        vertex: VertexId,
        label: char,
    ) -> Result<(), Error> {
        self.get_mut(node)?.elements.set_vertex_label(vertex, label)
    }

    /// Leaves holding a reference to face `f`.
    pub fn leaves_with_face(&self, f: FaceId) -> impl Iterator<Item = &OctNode> + '_ {
        self.leaves().filter(move |l| l.elements.faces.contains(&f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation() {
        assert!(PartitionConfig::new(MAX_LEVEL).validate().is_ok());
        assert!(matches!(
            PartitionConfig::new(MAX_LEVEL + 1).validate(),
            Err(Error::LevelTooDeep(l)) if l == MAX_LEVEL + 1
        ));
        assert!(matches!(
            PartitionConfig::new(2).with_margin(-0.5).validate(),
            Err(Error::InvalidMargin(_))
        ));
        assert!(PartitionConfig::new(2)
            .with_margin(Real::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn empty_tree() {
        let tree = Octree::new(TriMesh::empty(), PartitionConfig::new(3)).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.cube().length, 1.0);
        assert!(tree.get(1).is_err());
        let root = tree.get(tree.root()).unwrap();
        assert!(root.is_leaf() && root.elements().is_empty());
        assert_eq!(tree.label_counts()[CellLabel::Undefined], 1);
    }
}
