use num_traits::AsPrimitive;

use crate::{CellLabel, Error, NodeIndex, Octant, OctNode, Octree, SurfaceMesh, MAX_LEVEL};

/// The outcome of [Octree::partition].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// The root was divided down to the configured level, producing `leaves` leaves.
    Subdivided { leaves: usize },
    /// The mesh gives nothing to partition; the root was left as a single unclassified leaf.
    Degenerate(Degeneracy),
}

/// Input meshes for which partitioning is trivial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The mesh has no faces.
    EmptyMesh,
    /// The mesh's bounding box has no volume.
    ZeroVolume,
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::EmptyMesh => f.write_str("mesh has no faces"),
            Degeneracy::ZeroVolume => f.write_str("mesh bounding box has zero volume"),
        }
    }
}

impl<M: SurfaceMesh> Octree<M> {
    /// Rebuild the tree as a complete octree of uniform depth [max_level](crate::PartitionConfig),
    /// handing every vertex and face down to the leaves whose boxes contain them.
    ///
    /// Vertices go to the one leaf containing them, and faces to every leaf their bounding box
    /// overlaps, under the half-open rules of [OctNode::contains]. A mesh without faces or
    /// without volume leaves the tree as a single unclassified leaf; that's reported in the
    /// result rather than as an error.
    #[tracing::instrument(skip(self), fields(max_level = self.config().max_level))]
    pub fn partition(&mut self) -> Partition {
        self.clear();
        let degeneracy = if self.mesh().face_count() == 0 {
            Some(Degeneracy::EmptyMesh)
        } else if self
            .mesh()
            .bounding_box()
            .map_or(true, |bb| bb.volume() <= 0.0)
        {
            Some(Degeneracy::ZeroVolume)
        } else {
            None
        };
        if let Some(d) = degeneracy {
            tracing::warn!(reason = %d, "not partitioning degenerate mesh");
            self.degeneracy = Some(d);
            return Partition::Degenerate(d);
        }

        let target = self.config().max_level;
        let leaves = self.subdivide_to(self.root(), target, CellLabel::Undefined);
        tracing::debug!(
            leaves = leaves.len(),
            nodes = self.len(),
            height = self.height(),
            "partitioned"
        );
        Partition::Subdivided {
            leaves: leaves.len(),
        }
    }

    /// Continue partitioning one leaf down to `target`, labelling every new leaf with `label`.
    ///
    /// The leaf's elements are redistributed as in [Self::partition], and the new leaves replace
    /// it in [Self::boundary_leaves] or [Self::interior_leaves] according to `label`. Returns the
    /// new leaves, which is empty if `target` isn't deeper than `node`.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    /// * [Error::NotALeaf] if `node` has children
    /// * [Error::LevelTooDeep] if `target > MAX_LEVEL`
    #[tracing::instrument(skip(self))]
    pub fn partition_to_level(
        &mut self,
        node: NodeIndex,
        target: u32,
        label: CellLabel,
    ) -> Result<Vec<NodeIndex>, Error> {
        let n = self.get(node)?;
        if !n.is_leaf() {
            return Err(Error::NotALeaf(node));
        }
        if target > MAX_LEVEL {
            return Err(Error::LevelTooDeep(target));
        }
        if target <= n.level() {
            return Ok(Vec::new());
        }

        self.boundary_leaves.retain(|&l| l != node);
        self.interior_leaves.retain(|&l| l != node);
        let leaves = self.subdivide_to(node, target, label);
        if label.is_membrane() {
            self.boundary_leaves.extend_from_slice(&leaves);
        } else if label == CellLabel::Interior {
            self.interior_leaves.extend_from_slice(&leaves);
        }
        tracing::debug!(new_leaves = leaves.len(), "refined leaf");
        Ok(leaves)
    }

    /// Divide `start` and its descendants until every leaf below it sits at `target`, returning
    /// those leaves in depth-first order.
    fn subdivide_to(&mut self, start: NodeIndex, target: u32, label: CellLabel) -> Vec<NodeIndex> {
        let mut leaves = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if self.node_unchecked(idx).level() >= target {
                self.node_mut_unchecked(idx).label = label;
                leaves.push(idx);
                continue;
            }
            let children = self.branch(idx);
            stack.extend(children.into_iter().rev());
        }
        self.height = self.height.max(target);
        leaves
    }

    /// Give a leaf eight children, moving its elements into whichever contain them.
    fn branch(&mut self, idx: NodeIndex) -> [NodeIndex; 8] {
        let parent = self.node_mut_unchecked(idx);
        let elements = std::mem::take(&mut parent.elements);
        let (bounds, code) = (parent.bounds, parent.code);

        let first: NodeIndex = self.nodes.len().as_();
        let children: [NodeIndex; 8] = std::array::from_fn(|i| first + i as NodeIndex);
        for oct in Octant::all() {
            let mut child = OctNode::new(
                children[usize::from(oct)],
                idx,
                bounds.child(oct),
                code.child(oct),
            );
            let closed = child.closed_max();
            child.elements.vertices = elements
                .vertices
                .iter()
                .copied()
                .filter(|&(v, _)| child.bounds.contains_half_open(&self.mesh.position(v), closed))
                .collect();
            child.elements.faces = elements
                .faces
                .iter()
                .copied()
                .filter(|&f| {
                    child
                        .bounds
                        .overlaps_half_open(&self.mesh.face_bounds(f), closed)
                })
                .collect();
            tracing::trace!(
                index = child.index,
                level = child.level(),
                vertices = child.elements.vertices.len(),
                faces = child.elements.faces.len(),
                "created node"
            );
            self.nodes.push(child);
        }
        self.node_mut_unchecked(idx).children = Some(children);
        children
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::{spatial::Aabb, FaceId, PartitionConfig, Real, TriMesh, VertexId};

    fn tetrahedron() -> TriMesh {
        TriMesh::new(
            vec![
                point![0.0, 0.0, 0.0],
                point![1.0, 0.0, 0.0],
                point![0.0, 1.0, 0.0],
                point![0.0, 0.0, 1.0],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn uniform_depth() {
        let mut tree = Octree::new(tetrahedron(), PartitionConfig::new(2)).unwrap();
        assert_eq!(tree.partition(), Partition::Subdivided { leaves: 64 });
        assert_eq!(tree.len(), 1 + 8 + 64);
        assert_eq!(tree.height(), 2);
        assert!(tree.leaves().all(|l| l.level() == 2));
        for node in tree.nodes() {
            if let Some(children) = node.children() {
                for &c in children {
                    let child = tree.get(c).unwrap();
                    assert_eq!(child.parent(), Some(node.index()));
                    assert_eq!(child.level(), node.level() + 1);
                    assert!(node.code().is_ancestor_of(child.code()));
                }
                assert!(node.elements().is_empty());
            }
        }
    }

    #[test]
    fn vertices_land_in_one_leaf() {
        let mut tree = Octree::new(tetrahedron(), PartitionConfig::new(3)).unwrap();
        tree.partition();
        for v in 0..4 {
            let holders: Vec<_> = tree
                .leaves()
                .filter(|l| l.elements().vertex_label(VertexId(v)).is_some())
                .collect();
            assert_eq!(holders.len(), 1);
            let p = tree.mesh().position(VertexId(v));
            assert!(holders[0].contains(&p));
        }
    }

    #[test]
    fn degenerate_meshes() {
        let mut tree = Octree::new(TriMesh::empty(), PartitionConfig::new(3)).unwrap();
        assert_eq!(
            tree.partition(),
            Partition::Degenerate(Degeneracy::EmptyMesh)
        );
        assert_eq!(tree.len(), 1);

        let flat = TriMesh::new(
            vec![
                point![0.0, 0.0, 0.0],
                point![1.0, 0.0, 0.0],
                point![0.0, 1.0, 0.0],
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut tree = Octree::new(flat, PartitionConfig::new(3)).unwrap();
        assert_eq!(
            tree.partition(),
            Partition::Degenerate(Degeneracy::ZeroVolume)
        );
        assert_eq!(tree.degeneracy(), Some(Degeneracy::ZeroVolume));
        assert_eq!(tree.get(tree.root()).unwrap().label(), CellLabel::Undefined);
    }

    #[test]
    fn refine_one_leaf() {
        let mut tree = Octree::new(tetrahedron(), PartitionConfig::new(1)).unwrap();
        tree.partition();
        let leaf = tree.leaves().next().unwrap().index();
        let faces_before = tree.get(leaf).unwrap().elements().faces().len();
        assert!(faces_before > 0);

        let new = tree
            .partition_to_level(leaf, 3, CellLabel::Boundary)
            .unwrap();
        assert_eq!(new.len(), 64);
        assert_eq!(tree.height(), 3);
        assert!(new.iter().all(|&l| {
            let n = tree.get(l).unwrap();
            n.label() == CellLabel::Boundary && n.level() == 3
        }));
        assert_eq!(tree.boundary_leaves(), new.as_slice());
        assert_eq!(tree.leaves().count(), 7 + 64);

        // already deep enough
        assert!(tree
            .partition_to_level(new[0], 2, CellLabel::Interior)
            .unwrap()
            .is_empty());
        assert!(matches!(
            tree.partition_to_level(leaf, 4, CellLabel::Interior),
            Err(Error::NotALeaf(l)) if l == leaf
        ));
        assert!(matches!(
            tree.partition_to_level(new[0], MAX_LEVEL + 1, CellLabel::Interior),
            Err(Error::LevelTooDeep(_))
        ));
        assert!(matches!(
            tree.partition_to_level(10_000, 4, CellLabel::Interior),
            Err(Error::InvalidIndex(10_000))
        ));
    }

    #[quickcheck]
    fn leaves_tile_the_root(level: u8) -> bool {
        let level = u32::from(level % 4);
        let mut tree = Octree::new(tetrahedron(), PartitionConfig::new(level)).unwrap();
        tree.partition();
        let root = Aabb::from(*tree.cube());
        let total: Real = tree.leaves().map(|l| l.bounds().volume()).sum();
        (total - root.volume()).abs() <= root.volume() * 1e-4
            && tree.leaves().count() == 1 << (3 * level)
    }

    #[test]
    fn faces_are_never_dropped() {
        let mut tree = Octree::new(tetrahedron(), PartitionConfig::new(3)).unwrap();
        tree.partition();
        for f in tree.mesh().faces() {
            let fb = tree.mesh().face_bounds(f);
            let holders: Vec<_> = tree.leaves_with_face(f).collect();
            assert!(!holders.is_empty(), "{f:?} dropped");
            for h in holders {
                assert!(h.bounds().overlaps_half_open(&fb, h.closed_max()));
            }
        }
        assert!(tree.leaves_with_face(FaceId(99)).next().is_none());
    }
}
