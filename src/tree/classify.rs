use crate::{
    closest_point_on_triangle, segment_crosses_box, triangle_overlaps_box, CellLabel, NodeIndex,
    Octree, SurfaceMesh,
};

/// How many leaves [Octree::classify] labelled, and how many it found carrying only spurious
/// face references.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyStats {
    pub boundary: usize,
    pub boundary_special: usize,
    pub pruned: usize,
}

impl<M: SurfaceMesh> Octree<M> {
    /// Label every unclassified leaf carrying faces.
    ///
    /// For each face, the point of the face closest to the leaf's center stands in for the whole
    /// face. If any such point lies within the leaf (under the half-open rules of
    /// [OctNode::contains](crate::OctNode::contains)), the leaf is [CellLabel::Boundary].
    /// Otherwise, if an edge of one of its faces crosses its closed box or a face overlaps it,
    /// it's [CellLabel::BoundarySpecial]. Anything else was handed faces only because their
    /// bounding boxes overlap; those references are dropped and the leaf stays unclassified.
    ///
    /// Does nothing if the last [partition](Self::partition) was degenerate.
    #[tracing::instrument(skip(self))]
    pub fn classify(&mut self) -> ClassifyStats {
        let mut stats = ClassifyStats::default();
        if self.degeneracy().is_some() {
            return stats;
        }
        let candidates: Vec<NodeIndex> = self
            .leaves()
            .filter(|l| l.label() == CellLabel::Undefined && l.elements().has_faces())
            .map(|l| l.index())
            .collect();

        for idx in candidates {
            let label = self.classify_leaf(idx);
            let node = self.node_mut_unchecked(idx);
            match label {
                CellLabel::Boundary => stats.boundary += 1,
                CellLabel::BoundarySpecial => stats.boundary_special += 1,
                _ => {
                    node.elements.faces.clear();
                    stats.pruned += 1;
                }
            }
            node.label = label;
            tracing::trace!(index = idx, %label, "classified leaf");
        }

        tracing::debug!(?stats, "classified leaves");
        stats
    }

    fn classify_leaf(&self, idx: NodeIndex) -> CellLabel {
        let node = self.node_unchecked(idx);
        let center = node.bounds().center();
        let closed = node.closed_max();
        let mesh = self.mesh();

        let touching = node.elements().faces().iter().any(|&f| {
            let rep = closest_point_on_triangle(&mesh.triangle(f), &center);
            node.bounds().contains_half_open(&rep, closed)
        });
        if touching {
            return CellLabel::Boundary;
        }

        let grazing = node.elements().faces().iter().any(|&f| {
            let [a, b, c] = mesh.triangle(f);
            segment_crosses_box(&a, &b, node.bounds())
                || segment_crosses_box(&b, &c, node.bounds())
                || segment_crosses_box(&c, &a, node.bounds())
                || triangle_overlaps_box(&[a, b, c], node.bounds())
        });
        if grazing {
            CellLabel::BoundarySpecial
        } else {
            CellLabel::Undefined
        }
    }
}
