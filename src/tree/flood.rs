use std::collections::VecDeque;

use crate::{CellLabel, Direction, NodeIndex, Octree, SurfaceMesh};

/// How many leaves [Octree::flood_fill] reached from outside, and how many it found enclosed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FloodStats {
    pub exterior: usize,
    pub interior: usize,
}

impl<M: SurfaceMesh> Octree<M> {
    /// Collect the surface leaves and seed the exterior.
    ///
    /// Every [Boundary](CellLabel::Boundary) and [BoundarySpecial](CellLabel::BoundarySpecial)
    /// leaf goes into [Self::boundary_leaves]. Unclassified leaves touching the outside of the
    /// root can't be enclosed by the surface, since the root is padded around it, so they're
    /// labelled [CellLabel::Exterior]. Returns the number of seeds.
    ///
    /// No neighbors are looked up here. A leaf has no neighbor in some direction exactly when
    /// its location code is on the root's boundary in that direction, so seeding tests
    /// [LocCode::is_on_domain_boundary](crate::LocCode::is_on_domain_boundary) directly instead
    /// of walking the neighbors of each surface leaf.
    ///
    /// Does nothing if the last [partition](Self::partition) was degenerate.
    #[tracing::instrument(skip(self))]
    pub fn label_boundary_neighbors(&mut self) -> usize {
        if self.degeneracy().is_some() {
            return 0;
        }
        let mut membrane = Vec::new();
        let mut seeds = Vec::new();
        for leaf in self.leaves() {
            if leaf.label().is_membrane() {
                membrane.push(leaf.index());
            } else if leaf.label() == CellLabel::Undefined && leaf.code().is_on_domain_boundary()
            {
                seeds.push(leaf.index());
            }
        }
        for &s in &seeds {
            self.node_mut_unchecked(s).label = CellLabel::Exterior;
        }
        tracing::debug!(
            boundary = membrane.len(),
            seeds = seeds.len(),
            "seeded exterior"
        );
        self.boundary_leaves = membrane;
        seeds.len()
    }

    /// Spread [CellLabel::Exterior] breadth-first from every exterior leaf to each unclassified
    /// leaf sharing a face with it, then label whatever is left [CellLabel::Interior].
    ///
    /// Surface leaves are never crossed, so the interior is exactly what they enclose. Every
    /// interior leaf is collected into [Self::interior_leaves].
    ///
    /// Does nothing if the last [partition](Self::partition) was degenerate.
    #[tracing::instrument(skip(self))]
    pub fn flood_fill(&mut self) -> FloodStats {
        let mut stats = FloodStats::default();
        if self.degeneracy().is_some() {
            return stats;
        }

        let mut queue: VecDeque<NodeIndex> = self
            .leaves()
            .filter(|l| l.label() == CellLabel::Exterior)
            .map(|l| l.index())
            .collect();
        while let Some(idx) = queue.pop_front() {
            for dir in Direction::ALL {
                for n in self.face_leaves_unchecked(idx, dir) {
                    let node = self.node_mut_unchecked(n);
                    if node.label == CellLabel::Undefined {
                        node.label = CellLabel::Exterior;
                        stats.exterior += 1;
                        queue.push_back(n);
                    }
                }
            }
        }

        let enclosed: Vec<NodeIndex> = self
            .leaves()
            .filter(|l| l.label() == CellLabel::Undefined)
            .map(|l| l.index())
            .collect();
        for &idx in &enclosed {
            self.node_mut_unchecked(idx).label = CellLabel::Interior;
        }
        stats.interior = enclosed.len();
        self.interior_leaves = self
            .leaves()
            .filter(|l| l.label() == CellLabel::Interior)
            .map(|l| l.index())
            .collect();

        tracing::debug!(?stats, "flood filled");
        stats
    }
}
