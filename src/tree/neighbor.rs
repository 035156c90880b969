use crate::{Direction, Error, LocCode, NodeIndex, Octant, Octree, Point, SurfaceMesh};

impl<M: SurfaceMesh> Octree<M> {
    /// The deepest node along the path described by `code`, stopping at a leaf or at
    /// `code.level`.
    pub fn deepest_along(&self, code: &LocCode) -> NodeIndex {
        let mut idx = self.root();
        for depth in 1..=code.level {
            match self.node_unchecked(idx).child(code.octant_at(depth)) {
                Some(child) => idx = child,
                None => break,
            }
        }
        idx
    }

    /// The node with exactly this location code, if the tree reaches that deep there.
    pub fn node_at(&self, code: &LocCode) -> Option<NodeIndex> {
        let idx = self.deepest_along(code);
        (self.node_unchecked(idx).level() == code.level).then_some(idx)
    }

    /// The leaf containing `p`, or `None` if `p` lies outside the root.
    pub fn leaf_at(&self, p: &Point) -> Option<NodeIndex> {
        let mut node = self.node_unchecked(self.root());
        if !node.bounds().contains(p) {
            return None;
        }
        while let Some(children) = node.children() {
            node = self.node_unchecked(children[usize::from(node.bounds().octant_of(p))]);
        }
        Some(node.index())
    }

    /// The node adjacent to `node` across the face in `dir`, found through location code
    /// arithmetic; `None` if `node` lies on the root's boundary in that direction.
    ///
    /// The search stops at the same level as `node`, or at a coarser leaf. If the same-level
    /// neighbor has children, then with `consider_level` it's returned anyway; otherwise the
    /// search continues down to the first leaf (in [Octant] order) on the shared face. Use
    /// [Self::face_leaves] to get all of them.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    pub fn neighbor(
        &self,
        node: NodeIndex,
        dir: Direction,
        consider_level: bool,
    ) -> Result<Option<NodeIndex>, Error> {
        let Some(code) = self.get(node)?.code().neighbor(dir) else {
            return Ok(None);
        };
        let mut idx = self.deepest_along(&code);
        if !consider_level {
            let face = facing(dir);
            while let Some(children) = self.node_unchecked(idx).children() {
                idx = children[usize::from(face)];
            }
        }
        Ok(Some(idx))
    }

    /// [Self::neighbor] in every [Direction], in [Direction::ALL] order.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    pub fn neighbors6(
        &self,
        node: NodeIndex,
        consider_level: bool,
    ) -> Result<[Option<NodeIndex>; 6], Error> {
        let mut res = [None; 6];
        for (slot, dir) in res.iter_mut().zip(Direction::ALL) {
            *slot = self.neighbor(node, dir, consider_level)?;
        }
        Ok(res)
    }

    /// Every leaf sharing part of the face of `node` in `dir`.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `node`
    pub fn face_leaves(&self, node: NodeIndex, dir: Direction) -> Result<Vec<NodeIndex>, Error> {
        self.get(node)?;
        Ok(self.face_leaves_unchecked(node, dir))
    }

    /// [Self::face_leaves] for an index known to be in the tree.
    ///
    /// # Panics
    /// * `node` ∉ `self.nodes`
    pub(crate) fn face_leaves_unchecked(&self, node: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let Some(code) = self.node_unchecked(node).code().neighbor(dir) else {
            return Vec::new();
        };
        let start = self.deepest_along(&code);
        let axis = dir.axis();
        // children touching the shared face lie on the side facing back toward `node`
        let toward = !dir.is_positive();
        let mut res = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            match self.node_unchecked(idx).children() {
                None => res.push(idx),
                Some(children) => stack.extend(
                    Octant::all()
                        .filter(|o| o.upper(axis) == toward)
                        .map(|o| children[usize::from(o)]),
                ),
            }
        }
        res
    }
}

/// The first child octant whose face lies against a neighbor approached from `dir`.
fn facing(dir: Direction) -> Octant {
    let upper = !dir.is_positive();
    let axis = dir.axis();
    Octant::new(
        upper && axis == crate::Axis::X,
        upper && axis == crate::Axis::Y,
        upper && axis == crate::Axis::Z,
    )
}
