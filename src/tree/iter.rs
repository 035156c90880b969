use std::{iter::FusedIterator, ops::ControlFlow};

use crate::{Error, NodeIndex, OctNode, Octree, SurfaceMesh};

/// Something called once per node by [Octree::traverse].
///
/// Implemented for every `FnMut(&OctNode) -> ControlFlow<()>`.
pub trait Visitor {
    /// Inspect a node; [ControlFlow::Break] ends the traversal immediately.
    fn visit(&mut self, node: &OctNode) -> ControlFlow<()>;
}

impl<F: FnMut(&OctNode) -> ControlFlow<()>> Visitor for F {
    #[inline]
    fn visit(&mut self, node: &OctNode) -> ControlFlow<()> {
        self(node)
    }
}

/// A depth-first iterator over the leaves of an [Octree], with siblings in
/// [Octant](crate::Octant) order.
pub struct LeafIter<'tree, M: SurfaceMesh> {
    pub(crate) tree: &'tree Octree<M>,
    pub(crate) node_stack: Vec<NodeIndex>,
}

impl<'tree, M: SurfaceMesh> FusedIterator for LeafIter<'tree, M> {}

impl<'tree, M: SurfaceMesh> Iterator for LeafIter<'tree, M> {
    type Item = &'tree OctNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.node_stack.pop() {
            let node = self.tree.node_unchecked(idx);
            match node.children() {
                None => return Some(node),
                Some(children) => self.node_stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

impl<M: SurfaceMesh> Octree<M> {
    /// Every leaf, depth-first.
    pub fn leaves(&self) -> LeafIter<'_, M> {
        LeafIter {
            tree: self,
            node_stack: vec![self.root()],
        }
    }

    /// Visit `start` and each of its descendants in pre-order, stopping as soon as `visitor`
    /// breaks.
    ///
    /// Returns whether the traversal was cut short.
    ///
    /// # Errors
    /// * [Error::InvalidIndex] if there's no node at `start`
    pub fn traverse<V: Visitor + ?Sized>(
        &self,
        start: NodeIndex,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>, Error> {
        self.get(start)?;
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            let node = self.node_unchecked(idx);
            if visitor.visit(node).is_break() {
                return Ok(ControlFlow::Break(()));
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::*;
    use crate::{Octant, PartitionConfig, TriMesh};

    fn tree() -> Octree {
        let mesh = TriMesh::new(
            vec![
                point![0.0, 0.0, 0.0],
                point![1.0, 0.0, 0.0],
                point![0.0, 1.0, 0.0],
                point![0.0, 0.0, 1.0],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap();
        let mut tree = Octree::new(mesh, PartitionConfig::new(2)).unwrap();
        tree.partition();
        tree
    }

    #[test]
    fn pre_order() {
        let tree = tree();
        let mut seen = Vec::new();
        let flow = tree
            .traverse(tree.root(), &mut |n: &OctNode| {
                seen.push((n.morton(), n.level()));
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen.len(), tree.len());
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted);
    }

    #[test]
    fn break_stops_immediately() {
        let tree = tree();
        let mut count = 0;
        let flow = tree
            .traverse(tree.root(), &mut |_: &OctNode| {
                count += 1;
                if count == 5 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 5);
    }

    #[test]
    fn subtree_and_visitor_impls() {
        struct Counter(usize);
        impl Visitor for Counter {
            fn visit(&mut self, _: &OctNode) -> ControlFlow<()> {
                self.0 += 1;
                ControlFlow::Continue(())
            }
        }

        let tree = tree();
        let child = tree
            .get(tree.root())
            .unwrap()
            .child(Octant(3))
            .unwrap();
        let mut counter = Counter(0);
        tree.traverse(child, &mut counter).unwrap();
        assert_eq!(counter.0, 9);
        assert!(tree.traverse(1000, &mut counter).is_err());
    }

    #[test]
    fn leaves_in_octant_order() {
        let tree = tree();
        let keys: Vec<_> = tree.leaves().map(|l| l.morton()).collect();
        assert_eq!(keys.len(), 64);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}
