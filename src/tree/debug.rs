use std::fmt::Display;

use crate::{Octree, SurfaceMesh};

impl<M: SurfaceMesh> Display for Octree<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Octree (root: {}, height: {}, {} nodes, {} boundary / {} interior leaves) {{",
            self.root(),
            self.height(),
            self.len(),
            self.boundary_leaves().len(),
            self.interior_leaves().len(),
        )?;
        let mut stack = vec![self.root()];
        while let Some(idx) = stack.pop() {
            let node = self.node_unchecked(idx);
            let indent = "  ".repeat(node.level() as usize + 1);
            let c = node.code();
            match node.children() {
                None => write!(
                    f,
                    "\n{indent}<L @ {idx}> {} {:?} {} ({} vertices, {} faces)",
                    c.level,
                    c.axes,
                    node.label(),
                    node.elements().vertices().len(),
                    node.elements().faces().len(),
                )?,
                Some(children) => {
                    write!(f, "\n{indent}<B @ {idx}> {} {:?}", c.level, c.axes)?;
                    stack.extend(children.iter().rev());
                }
            }
        }
        write!(f, "\n}}")
    }
}
