use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Axis, FaceId, OctNode, Octree, Point, Real, SurfaceMesh, Vector};

use super::ExportError;

/// Grid offsets of the corners of a cell, in [Aabb::corners](crate::spatial::Aabb::corners)
/// order.
const CORNERS: [[u32; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Node ids per line of an `*NSET` block.
const NSET_WIDTH: usize = 16;

/// A finite-element deck built from the interior of a labelled [Octree]: one 8-node hexahedron
/// per [Interior](crate::CellLabel::Interior) leaf.
///
/// Nodes are shared between elements by their position on the grid of the tree's deepest level,
/// so ids are stable no matter which element reaches a node first. Element and node ids start at
/// 1.
#[derive(Debug, Clone)]
pub struct Deck {
    origin: Point,
    spacing: Real,
    height: u32,
    nodes: Vec<[u32; 3]>,
    node_ids: HashMap<[u32; 3], u32>,
    elements: Vec<[u32; 8]>,
}

impl Deck {
    #[tracing::instrument(skip_all)]
    pub fn build<M: SurfaceMesh>(tree: &Octree<M>) -> Self {
        let height = tree.height();
        let mut res = Self {
            origin: tree.cube().origin,
            spacing: tree.cube().cell_length(height),
            height,
            nodes: Vec::new(),
            node_ids: HashMap::new(),
            elements: Vec::new(),
        };
        for &idx in tree.interior_leaves() {
            let corners = grid_corners(tree.node_unchecked(idx), height);
            let element = corners.map(|key| res.node_id_or_insert(key));
            res.elements.push(element);
        }
        tracing::debug!(
            nodes = res.nodes.len(),
            elements = res.elements.len(),
            "built deck"
        );
        res
    }

    fn node_id_or_insert(&mut self, key: [u32; 3]) -> u32 {
        let next = self.nodes.len() as u32 + 1;
        let id = *self.node_ids.entry(key).or_insert(next);
        if id == next {
            self.nodes.push(key);
        }
        id
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Position of the node with id `id`.
    pub fn node_position(&self, id: u32) -> Option<Point> {
        let key = self.nodes.get((id as usize).checked_sub(1)?)?;
        Some(self.origin + Vector::from(key.map(|k| k as Real)) * self.spacing)
    }

    /// Node ids of each element, in element id order.
    pub fn elements(&self) -> &[[u32; 8]] {
        &self.elements
    }

    /// Write the `*NODE` and `*ELEMENT` sections.
    pub fn write_base(&self, title: &str, out: &mut impl Write) -> Result<(), ExportError> {
        writeln!(out, "*HEADING")?;
        writeln!(out, "{}", title.lines().next().unwrap_or_default())?;
        writeln!(out, "*NODE")?;
        for id in 1..=self.nodes.len() as u32 {
            if let Some(p) = self.node_position(id) {
                writeln!(out, "{id}, {}, {}, {}", p.x, p.y, p.z)?;
            }
        }
        writeln!(out, "*ELEMENT, TYPE=C3D8, ELSET=INTERIOR")?;
        for (i, e) in self.elements.iter().enumerate() {
            write!(out, "{}", i + 1)?;
            for n in e {
                write!(out, ", {n}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Ids of deck nodes lying on a surface leaf which carries face `face`.
    ///
    /// # Errors
    /// * [ExportError::UnknownFace] if the mesh has no face `face`
    pub fn surface_nodes<M: SurfaceMesh>(
        &self,
        tree: &Octree<M>,
        face: FaceId,
    ) -> Result<BTreeSet<u32>, ExportError> {
        let count = tree.mesh().face_count();
        if face.0 as usize >= count {
            return Err(ExportError::UnknownFace { face, count });
        }
        let mut res = BTreeSet::new();
        for &idx in tree.boundary_leaves() {
            let leaf = tree.get(idx)?;
            if !leaf.elements().faces().contains(&face) {
                continue;
            }
            res.extend(
                grid_corners(leaf, self.height)
                    .iter()
                    .filter_map(|key| self.node_ids.get(key).copied()),
            );
        }
        Ok(res)
    }

    /// Write a `*CLOAD` of `magnitude` along each face's normal onto every node of
    /// [Self::surface_nodes]. Loads from several faces on one node add up.
    ///
    /// Returns the number of loaded nodes.
    #[tracing::instrument(skip(self, tree, out))]
    pub fn write_forces<M: SurfaceMesh>(
        &self,
        tree: &Octree<M>,
        faces: &[FaceId],
        magnitude: Real,
        out: &mut impl Write,
    ) -> Result<usize, ExportError> {
        let mut loads: BTreeMap<u32, Vector> = BTreeMap::new();
        for &face in faces {
            let nodes = self.surface_nodes(tree, face)?;
            let Some(normal) = tree.mesh().face_normal(face) else {
                tracing::warn!(?face, "skipping load on degenerate face");
                continue;
            };
            for n in nodes {
                *loads.entry(n).or_insert_with(Vector::zeros) += normal * magnitude;
            }
        }
        if loads.is_empty() {
            tracing::warn!("no deck nodes to load");
            return Ok(0);
        }
        writeln!(out, "*CLOAD")?;
        for (n, f) in &loads {
            for axis in Axis::ALL {
                writeln!(out, "{n}, {}, {}", axis.index() + 1, f[axis.index()])?;
            }
        }
        Ok(loads.len())
    }

    /// Pin every node of [Self::surface_nodes] for each face in place, through an `NSET` named
    /// `FIXED`.
    ///
    /// Returns the number of fixed nodes.
    #[tracing::instrument(skip(self, tree, out))]
    pub fn write_constraints<M: SurfaceMesh>(
        &self,
        tree: &Octree<M>,
        faces: &[FaceId],
        out: &mut impl Write,
    ) -> Result<usize, ExportError> {
        let mut fixed = BTreeSet::new();
        for &face in faces {
            fixed.append(&mut self.surface_nodes(tree, face)?);
        }
        if fixed.is_empty() {
            tracing::warn!("no deck nodes to fix");
            return Ok(0);
        }
        writeln!(out, "*NSET, NSET=FIXED")?;
        let ids: Vec<String> = fixed.iter().map(u32::to_string).collect();
        for line in ids.chunks(NSET_WIDTH) {
            writeln!(out, "{}", line.join(", "))?;
        }
        writeln!(out, "*BOUNDARY")?;
        writeln!(out, "FIXED, 1, 3")?;
        Ok(fixed.len())
    }

    /// [Self::write_base] to a new file at `path`.
    pub fn save_base(&self, title: &str, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_base(title, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// [Self::write_forces] onto the end of an existing deck.
    pub fn append_forces<M: SurfaceMesh>(
        &self,
        tree: &Octree<M>,
        faces: &[FaceId],
        magnitude: Real,
        path: impl AsRef<Path>,
    ) -> Result<usize, ExportError> {
        let mut out = BufWriter::new(OpenOptions::new().append(true).open(path)?);
        let res = self.write_forces(tree, faces, magnitude, &mut out)?;
        out.flush()?;
        Ok(res)
    }

    /// [Self::write_constraints] onto the end of an existing deck.
    pub fn append_constraints<M: SurfaceMesh>(
        &self,
        tree: &Octree<M>,
        faces: &[FaceId],
        path: impl AsRef<Path>,
    ) -> Result<usize, ExportError> {
        let mut out = BufWriter::new(OpenOptions::new().append(true).open(path)?);
        let res = self.write_constraints(tree, faces, &mut out)?;
        out.flush()?;
        Ok(res)
    }
}

/// Corners of `node` on the grid of cells at `height`.
fn grid_corners(node: &OctNode, height: u32) -> [[u32; 3]; 8] {
    let scale = 1u32 << height.saturating_sub(node.level());
    let base = Axis::ALL.map(|a| node.code().cell_index(a) * scale);
    CORNERS.map(|off| [0, 1, 2].map(|i| base[i] + off[i] * scale))
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::*;
    use crate::{CellLabel, PartitionConfig, TriMesh};

    fn unit_cube() -> TriMesh {
        TriMesh::new(
            (0..8)
                .map(|i: u32| {
                    point![
                        (i >> 2 & 1) as Real,
                        (i >> 1 & 1) as Real,
                        (i & 1) as Real
                    ]
                })
                .collect(),
            vec![
                [0, 1, 3],
                [0, 3, 2],
                [4, 6, 7],
                [4, 7, 5],
                [0, 4, 5],
                [0, 5, 1],
                [2, 3, 7],
                [2, 7, 6],
                [0, 2, 6],
                [0, 6, 4],
                [1, 5, 7],
                [1, 7, 3],
            ],
        )
        .unwrap()
    }

    fn text(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn shared_nodes() {
        let tree = Octree::voxelize(unit_cube(), PartitionConfig::new(3)).unwrap();
        let deck = Deck::build(&tree);
        assert_eq!(deck.element_count(), 64);
        assert_eq!(deck.node_count(), 125);
        assert!(deck.node_position(0).is_none());
        assert!(deck.node_position(126).is_none());

        let base = text(|b| deck.write_base("cube", b).unwrap());
        assert!(base.starts_with("*HEADING\ncube\n*NODE\n1, "));
        assert!(base.contains("\n*ELEMENT, TYPE=C3D8, ELSET=INTERIOR\n1, 1, 2, 3, 4, 5, 6, 7, 8\n"));
        assert_eq!(base.lines().count(), 4 + 125 + 64);

        // first element's first node is the lowest corner of the interior block
        let p = deck.node_position(1).unwrap();
        assert!((p - point![0.125, 0.125, 0.125]).norm() < 1e-6);
    }

    #[test]
    fn refined_interior() {
        let mut tree = Octree::voxelize(unit_cube(), PartitionConfig::new(3)).unwrap();
        let inner = tree.interior_leaves()[0];
        let finer = tree
            .partition_to_level(inner, 4, CellLabel::Interior)
            .unwrap();
        assert_eq!(tree.interior_leaves().len(), 64 - 1 + 8);

        let deck = Deck::build(&tree);
        assert_eq!(deck.element_count(), 71);
        // on the level 4 grid, the refined cell adds its center and the centers of its faces
        // and edges to the 125 corner nodes of the coarse block
        assert_eq!(deck.node_count(), 125 + 1 + 6 + 12);
        let first = grid_corners(tree.get(finer[0]).unwrap(), 4);
        assert!(deck.elements().iter().any(|e| {
            e.iter()
                .zip(first)
                .all(|(&id, key)| deck.node_ids.get(&key) == Some(&id))
        }));
    }

    #[test]
    fn loads_and_constraints() {
        let tree = Octree::voxelize(unit_cube(), PartitionConfig::new(3)).unwrap();
        let deck = Deck::build(&tree);

        // both halves of the x = 0 side
        assert_eq!(deck.surface_nodes(&tree, FaceId(0)).unwrap().len(), 25);
        let mut n = 0;
        let loads = text(|b| n = deck.write_forces(&tree, &[FaceId(0)], 2.0, b).unwrap());
        assert_eq!(n, 25);
        assert!(loads.starts_with("*CLOAD\n"));
        assert_eq!(loads.lines().filter(|l| l.ends_with(", 1, -2")).count(), 25);

        let fixed = text(|b| {
            n = deck
                .write_constraints(&tree, &[FaceId(8), FaceId(9)], b)
                .unwrap()
        });
        assert_eq!(n, 25);
        assert!(fixed.starts_with("*NSET, NSET=FIXED\n"));
        assert!(fixed.ends_with("*BOUNDARY\nFIXED, 1, 3\n"));

        assert!(matches!(
            deck.surface_nodes(&tree, FaceId(12)),
            Err(ExportError::UnknownFace { count: 12, .. })
        ));
    }
}
