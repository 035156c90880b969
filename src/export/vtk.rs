use std::{
    fs::File,
    io::{BufWriter, Write},
    ops::ControlFlow,
    path::Path,
};

use crate::{CellLabel, OctNode, Octree, SurfaceMesh, Vector};

use super::ExportError;

/// VTK cell type of a hexahedron.
const VTK_HEXAHEDRON: u8 = 12;

/// Settings for [write_vtk].
#[derive(Debug, Clone, PartialEq)]
pub struct VtkOptions {
    /// Depth at which to cut the tree; shallower leaves are written as they are.
    pub level: u32,
    /// Added to every point.
    pub offset: Vector,
    /// Header line of the file.
    pub title: String,
}

impl Default for VtkOptions {
    fn default() -> Self {
        Self {
            level: u32::MAX,
            offset: Vector::zeros(),
            title: "octofem".to_owned(),
        }
    }
}

/// Write the cells of `tree` down to `opts.level` as a legacy ASCII VTK unstructured grid of
/// hexahedra, with `label`, `strain` and `out` cell scalars.
#[tracing::instrument(skip_all, fields(level = opts.level))]
pub fn write_vtk<M: SurfaceMesh>(
    tree: &Octree<M>,
    opts: &VtkOptions,
    out: &mut impl Write,
) -> Result<(), ExportError> {
    let mut cut = Vec::new();
    let flow = tree.traverse(tree.root(), &mut |n: &OctNode| {
        if n.level() == opts.level || (n.is_leaf() && n.level() < opts.level) {
            cut.push(n.index());
        }
        ControlFlow::Continue(())
    })?;
    debug_assert!(flow.is_continue());
    let cells: Vec<&OctNode> = cut.into_iter().map(|i| tree.node_unchecked(i)).collect();

    let title: String = opts.title.chars().filter(|c| *c != '\n').take(255).collect();
    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "{title}")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(out, "POINTS {} float", cells.len() * 8)?;
    for cell in &cells {
        for p in cell.bounds().corners() {
            let p = p + opts.offset;
            writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
        }
    }

    writeln!(out, "CELLS {} {}", cells.len(), cells.len() * 9)?;
    for i in 0..cells.len() {
        let b = i * 8;
        writeln!(
            out,
            "8 {} {} {} {} {} {} {} {}",
            b,
            b + 1,
            b + 2,
            b + 3,
            b + 4,
            b + 5,
            b + 6,
            b + 7
        )?;
    }

    writeln!(out, "CELL_TYPES {}", cells.len())?;
    for _ in &cells {
        writeln!(out, "{VTK_HEXAHEDRON}")?;
    }

    writeln!(out, "CELL_DATA {}", cells.len())?;
    writeln!(out, "SCALARS label int 1")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for cell in &cells {
        writeln!(out, "{}", cell.label() as u8)?;
    }
    writeln!(out, "SCALARS strain float 1")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for cell in &cells {
        writeln!(out, "{}", cell.strain())?;
    }
    writeln!(out, "SCALARS out int 1")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for cell in &cells {
        writeln!(out, "{}", u8::from(cell.label() == CellLabel::Exterior))?;
    }

    tracing::debug!(cells = cells.len(), "wrote VTK grid");
    Ok(())
}

/// [write_vtk] to a new file at `path`.
pub fn save_vtk<M: SurfaceMesh>(
    tree: &Octree<M>,
    opts: &VtkOptions,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_vtk(tree, opts, &mut out)?;
    out.flush()?;
    Ok(())
}
