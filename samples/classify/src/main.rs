use clap::Parser;
use octofem::{
    export::{save_vtk, Deck, ExportError, VtkOptions},
    CellLabel, FaceId, Octree, PartitionConfig, TriMesh,
};

mod cli;
use cli::*;

#[derive(Debug, thiserror::Error)]
enum ClassifyError {
    #[error(transparent)]
    Tree(#[from] octofem::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn run(args: &Cli) -> Result<(), ClassifyError> {
    let mesh = TriMesh::load_obj(&args.file)?;
    let config = PartitionConfig::new(args.level).with_margin(args.margin);
    let tree = Octree::voxelize(mesh, config)?;

    let counts = tree.label_counts();
    tracing::info!(
        exterior = counts[CellLabel::Exterior],
        boundary = counts[CellLabel::Boundary],
        boundary_special = counts[CellLabel::BoundarySpecial],
        interior = counts[CellLabel::Interior],
        undefined = counts[CellLabel::Undefined],
        "classified {}",
        args.file.display()
    );
    if let Some(d) = tree.degeneracy() {
        tracing::warn!(reason = %d, "nothing was classified");
    }

    if let Some(path) = &args.vtk {
        let opts = VtkOptions {
            level: args.vtk_level.unwrap_or(args.level),
            offset: args.vtk_offset,
            title: args.file.display().to_string(),
        };
        save_vtk(&tree, &opts, path)?;
        tracing::info!(path = %path.display(), "wrote VTK file");
    }

    if let Some(path) = &args.inp {
        let deck = Deck::build(&tree);
        deck.save_base(&args.file.display().to_string(), path)?;
        let load_faces: Vec<FaceId> = args.load_faces.iter().copied().map(FaceId).collect();
        let fixed_faces: Vec<FaceId> = args.fixed_faces.iter().copied().map(FaceId).collect();
        let loaded = if load_faces.is_empty() {
            0
        } else {
            deck.append_forces(&tree, &load_faces, args.load, path)?
        };
        let fixed = if fixed_faces.is_empty() {
            0
        } else {
            deck.append_constraints(&tree, &fixed_faces, path)?
        };
        tracing::info!(
            path = %path.display(),
            elements = deck.element_count(),
            nodes = deck.node_count(),
            loaded,
            fixed,
            "wrote INP deck"
        );
    }

    Ok(())
}

pub fn main() {
    let args = Cli::parse();
    initialize_tracing(&args.log_filter, args.log_format);

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
