use std::path::PathBuf;

use clap::ValueHint;
use nalgebra::Vector3;

use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,octofem=info,classify=info",
        env = "OCTOFEM_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Depth to partition the mesh's bounding cube to
    #[arg(short = 'L', long, default_value_t = 5)]
    pub level: u32,
    /// Padding around the mesh, as a fraction of its largest extent
    #[arg(short, long, default_value_t = octofem::PartitionConfig::DEFAULT_MARGIN)]
    pub margin: f32,
    /// Write the classified cells to this VTK file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub vtk: Option<PathBuf>,
    /// Depth at which to cut the tree for VTK output; defaults to the partition depth
    #[arg(long)]
    pub vtk_level: Option<u32>,
    /// Offset added to every VTK point
    #[arg(long, default_value = "0,0,0", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z")]
    pub vtk_offset: Vector3<f32>,
    /// Write interior cells as hexahedral elements to this INP deck
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub inp: Option<PathBuf>,
    /// Faces whose deck nodes get a point load along the face normal; comma-separated
    #[arg(long, value_delimiter = ',', requires = "inp")]
    pub load_faces: Vec<u32>,
    /// Magnitude of each point load
    #[arg(long, default_value_t = 1.0)]
    pub load: f32,
    /// Faces whose deck nodes are held in place; comma-separated
    #[arg(long, value_delimiter = ',', requires = "inp")]
    pub fixed_faces: Vec<u32>,
    /// Surface mesh to classify
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || split.next().ok_or("expected three comma-separated components");
    let x = R::from_str(next()?.trim())?;
    let y = R::from_str(next()?.trim())?;
    let z = R::from_str(next()?.trim())?;
    Ok(nalgebra::vector![x, y, z])
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
