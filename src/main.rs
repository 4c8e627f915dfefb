//! Command-line renderer for HypoDD relocation catalogs
//!
//! Run with: cargo run --features cli -- catalog.json --coastlines 10m

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use hypodd_plot::{load_catalog, HypoDdPlotter, OutputFormat, PlotConfig, ShapeConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot a catalog before and after HypoDD relocation", long_about = None)]
struct Cli {
    /// JSON event catalog.
    catalog: PathBuf,
    /// JSON plot configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file base name; "_original"/"_relocated" and the extension are appended.
    #[arg(long)]
    output: Option<String>,
    #[arg(long, num_args = 4, value_names = ["LON_MIN", "LON_MAX", "LAT_MIN", "LAT_MAX"], allow_negative_numbers = true)]
    map_extent: Option<Vec<f64>>,
    /// Depth range in km.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    depth_extent: Option<Vec<f64>>,
    /// Highlight events within RADIUS degrees of (LON, LAT).
    #[arg(long, num_args = 3, value_names = ["LON", "LAT", "RADIUS"], allow_negative_numbers = true, conflicts_with = "polygon")]
    circle: Option<Vec<f64>>,
    /// Highlight events inside the polygon given as LON,LAT vertices.
    /// Vertices may start with '-', so the list runs to the end of the
    /// command line: give this flag last.
    #[arg(long, num_args = 3.., value_parser = parse_vertex, allow_hyphen_values = true)]
    polygon: Option<Vec<(f64, f64)>>,
    /// Coastline resolution: 10m, 50m, 110m, auto, coarse, low, intermediate, high, full.
    #[arg(long)]
    coastlines: Option<String>,
    /// Directory holding <resolution>.json coastline files.
    #[arg(long)]
    coastline_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<Format>,
    /// Widen the map so the panels fill the whole figure.
    #[arg(long)]
    fill_figure: bool,
    /// Marker size in points.
    #[arg(long)]
    marker_size: Option<f64>,
    /// Magnitude drawn at --marker-size; other magnitudes scale around it.
    #[arg(long, allow_negative_numbers = true)]
    ref_mag: Option<f64>,
}

fn parse_vertex(s: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = s.split_once(',').ok_or_else(|| format!("expected LON,LAT, got {s:?}"))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| format!("longitude {lon:?}: {e}"))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("latitude {lat:?}: {e}"))?;
    Ok((lon, lat))
}

impl Cli {
    /// Apply command-line overrides on top of a (file or default) config.
    fn apply(&self, config: &mut PlotConfig) {
        if let Some(output) = &self.output {
            config.output_file_base_name = output.clone();
        }
        if self.map_extent.is_some() {
            config.map_extent = self.map_extent.clone();
        }
        if self.depth_extent.is_some() {
            config.depth_extent = self.depth_extent.clone();
        }
        if let Some(&[lon, lat, radius]) = self.circle.as_deref() {
            config.shape = ShapeConfig::Circle { lon, lat, radius };
        }
        if let Some(vertices) = &self.polygon {
            config.shape = ShapeConfig::Polygon { vertices: vertices.clone() };
        }
        if self.coastlines.is_some() {
            config.coastline_resolution = self.coastlines.clone();
        }
        if self.coastline_dir.is_some() {
            config.coastline_dir = self.coastline_dir.clone();
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        if self.fill_figure {
            config.fill_figure = true;
        }
        if let Some(size) = self.marker_size {
            config.marker_size = size;
        }
        if self.ref_mag.is_some() {
            config.ref_mag = self.ref_mag;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hypodd_plot=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlotConfig::load(path)?,
        None => PlotConfig::default(),
    };
    cli.apply(&mut config);
    debug!(?config, "Effective configuration");

    let catalog = load_catalog(&cli.catalog)?;
    info!(path = %cli.catalog.display(), events = catalog.len(), "Catalog read");

    let mut plotter = HypoDdPlotter::new(catalog, config)?;
    let (original, relocated) = plotter.plot()?;
    info!(original = %original.display(), relocated = %relocated.display(), "Done");
    Ok(())
}
