//! Error taxonomy
//!
//! - ConfigError: rejected before any drawing begins
//! - DataError: problems with the catalog content
//! - RenderError: drawing backend or file output failures

use std::path::PathBuf;

use thiserror::Error;

/// Invalid extents, degenerate shapes, bad figure geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("map_extent must have 4 values [lon_min, lon_max, lat_min, lat_max], got {0}")]
    MapExtentArity(usize),
    #[error("depth_extent must have 2 values [depth_min, depth_max], got {0}")]
    DepthExtentArity(usize),
    #[error("{axis} extent: min ({min}) must be < max ({max})")]
    InvertedExtent { axis: &'static str, min: f64, max: f64 },
    #[error("{axis} extent has zero range ({value})")]
    ZeroRange { axis: &'static str, value: f64 },
    #[error("latitude extent [{min}, {max}] reaches beyond [-90, 90]")]
    LatitudeOutOfRange { min: f64, max: f64 },
    #[error("{projection} cannot show latitude {lat}; limit is +/-{limit}")]
    ProjectionLatitude { projection: &'static str, lat: f64, limit: f64 },
    #[error("{axis} extent contains a non-finite value")]
    NonFiniteExtent { axis: &'static str },
    #[error("need either an explicit {0} extent or event samples")]
    MissingExtentSource(&'static str),
    #[error("no samples to derive the {0} extent from")]
    EmptySamples(&'static str),
    #[error("buffer_fraction must be finite and >= 0, got {0}")]
    InvalidBuffer(f64),
    #[error("circle radius must be > 0 degrees, got {0}")]
    InvalidRadius(f64),
    #[error("shape coordinates must be finite")]
    NonFiniteShape,
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    DegeneratePolygon(usize),
    #[error("figure {0}")]
    InvalidFigure(String),
    #[error("marker_size must be > 0, got {0}")]
    InvalidMarkerSize(f64),
    #[error("failed to read config {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Problems with catalog content.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("catalog contains no events")]
    EmptyCatalog,
    #[error("event {index} has no origins")]
    NoOrigins { index: usize },
    #[error("event {index}: origin is missing {field}")]
    MissingCoordinate { index: usize, field: &'static str },
    #[error("malformed catalog: {0}")]
    Malformed(String),
    #[error("failed to read catalog {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch { what: &'static str, got: usize, expected: usize },
}

/// Drawing backend or file output failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything the plotting pipeline can fail with.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
