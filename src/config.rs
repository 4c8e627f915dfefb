//! Plot configuration
//!
//! Loaded from a JSON file; every field has a default so a partial file (or
//! none at all) is valid. CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::MissingPolicy;
use crate::error::ConfigError;
use crate::geometry::{FigureGeometry, Projection, Shape, DEFAULT_BUFFER_FRACTION};
use crate::xsection::{MarkerStyle, OutputFormat};

fn default_buffer_fraction() -> f64 {
    DEFAULT_BUFFER_FRACTION
}

fn default_marker_size() -> f64 {
    1.0
}

fn default_output_base() -> String {
    "hypoDDpy".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dpi() -> f64 {
    100.0
}

/// Selection shape as written in configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    #[default]
    None,
    /// Center and radius in degrees.
    Circle { lon: f64, lat: f64, radius: f64 },
    /// (lon, lat) vertices; the ring is closed automatically.
    Polygon { vertices: Vec<(f64, f64)> },
}

impl ShapeConfig {
    pub fn build(&self) -> Result<Option<Shape>, ConfigError> {
        match self {
            ShapeConfig::None => Ok(None),
            ShapeConfig::Circle { lon, lat, radius } => Shape::circle(*lon, *lat, *radius).map(Some),
            ShapeConfig::Polygon { vertices } => Shape::polygon(vertices).map(Some),
        }
    }
}

/// Figure size and margins in inches, plus output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
    pub dpi: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        let g = FigureGeometry::default();
        Self {
            width: g.width_in,
            height: g.height_in,
            pad_left: g.pad_left,
            pad_right: g.pad_right,
            pad_top: g.pad_top,
            pad_bottom: g.pad_bottom,
            dpi: default_dpi(),
        }
    }
}

impl FigureConfig {
    pub fn geometry(&self) -> FigureGeometry {
        FigureGeometry {
            width_in: self.width,
            height_in: self.height,
            pad_left: self.pad_left,
            pad_right: self.pad_right,
            pad_top: self.pad_top,
            pad_bottom: self.pad_bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// [lon_min, lon_max, lat_min, lat_max]; derived from events when unset.
    #[serde(default)]
    pub map_extent: Option<Vec<f64>>,
    /// [depth_min, depth_max] in km; derived from events when unset.
    #[serde(default)]
    pub depth_extent: Option<Vec<f64>>,
    /// "10m", "50m", "110m" or a GSHHS level; unknown names disable coastlines.
    #[serde(default)]
    pub coastline_resolution: Option<String>,
    #[serde(default)]
    pub coastline_dir: Option<PathBuf>,
    #[serde(default = "default_buffer_fraction")]
    pub buffer_fraction: f64,
    #[serde(default)]
    pub fill_figure: bool,
    /// Marker size in points.
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    #[serde(default)]
    pub ref_mag: Option<f64>,
    #[serde(default)]
    pub shape: ShapeConfig,
    #[serde(default = "default_output_base")]
    pub output_file_base_name: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub figure: FigureConfig,
    #[serde(default = "default_true")]
    pub gridlines: bool,
    #[serde(default = "default_true")]
    pub axis_labels: bool,
    #[serde(default)]
    pub missing: MissingPolicy,
    #[serde(default)]
    pub projection: Projection,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            map_extent: None,
            depth_extent: None,
            coastline_resolution: None,
            coastline_dir: None,
            buffer_fraction: default_buffer_fraction(),
            fill_figure: false,
            marker_size: default_marker_size(),
            ref_mag: None,
            shape: ShapeConfig::None,
            output_file_base_name: default_output_base(),
            format: OutputFormat::default(),
            figure: FigureConfig::default(),
            gridlines: true,
            axis_labels: true,
            missing: MissingPolicy::default(),
            projection: Projection::default(),
        }
    }
}

impl PlotConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |reason: String| ConfigError::Unreadable { path: path.to_path_buf(), reason };
        let text = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let config: PlotConfig = serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Reject values no figure can be drawn with. Extents are checked again
    /// when they are resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(extent) = &self.map_extent {
            if extent.len() != 4 {
                return Err(ConfigError::MapExtentArity(extent.len()));
            }
        }
        if let Some(extent) = &self.depth_extent {
            if extent.len() != 2 {
                return Err(ConfigError::DepthExtentArity(extent.len()));
            }
        }
        if !self.buffer_fraction.is_finite() || self.buffer_fraction < 0.0 {
            return Err(ConfigError::InvalidBuffer(self.buffer_fraction));
        }
        if !self.marker_size.is_finite() || self.marker_size <= 0.0 {
            return Err(ConfigError::InvalidMarkerSize(self.marker_size));
        }
        if !self.figure.dpi.is_finite() || self.figure.dpi <= 0.0 {
            return Err(ConfigError::InvalidFigure(format!("dpi must be > 0, got {}", self.figure.dpi)));
        }
        self.figure.geometry().validate()?;
        self.shape.build()?;
        Ok(())
    }

    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle { size: self.marker_size, ref_mag: self.ref_mag }
    }
}
