//! HypoDD relocation plots
//!
//! Draws an earthquake catalog as a map with two depth cross-sections:
//! - Map view (longitude vs latitude), projected
//! - Longitude vs depth strip below the map
//! - Depth vs latitude strip right of the map
//!
//! All three share one kilometer scale. [`HypoDdPlotter`] writes the same
//! catalog twice, before and after relocation, with identical extents.

pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod plotter;
pub mod theme;
pub mod xsection;

pub use config::{FigureConfig, PlotConfig, ShapeConfig};
pub use crate::core::{load_catalog, parse_catalog, Catalog, Event, MissingPolicy, Origin};
pub use error::{ConfigError, DataError, PlotError, RenderError};
pub use geometry::{FigureGeometry, PanelLayout, Projection, Shape};
pub use plotter::HypoDdPlotter;
pub use xsection::{CoastlineResolution, EventRenderer, OutputFormat};
