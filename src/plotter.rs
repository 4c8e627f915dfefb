//! Original vs relocated figure pair
//!
//! [`HypoDdPlotter`] draws the catalog twice, once at each event's first
//! origin and once at its last (relocated) origin. Both figures share the
//! same extents and layout so they can be flipped between.

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use tracing::{debug, info, warn};

use crate::config::PlotConfig;
use crate::core::{cluster_label, Catalog, ClusterLabel, Event, OriginChoice, Positions};
use crate::error::{ConfigError, PlotError, RenderError};
use crate::geometry::{compute_depth_extent, compute_map_extent, PanelLayout, Shape};
use crate::xsection::{
    classify, resolve_coastlines, Canvas, CoastlineDir, CoastlineSource, EventRenderer, NoCoastlines, OutputFormat,
    RenderStats,
};

/// Event attributes shared by both figures.
struct EventStyling {
    colors: Vec<RGBColor>,
    magnitudes: Vec<Option<f64>>,
    mask: Vec<bool>,
}

impl EventStyling {
    /// Colors and selection follow the relocated origin in both figures.
    fn new(events: &[&Event], relocated: &Positions, shape: Option<&Shape>) -> Self {
        let colors = events
            .iter()
            .map(|e| e.relocated_origin().map_or(ClusterLabel::Unclustered, cluster_label).color())
            .collect();
        let magnitudes = events.iter().map(|e| e.magnitude()).collect();
        let mask = classify(relocated, shape);
        Self { colors, magnitudes, mask }
    }
}

pub struct HypoDdPlotter {
    catalog: Catalog,
    config: PlotConfig,
    coastlines: Box<dyn CoastlineSource>,
    last_outputs: Option<(PathBuf, PathBuf)>,
    last_stats: Vec<RenderStats>,
}

impl HypoDdPlotter {
    /// Validate `config` and prepare a plotter. Coastlines are read from
    /// `config.coastline_dir` when set.
    pub fn new(catalog: Catalog, config: PlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let coastlines: Box<dyn CoastlineSource> = match &config.coastline_dir {
            Some(dir) => Box::new(CoastlineDir::new(dir)),
            None => Box::new(NoCoastlines),
        };
        Ok(Self { catalog, config, coastlines, last_outputs: None, last_stats: Vec::new() })
    }

    pub fn with_coastline_source(mut self, source: impl CoastlineSource + 'static) -> Self {
        self.coastlines = Box::new(source);
        self
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Paths written by the last successful [`HypoDdPlotter::plot_events`].
    pub fn last_outputs(&self) -> Option<&(PathBuf, PathBuf)> {
        self.last_outputs.as_ref()
    }

    /// Stats of the last original and relocated renders, in that order.
    pub fn last_stats(&self) -> &[RenderStats] {
        &self.last_stats
    }

    /// Plot with the output base, shape and coastlines from the config.
    pub fn plot(&mut self) -> Result<(PathBuf, PathBuf), PlotError> {
        let base = PathBuf::from(&self.config.output_file_base_name);
        let shape = self.config.shape.build()?;
        let coastlines = self.config.coastline_resolution.clone();
        self.plot_events(&base, shape.as_ref(), coastlines.as_deref())
    }

    /// Write `{file_base}_original.<ext>` and `{file_base}_relocated.<ext>`.
    ///
    /// Events outside `shape` are drawn muted. An unknown `coastlines`
    /// resolution is logged and the maps are drawn without coastlines.
    /// Either both files are written or, on error, neither is left behind.
    pub fn plot_events(
        &mut self,
        file_base: &Path,
        shape: Option<&Shape>,
        coastlines: Option<&str>,
    ) -> Result<(PathBuf, PathBuf), PlotError> {
        let events = self.catalog.plottable_events(self.config.missing)?;
        let original = Positions::from_events(&events, OriginChoice::Original)?;
        let relocated = Positions::from_events(&events, OriginChoice::Relocated)?;
        let styling = EventStyling::new(&events, &relocated, shape);

        // Extents come from the original locations and are reused unchanged
        // for the relocated figure.
        let map_extent = compute_map_extent(
            self.config.map_extent.as_deref(),
            Some(&original.lat_lon()),
            self.config.buffer_fraction,
        )?;
        let depth_extent = compute_depth_extent(
            self.config.depth_extent.as_deref(),
            Some(&original.depths_km()),
            self.config.buffer_fraction,
        )?;
        let figure = self.config.figure.geometry();
        let layout = PanelLayout::compute(&figure, map_extent, depth_extent, self.config.fill_figure)?;
        self.config.projection.check_extent(&layout.map_extent)?;

        let mut renderer = EventRenderer::new(self.config.projection, self.config.marker_style())
            .with_gridlines(self.config.gridlines)
            .with_axis_labels(self.config.axis_labels);
        if let Some(shape) = shape {
            renderer = renderer.with_shape(shape);
        }
        if let Some(resolution) = resolve_coastlines(coastlines) {
            renderer = renderer.with_coastlines(self.coastlines.polylines(resolution, &layout.map_extent));
        }

        let format = self.config.format;
        let original_path = output_path(file_base, "original", format);
        let relocated_path = output_path(file_base, "relocated", format);
        ensure_parent(&original_path)?;

        let original_stats = self.render_figure(&renderer, &original_path, &layout, &original, &styling)?;
        info!(path = %original_path.display(), "Figure saved");
        let relocated_stats = match self.render_figure(&renderer, &relocated_path, &layout, &relocated, &styling) {
            Ok(stats) => stats,
            Err(e) => {
                remove_orphan(&original_path);
                return Err(e);
            }
        };
        info!(path = %relocated_path.display(), "Figure saved");
        let stats = vec![original_stats, relocated_stats];

        self.last_stats = stats;
        self.last_outputs = Some((original_path.clone(), relocated_path.clone()));
        Ok((original_path, relocated_path))
    }

    fn render_figure(
        &self,
        renderer: &EventRenderer,
        path: &Path,
        layout: &PanelLayout,
        positions: &Positions,
        styling: &EventStyling,
    ) -> Result<RenderStats, PlotError> {
        let figure = self.config.figure.geometry();
        let dpi = self.config.figure.dpi;
        debug!(path = %path.display(), events = positions.len(), "Rendering figure");
        match self.config.format {
            OutputFormat::Png => {
                let canvas = Canvas::png(path, figure, dpi);
                let stats =
                    renderer.render(&canvas, layout, positions, &styling.colors, &styling.magnitudes, &styling.mask)?;
                canvas.present()?;
                Ok(stats)
            }
            OutputFormat::Svg => {
                let canvas = Canvas::svg(path, figure, dpi);
                let stats =
                    renderer.render(&canvas, layout, positions, &styling.colors, &styling.magnitudes, &styling.mask)?;
                canvas.present()?;
                Ok(stats)
            }
        }
    }
}

/// `{base}_{suffix}.{ext}`; the base may contain dots.
pub fn output_path(base: &Path, suffix: &str, format: OutputFormat) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{suffix}.{}", format.extension()));
    PathBuf::from(name)
}

/// Drop the first figure of a pair whose second figure failed.
fn remove_orphan(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed unpaired figure"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove unpaired figure"),
    }
}

fn ensure_parent(path: &Path) -> Result<(), RenderError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::Io { path: dir.to_path_buf(), source })
        }
        _ => Ok(()),
    }
}
