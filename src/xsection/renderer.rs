//! Three-panel event renderer on plotters
//!
//! Each figure is drawn on its own [`Canvas`]. Events are painted twice: a
//! muted layer with every event, then the selected events (inside the shape,
//! or all of them) in their cluster colors on top.

use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::coastline::Polyline;
use crate::core::Positions;
use crate::error::{DataError, PlotError, RenderError};
use crate::geometry::{FigureGeometry, PanelLayout, Projection, Rect, Shape};
use crate::theme::{colors, FONT_FAMILY, POINTS_PER_INCH};

const TICK_COUNT: usize = 5;
const TICK_FONT_PT: f64 = 8.0;
const DESC_FONT_PT: f64 = 9.0;

// ============================================================================
// Output surface
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Figure size in pixels at `dpi`.
pub fn figure_pixels(figure: &FigureGeometry, dpi: f64) -> (u32, u32) {
    (
        (figure.width_in * dpi).round().max(1.0) as u32,
        (figure.height_in * dpi).round().max(1.0) as u32,
    )
}

/// Drawing surface for exactly one figure.
pub struct Canvas<DB: DrawingBackend> {
    root: DrawingArea<DB, Shift>,
    figure: FigureGeometry,
    dpi: f64,
}

impl<'a> Canvas<BitMapBackend<'a>> {
    pub fn png(path: &'a Path, figure: FigureGeometry, dpi: f64) -> Self {
        Self::from_backend(BitMapBackend::new(path, figure_pixels(&figure, dpi)), figure, dpi)
    }
}

impl<'a> Canvas<SVGBackend<'a>> {
    pub fn svg(path: &'a Path, figure: FigureGeometry, dpi: f64) -> Self {
        Self::from_backend(SVGBackend::new(path, figure_pixels(&figure, dpi)), figure, dpi)
    }
}

impl<DB: DrawingBackend> Canvas<DB> {
    /// Wrap an already sized backend. Its pixel size should match
    /// [`figure_pixels`].
    pub fn from_backend(backend: DB, figure: FigureGeometry, dpi: f64) -> Self {
        Self { root: backend.into_drawing_area(), figure, dpi }
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.root.dim_in_pixel()
    }

    pub fn figure(&self) -> &FigureGeometry {
        &self.figure
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }

    fn inches_to_px(&self, inches: f64) -> i32 {
        (inches * self.dpi).round() as i32
    }

    /// Flush the figure to its destination.
    pub fn present(self) -> Result<(), RenderError> {
        self.root.present().map_err(draw_err)
    }
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

// ============================================================================
// Markers
// ============================================================================

/// Event marker size, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub size: f64,
    /// Magnitude drawn at `size`; others scale by `3^((mag - ref_mag) / 2)`.
    pub ref_mag: Option<f64>,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { size: 1.0, ref_mag: None }
    }
}

impl MarkerStyle {
    /// Marker radius in pixels, never below one pixel.
    pub fn radius_px(&self, magnitude: Option<f64>, dpi: f64) -> u32 {
        let points = match (self.ref_mag, magnitude) {
            (Some(ref_mag), Some(mag)) => self.size * 3f64.powf((mag - ref_mag) / 2.0),
            _ => self.size,
        };
        (points * dpi / POINTS_PER_INCH).round().max(1.0) as u32
    }
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    radius: u32,
    color: RGBColor,
    selected: bool,
}

/// Inside-shape flag per event; everything is selected without a shape.
pub fn classify(positions: &Positions, shape: Option<&Shape>) -> Vec<bool> {
    match shape {
        Some(shape) => positions.points.iter().map(|p| shape.contains(p.longitude, p.latitude)).collect(),
        None => vec![true; positions.len()],
    }
}

// ============================================================================
// Panels
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum XLabels {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
enum YLabels {
    Left,
    Right,
}

type Formatter<'f> = &'f dyn Fn(&f64) -> String;

struct Panel<'f> {
    name: &'static str,
    rect: Rect,
    x: Range<f64>,
    y: Range<f64>,
    x_labels: XLabels,
    y_labels: YLabels,
    x_desc: Option<&'static str>,
    y_desc: Option<&'static str>,
    grid: bool,
    x_fmt: Formatter<'f>,
    y_fmt: Formatter<'f>,
}

impl Panel<'_> {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        within(&self.x, x) && within(&self.y, y)
    }
}

fn within(range: &Range<f64>, v: f64) -> bool {
    v >= range.start.min(range.end) && v <= range.start.max(range.end)
}

/// Split a polyline into the runs of consecutive vertices that pass `keep`.
fn clip_runs(line: &[(f64, f64)], keep: impl Fn((f64, f64)) -> bool) -> Vec<Polyline> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &p in line {
        if keep(p) {
            current.push(p);
        } else if current.len() > 1 {
            runs.push(std::mem::take(&mut current));
        } else {
            current.clear();
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

/// Gridlines at the panel's tick positions, for panels drawn without a mesh.
fn grid_lines(panel: &Panel<'_>) -> Vec<Polyline> {
    let xs = RangedCoordf64::from(panel.x.clone()).key_points(TICK_COUNT);
    let ys = RangedCoordf64::from(panel.y.clone()).key_points(TICK_COUNT);
    let vertical = xs.into_iter().map(|x| vec![(x, panel.y.start), (x, panel.y.end)]);
    let horizontal = ys.into_iter().map(|y| vec![(panel.x.start, y), (panel.x.end, y)]);
    vertical.chain(horizontal).collect()
}

/// What one render call drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub events: usize,
    pub highlighted: usize,
    pub coastline_segments: usize,
    pub outline_segments: usize,
    /// Gridlines drawn as plain lines (no mesh, so no tick labels).
    pub grid_lines: usize,
}

// ============================================================================
// Renderer
// ============================================================================

/// Draws the map, longitude-depth and depth-latitude panels of one figure.
#[derive(Debug, Clone)]
pub struct EventRenderer {
    pub projection: Projection,
    pub marker: MarkerStyle,
    /// Map gridlines, with or without `axis_labels`.
    pub gridlines: bool,
    /// Tick labels and axis titles. Without them panels get a bare frame
    /// and no text is rendered at all.
    pub axis_labels: bool,
    outline: Option<Polyline>,
    coastlines: Vec<Polyline>,
}

impl Default for EventRenderer {
    fn default() -> Self {
        Self::new(Projection::default(), MarkerStyle::default())
    }
}

impl EventRenderer {
    pub fn new(projection: Projection, marker: MarkerStyle) -> Self {
        Self {
            projection,
            marker,
            gridlines: true,
            axis_labels: true,
            outline: None,
            coastlines: Vec::new(),
        }
    }

    pub fn with_gridlines(mut self, gridlines: bool) -> Self {
        self.gridlines = gridlines;
        self
    }

    pub fn with_axis_labels(mut self, axis_labels: bool) -> Self {
        self.axis_labels = axis_labels;
        self
    }

    /// Outline the selection shape on the map.
    pub fn with_shape(mut self, shape: &Shape) -> Self {
        self.outline = Some(shape.outline());
        self
    }

    /// Coastline polylines, (lon, lat), drawn under the events.
    pub fn with_coastlines(mut self, coastlines: Vec<Polyline>) -> Self {
        self.coastlines = coastlines;
        self
    }

    /// Draw one figure. `event_colors`, `magnitudes` and `mask` are indexed
    /// like `positions`.
    pub fn render<DB: DrawingBackend>(
        &self,
        canvas: &Canvas<DB>,
        layout: &PanelLayout,
        positions: &Positions,
        event_colors: &[RGBColor],
        magnitudes: &[Option<f64>],
        mask: &[bool],
    ) -> Result<RenderStats, PlotError> {
        let n = positions.len();
        check_len("colors", event_colors.len(), n)?;
        check_len("magnitudes", magnitudes.len(), n)?;
        check_len("mask", mask.len(), n)?;
        self.projection.check_extent(&layout.map_extent)?;

        let markers: Vec<Marker> = (0..n)
            .map(|i| Marker {
                radius: self.marker.radius_px(magnitudes[i], canvas.dpi()),
                color: event_colors[i],
                selected: mask[i],
            })
            .collect();

        canvas.root.fill(&colors::BACKGROUND).map_err(draw_err)?;

        let map = layout.map_extent;
        let depth = layout.depth_extent;
        let projection = self.projection;
        let ((x0, x1), (y0, y1)) = projection.project_extent(&map);

        let degrees = |v: &f64| format!("{v:.2}");
        let map_lat = move |v: &f64| format!("{:.2}", projection.unproject_lat(*v));
        let depth_km = |v: &f64| format!("{v:.0}");
        // Depth axis pointing down is stored negated; + 0.0 turns -0 into 0
        let down_depth_km = |v: &f64| format!("{:.0}", -*v + 0.0);

        let map_panel = Panel {
            name: "map",
            rect: layout.rects.map,
            x: x0..x1,
            y: y0..y1,
            x_labels: XLabels::Top,
            y_labels: YLabels::Left,
            x_desc: None,
            y_desc: None,
            grid: true,
            x_fmt: &degrees,
            y_fmt: &map_lat,
        };
        let lon_depth_panel = Panel {
            name: "lon_depth",
            rect: layout.rects.lon_depth,
            x: map.lon_min()..map.lon_max(),
            y: -depth.depth_max()..-depth.depth_min(),
            x_labels: XLabels::Bottom,
            y_labels: YLabels::Left,
            x_desc: Some("Longitude"),
            y_desc: Some("Depth (km)"),
            grid: false,
            x_fmt: &degrees,
            y_fmt: &down_depth_km,
        };
        let depth_lat_panel = Panel {
            name: "depth_lat",
            rect: layout.rects.depth_lat,
            x: depth.depth_min()..depth.depth_max(),
            y: map.lat_min()..map.lat_max(),
            x_labels: XLabels::Top,
            y_labels: YLabels::Right,
            x_desc: Some("Depth (km)"),
            y_desc: Some("Latitude"),
            grid: false,
            x_fmt: &depth_km,
            y_fmt: &degrees,
        };

        let project = |line: &[(f64, f64)]| -> Polyline {
            line.iter().map(|&(lon, lat)| projection.project(lon, lat)).collect()
        };
        let coastlines: Vec<Polyline> = self
            .coastlines
            .iter()
            .flat_map(|line| clip_runs(&project(line), |p| map_panel.contains(p)))
            .collect();
        let outline: Vec<Polyline> = self
            .outline
            .iter()
            .flat_map(|line| clip_runs(&project(line), |p| map_panel.contains(p)))
            .collect();

        let map_points: Vec<(f64, f64)> =
            positions.points.iter().map(|p| projection.project(p.longitude, p.latitude)).collect();
        let lon_depth_points: Vec<(f64, f64)> =
            positions.points.iter().map(|p| (p.longitude, -p.depth_km)).collect();
        let depth_lat_points: Vec<(f64, f64)> =
            positions.points.iter().map(|p| (p.depth_km, p.latitude)).collect();

        // With labels the mesh draws the grid; without them it is drawn as lines
        let grid = if map_panel.grid && self.gridlines && !self.axis_labels {
            grid_lines(&map_panel)
        } else {
            Vec::new()
        };

        self.draw_panel(canvas, &map_panel, &map_points, &markers, &grid, &coastlines, &outline)?;
        self.draw_panel(canvas, &lon_depth_panel, &lon_depth_points, &markers, &[], &[], &[])?;
        self.draw_panel(canvas, &depth_lat_panel, &depth_lat_points, &markers, &[], &[], &[])?;

        let stats = RenderStats {
            events: n,
            highlighted: mask.iter().filter(|&&m| m).count(),
            coastline_segments: coastlines.len(),
            outline_segments: outline.len(),
            grid_lines: grid.len(),
        };
        debug!(
            events = stats.events,
            highlighted = stats.highlighted,
            coastline_segments = stats.coastline_segments,
            "Figure rendered"
        );
        Ok(stats)
    }

    /// Panel drawing area: the axis rectangle plus its label areas.
    fn panel_area<DB: DrawingBackend>(&self, canvas: &Canvas<DB>, panel: &Panel<'_>) -> (DrawingArea<DB, Shift>, i32, i32) {
        let (x, y, w, h) = panel.rect.to_pixels(canvas.size_px());
        let (mut x, mut y, mut w, mut h) = (x, y, w as i32, h as i32);
        let figure = canvas.figure();

        let (x_label, y_label) = if self.axis_labels {
            let x_pad = match panel.x_labels {
                XLabels::Top => figure.pad_top,
                XLabels::Bottom => figure.pad_bottom,
            };
            let y_pad = match panel.y_labels {
                YLabels::Left => figure.pad_left,
                YLabels::Right => figure.pad_right,
            };
            (canvas.inches_to_px(x_pad), canvas.inches_to_px(y_pad))
        } else {
            (0, 0)
        };

        if let YLabels::Left = panel.y_labels {
            x -= y_label;
        }
        w += y_label;
        if let XLabels::Top = panel.x_labels {
            y -= x_label;
        }
        h += x_label;

        let area = canvas.root.clone().shrink((x.max(0), y.max(0)), (w, h));
        (area, x_label, y_label)
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        canvas: &Canvas<DB>,
        panel: &Panel<'_>,
        points: &[(f64, f64)],
        markers: &[Marker],
        grid: &[Polyline],
        underlay: &[Polyline],
        overlay: &[Polyline],
    ) -> Result<(), RenderError> {
        let (area, x_label, y_label) = self.panel_area(canvas, panel);
        trace!(panel = panel.name, x = ?panel.x, y = ?panel.y, "Drawing panel");

        let mut builder = ChartBuilder::on(&area);
        if self.axis_labels {
            let x_pos = match panel.x_labels {
                XLabels::Top => LabelAreaPosition::Top,
                XLabels::Bottom => LabelAreaPosition::Bottom,
            };
            let y_pos = match panel.y_labels {
                YLabels::Left => LabelAreaPosition::Left,
                YLabels::Right => LabelAreaPosition::Right,
            };
            builder.set_label_area_size(x_pos, x_label).set_label_area_size(y_pos, y_label);
        }
        let mut chart = builder
            .build_cartesian_2d(panel.x.clone(), panel.y.clone())
            .map_err(draw_err)?;

        if self.axis_labels {
            let mut mesh = chart.configure_mesh();
            mesh.x_labels(TICK_COUNT)
                .y_labels(TICK_COUNT)
                .label_style((FONT_FAMILY, canvas.points_to_px(TICK_FONT_PT)))
                .axis_desc_style((FONT_FAMILY, canvas.points_to_px(DESC_FONT_PT)))
                .x_label_formatter(panel.x_fmt)
                .y_label_formatter(panel.y_fmt);
            if let Some(desc) = panel.x_desc {
                mesh.x_desc(desc);
            }
            if let Some(desc) = panel.y_desc {
                mesh.y_desc(desc);
            }
            if panel.grid && self.gridlines {
                mesh.bold_line_style(colors::GRID.mix(colors::GRID_ALPHA).stroke_width(1))
                    .max_light_lines(0);
            } else {
                mesh.disable_mesh();
            }
            mesh.draw().map_err(draw_err)?;
        }

        chart
            .draw_series(
                grid.iter()
                    .map(|line| PathElement::new(line.clone(), colors::GRID.mix(colors::GRID_ALPHA).stroke_width(1))),
            )
            .map_err(draw_err)?;

        chart
            .draw_series(underlay.iter().map(|line| PathElement::new(line.clone(), colors::COASTLINE.stroke_width(1))))
            .map_err(draw_err)?;

        // Layer 1: every event, muted
        chart
            .draw_series(
                points
                    .iter()
                    .zip(markers)
                    .filter(|(p, _)| panel.contains(**p))
                    .map(|(&p, m)| Circle::new(p, m.radius, colors::EVENT_MUTED.filled())),
            )
            .map_err(draw_err)?;

        // Layer 2: selected events in cluster colors
        chart
            .draw_series(
                points
                    .iter()
                    .zip(markers)
                    .filter(|(p, m)| m.selected && panel.contains(**p))
                    .map(|(&p, m)| Circle::new(p, m.radius, m.color.filled())),
            )
            .map_err(draw_err)?;

        chart
            .draw_series(overlay.iter().map(|line| PathElement::new(line.clone(), colors::SHAPE_OUTLINE.stroke_width(1))))
            .map_err(draw_err)?;

        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [(panel.x.start, panel.y.start), (panel.x.end, panel.y.end)],
                colors::FRAME.stroke_width(1),
            ))
            .map_err(draw_err)?;

        Ok(())
    }
}

fn check_len(what: &'static str, got: usize, expected: usize) -> Result<(), DataError> {
    if got == expected {
        Ok(())
    } else {
        Err(DataError::LengthMismatch { what, got, expected })
    }
}
