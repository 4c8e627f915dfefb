//! Three-panel composite layout
//!
//! Places the map panel (top-left), the longitude-depth strip below it and
//! the depth-latitude strip to its right so that one kilometer has the same
//! physical length on every axis of the composite:
//!
//! ```text
//!  +-----------+-----+
//!  |    map    | z-y |
//!  |           |     |
//!  +-----------+-----+
//!  |    x-z    |
//!  +-----------+
//! ```
//!
//! Rectangles are figure fractions with the origin at the bottom-left of the
//! figure, the convention used for axes placement.

use tracing::{debug, trace};

use super::extent::{DepthExtent, MapExtent, KM_PER_DEG_LAT};
use crate::error::ConfigError;

// ============================================================================
// Figure geometry
// ============================================================================

/// Figure size and label margins, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureGeometry {
    pub width_in: f64,
    pub height_in: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
}

impl Default for FigureGeometry {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            pad_left: 0.6,
            pad_right: 0.6,
            pad_top: 0.4,
            pad_bottom: 0.4,
        }
    }
}

impl FigureGeometry {
    /// Figure of the given size with default margins.
    pub fn with_size(width_in: f64, height_in: f64) -> Self {
        Self { width_in, height_in, ..Self::default() }
    }

    /// Drawing area left after removing the margins, in inches.
    pub fn usable(&self) -> (f64, f64) {
        (
            self.width_in - self.pad_left - self.pad_right,
            self.height_in - self.pad_top - self.pad_bottom,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.width_in, self.height_in, self.pad_left, self.pad_right, self.pad_top, self.pad_bottom];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidFigure("dimensions must be finite".into()));
        }
        if values[2..].iter().any(|&pad| pad < 0.0) {
            return Err(ConfigError::InvalidFigure("padding must be >= 0".into()));
        }
        let (w, h) = self.usable();
        if w <= 0.0 || h <= 0.0 {
            return Err(ConfigError::InvalidFigure(format!(
                "{}x{} in leaves no drawing area after padding",
                self.width_in, self.height_in
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis rectangle as figure fractions, origin at bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// True if the interiors intersect. Shared edges do not count, with
    /// `eps` tolerance for rounding.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.left < other.right() - eps
            && other.left < self.right() - eps
            && self.bottom < other.top() - eps
            && other.bottom < self.top() - eps
    }

    /// Pixel box `(x, y, width, height)` with a top-left origin, for a figure
    /// of `(width_px, height_px)`.
    pub fn to_pixels(&self, (width_px, height_px): (u32, u32)) -> (i32, i32, u32, u32) {
        let w = width_px as f64;
        let h = height_px as f64;
        let x0 = (self.left * w).round();
        let x1 = (self.right() * w).round();
        let y0 = ((1.0 - self.top()) * h).round();
        let y1 = ((1.0 - self.bottom) * h).round();
        (x0 as i32, y0 as i32, (x1 - x0).max(1.0) as u32, (y1 - y0).max(1.0) as u32)
    }
}

/// The three axis rectangles of the composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRectangles {
    /// Map view, top-left.
    pub map: Rect,
    /// Longitude (x) vs depth (down) strip below the map; same left/width.
    pub lon_depth: Rect,
    /// Depth (x) vs latitude (y) strip right of the map; same bottom/height.
    pub depth_lat: Rect,
}

impl PanelRectangles {
    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        [&self.map, &self.lon_depth, &self.depth_lat].into_iter()
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Result of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Map extent actually plotted (widened in fill-figure mode).
    pub map_extent: MapExtent,
    pub depth_extent: DepthExtent,
    pub rects: PanelRectangles,
    /// Shared scale, inches per kilometer, on both figure axes.
    pub inch_per_km_x: f64,
    pub inch_per_km_y: f64,
}

/// Width and height of the composite in kilometers: map plus one depth strip
/// in each direction.
pub fn composite_range_km(map: &MapExtent, depth: &DepthExtent) -> (f64, f64) {
    (map.lon_range_km() + depth.range(), map.lat_range_km() + depth.range())
}

/// Ratio of composite width to composite height, both in km.
pub fn plot_aspect(map: &MapExtent, depth: &DepthExtent) -> f64 {
    let (x_km, y_km) = composite_range_km(map, depth);
    x_km / y_km
}

/// Widen the map extent symmetrically so the composite has `figure_aspect`.
///
/// A figure wider than the data gains longitude, otherwise latitude. Widening
/// latitude past a pole is an error.
pub fn fill_to_aspect(map: &MapExtent, depth: &DepthExtent, figure_aspect: f64) -> Result<MapExtent, ConfigError> {
    let (x_km, y_km) = composite_range_km(map, depth);
    if figure_aspect > x_km / y_km {
        let add_km = (y_km * figure_aspect - x_km) / 2.0;
        Ok(map.widen_lon(add_km / map.km_per_deg_lon()))
    } else {
        let add_km = (x_km / figure_aspect - y_km) / 2.0;
        map.widen_lat(add_km / KM_PER_DEG_LAT)
    }
}

impl PanelLayout {
    /// Compute the three panel rectangles for a figure.
    ///
    /// The scale is isometric: `inch_per_km_x == inch_per_km_y`. With
    /// `fill_figure` the map extent is widened first so the composite covers
    /// the whole usable area.
    pub fn compute(
        figure: &FigureGeometry,
        map_extent: MapExtent,
        depth_extent: DepthExtent,
        fill_figure: bool,
    ) -> Result<Self, ConfigError> {
        figure.validate()?;
        let (usable_w, usable_h) = figure.usable();
        let figure_aspect = usable_w / usable_h;

        let map_extent = if fill_figure {
            let filled = fill_to_aspect(&map_extent, &depth_extent, figure_aspect)?;
            debug!(before = ?map_extent.as_array(), after = ?filled.as_array(), "Map extent widened to fill figure");
            filled
        } else {
            map_extent
        };

        let (x_km, y_km) = composite_range_km(&map_extent, &depth_extent);
        let aspect = x_km / y_km;

        let mut inch_per_km_x = usable_w / x_km;
        let mut inch_per_km_y = usable_h / y_km;
        if aspect > figure_aspect {
            inch_per_km_y *= figure_aspect / aspect;
        } else if aspect < figure_aspect {
            inch_per_km_x *= aspect / figure_aspect;
        }
        trace!(aspect, figure_aspect, inch_per_km_x, inch_per_km_y, "Panel scale");

        let fig_w = figure.width_in;
        let fig_h = figure.height_in;
        let depth_km = depth_extent.range();

        let left_width = map_extent.lon_range_km() * inch_per_km_x / fig_w;
        let right_width = depth_km * inch_per_km_x / fig_w;
        let lower_height = depth_km * inch_per_km_y / fig_h;
        let upper_height = map_extent.lat_range_km() * inch_per_km_y / fig_h;

        let left_left = figure.pad_left / fig_w;
        let right_left = left_left + left_width;
        let lower_bottom = figure.pad_bottom / fig_h;
        let upper_bottom = lower_bottom + lower_height;

        let rects = PanelRectangles {
            map: Rect { left: left_left, bottom: upper_bottom, width: left_width, height: upper_height },
            lon_depth: Rect { left: left_left, bottom: lower_bottom, width: left_width, height: lower_height },
            depth_lat: Rect { left: right_left, bottom: upper_bottom, width: right_width, height: upper_height },
        };
        debug!(map = ?rects.map, lon_depth = ?rects.lon_depth, depth_lat = ?rects.depth_lat, "Panel rectangles");

        Ok(Self { map_extent, depth_extent, rects, inch_per_km_x, inch_per_km_y })
    }

    /// Figure inches per km along x divided by inches per km along y.
    pub fn isometry_ratio(&self) -> f64 {
        self.inch_per_km_x / self.inch_per_km_y
    }
}
