//! Property tests for extent derivation and the three-panel layout.

use hypodd_plot::ConfigError;
use hypodd_plot::geometry::{
    compute_depth_extent, compute_map_extent, DepthExtent, FigureGeometry, MapExtent, PanelLayout, Shape,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ── Strategy helpers ────────────────────────────────────────────────────

fn map_extent() -> impl Strategy<Value = MapExtent> {
    (-170.0..170.0f64, 0.01..5.0f64, -70.0..70.0f64, 0.01..5.0f64)
        .prop_map(|(lon, dlon, lat, dlat)| MapExtent::new(lon, lon + dlon, lat, lat + dlat).unwrap())
}

fn depth_extent() -> impl Strategy<Value = DepthExtent> {
    (-5.0..30.0f64, 1.0..100.0f64).prop_map(|(min, range)| DepthExtent::new(min, min + range).unwrap())
}

fn figure() -> impl Strategy<Value = FigureGeometry> {
    (3.0..20.0f64, 3.0..20.0f64).prop_map(|(w, h)| FigureGeometry::with_size(w, h))
}

fn samples() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-30.0..30.0f64, -170.0..170.0f64), 2..40).prop_filter("non-zero range", |s| {
        let lat_spread = s.iter().any(|p| p.0 != s[0].0);
        let lon_spread = s.iter().any(|p| p.1 != s[0].1);
        lat_spread && lon_spread
    })
}

/// Layout, or None when fill mode had to widen latitude past a pole.
fn try_layout(fig: &FigureGeometry, map: MapExtent, depth: DepthExtent, fill: bool) -> Option<PanelLayout> {
    match PanelLayout::compute(fig, map, depth, fill) {
        Ok(layout) => Some(layout),
        Err(ConfigError::LatitudeOutOfRange { .. }) if fill => None,
        Err(e) => panic!("layout failed: {e}"),
    }
}

// ── Layout ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn panels_never_overlap(map in map_extent(), depth in depth_extent(), fig in figure(), fill in any::<bool>()) {
        let Some(layout) = try_layout(&fig, map, depth, fill) else { return Ok(()) };
        let r = layout.rects;
        prop_assert!(!r.map.overlaps(&r.lon_depth, 1e-9));
        prop_assert!(!r.map.overlaps(&r.depth_lat, 1e-9));
        prop_assert!(!r.lon_depth.overlaps(&r.depth_lat, 1e-9));
    }

    #[test]
    fn panels_stay_aligned(map in map_extent(), depth in depth_extent(), fig in figure(), fill in any::<bool>()) {
        let Some(layout) = try_layout(&fig, map, depth, fill) else { return Ok(()) };
        let r = layout.rects;
        prop_assert_eq!(r.map.left, r.lon_depth.left);
        prop_assert_eq!(r.map.width, r.lon_depth.width);
        prop_assert_eq!(r.map.bottom, r.depth_lat.bottom);
        prop_assert_eq!(r.map.height, r.depth_lat.height);
    }

    #[test]
    fn fill_mode_uses_usable_width(map in map_extent(), depth in depth_extent(), fig in figure()) {
        let Some(layout) = try_layout(&fig, map, depth, true) else { return Ok(()) };
        let r = layout.rects;
        let (usable_w, usable_h) = fig.usable();
        let width_in = (r.map.width + r.depth_lat.width) * fig.width_in;
        let height_in = (r.map.height + r.lon_depth.height) * fig.height_in;
        prop_assert!((width_in - usable_w).abs() < 1e-6 * usable_w);
        prop_assert!((height_in - usable_h).abs() < 1e-6 * usable_h);
    }

    #[test]
    fn layout_is_isometric(map in map_extent(), depth in depth_extent(), fig in figure(), fill in any::<bool>()) {
        let Some(layout) = try_layout(&fig, map, depth, fill) else { return Ok(()) };
        prop_assert!((layout.isometry_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn panels_fit_inside_figure(map in map_extent(), depth in depth_extent(), fig in figure(), fill in any::<bool>()) {
        let Some(layout) = try_layout(&fig, map, depth, fill) else { return Ok(()) };
        let r = layout.rects;
        let right_edge = 1.0 - fig.pad_right / fig.width_in;
        let top_edge = 1.0 - fig.pad_top / fig.height_in;
        prop_assert!(r.depth_lat.right() <= right_edge + EPS);
        prop_assert!(r.map.top() <= top_edge + EPS);
    }
}

// ── Extents ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn zero_buffer_extent_is_sample_bounds(samples in samples()) {
        let extent = compute_map_extent(None, Some(&samples), 0.0).unwrap();
        let lat_min = samples.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let lat_max = samples.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let lon_min = samples.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let lon_max = samples.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(extent.as_array(), [lon_min, lon_max, lat_min, lat_max]);
    }

    #[test]
    fn buffered_extent_grows_symmetrically(samples in samples(), buffer in 0.0..1.0f64) {
        let tight = compute_map_extent(None, Some(&samples), 0.0).unwrap();
        let loose = compute_map_extent(None, Some(&samples), buffer).unwrap();
        let lon_pad = buffer * tight.lon_range();
        let lat_pad = buffer * tight.lat_range();
        prop_assert!((tight.lon_min() - loose.lon_min() - lon_pad).abs() < EPS);
        prop_assert!((loose.lon_max() - tight.lon_max() - lon_pad).abs() < EPS);
        prop_assert!((tight.lat_min() - loose.lat_min() - lat_pad).abs() < EPS);
        prop_assert!((loose.lat_max() - tight.lat_max() - lat_pad).abs() < EPS);
    }

    #[test]
    fn explicit_extent_ignores_samples(samples in samples(), buffer in 0.0..1.0f64) {
        let explicit = [45.0, 46.0, -13.0, -12.0];
        let extent = compute_map_extent(Some(&explicit), Some(&samples), buffer).unwrap();
        prop_assert_eq!(extent.as_array(), explicit);
    }

    #[test]
    fn depth_extent_contains_samples(depths in prop::collection::vec(0.0..80.0f64, 2..30), buffer in 0.0..1.0f64) {
        prop_assume!(depths.iter().any(|d| *d != depths[0]));
        let extent = compute_depth_extent(None, Some(&depths), buffer).unwrap();
        for d in &depths {
            prop_assert!(*d >= extent.depth_min() && *d <= extent.depth_max());
        }
    }
}

// ── Shapes ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn circle_contains_its_center(lon in -179.0..179.0f64, lat in -80.0..80.0f64, radius in 0.001..10.0f64) {
        let circle = Shape::circle(lon, lat, radius).unwrap();
        prop_assert!(circle.contains(lon, lat));
    }

    #[test]
    fn circle_rejects_points_beyond_radius(lat in -60.0..60.0f64, radius in 0.01..5.0f64) {
        let circle = Shape::circle(0.0, lat, radius).unwrap();
        // Due north by twice the radius
        prop_assert!(!circle.contains(0.0, lat + 2.0 * radius));
    }
}
