//! Spatial shapes used to select events
//!
//! A shape has one contract: a deterministic `contains(lon, lat)`.
//! Circles use geodesic distance on the WGS-84 ellipsoid, polygons a planar
//! point-in-polygon test in (lon, lat) space.

use geo::{Contains, Coord, GeodesicDistance, LineString, Point, Polygon};
use tracing::{debug, warn};

use crate::core::Catalog;
use crate::error::ConfigError;

/// Meters per degree of latitude (60 nautical miles).
pub const METERS_PER_DEGREE: f64 = 1852.0 * 60.0;

/// Number of segments used to draw a circle outline.
const CIRCLE_OUTLINE_STEPS: usize = 360;

/// Event selection shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Everything within `radius_deg` degrees of latitude of the center.
    Circle {
        center_lon: f64,
        center_lat: f64,
        radius_deg: f64,
    },
    /// Implicitly closed ring of (lon, lat) vertices.
    Polygon { polygon: Polygon<f64> },
}

impl Shape {
    pub fn circle(center_lon: f64, center_lat: f64, radius_deg: f64) -> Result<Self, ConfigError> {
        if !center_lon.is_finite() || !center_lat.is_finite() {
            return Err(ConfigError::NonFiniteShape);
        }
        if !(radius_deg.is_finite() && radius_deg > 0.0) {
            return Err(ConfigError::InvalidRadius(radius_deg));
        }
        Ok(Shape::Circle { center_lon, center_lat, radius_deg })
    }

    /// Build a polygon from (lon, lat) vertices. The caller does not need to
    /// repeat the first vertex at the end.
    pub fn polygon(vertices: &[(f64, f64)]) -> Result<Self, ConfigError> {
        if vertices.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ConfigError::NonFiniteShape);
        }
        let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(vertices.len());
        for &v in vertices {
            if !distinct.contains(&v) {
                distinct.push(v);
            }
        }
        if distinct.len() < 3 {
            return Err(ConfigError::DegeneratePolygon(distinct.len()));
        }
        // Polygon::new closes the exterior ring
        let ring: LineString<f64> = vertices.iter().map(|&(x, y)| Coord { x, y }).collect();
        Ok(Shape::Polygon { polygon: Polygon::new(ring, vec![]) })
    }

    /// True if (lon, lat) lies inside the shape.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        match self {
            Shape::Circle { center_lon, center_lat, radius_deg } => {
                let meters = Point::new(lon, lat).geodesic_distance(&Point::new(*center_lon, *center_lat));
                meters / METERS_PER_DEGREE <= *radius_deg
            }
            Shape::Polygon { polygon } => polygon.contains(&Point::new(lon, lat)),
        }
    }

    /// Keep events whose preferred origin is inside (`keep_inside == true`)
    /// or outside the shape.
    ///
    /// Events whose preferred origin has no coordinates cannot be classified
    /// and are dropped.
    pub fn filter(&self, catalog: &Catalog, keep_inside: bool) -> Catalog {
        let mut kept = Vec::with_capacity(catalog.events.len());
        for (index, event) in catalog.events.iter().enumerate() {
            let Some((lon, lat)) = event.preferred_origin().and_then(|o| o.lon_lat()) else {
                warn!(index, "Event has no usable preferred origin, dropped from selection");
                continue;
            };
            if self.contains(lon, lat) == keep_inside {
                kept.push(event.clone());
            }
        }
        debug!(total = catalog.events.len(), kept = kept.len(), keep_inside, "Shape filter");
        Catalog { events: kept }
    }

    /// Events inside the shape.
    pub fn include(&self, catalog: &Catalog) -> Catalog {
        self.filter(catalog, true)
    }

    /// Events outside the shape.
    pub fn exclude(&self, catalog: &Catalog) -> Catalog {
        self.filter(catalog, false)
    }

    /// Closed (lon, lat) polyline for drawing the shape on a map.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        match self {
            Shape::Circle { center_lon, center_lat, radius_deg } => {
                let lon_per_lat = 1.0 / center_lat.to_radians().cos();
                (0..=CIRCLE_OUTLINE_STEPS)
                    .map(|step| {
                        let theta = (step as f64).to_radians();
                        (
                            center_lon + radius_deg * theta.cos() * lon_per_lat,
                            center_lat + radius_deg * theta.sin(),
                        )
                    })
                    .collect()
            }
            Shape::Polygon { polygon } => polygon.exterior().coords().map(|c| (c.x, c.y)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, Origin};

    fn event_at(lon: f64, lat: f64) -> Event {
        Event {
            origins: vec![Origin::at(lat, lon, 1000.0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_circle_center_and_far_point() {
        let circle = Shape::circle(45.3, -12.8, 0.1).unwrap();
        assert!(circle.contains(45.3, -12.8));
        assert!(!circle.contains(46.0, -12.8));
    }

    #[test]
    fn test_circle_radius_in_degrees_of_latitude() {
        let circle = Shape::circle(-12.3, 45.6, 10.0).unwrap();
        assert!(circle.contains(-12.35, 45.65));
        // Just under/over 1 degree north of the center
        let small = Shape::circle(0.0, 0.0, 1.0).unwrap();
        assert!(small.contains(0.0, 0.99));
        assert!(!small.contains(0.0, 1.05));
    }

    #[test]
    fn test_circle_rejects_bad_radius() {
        assert_eq!(Shape::circle(0.0, 0.0, 0.0), Err(ConfigError::InvalidRadius(0.0)));
        assert_eq!(Shape::circle(0.0, 0.0, -1.0), Err(ConfigError::InvalidRadius(-1.0)));
        assert_eq!(Shape::circle(f64::NAN, 0.0, 1.0), Err(ConfigError::NonFiniteShape));
    }

    #[test]
    fn test_polygon_contains() {
        let square = Shape::polygon(&[(12.0, 45.0), (12.0, 47.0), (14.0, 47.0), (14.0, 45.0)]).unwrap();
        assert!(square.contains(13.0, 46.0));
        assert!(!square.contains(15.0, 46.0));
        assert!(!square.contains(100.0, -80.0));
    }

    #[test]
    fn test_polygon_already_closed_is_accepted() {
        let tri = Shape::polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]).unwrap();
        assert!(tri.contains(1.0, 1.0));
        assert!(!tri.contains(3.0, 3.0));
    }

    #[test]
    fn test_polygon_needs_three_distinct_vertices() {
        assert_eq!(Shape::polygon(&[(0.0, 0.0), (1.0, 1.0)]), Err(ConfigError::DegeneratePolygon(2)));
        assert_eq!(
            Shape::polygon(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            Err(ConfigError::DegeneratePolygon(2))
        );
    }

    #[test]
    fn test_filter_include_exclude() {
        let catalog = Catalog {
            events: vec![event_at(45.3, -12.8), event_at(46.0, -12.8), event_at(45.31, -12.79)],
        };
        let circle = Shape::circle(45.3, -12.8, 0.1).unwrap();
        assert_eq!(circle.include(&catalog).events.len(), 2);
        assert_eq!(circle.exclude(&catalog).events.len(), 1);
        assert_eq!(circle.filter(&catalog, false).events[0], event_at(46.0, -12.8));
    }

    #[test]
    fn test_filter_drops_events_without_coordinates() {
        let mut event = event_at(45.3, -12.8);
        event.origins[0].latitude = None;
        let catalog = Catalog { events: vec![event] };
        let circle = Shape::circle(45.3, -12.8, 0.1).unwrap();
        assert!(circle.include(&catalog).events.is_empty());
        assert!(circle.exclude(&catalog).events.is_empty());
    }

    #[test]
    fn test_outline_is_closed() {
        let circle = Shape::circle(45.3, -12.8, 0.1).unwrap();
        let outline = circle.outline();
        assert_eq!(outline.len(), CIRCLE_OUTLINE_STEPS + 1);
        let (first, last) = (outline[0], outline[outline.len() - 1]);
        assert!((first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9);

        let poly = Shape::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        let outline = poly.outline();
        assert_eq!(outline.first(), outline.last());
    }
}
