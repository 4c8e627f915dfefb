//! Map-panel projection
//!
//! Only the map panel is projected; the cross-sections plot raw degrees
//! against depth.

use serde::{Deserialize, Serialize};

use super::extent::MapExtent;
use crate::error::ConfigError;

/// Latitude limit for Mercator, avoids the poles' infinities.
pub const MERCATOR_MAX_LAT: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Spherical Mercator, y expressed in "Mercator degrees".
    #[default]
    Mercator,
    /// Longitude and latitude used as-is.
    PlateCarree,
}

impl Projection {
    pub fn name(&self) -> &'static str {
        match self {
            Projection::Mercator => "mercator",
            Projection::PlateCarree => "plate_carree",
        }
    }

    /// Reject extents the projection cannot draw without flattening: Mercator
    /// clamps latitude at +/-85 degrees.
    pub fn check_extent(&self, extent: &MapExtent) -> Result<(), ConfigError> {
        match self {
            Projection::Mercator => {
                for lat in [extent.lat_min(), extent.lat_max()] {
                    if lat.abs() > MERCATOR_MAX_LAT {
                        return Err(ConfigError::ProjectionLatitude {
                            projection: self.name(),
                            lat,
                            limit: MERCATOR_MAX_LAT,
                        });
                    }
                }
                Ok(())
            }
            Projection::PlateCarree => Ok(()),
        }
    }

    /// Project geodetic (lon, lat) into map-plane coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::Mercator => {
                let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
                let y = (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln();
                (lon, y.to_degrees())
            }
            Projection::PlateCarree => (lon, lat),
        }
    }

    /// Inverse of [`Projection::project`] for the y axis: latitude of a
    /// map-plane y, used for axis tick labels.
    pub fn unproject_lat(&self, y: f64) -> f64 {
        match self {
            Projection::Mercator => (2.0 * y.to_radians().exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees(),
            Projection::PlateCarree => y,
        }
    }

    /// Map-plane x and y ranges covering the extent.
    pub fn project_extent(&self, extent: &MapExtent) -> ((f64, f64), (f64, f64)) {
        let (x0, y0) = self.project(extent.lon_min(), extent.lat_min());
        let (x1, y1) = self.project(extent.lon_max(), extent.lat_max());
        ((x0, x1), (y0, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_equator_and_symmetry() {
        let p = Projection::Mercator;
        assert_eq!(p.project(10.0, 0.0), (10.0, 0.0));
        let (_, north) = p.project(0.0, 30.0);
        let (_, south) = p.project(0.0, -30.0);
        assert!((north + south).abs() < 1e-12);
        // Mercator stretches latitude away from the equator
        assert!(north > 30.0);
    }

    #[test]
    fn test_mercator_is_monotonic() {
        let p = Projection::Mercator;
        let ys: Vec<f64> = (-80..=80).step_by(10).map(|lat| p.project(0.0, lat as f64).1).collect();
        assert!(ys.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_plate_carree_identity() {
        assert_eq!(Projection::PlateCarree.project(45.3, -12.8), (45.3, -12.8));
    }

    #[test]
    fn test_unproject_lat_inverts_project() {
        for lat in [-60.0, -12.8, 0.0, 33.3, 80.0] {
            for p in [Projection::Mercator, Projection::PlateCarree] {
                let (_, y) = p.project(0.0, lat);
                assert!((p.unproject_lat(y) - lat).abs() < 1e-9, "{p:?} {lat}");
            }
        }
    }

    #[test]
    fn test_polar_extent_rejected_for_mercator() {
        let arctic = MapExtent::new(0.0, 10.0, 86.0, 89.0).unwrap();
        assert_eq!(
            Projection::Mercator.check_extent(&arctic),
            Err(ConfigError::ProjectionLatitude { projection: "mercator", lat: 86.0, limit: 85.0 })
        );
        let partly = MapExtent::new(0.0, 10.0, -87.0, -80.0).unwrap();
        assert!(Projection::Mercator.check_extent(&partly).is_err());
        assert!(Projection::PlateCarree.check_extent(&arctic).is_ok());

        let edge = MapExtent::new(0.0, 10.0, 80.0, 85.0).unwrap();
        assert!(Projection::Mercator.check_extent(&edge).is_ok());
        let ((_, _), (y0, y1)) = Projection::Mercator.project_extent(&edge);
        assert!(y1 > y0);
    }

    #[test]
    fn test_project_extent() {
        let extent = MapExtent::new(45.0, 46.0, -13.0, -12.0).unwrap();
        let ((x0, x1), (y0, y1)) = Projection::Mercator.project_extent(&extent);
        assert_eq!((x0, x1), (45.0, 46.0));
        assert!(y0 < y1);
    }
}
