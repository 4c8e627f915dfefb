//! Map and depth bounding boxes
//!
//! Extents are immutable once built. Everything derived from them
//! (km per degree, ranges in km) is computed on demand so an adjusted
//! extent can never carry stale values.

use tracing::debug;

use crate::error::ConfigError;

/// 1 nautical mile = 1852 m, 60 nm per degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 1.852 * 60.0;

/// Latitudes beyond the poles are rejected.
pub const MAX_LATITUDE: f64 = 90.0;

/// Default fraction of the sample range added on each side of an extent.
pub const DEFAULT_BUFFER_FRACTION: f64 = 0.2;

// ============================================================================
// MapExtent
// ============================================================================

/// Geographic bounds of the map panel, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    lon_min: f64,
    lon_max: f64,
    lat_min: f64,
    lat_max: f64,
}

impl MapExtent {
    /// Validating constructor: both axes must be finite with max > min,
    /// and latitude must stay within [-90, 90].
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self, ConfigError> {
        check_axis("longitude", lon_min, lon_max)?;
        check_axis("latitude", lat_min, lat_max)?;
        if lat_min < -MAX_LATITUDE || lat_max > MAX_LATITUDE {
            return Err(ConfigError::LatitudeOutOfRange { min: lat_min, max: lat_max });
        }
        Ok(Self { lon_min, lon_max, lat_min, lat_max })
    }

    /// Build from `[lon_min, lon_max, lat_min, lat_max]`.
    ///
    /// Anything other than exactly four values is rejected rather than
    /// guessing a fallback for the missing bounds.
    pub fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        match values {
            [w, e, s, n] => Self::new(*w, *e, *s, *n),
            _ => Err(ConfigError::MapExtentArity(values.len())),
        }
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    /// `[lon_min, lon_max, lat_min, lat_max]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }

    pub fn lon_range(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn lat_range(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Midpoint of the latitude range, in degrees.
    pub fn mean_latitude(&self) -> f64 {
        (self.lat_min + self.lat_max) / 2.0
    }

    /// Longitude degrees shrink with cos(latitude) (meridian convergence).
    pub fn km_per_deg_lon(&self) -> f64 {
        KM_PER_DEG_LAT * self.mean_latitude().to_radians().cos()
    }

    pub fn lon_range_km(&self) -> f64 {
        self.lon_range() * self.km_per_deg_lon()
    }

    pub fn lat_range_km(&self) -> f64 {
        self.lat_range() * KM_PER_DEG_LAT
    }

    /// New extent with `delta` degrees added on both longitude ends.
    pub fn widen_lon(&self, delta: f64) -> Self {
        Self {
            lon_min: self.lon_min - delta,
            lon_max: self.lon_max + delta,
            ..*self
        }
    }

    /// New extent with `delta` degrees added on both latitude ends. Fails
    /// if that pushes past a pole.
    pub fn widen_lat(&self, delta: f64) -> Result<Self, ConfigError> {
        Self::new(self.lon_min, self.lon_max, self.lat_min - delta, self.lat_max + delta)
    }
}

// ============================================================================
// DepthExtent
// ============================================================================

/// Depth bounds of the cross-section panels, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthExtent {
    depth_min: f64,
    depth_max: f64,
}

impl DepthExtent {
    pub fn new(depth_min: f64, depth_max: f64) -> Result<Self, ConfigError> {
        check_axis("depth", depth_min, depth_max)?;
        Ok(Self { depth_min, depth_max })
    }

    /// Build from `[depth_min, depth_max]`.
    pub fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        match values {
            [lo, hi] => Self::new(*lo, *hi),
            _ => Err(ConfigError::DepthExtentArity(values.len())),
        }
    }

    pub fn depth_min(&self) -> f64 {
        self.depth_min
    }

    pub fn depth_max(&self) -> f64 {
        self.depth_max
    }

    pub fn range(&self) -> f64 {
        self.depth_max - self.depth_min
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.depth_min, self.depth_max]
    }
}

// ============================================================================
// Extent computation
// ============================================================================

/// Derive the map extent from an explicit extent or from (lat, lon) samples.
///
/// An explicit extent wins and is only validated. Otherwise each axis spans
/// the samples' min..max, pushed outward by `buffer_fraction * range` on
/// both ends. The latitude buffer stops at the poles.
pub fn compute_map_extent(
    explicit: Option<&[f64]>,
    samples: Option<&[(f64, f64)]>,
    buffer_fraction: f64,
) -> Result<MapExtent, ConfigError> {
    if let Some(values) = explicit {
        return MapExtent::from_slice(values);
    }
    check_buffer(buffer_fraction)?;
    let samples = samples.ok_or(ConfigError::MissingExtentSource("map"))?;
    if samples.is_empty() {
        return Err(ConfigError::EmptySamples("map"));
    }

    let (lat_min, lat_max) = min_max(samples.iter().map(|&(lat, _)| lat)).ok_or(ConfigError::NonFiniteExtent { axis: "latitude" })?;
    let (lon_min, lon_max) = min_max(samples.iter().map(|&(_, lon)| lon)).ok_or(ConfigError::NonFiniteExtent { axis: "longitude" })?;

    let lon_buffer = (lon_max - lon_min) * buffer_fraction;
    let lat_buffer = (lat_max - lat_min) * buffer_fraction;
    let extent = MapExtent::new(
        lon_min - lon_buffer,
        lon_max + lon_buffer,
        (lat_min - lat_buffer).max(-MAX_LATITUDE),
        (lat_max + lat_buffer).min(MAX_LATITUDE),
    )?;
    debug!(extent = ?extent.as_array(), samples = samples.len(), buffer_fraction, "Map extent from samples");
    Ok(extent)
}

/// 1D analogue of [`compute_map_extent`] over depths in kilometers.
pub fn compute_depth_extent(
    explicit: Option<&[f64]>,
    samples: Option<&[f64]>,
    buffer_fraction: f64,
) -> Result<DepthExtent, ConfigError> {
    if let Some(values) = explicit {
        return DepthExtent::from_slice(values);
    }
    check_buffer(buffer_fraction)?;
    let samples = samples.ok_or(ConfigError::MissingExtentSource("depth"))?;
    if samples.is_empty() {
        return Err(ConfigError::EmptySamples("depth"));
    }

    let (depth_min, depth_max) = min_max(samples.iter().copied()).ok_or(ConfigError::NonFiniteExtent { axis: "depth" })?;
    let buffer = (depth_max - depth_min) * buffer_fraction;
    let extent = DepthExtent::new(depth_min - buffer, depth_max + buffer)?;
    debug!(extent = ?extent.as_array(), samples = samples.len(), buffer_fraction, "Depth extent from samples");
    Ok(extent)
}

fn check_axis(axis: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::NonFiniteExtent { axis });
    }
    if max == min {
        return Err(ConfigError::ZeroRange { axis, value: min });
    }
    if max < min {
        return Err(ConfigError::InvertedExtent { axis, min, max });
    }
    Ok(())
}

fn check_buffer(buffer_fraction: f64) -> Result<(), ConfigError> {
    if buffer_fraction.is_finite() && buffer_fraction >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBuffer(buffer_fraction))
    }
}

/// Min and max of a sequence; None if empty or any value is non-finite.
fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut out: Option<(f64, f64)> = None;
    for v in values {
        if !v.is_finite() {
            return None;
        }
        out = Some(match out {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    out
}
