//! Event catalog model
//!
//! Each event carries an ordered list of origins: the first is the original
//! location, the last the current (possibly relocated) one. Depths are stored
//! in meters, as in the source catalogs, and converted to kilometers when
//! positions are extracted for plotting.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DataError;

// ============================================================================
// Catalog types
// ============================================================================

/// Free-text annotation attached to an origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub text: Option<String>,
}

/// One location solution for an event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Depth in meters
    #[serde(default, rename = "depth")]
    pub depth_m: Option<f64>,
    /// Algorithm that produced this origin (e.g. "smi:local/HYPODD")
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Origin {
    /// Origin at a position, depth in meters.
    pub fn at(latitude: f64, longitude: f64, depth_m: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            depth_m: Some(depth_m),
            ..Default::default()
        }
    }

    /// (lon, lat) if both are present and finite.
    pub fn lon_lat(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Some((lon, lat)),
            _ => None,
        }
    }

    /// Plotting position, or the name of the first missing field.
    pub fn position(&self) -> Result<EventPosition, &'static str> {
        let latitude = self.latitude.filter(|v| v.is_finite()).ok_or("latitude")?;
        let longitude = self.longitude.filter(|v| v.is_finite()).ok_or("longitude")?;
        let depth_m = self.depth_m.filter(|v| v.is_finite()).ok_or("depth")?;
        Ok(EventPosition { latitude, longitude, depth_km: depth_m / 1000.0 })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Magnitude {
    pub mag: f64,
}

/// A catalog event with its successive origins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub preferred_origin_id: Option<String>,
    #[serde(default)]
    pub origins: Vec<Origin>,
    #[serde(default)]
    pub magnitudes: Vec<Magnitude>,
}

impl Event {
    /// Origin referenced by `preferred_origin_id`, otherwise the last origin.
    pub fn preferred_origin(&self) -> Option<&Origin> {
        self.preferred_origin_id
            .as_deref()
            .and_then(|id| self.origins.iter().find(|o| o.resource_id.as_deref() == Some(id)))
            .or_else(|| self.origins.last())
    }

    /// First origin: the location before relocation.
    pub fn original_origin(&self) -> Option<&Origin> {
        self.origins.first()
    }

    /// Last origin: relocated if relocation succeeded, else the original.
    pub fn relocated_origin(&self) -> Option<&Origin> {
        self.origins.last()
    }

    /// First listed magnitude value.
    pub fn magnitude(&self) -> Option<f64> {
        self.magnitudes.first().map(|m| m.mag).filter(|m| m.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose original and relocated origins both have a complete
    /// position.
    ///
    /// With [`MissingPolicy::Reject`] the first incomplete event is an error;
    /// with [`MissingPolicy::Skip`] it is logged and left out.
    pub fn plottable_events(&self, policy: MissingPolicy) -> Result<Vec<&Event>, DataError> {
        if self.events.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        let mut out = Vec::with_capacity(self.events.len());
        for (index, event) in self.events.iter().enumerate() {
            let check = match (event.original_origin(), event.relocated_origin()) {
                (Some(first), Some(last)) => first.position().and_then(|_| last.position()).map_err(|field| {
                    DataError::MissingCoordinate { index, field }
                }),
                _ => Err(DataError::NoOrigins { index }),
            };
            match (check, policy) {
                (Ok(_), _) => out.push(event),
                (Err(e), MissingPolicy::Reject) => return Err(e),
                (Err(e), MissingPolicy::Skip) => warn!(index, error = %e, "Skipping event"),
            }
        }
        if out.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        debug!(total = self.events.len(), plottable = out.len(), "Plottable events");
        Ok(out)
    }
}

// ============================================================================
// Positions
// ============================================================================

/// What to do with events that lack a coordinate or depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Fail the whole render.
    Reject,
    /// Leave the event out and log a warning.
    #[default]
    Skip,
}

/// Which origin of each event to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginChoice {
    Original,
    Relocated,
}

/// Plotting position of one event, depth in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
}

/// Positions of a set of events, one per event in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Positions {
    pub points: Vec<EventPosition>,
}

impl Positions {
    /// Extract one origin per event. Events must come from
    /// [`Catalog::plottable_events`]; an incomplete origin is still reported.
    pub fn from_events(events: &[&Event], choice: OriginChoice) -> Result<Self, DataError> {
        let points = events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let origin = match choice {
                    OriginChoice::Original => event.original_origin(),
                    OriginChoice::Relocated => event.relocated_origin(),
                }
                .ok_or(DataError::NoOrigins { index })?;
                origin.position().map_err(|field| DataError::MissingCoordinate { index, field })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (lat, lon) pairs for extent computation.
    pub fn lat_lon(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.latitude, p.longitude)).collect()
    }

    pub fn depths_km(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.depth_km).collect()
    }
}
