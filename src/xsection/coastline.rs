//! Coastline overlay for the map panel
//!
//! The resolution name is chosen from a fixed set (NaturalEarth scales and
//! GSHHS levels). An unknown name is not fatal: it is logged once and the
//! map is drawn without coastlines.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::geometry::MapExtent;

/// (lon, lat) vertices of one coastline segment.
pub type Polyline = Vec<(f64, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoastlineResolution {
    NaturalEarth10m,
    NaturalEarth50m,
    NaturalEarth110m,
    GshhsAuto,
    GshhsCoarse,
    GshhsLow,
    GshhsIntermediate,
    GshhsHigh,
    GshhsFull,
}

impl CoastlineResolution {
    pub const ALL: &'static [CoastlineResolution] = &[
        CoastlineResolution::NaturalEarth10m,
        CoastlineResolution::NaturalEarth50m,
        CoastlineResolution::NaturalEarth110m,
        CoastlineResolution::GshhsAuto,
        CoastlineResolution::GshhsCoarse,
        CoastlineResolution::GshhsLow,
        CoastlineResolution::GshhsIntermediate,
        CoastlineResolution::GshhsHigh,
        CoastlineResolution::GshhsFull,
    ];

    /// Name as written in configuration ("10m", "intermediate", ...).
    pub fn name(&self) -> &'static str {
        match self {
            CoastlineResolution::NaturalEarth10m => "10m",
            CoastlineResolution::NaturalEarth50m => "50m",
            CoastlineResolution::NaturalEarth110m => "110m",
            CoastlineResolution::GshhsAuto => "auto",
            CoastlineResolution::GshhsCoarse => "coarse",
            CoastlineResolution::GshhsLow => "low",
            CoastlineResolution::GshhsIntermediate => "intermediate",
            CoastlineResolution::GshhsHigh => "high",
            CoastlineResolution::GshhsFull => "full",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }
}

/// Resolve a configured resolution name; unknown names warn and disable
/// the overlay.
pub fn resolve_coastlines(name: Option<&str>) -> Option<CoastlineResolution> {
    let name = name?;
    let resolution = CoastlineResolution::parse(name);
    if resolution.is_none() {
        warn!(coastlines = name, "Invalid coastlines resolution, drawing map without coastlines");
    }
    resolution
}

/// Provider of coastline polylines.
pub trait CoastlineSource {
    /// Polylines intersecting `extent` at the requested resolution.
    fn polylines(&self, resolution: CoastlineResolution, extent: &MapExtent) -> Vec<Polyline>;
}

/// No coastline data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCoastlines;

impl CoastlineSource for NoCoastlines {
    fn polylines(&self, _resolution: CoastlineResolution, _extent: &MapExtent) -> Vec<Polyline> {
        Vec::new()
    }
}

/// Coastlines stored as `<dir>/<resolution>.json`, each file a JSON array
/// of polylines `[[lon, lat], ...]`.
#[derive(Debug, Clone)]
pub struct CoastlineDir {
    root: PathBuf,
}

impl CoastlineDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_for(&self, resolution: CoastlineResolution) -> PathBuf {
        self.root.join(format!("{}.json", resolution.name()))
    }
}

impl CoastlineSource for CoastlineDir {
    fn polylines(&self, resolution: CoastlineResolution, extent: &MapExtent) -> Vec<Polyline> {
        let path = self.file_for(resolution);
        let Some(all) = read_polylines(&path) else {
            return Vec::new();
        };
        let total = all.len();
        let visible: Vec<Polyline> = all.into_iter().filter(|line| touches(line, extent)).collect();
        debug!(path = %path.display(), total, visible = visible.len(), "Coastlines loaded");
        visible
    }
}

fn read_polylines(path: &Path) -> Option<Vec<Polyline>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| warn!(path = %path.display(), error = %e, "Coastline file unreadable"))
        .ok()?;
    let json: Value = serde_json::from_str(&text)
        .map_err(|e| warn!(path = %path.display(), error = %e, "Coastline file is not JSON"))
        .ok()?;
    let lines = json.as_array()?;
    Some(
        lines
            .iter()
            .filter_map(|line| {
                line.as_array().map(|pts| {
                    pts.iter()
                        .filter_map(|p| Some((p.get(0)?.as_f64()?, p.get(1)?.as_f64()?)))
                        .collect::<Polyline>()
                })
            })
            .filter(|line| line.len() >= 2)
            .collect(),
    )
}

fn touches(line: &[(f64, f64)], extent: &MapExtent) -> bool {
    line.iter().any(|&(lon, lat)| {
        lon >= extent.lon_min() && lon <= extent.lon_max() && lat >= extent.lat_min() && lat <= extent.lat_max()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for &resolution in CoastlineResolution::ALL {
            assert_eq!(CoastlineResolution::parse(resolution.name()), Some(resolution));
        }
        assert_eq!(CoastlineResolution::parse("99z"), None);
        assert_eq!(CoastlineResolution::parse("10M"), None);
    }

    #[test]
    fn test_resolve_none_is_silent() {
        assert_eq!(resolve_coastlines(None), None);
        assert_eq!(resolve_coastlines(Some("50m")), Some(CoastlineResolution::NaturalEarth50m));
        assert_eq!(resolve_coastlines(Some("99z")), None);
    }

    #[test]
    fn test_coastline_dir_filters_to_extent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("10m.json"),
            "[[[45.1, -12.9], [45.2, -12.8]], [[10.0, 10.0], [11.0, 11.0]], [[45.5]]]",
        )
        .unwrap();
        let source = CoastlineDir::new(dir.path());
        let extent = MapExtent::new(45.0, 46.0, -13.0, -12.0).unwrap();

        let lines = source.polylines(CoastlineResolution::NaturalEarth10m, &extent);
        assert_eq!(lines, vec![vec![(45.1, -12.9), (45.2, -12.8)]]);

        // Missing file for another resolution: empty, not an error
        assert!(source.polylines(CoastlineResolution::GshhsFull, &extent).is_empty());
    }
}
