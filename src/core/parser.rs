//! Catalog parser for JSON event catalogs
//!
//! Accepts `{"events": [...]}` documents (or a bare array of events) in the
//! layout of [`Event`]. Each event is decoded on its own so a bad entry is
//! reported with its index.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::catalog::{Catalog, Event};
use crate::error::DataError;

/// Read and parse a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let catalog = parse_catalog(&text)?;
    debug!(path = %path.display(), events = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Parse a catalog document.
pub fn parse_catalog(text: &str) -> Result<Catalog, DataError> {
    trace!(len = text.len(), "Parsing catalog");

    let json: Value = serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "Failed to parse catalog JSON");
        DataError::Malformed(e.to_string())
    })?;

    let entries = match &json {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("events") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(DataError::Malformed("\"events\" must be an array".into())),
            None => return Err(DataError::Malformed("missing \"events\" array".into())),
        },
        _ => return Err(DataError::Malformed("expected an object or an array of events".into())),
    };

    let events = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Event>(entry.clone()).map_err(|e| {
                warn!(index, error = %e, "Failed to parse event");
                DataError::Malformed(format!("event {index}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalog { events })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_document() {
        let text = r#"{
            "events": [
                {
                    "preferred_origin_id": "smi:origin/2",
                    "origins": [
                        {"resource_id": "smi:origin/1", "latitude": -12.8, "longitude": 45.3, "depth": 10000.0},
                        {
                            "resource_id": "smi:origin/2",
                            "latitude": -12.81,
                            "longitude": 45.31,
                            "depth": 12000.0,
                            "method_id": "smi:local/HYPODD",
                            "comments": [{"text": "HypoDD cluster id: 2"}]
                        }
                    ],
                    "magnitudes": [{"mag": 2.1}]
                }
            ]
        }"#;

        let catalog = parse_catalog(text).unwrap();
        assert_eq!(catalog.len(), 1);
        let event = &catalog.events[0];
        assert_eq!(event.origins.len(), 2);
        assert_eq!(event.preferred_origin().unwrap().depth_m, Some(12000.0));
        assert_eq!(event.magnitude(), Some(2.1));
        assert_eq!(event.origins[1].comments[0].text.as_deref(), Some("HypoDD cluster id: 2"));
    }

    #[test]
    fn test_parse_bare_array_with_missing_fields() {
        let catalog = parse_catalog(r#"[{"origins": [{"latitude": 1.0}]}, {}]"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.events[0].origins[0].longitude, None);
        assert!(catalog.events[1].origins.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_catalog("not json"), Err(DataError::Malformed(_))));
        assert!(matches!(parse_catalog(r#"{"evts": []}"#), Err(DataError::Malformed(_))));
        assert!(matches!(parse_catalog("42"), Err(DataError::Malformed(_))));

        let err = parse_catalog(r#"{"events": [{}, {"origins": [{"latitude": "north"}]}]}"#).unwrap_err();
        match err {
            DataError::Malformed(msg) => assert!(msg.starts_with("event 1:"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, DataError::Unreadable { .. }));
    }
}
