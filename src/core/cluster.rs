//! Cluster ids from relocation annotations
//!
//! HypoDD writes the cluster an event was relocated in as a free-text origin
//! comment such as `"HypoDD cluster id: 3"`. Only origins produced by HypoDD
//! carry a meaningful id; anything else is unclustered.

use plotters::style::RGBColor;
use tracing::trace;

use super::catalog::Origin;
use crate::theme::{colors, CLUSTER_PALETTE};

/// Marker substring of the method id of relocated origins (case-insensitive).
pub const RELOCATION_METHOD_TAG: &str = "HYPODD";

/// Marker substring of the comment holding the cluster id.
pub const CLUSTER_COMMENT_TAG: &str = "HypoDD cluster id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterLabel {
    /// Not relocated, or no valid cluster annotation.
    Unclustered,
    Cluster(u32),
}

impl ClusterLabel {
    /// Plot color: `palette[id mod palette_size]`, or the reserved grey.
    pub fn color(&self) -> RGBColor {
        match self {
            ClusterLabel::Unclustered => colors::UNCLUSTERED,
            ClusterLabel::Cluster(id) => CLUSTER_PALETTE[*id as usize % CLUSTER_PALETTE.len()],
        }
    }
}

/// Cluster label of an origin.
///
/// Malformed annotations are not an error; they yield `Unclustered`.
pub fn cluster_label(origin: &Origin) -> ClusterLabel {
    let relocated = origin
        .method_id
        .as_deref()
        .is_some_and(|m| m.to_uppercase().contains(RELOCATION_METHOD_TAG));
    if !relocated {
        return ClusterLabel::Unclustered;
    }

    let Some(text) = origin
        .comments
        .iter()
        .filter_map(|c| c.text.as_deref())
        .find(|t| t.contains(CLUSTER_COMMENT_TAG))
    else {
        return ClusterLabel::Unclustered;
    };

    match parse_cluster_id(text) {
        Some(id) => ClusterLabel::Cluster(id),
        None => {
            trace!(comment = text, "Unparsable cluster annotation");
            ClusterLabel::Unclustered
        }
    }
}

/// Integer after the last ':' of the annotation.
fn parse_cluster_id(text: &str) -> Option<u32> {
    let (_, value) = text.rsplit_once(':')?;
    value.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Comment;

    fn hypodd_origin(comments: &[&str]) -> Origin {
        Origin {
            method_id: Some("smi:local/hypoDD".into()),
            comments: comments.iter().map(|t| Comment { text: Some(t.to_string()) }).collect(),
            ..Origin::at(0.0, 0.0, 0.0)
        }
    }

    #[test]
    fn test_cluster_id_from_comment() {
        let origin = hypodd_origin(&["Relocated", "HypoDD cluster id: 3"]);
        assert_eq!(cluster_label(&origin), ClusterLabel::Cluster(3));
    }

    #[test]
    fn test_not_relocated_is_unclustered() {
        let mut origin = hypodd_origin(&["HypoDD cluster id: 3"]);
        origin.method_id = Some("smi:local/NLLOC".into());
        assert_eq!(cluster_label(&origin), ClusterLabel::Unclustered);
        origin.method_id = None;
        assert_eq!(cluster_label(&origin), ClusterLabel::Unclustered);
    }

    #[test]
    fn test_malformed_annotations_fall_back() {
        assert_eq!(cluster_label(&hypodd_origin(&[])), ClusterLabel::Unclustered);
        assert_eq!(cluster_label(&hypodd_origin(&["HypoDD cluster id: x"])), ClusterLabel::Unclustered);
        assert_eq!(cluster_label(&hypodd_origin(&["HypoDD cluster id: -2"])), ClusterLabel::Unclustered);
        assert_eq!(cluster_label(&hypodd_origin(&["HypoDD cluster id"])), ClusterLabel::Unclustered);
    }

    #[test]
    fn test_palette_wraps() {
        let n = CLUSTER_PALETTE.len() as u32;
        assert_eq!(ClusterLabel::Cluster(1).color(), CLUSTER_PALETTE[1]);
        assert_eq!(ClusterLabel::Cluster(n + 1).color(), ClusterLabel::Cluster(1).color());
        assert_eq!(ClusterLabel::Unclustered.color(), colors::UNCLUSTERED);
    }
}
