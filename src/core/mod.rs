//! Catalog model shared between the library and the CLI

pub mod catalog;
pub mod cluster;
pub mod parser;

pub use catalog::{Catalog, Comment, Event, EventPosition, Magnitude, MissingPolicy, Origin, OriginChoice, Positions};
pub use cluster::{cluster_label, ClusterLabel};
pub use parser::{load_catalog, parse_catalog};
