//! Geometry core: extents, selection shapes, panel layout, projection

pub mod extent;
pub mod layout;
pub mod projection;
pub mod shape;

pub use extent::{
    compute_depth_extent, compute_map_extent, DepthExtent, MapExtent, DEFAULT_BUFFER_FRACTION, KM_PER_DEG_LAT, MAX_LATITUDE,
};
pub use layout::{FigureGeometry, PanelLayout, PanelRectangles, Rect};
pub use projection::{Projection, MERCATOR_MAX_LAT};
pub use shape::Shape;
