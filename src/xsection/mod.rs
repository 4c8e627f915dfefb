//! Map and depth cross-section rendering

pub mod coastline;
pub mod renderer;

pub use coastline::{resolve_coastlines, CoastlineDir, CoastlineResolution, CoastlineSource, NoCoastlines, Polyline};
pub use renderer::{classify, figure_pixels, Canvas, EventRenderer, MarkerStyle, OutputFormat, RenderStats};
