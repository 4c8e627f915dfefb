//! Plot styling: event colors, panel decorations
//!
//! Light figure meant for print: white background, black frames, muted grey
//! for the background layer of events.

use plotters::style::RGBColor;

pub mod colors {
    use super::RGBColor;

    // === Figure ===
    pub const BACKGROUND: RGBColor = RGBColor(255, 255, 255);  // #FFFFFF
    pub const FRAME: RGBColor = RGBColor(0, 0, 0);             // #000000 - panel borders, text
    pub const GRID: RGBColor = RGBColor(128, 128, 128);        // #808080 - map gridlines

    // === Events ===
    pub const EVENT_MUTED: RGBColor = RGBColor(224, 224, 224); // #E0E0E0 - layer 1, every event
    pub const UNCLUSTERED: RGBColor = RGBColor(128, 128, 128); // #808080 - not relocated / no cluster id

    // === Overlays ===
    pub const SHAPE_OUTLINE: RGBColor = RGBColor(0, 0, 0);
    pub const COASTLINE: RGBColor = RGBColor(60, 60, 60);      // #3C3C3C

    /// Opacity of map gridlines
    pub const GRID_ALPHA: f64 = 0.3;
}

/// Discrete cluster palette (ColorBrewer "Paired", 12 classes).
/// Cluster `id` uses `CLUSTER_PALETTE[id % 12]`.
pub const CLUSTER_PALETTE: [RGBColor; 12] = [
    RGBColor(0xa6, 0xce, 0xe3), // light blue
    RGBColor(0x1f, 0x78, 0xb4), // blue
    RGBColor(0xb2, 0xdf, 0x8a), // light green
    RGBColor(0x33, 0xa0, 0x2c), // green
    RGBColor(0xfb, 0x9a, 0x99), // pink
    RGBColor(0xe3, 0x1a, 0x1c), // red
    RGBColor(0xfd, 0xbf, 0x6f), // light orange
    RGBColor(0xff, 0x7f, 0x00), // orange
    RGBColor(0xca, 0xb2, 0xd6), // lavender
    RGBColor(0x6a, 0x3d, 0x9a), // purple
    RGBColor(0xff, 0xff, 0x99), // pale yellow
    RGBColor(0xb1, 0x59, 0x28), // brown
];

/// Font family for axis labels
pub const FONT_FAMILY: &str = "sans-serif";

/// Points per inch, for converting marker sizes to pixels
pub const POINTS_PER_INCH: f64 = 72.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_colors_distinct() {
        for i in 0..CLUSTER_PALETTE.len() {
            for j in (i + 1)..CLUSTER_PALETTE.len() {
                assert_ne!(CLUSTER_PALETTE[i], CLUSTER_PALETTE[j], "colors {i} and {j}");
            }
        }
    }

    #[test]
    fn test_unclustered_not_in_palette() {
        assert!(!CLUSTER_PALETTE.contains(&colors::UNCLUSTERED));
        assert!(!CLUSTER_PALETTE.contains(&colors::EVENT_MUTED));
    }
}
