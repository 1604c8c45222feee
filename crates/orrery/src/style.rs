//! Presentation constants shared by trace building and selection.
//!
//! The category ramp is a hardcoded Viridis slice so selection code can
//! resolve the exact color a point was originally painted with, without
//! asking the rendering surface for its colorscale machinery.

/// Color applied to every point outside the selection when dimming is on.
pub const UNSELECTED_COLOR: &str = "white";

/// Marker size multiplier per unit of node weight.
pub const NODE_WEIGHT_SIZE_FACTOR: f64 = 5.0;

/// Marker outline color for node points.
pub const NODE_MARKER_LINE_COLOR: &str = "rgb(50,50,50)";

/// Lower bound of the category scale.
pub const CATEGORY_SCALE_MIN: f64 = 0.0;
/// Upper bound of the category scale.
pub const CATEGORY_SCALE_MAX: f64 = 3.0;

/// Viridis color ramp: (scale position, hex color) pairs in ascending order.
const CATEGORY_COLORSCALE: [(f64, &str); 17] = [
    (0.0, "#440154"),
    (0.062_745, "#48186a"),
    (0.125_490, "#472d7b"),
    (0.188_235, "#424086"),
    (0.250_980, "#3b528b"),
    (0.313_725, "#33638d"),
    (0.376_470, "#2c728e"),
    (0.439_215, "#26828e"),
    (0.501_960, "#21918c"),
    (0.564_705, "#1fa088"),
    (0.627_450, "#28ae80"),
    (0.690_196, "#3fbc73"),
    (0.752_941, "#5ec962"),
    (0.815_686, "#84d44b"),
    (0.878_431, "#addc30"),
    (0.941_176, "#d8e219"),
    (1.0, "#fde725"),
];

/// Resolve a scale value (in `CATEGORY_SCALE_MIN..=CATEGORY_SCALE_MAX`) to
/// the nearest ramp color at or above its normalized position.
#[must_use]
pub fn color_from_scale(value: f64) -> &'static str {
    let span = CATEGORY_SCALE_MAX - CATEGORY_SCALE_MIN;
    let scaled = (value - CATEGORY_SCALE_MIN) / span;
    for (position, color) in CATEGORY_COLORSCALE {
        if scaled <= position {
            return color;
        }
    }
    // scaled > 1.0 clamps to the ramp's top color
    CATEGORY_COLORSCALE[CATEGORY_COLORSCALE.len() - 1].1
}

/// Orange.
pub const EDGE_REQUIRES_COLOR: &str = "#FFA500";
/// Gold.
pub const EDGE_SOFT_REQUIRES_COLOR: &str = "#FFD700";
/// DarkSeaGreen.
pub const EDGE_REFERENCES_COLOR: &str = "#8FBC8F";
/// LightSkyBlue.
pub const EDGE_CONTAINS_COLOR: &str = "#87CEFA";

/// Marker symbol for edge sample points.
#[must_use]
pub fn edge_marker_symbol(is_3d: bool) -> &'static str {
    if is_3d { "circle" } else { "hexagon" }
}

/// Marker size for edge sample points.
#[must_use]
pub fn edge_marker_size(is_3d: bool) -> f64 {
    if is_3d { 2.0 } else { 5.0 }
}
