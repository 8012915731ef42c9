/// Application-wide layout constants.
/// Values are logical canvas units; the viewport transform maps them to
/// device pixels.

/// Reference triangle panel (left), 340x340.
pub const REF_W: f64 = 340.0;
/// Construction panel (right), 450x350.
pub const CONS_W: f64 = 450.0;
pub const CONS_H: f64 = 350.0;
/// Horizontal gap between the two panels.
pub const PANEL_GAP: f64 = 20.0;
/// Total logical drawing area; the construction panel is the taller one.
pub const LOGICAL_W: f64 = REF_W + PANEL_GAP + CONS_W;
pub const LOGICAL_H: f64 = CONS_H;
/// Construction origin `D`, relative to the construction panel.
pub const ORIGIN_X: f64 = CONS_W - 50.0;
pub const ORIGIN_Y: f64 = CONS_H - 50.0;
/// Screen margin kept around the logical area (px).
pub const VIEW_MARGIN: f64 = 20.0;
/// Radii of the angle markers.
pub const RIGHT_ANGLE_RADIUS: f64 = 20.0;
pub const ACUTE_ARC_RADIUS: f64 = 25.0;
/// Hit distance for clicking the hypotenuse (logical units).
pub const HYPOTENUSE_HIT_RADIUS: f64 = 8.0;
/// Vertex dot radius.
pub const VERTEX_RADIUS: f64 = 5.0;
