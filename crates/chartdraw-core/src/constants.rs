//! Shared constants for the drawing overlay.

/// Pixel distance the pointer must travel from the press position before a
/// press-and-move is treated as a drag rather than a click.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Pixel radius around a handle within which the pointer is considered to be
/// hovering that handle.
pub const HANDLE_HIT_RADIUS_PX: f64 = 5.0;

/// Default profit target distance as a multiple of the entry-to-stop risk.
pub const DEFAULT_RISK_REWARD_RATIO: f64 = 3.0;

/// Fallback price increment used when the host reports an increment of
/// exactly zero. A zero increment would divide by zero in the rounding
/// formula.
pub const DEFAULT_PRICE_INCREMENT: f64 = 0.00001;

/// Radius of the circular grips drawn at each draggable handle, in bitmap
/// pixels.
pub const HANDLE_RADIUS_PX: f64 = 15.0;

/// Stroke width of the handle grips, in bitmap pixels.
pub const HANDLE_STROKE_WIDTH_PX: f64 = 4.0;

/// Font specification for the hover labels.
pub const LABEL_FONT: &str = "24px Arial";
