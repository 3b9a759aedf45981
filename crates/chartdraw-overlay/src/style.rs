//! Style options for the position rectangle.

use serde::{Deserialize, Serialize};

/// RGBA color. Alpha is 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// How a border stroke is positioned relative to the box edge.
///
/// Each mode uses a distinct pixel offset so the stroke neither overflows
/// nor underflows the fill; center alignment shifts by half a pixel for odd
/// stroke widths to keep strokes crisp on integer pixel grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderAlign {
    Outer,
    Center,
    Inner,
}

/// Border stroke style for the position boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f64,
    pub color: Color,
    pub align: BorderAlign,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::rgba(255, 255, 255, 0.5),
            align: BorderAlign::Center,
        }
    }
}

/// Style options for a position shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill of the entry-to-stop (risk) box.
    pub risk_fill: Color,
    /// Fill of the entry-to-target (reward) box.
    pub reward_fill: Color,
    pub border: BorderStyle,
    /// Whether the risk/reward and price labels are drawn when the shape is
    /// hovered or selected.
    pub show_labels: bool,
    pub label_color: Color,
    pub handle_fill: Color,
    pub handle_stroke: Color,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            risk_fill: Color::rgba(242, 53, 69, 0.2),
            reward_fill: Color::rgba(3, 153, 129, 0.2),
            border: BorderStyle::default(),
            show_labels: true,
            label_color: Color::rgb(255, 255, 255),
            handle_fill: Color::rgb(0, 0, 0),
            handle_stroke: Color::rgb(30, 83, 229),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_serde_round_trip() {
        let style = ShapeStyle {
            show_labels: false,
            border: BorderStyle {
                width: 2.0,
                color: Color::rgb(10, 20, 30),
                align: BorderAlign::Inner,
            },
            ..Default::default()
        };

        let json = serde_json::to_string(&style).expect("serialize");
        let back: ShapeStyle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(style, back);
    }
}
