//! Position rectangle rendering.
//!
//! Pure functions from the shape's pixel-space points and interaction flags
//! to a list of [`DrawCommand`]s. The host owns the canvas; it executes the
//! commands in order on each paint. All box edges are snapped to the bitmap
//! pixel grid via [`positions_box`].

use std::cell::RefCell;

use chartdraw_core::constants::{
    HANDLE_RADIUS_PX, HANDLE_STROKE_WIDTH_PX, LABEL_FONT,
};
use chartdraw_core::format_price;

use crate::style::{BorderAlign, BorderStyle, Color, ShapeStyle};

/// Paint-target geometry for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderScope {
    /// Media-to-bitmap ratio on the x axis.
    pub horizontal_pixel_ratio: f64,
    /// Media-to-bitmap ratio on the y axis.
    pub vertical_pixel_ratio: f64,
    pub bitmap_width: f64,
    pub bitmap_height: f64,
}

/// A shape point projected into media pixel space.
///
/// Either coordinate is `None` when the point is outside the visible range;
/// the whole frame is skipped in that case.
#[derive(Debug, Clone, Copy)]
pub struct ViewPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub price: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams {
    pub p1: ViewPoint,
    pub p2: ViewPoint,
    pub p3: ViewPoint,
    pub p4: ViewPoint,
    pub hovered: bool,
    pub selected: bool,
}

/// A host-paintable draw command, in bitmap coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        line_width: f64,
        fill: Color,
        stroke: Color,
    },
    /// Text horizontally centered on `x`.
    Text {
        text: String,
        x: f64,
        y: f64,
        font: &'static str,
        color: Color,
    },
}

/// A pixel-snapped box extent on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPositions {
    pub position: f64,
    pub length: f64,
}

/// Snaps the span between two media coordinates onto the bitmap grid.
pub fn positions_box(coord1: f64, coord2: f64, pixel_ratio: f64) -> BoxPositions {
    let scaled1 = (coord1 * pixel_ratio).round();
    let scaled2 = (coord2 * pixel_ratio).round();
    BoxPositions {
        position: scaled1.min(scaled2),
        length: (scaled2 - scaled1).abs() + 1.0,
    }
}

/// Border line offsets for one alignment mode.
///
/// Returns the offset vectors applied to the line start (`near`) and end
/// (`far`) so the stroke sits outside, centered on, or inside the box edge.
/// Center alignment shifts by half a pixel when the stroke width is odd to
/// keep the stroke crisp on the integer pixel grid.
fn border_offsets(align: BorderAlign, width: f64) -> ((f64, f64), (f64, f64)) {
    let half = 0.5 * width;
    match align {
        BorderAlign::Outer => ((0.0, half), (0.0, half)),
        BorderAlign::Center => {
            let odd = width % 2.0 != 0.0;
            let e = if odd { 0.5 } else { 0.0 };
            let t = if odd { 0.5 } else { 1.0 };
            ((half - e, -e), (t + half, -e))
        }
        BorderAlign::Inner => ((0.0, -half), (1.0, -half)),
    }
}

/// Emits a filled box with top and bottom border lines.
///
/// Corner order follows the caller; the fill is normalized, the border
/// lines stay on the given edges so alignment offsets land on the correct
/// side.
fn push_rect_with_border(
    commands: &mut Vec<DrawCommand>,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    fill: Color,
    border: &BorderStyle,
) {
    commands.push(DrawCommand::FillRect {
        x: x1.min(x2),
        y: y1.min(y2),
        width: (x2 - x1).abs(),
        height: (y2 - y1).abs(),
        color: fill,
    });

    if border.width > 0.0 {
        let (near, far) = border_offsets(border.align, border.width);
        commands.push(DrawCommand::Line {
            x1: x1 - near.0,
            y1: y1 - near.1,
            x2: x2 + far.0,
            y2: y1 - far.1,
            width: border.width,
            color: border.color,
        });
        commands.push(DrawCommand::Line {
            x1: x1 - near.0,
            y1: y2 + near.1,
            x2: x2 + far.0,
            y2: y2 + far.1,
            width: border.width,
            color: border.color,
        });
    }
}

fn push_handle(commands: &mut Vec<DrawCommand>, cx: f64, cy: f64, style: &ShapeStyle) {
    commands.push(DrawCommand::Circle {
        cx,
        cy,
        radius: HANDLE_RADIUS_PX - HANDLE_STROKE_WIDTH_PX / 2.0,
        line_width: HANDLE_STROKE_WIDTH_PX,
        fill: style.handle_fill,
        stroke: style.handle_stroke,
    });
}

/// Renders the position rectangle for one frame.
///
/// Produces the risk and reward boxes; when the shape is hovered or
/// selected, also the risk/reward ratio and price labels plus a grip circle
/// at each of the four handles. Returns an empty list when any point is
/// outside the visible range.
pub fn render_position(
    params: &RenderParams,
    scope: &RenderScope,
    style: &ShapeStyle,
) -> Vec<DrawCommand> {
    let RenderParams {
        p1,
        p2,
        p3,
        p4,
        hovered,
        selected,
    } = *params;

    let (Some(p1x), Some(p1y)) = (p1.x, p1.y) else {
        return Vec::new();
    };
    let (Some(p2x), Some(p2y)) = (p2.x, p2.y) else {
        return Vec::new();
    };
    if p3.x.is_none() || p3.y.is_none() {
        return Vec::new();
    }
    let (Some(_), Some(p4y)) = (p4.x, p4.y) else {
        return Vec::new();
    };

    let mut commands = Vec::new();
    let highlighted = hovered || selected;

    let horizontal = positions_box(p1x, p2x, scope.horizontal_pixel_ratio);
    let vertical = positions_box(p1y, p2y, scope.vertical_pixel_ratio);
    let target_vertical = positions_box(p2y, p4y, scope.vertical_pixel_ratio);

    let long = p2.price < p1.price;

    let point1_x = horizontal.position;
    let point1_y = vertical.position;
    let point2_x = horizontal.position + horizontal.length;
    let point2_y = vertical.position + vertical.length;
    let point4_x = point2_x;

    // Risk box between entry and stop.
    push_rect_with_border(
        &mut commands,
        point1_x,
        point1_y,
        point2_x,
        point2_y,
        style.risk_fill,
        &style.border,
    );

    // Reward box adjacent to the entry edge; which edge is "near" flips with
    // the drag direction and the side.
    push_rect_with_border(
        &mut commands,
        if p1x < p2x { point1_x } else { point2_x },
        if long { point1_y } else { point2_y },
        if p1x < p2x { point4_x } else { point1_x },
        if long {
            target_vertical.position
        } else {
            target_vertical.position + target_vertical.length
        },
        style.reward_fill,
        &style.border,
    );

    if highlighted {
        let middle = horizontal.position + horizontal.length / 2.0;

        if style.show_labels {
            let risk_to_reward =
                (p1.price - p4.price).abs() / (p1.price - p2.price).abs();
            commands.push(DrawCommand::Text {
                text: format!("RR: {:.2}", risk_to_reward),
                x: middle,
                y: vertical.position + 30.0 + if long { 0.0 } else { vertical.length },
                font: LABEL_FONT,
                color: style.label_color,
            });
            commands.push(DrawCommand::Text {
                text: format!("Target: {}", format_price(p4.price)),
                x: middle,
                y: if long {
                    target_vertical.position - 25.0
                } else {
                    target_vertical.position + target_vertical.length + 47.0
                },
                font: LABEL_FONT,
                color: style.label_color,
            });
            commands.push(DrawCommand::Text {
                text: format!("Stop: {}", format_price(p2.price)),
                x: middle,
                y: if long { point2_y + 25.0 } else { point1_y - 13.0 },
                font: LABEL_FONT,
                color: style.label_color,
            });
        }

        push_handle(
            &mut commands,
            if p1x < p2x { point1_x } else { point2_x },
            if long { point1_y } else { point2_y },
            style,
        );
        push_handle(
            &mut commands,
            if p1x < p2x { point2_x } else { point1_x },
            if long { point2_y } else { point1_y },
            style,
        );
        push_handle(
            &mut commands,
            if p1x < p2x { point2_x } else { point1_x },
            if long { point1_y } else { point2_y },
            style,
        );
        push_handle(
            &mut commands,
            if p1x < p2x {
                horizontal.position + horizontal.length
            } else {
                horizontal.position
            },
            if long {
                target_vertical.position
            } else {
                target_vertical.position + target_vertical.length
            },
            style,
        );
    }

    commands
}

/// Per-shape view: caches the latest [`RenderParams`] so the host can pull
/// draw commands on each paint without recomputing interaction state.
#[derive(Debug, Default)]
pub struct PaneView {
    params: RefCell<Option<RenderParams>>,
}

impl PaneView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached frame parameters.
    pub fn update(&self, params: RenderParams) {
        *self.params.borrow_mut() = Some(params);
    }

    /// Renders the cached parameters, or nothing before the first update.
    pub fn render(&self, scope: &RenderScope, style: &ShapeStyle) -> Vec<DrawCommand> {
        match &*self.params.borrow() {
            Some(params) => render_position(params, scope, style),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> RenderScope {
        RenderScope {
            horizontal_pixel_ratio: 1.0,
            vertical_pixel_ratio: 1.0,
            bitmap_width: 1000.0,
            bitmap_height: 1000.0,
        }
    }

    fn view_point(x: f64, y: f64, price: f64) -> ViewPoint {
        ViewPoint {
            x: Some(x),
            y: Some(y),
            price,
        }
    }

    /// A long position: entry 50 at y=450, stop 40 at y=460, target 80 at
    /// y=420 (y grows downward).
    fn long_params() -> RenderParams {
        RenderParams {
            p1: view_point(100.0, 450.0, 50.0),
            p2: view_point(200.0, 460.0, 40.0),
            p3: view_point(200.0, 450.0, 50.0),
            p4: view_point(200.0, 420.0, 80.0),
            hovered: false,
            selected: false,
        }
    }

    #[test]
    fn test_positions_box_snapping() {
        let b = positions_box(10.4, 20.6, 1.0);
        assert_eq!(b.position, 10.0);
        assert_eq!(b.length, 11.0);

        // Order independent.
        let r = positions_box(20.6, 10.4, 1.0);
        assert_eq!(r, b);

        let hi_dpi = positions_box(10.0, 20.0, 2.0);
        assert_eq!(hi_dpi.position, 20.0);
        assert_eq!(hi_dpi.length, 21.0);
    }

    #[test]
    fn test_border_offsets_center_odd_width_half_pixel() {
        let ((near_x, near_y), (far_x, far_y)) = border_offsets(BorderAlign::Center, 1.0);
        assert_eq!((near_x, near_y), (0.0, -0.5));
        assert_eq!((far_x, far_y), (1.0, -0.5));

        let ((near_x, near_y), (far_x, far_y)) = border_offsets(BorderAlign::Center, 2.0);
        assert_eq!((near_x, near_y), (1.0, 0.0));
        assert_eq!((far_x, far_y), (2.0, 0.0));
    }

    #[test]
    fn test_border_offsets_outer_and_inner() {
        assert_eq!(
            border_offsets(BorderAlign::Outer, 4.0),
            ((0.0, 2.0), (0.0, 2.0))
        );
        assert_eq!(
            border_offsets(BorderAlign::Inner, 4.0),
            ((0.0, -2.0), (1.0, -2.0))
        );
    }

    #[test]
    fn test_missing_coordinate_skips_frame() {
        let mut params = long_params();
        params.p4.y = None;
        assert!(render_position(&params, &scope(), &ShapeStyle::default()).is_empty());
    }

    #[test]
    fn test_unhovered_shape_draws_two_boxes_only() {
        let commands = render_position(&long_params(), &scope(), &ShapeStyle::default());
        // Two fills, each with a top and bottom border line.
        let fills = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(fills, 2);
        assert_eq!(lines, 4);
        assert!(!commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { .. } | DrawCommand::Circle { .. })));
    }

    #[test]
    fn test_hovered_shape_draws_labels_and_handles() {
        let mut params = long_params();
        params.hovered = true;
        let commands = render_position(&params, &scope(), &ShapeStyle::default());

        let texts: Vec<&String> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], "RR: 3.00");
        assert_eq!(texts[1], "Target: 80");
        assert_eq!(texts[2], "Stop: 40");

        let circles = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 4);
    }

    #[test]
    fn test_labels_suppressed_but_handles_kept_when_disabled() {
        let mut params = long_params();
        params.selected = true;
        let style = ShapeStyle {
            show_labels: false,
            ..Default::default()
        };
        let commands = render_position(&params, &scope(), &style);
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Text { .. })));
        assert_eq!(
            commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Circle { .. }))
                .count(),
            4
        );
    }

    #[test]
    fn test_risk_box_geometry() {
        let commands = render_position(&long_params(), &scope(), &ShapeStyle::default());
        let DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            ..
        } = commands[0]
        else {
            panic!("first command should be the risk fill");
        };
        assert_eq!(x, 100.0);
        assert_eq!(y, 450.0);
        assert_eq!(width, 101.0);
        assert_eq!(height, 11.0);
    }

    #[test]
    fn test_reward_box_sits_above_risk_box_for_long() {
        let commands = render_position(&long_params(), &scope(), &ShapeStyle::default());
        let DrawCommand::FillRect { y, height, .. } = commands[3] else {
            panic!("fourth command should be the reward fill");
        };
        // Target span: y 420..=460 snapped; reward fill runs from the entry
        // edge (450) up to the snapped target top (420).
        assert_eq!(y, 420.0);
        assert_eq!(height, 30.0);
    }

    #[test]
    fn test_pane_view_renders_nothing_before_first_update() {
        let view = PaneView::new();
        assert!(view.render(&scope(), &ShapeStyle::default()).is_empty());

        view.update(long_params());
        assert!(!view.render(&scope(), &ShapeStyle::default()).is_empty());
    }
}
