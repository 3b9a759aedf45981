//! Host wiring and pointer-driven interaction for a position shape.
//!
//! A shape is attached to a chart/series pair together with a
//! [`PointerRouter`]; from then on it reacts to the router's semantic
//! stream (select on click, hover tracking, handle and whole-body drags)
//! and registers itself as a [`PanePrimitive`] so the host pulls its draw
//! commands each paint.

use std::cell::RefCell;
use std::rc::Rc;

use chartdraw_core::constants::HANDLE_HIT_RADIUS_PX;
use chartdraw_core::{round_to_increment, OverlayError, PixelPoint, Result};

use crate::host::{ChartHost, PanePrimitive, SeriesHost};
use crate::pointer::PointerRouter;
use crate::render::{DrawCommand, RenderParams, RenderScope, ViewPoint};

use super::shape::{DragSession, Handle, PositionShape};

/// Host handles a shape needs while attached.
#[derive(Clone)]
pub struct AttachContext {
    pub chart: Rc<dyn ChartHost>,
    pub series: Rc<dyn SeriesHost>,
    pub router: Rc<PointerRouter>,
}

impl std::fmt::Debug for AttachContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachContext").finish_non_exhaustive()
    }
}

impl PositionShape {
    /// Wires the shape to the host: subscribes to the router's semantic
    /// stream and registers the shape on the series render list.
    pub fn attach(shape: &Rc<RefCell<Self>>, ctx: AttachContext) {
        let owner = {
            let mut s = shape.borrow_mut();
            s.ctx = Some(ctx.clone());
            s.owner
        };

        let weak = Rc::downgrade(shape);
        ctx.router.clicked.subscribe_with(
            move |pos| {
                if let Some(shape) = weak.upgrade() {
                    handle_click(&shape, *pos);
                }
            },
            Some(owner),
            false,
        );

        let weak = Rc::downgrade(shape);
        ctx.router.moved.subscribe_with(
            move |pos| {
                if let Some(shape) = weak.upgrade() {
                    handle_move(&shape, *pos);
                }
            },
            Some(owner),
            false,
        );

        let weak = Rc::downgrade(shape);
        ctx.router.drag_started.subscribe_with(
            move |press| {
                if let Some(shape) = weak.upgrade() {
                    handle_drag_start(&shape, *press);
                }
            },
            Some(owner),
            false,
        );

        let weak = Rc::downgrade(shape);
        ctx.router.dragging.subscribe_with(
            move |pos| {
                if let Some(shape) = weak.upgrade() {
                    handle_dragging(&shape, *pos);
                }
            },
            Some(owner),
            false,
        );

        let weak = Rc::downgrade(shape);
        ctx.router.drag_ended.subscribe_with(
            move |_| {
                if let Some(shape) = weak.upgrade() {
                    handle_drag_end(&shape);
                }
            },
            Some(owner),
            false,
        );

        ctx.series.attach_primitive(shape.clone());
        ctx.chart.request_update();
        tracing::debug!("position shape attached as {}", owner);
    }

    /// Reverses [`Self::attach`]: drops every subscription and removes the
    /// shape from the render list.
    pub fn detach(shape: &Rc<RefCell<Self>>) {
        let (ctx, owner) = {
            let mut s = shape.borrow_mut();
            (s.ctx.take(), s.owner)
        };
        let Some(ctx) = ctx else {
            return;
        };

        ctx.router.clicked.unsubscribe_all(owner);
        ctx.router.moved.unsubscribe_all(owner);
        ctx.router.drag_started.unsubscribe_all(owner);
        ctx.router.dragging.unsubscribe_all(owner);
        ctx.router.drag_ended.unsubscribe_all(owner);

        let primitive: Rc<dyn PanePrimitive> = shape.clone();
        ctx.series.detach_primitive(&primitive);
        ctx.chart.request_update();
        tracing::debug!("position shape detached as {}", owner);
    }
}

fn context_of(shape: &Rc<RefCell<PositionShape>>) -> Option<AttachContext> {
    shape.borrow().ctx.clone()
}

fn project(ctx: &AttachContext, point: chartdraw_core::ChartPoint) -> ViewPoint {
    ViewPoint {
        x: ctx.chart.time_to_coordinate(point.time),
        y: ctx.series.price_to_coordinate(point.price),
        price: point.price,
    }
}

/// The handle whose projected position is within grab distance of `pos`,
/// checked in `p1`, `p2`, `p3`, `p4` order.
fn handle_at(shape: &PositionShape, ctx: &AttachContext, pos: PixelPoint) -> Option<Handle> {
    let candidates = [
        (Handle::P1, shape.p1),
        (Handle::P2, shape.p2),
        (Handle::P3, shape.p3),
        (Handle::P4, shape.p4),
    ];
    for (handle, point) in candidates {
        let projected = project(ctx, point);
        if let (Some(x), Some(y)) = (projected.x, projected.y) {
            if PixelPoint::new(x, y).distance_within(pos, HANDLE_HIT_RADIUS_PX) {
                return Some(handle);
            }
        }
    }
    None
}

fn handle_click(shape: &Rc<RefCell<PositionShape>>, pos: PixelPoint) {
    let Some(ctx) = context_of(shape) else {
        return;
    };
    let time = ctx.chart.coordinate_to_time(pos.x);
    let price = ctx.series.coordinate_to_price(pos.y);
    {
        let mut s = shape.borrow_mut();
        s.selected = match (time, price) {
            (Some(time), Some(price)) => s.is_inside(time, price),
            _ => false,
        };
    }
    ctx.chart.request_update();
}

fn handle_move(shape: &Rc<RefCell<PositionShape>>, pos: Option<PixelPoint>) {
    let Some(ctx) = context_of(shape) else {
        return;
    };
    if let Some(pos) = pos {
        let mut s = shape.borrow_mut();
        // An active drag owns the interaction state.
        if s.drag.is_none() {
            s.hovering_point = handle_at(&s, &ctx, pos);
            let inside = match (
                ctx.chart.coordinate_to_time(pos.x),
                ctx.series.coordinate_to_price(pos.y),
            ) {
                (Some(time), Some(price)) => s.is_inside(time, price),
                _ => false,
            };
            s.hovered = inside || s.hovering_point.is_some();
        }
    }
    ctx.chart.request_update();
}

fn handle_drag_start(shape: &Rc<RefCell<PositionShape>>, press: PixelPoint) {
    let Some(ctx) = context_of(shape) else {
        return;
    };
    let grabbed = {
        let mut s = shape.borrow_mut();
        let point = handle_at(&s, &ctx, press);
        if point.is_some() || s.hovered {
            s.drag = Some(DragSession {
                start: press,
                point,
            });
            true
        } else {
            false
        }
    };
    if grabbed {
        // The host must not pan/zoom while the shape follows the pointer.
        ctx.chart.set_gestures_enabled(false);
    }
}

fn handle_dragging(shape: &Rc<RefCell<PositionShape>>, pos: PixelPoint) {
    let Some(ctx) = context_of(shape) else {
        return;
    };
    let increment = ctx.series.min_price_increment();
    let time = ctx.chart.coordinate_to_time(pos.x);
    let price = ctx.series.coordinate_to_price(pos.y);

    {
        let mut s = shape.borrow_mut();
        let Some(session) = s.drag else {
            return;
        };
        match session.point {
            Some(Handle::P1) => {
                if let Some(time) = time {
                    s.drag_p1_time(time);
                }
            }
            Some(Handle::P2) => {
                if let Some(price) = price {
                    s.drag_p2_price(price, increment);
                }
            }
            Some(Handle::P3) => {
                if let Some(price) = price {
                    s.drag_p3(price, time, increment);
                }
            }
            Some(Handle::P4) => {
                if let Some(price) = price {
                    s.drag_p4_price(price, increment);
                }
            }
            None => {
                // Either price out of range skips the whole event; the
                // anchor stays put so the delta accumulates until the
                // pointer returns.
                let (Some(at), Some(from)) = (
                    ctx.series.coordinate_to_price(pos.y),
                    ctx.series.coordinate_to_price(session.start.y),
                ) else {
                    return;
                };
                let time_delta = body_time_delta(&s, &ctx, pos.x - session.start.x);
                let price_delta = round_to_increment(at - from, increment);
                s.apply_body_delta(time_delta, price_delta);
                // Re-anchor so the next event measures from here.
                s.drag = Some(DragSession {
                    start: pos,
                    point: None,
                });
            }
        }
    }
    ctx.chart.request_update();
}

/// Uniform time shift for a whole-body drag of `dx` pixels.
///
/// Suppressed (zero) when either anchor's shifted position falls outside
/// the valid time domain, so the body cannot be dragged off the edge of the
/// axis.
fn body_time_delta(shape: &PositionShape, ctx: &AttachContext, dx: f64) -> i64 {
    let Some(p1x) = ctx.chart.time_to_coordinate(shape.p1.time) else {
        return 0;
    };
    let Some(p2x) = ctx.chart.time_to_coordinate(shape.p2.time) else {
        return 0;
    };
    match (
        ctx.chart.coordinate_to_time(p1x + dx),
        ctx.chart.coordinate_to_time(p2x + dx),
    ) {
        (Some(shifted), Some(_)) => shifted.delta_from(shape.p1.time),
        _ => 0,
    }
}

fn handle_drag_end(shape: &Rc<RefCell<PositionShape>>) {
    let Some(ctx) = context_of(shape) else {
        return;
    };
    shape.borrow_mut().drag = None;
    ctx.chart.set_gestures_enabled(true);
    ctx.chart.request_update();
}

impl PanePrimitive for RefCell<PositionShape> {
    fn draw(&self, scope: &RenderScope) -> Result<Vec<DrawCommand>> {
        let shape = self.borrow();
        let ctx = shape
            .ctx
            .as_ref()
            .ok_or_else(|| OverlayError::not_attached("position shape"))?;
        let params = RenderParams {
            p1: project(ctx, shape.p1),
            p2: project(ctx, shape.p2),
            p3: project(ctx, shape.p3),
            p4: project(ctx, shape.p4),
            hovered: shape.hovered,
            selected: shape.selected,
        };
        shape.view.update(params);
        Ok(shape.view.render(scope, &shape.style))
    }
}
