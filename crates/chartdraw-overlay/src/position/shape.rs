//! Four-point position rectangle model.
//!
//! The shape is defined by the user's two anchor points, entry `p1` and stop
//! `p2`; the far entry corner `p3` and the profit target `p4` are derived.
//! All drag mutations are pure methods over chart-space values so they can
//! be exercised without a host; the clamps keep the three price levels in
//! their side-dependent order with at least one tick between neighbours.

use chartdraw_core::constants::DEFAULT_RISK_REWARD_RATIO;
use chartdraw_core::{ChartPoint, ChartTime, OwnerId, PixelPoint};

use crate::render::PaneView;
use crate::style::ShapeStyle;

use super::interaction::AttachContext;

/// Which side of the entry the stop sits on.
///
/// Long when the stop is at or below the entry, short otherwise. Equal
/// entry and stop count as long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

/// One of the four draggable corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Entry anchor.
    P1,
    /// Stop corner.
    P2,
    /// Entry level at the far time edge.
    P3,
    /// Profit target corner.
    P4,
}

/// An in-flight drag.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    /// Anchor for whole-body deltas; re-anchored to the pointer after every
    /// applied move.
    pub start: PixelPoint,
    /// The grabbed handle, or `None` for a whole-body drag.
    pub point: Option<Handle>,
}

/// A position rectangle with its interaction state.
pub struct PositionShape {
    pub(crate) p1: ChartPoint,
    pub(crate) p2: ChartPoint,
    pub(crate) p3: ChartPoint,
    pub(crate) p4: ChartPoint,
    pub(crate) preview: bool,
    pub(crate) style: ShapeStyle,
    pub(crate) hovered: bool,
    pub(crate) selected: bool,
    pub(crate) hovering_point: Option<Handle>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) owner: OwnerId,
    pub(crate) ctx: Option<AttachContext>,
    pub(crate) view: PaneView,
}

impl std::fmt::Debug for PositionShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionShape")
            .field("p1", &self.p1)
            .field("p2", &self.p2)
            .field("p4", &self.p4)
            .field("preview", &self.preview)
            .field("selected", &self.selected)
            .finish()
    }
}

impl PositionShape {
    /// Creates a committed shape from the entry and stop anchors.
    pub fn new(p1: ChartPoint, p2: ChartPoint, style: ShapeStyle) -> Self {
        Self::with_preview(p1, p2, style, false)
    }

    /// Creates a preview shape that follows the pointer until the second
    /// anchor is committed.
    pub fn new_preview(p1: ChartPoint, p2: ChartPoint, style: ShapeStyle) -> Self {
        Self::with_preview(p1, p2, style, true)
    }

    fn with_preview(p1: ChartPoint, p2: ChartPoint, style: ShapeStyle, preview: bool) -> Self {
        let mut shape = Self {
            p1,
            p2,
            p3: p1,
            p4: p1,
            preview,
            style,
            hovered: false,
            selected: false,
            hovering_point: None,
            drag: None,
            owner: OwnerId::new(),
            ctx: None,
            view: PaneView::new(),
        };
        shape.derive_points();
        shape
    }

    /// Recomputes `p3` and `p4` from the current anchors.
    fn derive_points(&mut self) {
        self.p3 = ChartPoint::new(self.p2.time, self.p1.price);
        let risk = (self.p1.price - self.p2.price).abs();
        let target = match self.side() {
            Side::Long => self.p1.price + DEFAULT_RISK_REWARD_RATIO * risk,
            Side::Short => self.p1.price - DEFAULT_RISK_REWARD_RATIO * risk,
        };
        self.p4 = ChartPoint::new(self.p2.time, target);
    }

    /// Moves the stop anchor and rederives the target; used while the
    /// preview follows the pointer.
    pub fn set_end_point(&mut self, p2: ChartPoint) {
        self.p2 = p2;
        self.derive_points();
    }

    pub fn side(&self) -> Side {
        if self.p1.price >= self.p2.price {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn entry(&self) -> ChartPoint {
        self.p1
    }

    pub fn stop(&self) -> ChartPoint {
        self.p2
    }

    pub fn target(&self) -> ChartPoint {
        self.p4
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Marks the shape committed once the second anchor lands.
    pub fn commit(&mut self) {
        self.preview = false;
    }

    /// Whether a chart-space point lies inside the combined risk and reward
    /// area.
    pub fn is_inside(&self, time: ChartTime, price: f64) -> bool {
        let t_min = self.p1.time.min(self.p2.time);
        let t_max = self.p1.time.max(self.p2.time);
        let p_min = self.p1.price.min(self.p2.price).min(self.p4.price);
        let p_max = self.p4.price.max(self.p2.price.max(self.p4.price));
        time >= t_min && time <= t_max && price >= p_min && price <= p_max
    }

    /// Re-times the entry anchor; the entry price is pinned.
    pub fn drag_p1_time(&mut self, time: ChartTime) {
        self.p1.time = time;
    }

    /// Moves the stop, clamped to at least one tick on its side of the
    /// entry.
    pub fn drag_p2_price(&mut self, price: f64, increment: f64) {
        self.p2.price = match self.side() {
            Side::Long => price.min(self.p1.price - increment),
            Side::Short => price.max(self.p1.price + increment),
        };
    }

    /// Edits the entry level via the far corner; optionally re-times the
    /// far edge.
    ///
    /// The pre-drag corner price is mirrored into the entry first, then the
    /// pointer price is clamped one tick inside the stop/target band into
    /// the corner, so the entry trails the corner by one event during a
    /// drag. The stop and target prices are pinned.
    pub fn drag_p3(&mut self, price: f64, time: Option<ChartTime>, increment: f64) {
        let stop = self.p2.price;
        let profit = self.p4.price;
        self.p1.price = self.p3.price;
        self.p3.price = match self.side() {
            Side::Long => price.max(stop + increment).min(profit - increment),
            Side::Short => price.max(profit + increment).min(stop - increment),
        };
        if let Some(time) = time {
            self.p2.time = time;
            self.p3.time = time;
            self.p4.time = time;
        }
    }

    /// Moves the target, clamped to at least one tick beyond the entry on
    /// the opposite side from the stop.
    pub fn drag_p4_price(&mut self, price: f64, increment: f64) {
        self.p4.price = match self.side() {
            Side::Long => price.max(self.p1.price + increment),
            Side::Short => price.min(self.p1.price - increment),
        };
    }

    /// Shifts the whole shape by a time delta and a price delta.
    pub fn apply_body_delta(&mut self, time_delta: i64, price_delta: f64) {
        self.p1.time = self.p1.time.offset_by(time_delta);
        self.p2.time = self.p2.time.offset_by(time_delta);
        self.p3.time = self.p3.time.offset_by(time_delta);
        self.p4.time = self.p4.time.offset_by(time_delta);
        self.p1.price += price_delta;
        self.p2.price += price_delta;
        self.p3.price += price_delta;
        self.p4.price += price_delta;
    }
}
