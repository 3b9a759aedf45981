//! Host interfaces consumed by the overlay.
//!
//! The chart/rendering host owns the coordinate system, the canvas, and the
//! input devices. The overlay only requires the capabilities below; it never
//! implements them (test doubles live in [`crate::testing`]).
//!
//! Every `Option`-returning coordinate conversion means "outside the
//! visible/valid range" and consumers must treat `None` as "skip this
//! update/frame", never as an error.

use std::rc::Rc;

use chartdraw_core::{ChartTime, Delegate, PixelPoint, Result};

use crate::render::{DrawCommand, RenderScope};

/// Keyboard keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Backspace,
    Enter,
}

/// Raw pointer/keyboard streams owned by the host.
///
/// The host fires these delegates from its native input events; the
/// [`crate::pointer::PointerRouter`] subscribes to them and republishes a
/// normalized semantic stream.
#[derive(Debug, Default)]
pub struct ChartEvents {
    /// A completed click inside the chart pane.
    pub click: Delegate<PixelPoint>,
    /// Pointer movement; `None` when the pointer leaves the plotting area.
    pub cursor_move: Delegate<Option<PixelPoint>>,
    /// Primary button pressed.
    pub button_down: Delegate<PixelPoint>,
    /// Primary button released.
    pub button_up: Delegate<PixelPoint>,
    /// Key pressed while the chart has focus.
    pub key_down: Delegate<Key>,
}

impl ChartEvents {
    /// Creates an event bundle with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The chart pane: time axis transforms, redraw scheduling, gestures, and
/// raw input streams.
pub trait ChartHost {
    /// Pixel x for a chart time, `None` when outside the visible range.
    fn time_to_coordinate(&self, time: ChartTime) -> Option<f64>;

    /// Chart time at a pixel x, `None` when outside the valid domain.
    fn coordinate_to_time(&self, x: f64) -> Option<ChartTime>;

    /// Schedules a redraw. May be called any number of times between
    /// paints; the host coalesces bursts into one repaint.
    fn request_update(&self);

    /// Enables or disables the host's own pan/zoom gestures, used while a
    /// shape is being dragged.
    fn set_gestures_enabled(&self, enabled: bool);

    /// The host's raw input streams.
    fn events(&self) -> &ChartEvents;
}

/// The price series: price axis transforms, tick size, and render-list
/// membership.
pub trait SeriesHost {
    /// Pixel y for a price, `None` when outside the visible range.
    fn price_to_coordinate(&self, price: f64) -> Option<f64>;

    /// Price at a pixel y, `None` when outside the visible range.
    fn coordinate_to_price(&self, y: f64) -> Option<f64>;

    /// Minimum price increment (tick size). May report exactly zero for
    /// degenerate configurations; rounding falls back to a constant.
    fn min_price_increment(&self) -> f64;

    /// Adds an overlay primitive to the host's render list.
    fn attach_primitive(&self, primitive: Rc<dyn PanePrimitive>);

    /// Removes an overlay primitive from the host's render list.
    fn detach_primitive(&self, primitive: &Rc<dyn PanePrimitive>);
}

/// Toolbar affordance for the drawing tool.
///
/// The button chrome itself belongs to the embedding application; the tool
/// only recolors it and listens for activation clicks.
pub trait ToolbarHost {
    /// Recolors the affordance to indicate whether draw mode is active.
    fn set_active(&self, active: bool);

    /// Clicks on the affordance.
    fn clicks(&self) -> &Delegate<()>;
}

/// An overlay the host pulls draw commands from on each paint.
pub trait PanePrimitive {
    /// Produces this frame's draw commands.
    ///
    /// Fails only for lifecycle violations (rendering a primitive whose
    /// host handles were never attached); out-of-range coordinates yield an
    /// empty command list instead.
    fn draw(&self, scope: &RenderScope) -> Result<Vec<DrawCommand>>;
}
