//! Pointer event router.
//!
//! Subscribes to the host's raw pointer primitives and republishes a
//! normalized semantic stream: click, hover move, drag start, drag move,
//! drag end. Clicks are sourced directly from the host's click primitive;
//! drag state is tracked independently from presses and moves, so the only
//! disambiguation needed is the small pixel threshold below which a
//! press-move-release still counts as a click.

use std::cell::Cell;
use std::rc::Rc;

use chartdraw_core::constants::DRAG_THRESHOLD_PX;
use chartdraw_core::{Delegate, OwnerId, PixelPoint};

use crate::host::ChartEvents;

/// Translates raw host pointer events into the semantic stream consumed by
/// shapes and the drawing tool.
#[derive(Debug)]
pub struct PointerRouter {
    /// A completed click.
    pub clicked: Delegate<PixelPoint>,
    /// Hover movement; `None` when the pointer leaves the plotting area.
    pub moved: Delegate<Option<PixelPoint>>,
    /// A drag crossed the pixel threshold; payload is the press position.
    pub drag_started: Delegate<PixelPoint>,
    /// Drag movement, fired for every move while a drag is active.
    pub dragging: Delegate<PixelPoint>,
    /// The active drag ended (button release or pointer leaving the pane).
    pub drag_ended: Delegate<()>,

    owner: OwnerId,
    pressed_at: Cell<Option<PixelPoint>>,
    drag_active: Cell<bool>,
}

impl PointerRouter {
    /// Creates a detached router.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            clicked: Delegate::new(),
            moved: Delegate::new(),
            drag_started: Delegate::new(),
            dragging: Delegate::new(),
            drag_ended: Delegate::new(),
            owner: OwnerId::new(),
            pressed_at: Cell::new(None),
            drag_active: Cell::new(false),
        })
    }

    /// Subscribes to the host's raw streams. Call [`Self::detach`] with the
    /// same events bundle on teardown.
    pub fn attach(self: &Rc<Self>, events: &ChartEvents) {
        let owner = self.owner;

        let router = Rc::downgrade(self);
        events.click.subscribe_with(
            move |pos| {
                if let Some(router) = router.upgrade() {
                    router.clicked.fire(pos);
                }
            },
            Some(owner),
            false,
        );

        let router = Rc::downgrade(self);
        events.cursor_move.subscribe_with(
            move |pos| {
                if let Some(router) = router.upgrade() {
                    router.on_cursor_move(*pos);
                }
            },
            Some(owner),
            false,
        );

        let router = Rc::downgrade(self);
        events.button_down.subscribe_with(
            move |pos| {
                if let Some(router) = router.upgrade() {
                    router.pressed_at.set(Some(*pos));
                }
            },
            Some(owner),
            false,
        );

        let router = Rc::downgrade(self);
        events.button_up.subscribe_with(
            move |_| {
                if let Some(router) = router.upgrade() {
                    router.on_button_up();
                }
            },
            Some(owner),
            false,
        );

        tracing::debug!("pointer router attached as {}", owner);
    }

    /// Unsubscribes every raw-stream registration and resets drag state.
    pub fn detach(&self, events: &ChartEvents) {
        events.click.unsubscribe_all(self.owner);
        events.cursor_move.unsubscribe_all(self.owner);
        events.button_down.unsubscribe_all(self.owner);
        events.button_up.unsubscribe_all(self.owner);
        self.pressed_at.set(None);
        self.drag_active.set(false);
        tracing::debug!("pointer router detached as {}", self.owner);
    }

    fn on_cursor_move(&self, pos: Option<PixelPoint>) {
        match pos {
            Some(pos) => {
                if let Some(press) = self.pressed_at.get() {
                    if !self.drag_active.get() && !press.distance_within(pos, DRAG_THRESHOLD_PX) {
                        self.drag_active.set(true);
                        self.drag_started.fire(&press);
                    }
                    if self.drag_active.get() {
                        self.dragging.fire(&pos);
                    }
                }
                self.moved.fire(&Some(pos));
            }
            None => {
                // Pointer left the pane; an in-flight drag or press ends.
                self.pressed_at.set(None);
                if self.drag_active.get() {
                    self.drag_active.set(false);
                    self.drag_ended.fire(&());
                }
                self.moved.fire(&None);
            }
        }
    }

    fn on_button_up(&self) {
        self.pressed_at.set(None);
        if self.drag_active.get() {
            self.drag_active.set(false);
            self.drag_ended.fire(&());
        }
    }
}
