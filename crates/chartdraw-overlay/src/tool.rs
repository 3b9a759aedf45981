//! Position drawing tool.
//!
//! Owns the shape lifecycle: toolbar toggle into draw mode, two-click
//! creation with a live preview that follows the pointer, selection-based
//! deletion, and submit. At most one committed rectangle exists at a time;
//! starting a new drawing removes the previous one.

use std::cell::RefCell;
use std::rc::Rc;

use chartdraw_core::{round_to_increment, ChartPoint, OwnerId, PixelPoint};

use crate::host::{ChartHost, Key, SeriesHost, ToolbarHost};
use crate::pointer::PointerRouter;
use crate::position::{AttachContext, PositionShape};
use crate::style::ShapeStyle;

/// Tool configuration.
pub struct ToolOptions {
    /// Called with the rounded entry, stop, and target prices when the user
    /// submits the rectangle.
    pub on_submit: Option<Box<dyn Fn(f64, f64, f64)>>,
    pub style: ShapeStyle,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            on_submit: None,
            style: ShapeStyle::default(),
        }
    }
}

impl std::fmt::Debug for ToolOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolOptions")
            .field("on_submit", &self.on_submit.is_some())
            .field("style", &self.style)
            .finish()
    }
}

#[derive(Default)]
struct ToolState {
    drawing: bool,
    points: Vec<ChartPoint>,
    rectangle: Option<Rc<RefCell<PositionShape>>>,
    preview: Option<Rc<RefCell<PositionShape>>>,
}

/// The drawing tool. Create with [`PositionTool::create`]; tear down with
/// [`PositionTool::remove`].
pub struct PositionTool {
    chart: Rc<dyn ChartHost>,
    series: Rc<dyn SeriesHost>,
    router: Rc<PointerRouter>,
    toolbar: Option<Rc<dyn ToolbarHost>>,
    options: ToolOptions,
    owner: OwnerId,
    state: RefCell<ToolState>,
}

impl PositionTool {
    /// Creates the tool and wires it to the host's input streams.
    ///
    /// The tool owns its [`PointerRouter`]; shapes it creates share the
    /// router so their semantic stream subscriptions line up with the
    /// tool's.
    pub fn create(
        chart: Rc<dyn ChartHost>,
        series: Rc<dyn SeriesHost>,
        toolbar: Option<Rc<dyn ToolbarHost>>,
        options: ToolOptions,
    ) -> Rc<Self> {
        let router = PointerRouter::new();
        router.attach(chart.events());

        let tool = Rc::new(Self {
            chart,
            series,
            router,
            toolbar,
            options,
            owner: OwnerId::new(),
            state: RefCell::new(ToolState::default()),
        });

        let weak = Rc::downgrade(&tool);
        tool.router.clicked.subscribe_with(
            move |pos| {
                if let Some(tool) = weak.upgrade() {
                    tool.on_click(*pos);
                }
            },
            Some(tool.owner),
            false,
        );

        let weak = Rc::downgrade(&tool);
        tool.router.moved.subscribe_with(
            move |pos| {
                if let Some(tool) = weak.upgrade() {
                    tool.on_move(*pos);
                }
            },
            Some(tool.owner),
            false,
        );

        let weak = Rc::downgrade(&tool);
        tool.chart.events().key_down.subscribe_with(
            move |key| {
                if let Some(tool) = weak.upgrade() {
                    tool.on_key(*key);
                }
            },
            Some(tool.owner),
            false,
        );

        if let Some(toolbar) = &tool.toolbar {
            let weak = Rc::downgrade(&tool);
            toolbar.clicks().subscribe_with(
                move |_| {
                    if let Some(tool) = weak.upgrade() {
                        tool.toggle();
                    }
                },
                Some(tool.owner),
                false,
            );
        }

        tracing::debug!("position tool created as {}", tool.owner);
        tool
    }

    pub fn is_drawing(&self) -> bool {
        self.state.borrow().drawing
    }

    /// The committed rectangle, if any.
    pub fn rectangle(&self) -> Option<Rc<RefCell<PositionShape>>> {
        self.state.borrow().rectangle.clone()
    }

    /// Flips draw mode; bound to the toolbar affordance.
    pub fn toggle(&self) {
        if self.is_drawing() {
            self.stop_drawing();
        } else {
            self.start_drawing();
        }
    }

    /// Enters draw mode, removing any previously committed rectangle.
    pub fn start_drawing(&self) {
        let existing = self.state.borrow_mut().rectangle.take();
        if let Some(shape) = existing {
            PositionShape::detach(&shape);
        }
        {
            let mut state = self.state.borrow_mut();
            state.drawing = true;
            state.points.clear();
        }
        if let Some(toolbar) = &self.toolbar {
            toolbar.set_active(true);
        }
        self.chart.request_update();
    }

    /// Leaves draw mode. Any in-progress preview is kept; [`Key::Escape`]
    /// is the path that also discards it.
    pub fn stop_drawing(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.drawing = false;
            state.points.clear();
        }
        if let Some(toolbar) = &self.toolbar {
            toolbar.set_active(false);
        }
    }

    /// Full teardown: shapes, subscriptions, and the router.
    pub fn remove(&self) {
        self.stop_drawing();
        self.remove_preview();
        let rectangle = self.state.borrow_mut().rectangle.take();
        if let Some(shape) = rectangle {
            PositionShape::detach(&shape);
        }

        self.router.clicked.unsubscribe_all(self.owner);
        self.router.moved.unsubscribe_all(self.owner);
        self.chart.events().key_down.unsubscribe_all(self.owner);
        if let Some(toolbar) = &self.toolbar {
            toolbar.clicks().unsubscribe_all(self.owner);
        }
        self.router.detach(self.chart.events());
        self.chart.request_update();
        tracing::debug!("position tool removed as {}", self.owner);
    }

    fn ctx(&self) -> AttachContext {
        AttachContext {
            chart: self.chart.clone(),
            series: self.series.clone(),
            router: self.router.clone(),
        }
    }

    fn on_click(&self, pos: PixelPoint) {
        if !self.is_drawing() {
            return;
        }
        let (Some(time), Some(price)) = (
            self.chart.coordinate_to_time(pos.x),
            self.series.coordinate_to_price(pos.y),
        ) else {
            return;
        };
        self.add_point(ChartPoint::new(time, price));
    }

    fn add_point(&self, point: ChartPoint) {
        let count = {
            let mut state = self.state.borrow_mut();
            state.points.push(point);
            state.points.len()
        };

        if count >= 2 {
            let (p1, p2) = {
                let state = self.state.borrow();
                (state.points[0], state.points[1])
            };
            let shape = Rc::new(RefCell::new(PositionShape::new(p1, p2, self.options.style)));
            PositionShape::attach(&shape, self.ctx());
            self.state.borrow_mut().rectangle = Some(shape);
            self.stop_drawing();
            self.remove_preview();
        } else {
            // First anchor: a zero-size preview that follows the pointer.
            // A preview left over from an interrupted drawing is detached
            // first so it cannot linger on the render list.
            self.remove_preview();
            let shape = Rc::new(RefCell::new(PositionShape::new_preview(
                point,
                point,
                self.options.style,
            )));
            PositionShape::attach(&shape, self.ctx());
            self.state.borrow_mut().preview = Some(shape);
        }
    }

    fn on_move(&self, pos: Option<PixelPoint>) {
        if !self.is_drawing() {
            return;
        }
        let Some(pos) = pos else {
            return;
        };
        let (Some(time), Some(price)) = (
            self.chart.coordinate_to_time(pos.x),
            self.series.coordinate_to_price(pos.y),
        ) else {
            return;
        };
        let preview = self.state.borrow().preview.clone();
        if let Some(preview) = preview {
            preview
                .borrow_mut()
                .set_end_point(ChartPoint::new(time, price));
            self.chart.request_update();
        }
    }

    fn on_key(&self, key: Key) {
        match key {
            Key::Escape => {
                // Unconditional: a toolbar toggle-off mid-draw leaves the
                // preview attached with drawing already off, and Escape is
                // the recovery path for that state too.
                self.stop_drawing();
                self.remove_preview();
            }
            Key::Backspace => {
                let selected = self
                    .state
                    .borrow()
                    .rectangle
                    .as_ref()
                    .map(|r| r.borrow().is_selected())
                    .unwrap_or(false);
                if selected {
                    let rectangle = self.state.borrow_mut().rectangle.take();
                    if let Some(shape) = rectangle {
                        PositionShape::detach(&shape);
                    }
                }
            }
            Key::Enter => self.submit(),
        }
    }

    /// Rounds the three price levels to the tick size and reports them.
    /// Only a selected rectangle submits.
    fn submit(&self) {
        let shape = self.state.borrow().rectangle.clone();
        let Some(shape) = shape else {
            return;
        };
        if !shape.borrow().is_selected() {
            return;
        }
        let increment = self.series.min_price_increment();
        let (entry, stop, target) = {
            let mut s = shape.borrow_mut();
            let entry = round_to_increment(s.entry().price, increment);
            let stop = round_to_increment(s.stop().price, increment);
            let target = round_to_increment(s.target().price, increment);
            s.p1.price = entry;
            s.p2.price = stop;
            s.p4.price = target;
            (entry, stop, target)
        };
        if let Some(on_submit) = &self.options.on_submit {
            on_submit(entry, stop, target);
        }
        self.chart.request_update();
        tracing::debug!(entry, stop, target, "position submitted");
    }

    fn remove_preview(&self) {
        let preview = self.state.borrow_mut().preview.take();
        if let Some(shape) = preview {
            PositionShape::detach(&shape);
        }
    }
}

impl std::fmt::Debug for PositionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PositionTool")
            .field("drawing", &state.drawing)
            .field("points", &state.points.len())
            .field("rectangle", &state.rectangle.is_some())
            .field("preview", &state.preview.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockChart, MockSeries, MockToolbar};

    fn setup() -> (Rc<MockChart>, Rc<MockSeries>, Rc<MockToolbar>, Rc<PositionTool>) {
        let chart = MockChart::new();
        let series = MockSeries::new();
        let toolbar = MockToolbar::new();
        let tool = PositionTool::create(
            chart.clone(),
            series.clone(),
            Some(toolbar.clone()),
            ToolOptions::default(),
        );
        (chart, series, toolbar, tool)
    }

    #[test]
    fn test_toolbar_press_toggles_draw_mode() {
        let (_chart, _series, toolbar, tool) = setup();
        assert!(!tool.is_drawing());

        toolbar.press();
        assert!(tool.is_drawing());
        assert!(toolbar.is_active());

        toolbar.press();
        assert!(!tool.is_drawing());
        assert!(!toolbar.is_active());
    }

    #[test]
    fn test_clicks_are_ignored_outside_draw_mode() {
        let (chart, _series, _toolbar, tool) = setup();
        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));
        assert!(tool.rectangle().is_none());
    }

    #[test]
    fn test_out_of_range_click_adds_no_point() {
        let (chart, _series, _toolbar, tool) = setup();
        tool.start_drawing();
        chart.events().click.fire(&PixelPoint::new(2000.0, 450.0));
        assert!(tool.state.borrow().points.is_empty());
        assert!(tool.state.borrow().preview.is_none());
    }

    #[test]
    fn test_first_click_creates_preview_second_commits() {
        let (chart, series, _toolbar, tool) = setup();
        tool.start_drawing();

        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));
        assert!(tool.state.borrow().preview.is_some());
        assert_eq!(series.primitive_count(), 1);

        chart.events().click.fire(&PixelPoint::new(200.0, 460.0));
        assert!(tool.rectangle().is_some());
        assert!(tool.state.borrow().preview.is_none());
        assert!(!tool.is_drawing());
        // Preview detached, committed rectangle remains.
        assert_eq!(series.primitive_count(), 1);
    }

    #[test]
    fn test_starting_a_new_drawing_removes_the_old_rectangle() {
        let (chart, series, _toolbar, tool) = setup();
        tool.start_drawing();
        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));
        chart.events().click.fire(&PixelPoint::new(200.0, 460.0));
        let first = tool.rectangle().map(|r| Rc::as_ptr(&r));

        tool.start_drawing();
        assert!(tool.rectangle().is_none());
        assert_eq!(series.primitive_count(), 0);

        chart.events().click.fire(&PixelPoint::new(300.0, 450.0));
        chart.events().click.fire(&PixelPoint::new(400.0, 460.0));
        assert!(tool.rectangle().map(|r| Rc::as_ptr(&r)) != first);
        assert_eq!(series.primitive_count(), 1);
    }

    #[test]
    fn test_escape_discards_preview_after_toolbar_toggle_off() {
        let (chart, series, toolbar, tool) = setup();
        toolbar.press();
        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));

        // Toggling draw mode off keeps the preview attached.
        toolbar.press();
        assert!(!tool.is_drawing());
        assert_eq!(series.primitive_count(), 1);

        chart.events().key_down.fire(&Key::Escape);
        assert_eq!(series.primitive_count(), 0);
        assert!(tool.state.borrow().preview.is_none());
    }

    #[test]
    fn test_restart_after_interrupted_drawing_keeps_one_preview() {
        let (chart, series, toolbar, _tool) = setup();
        toolbar.press();
        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));
        toolbar.press();

        // Re-entering draw mode and placing a new first anchor must not
        // leave the interrupted preview on the render list.
        toolbar.press();
        chart.events().click.fire(&PixelPoint::new(300.0, 450.0));
        assert_eq!(series.primitive_count(), 1);
    }

    #[test]
    fn test_preview_follows_the_pointer() {
        let (chart, _series, _toolbar, tool) = setup();
        tool.start_drawing();
        chart.events().click.fire(&PixelPoint::new(100.0, 450.0));

        chart
            .events()
            .cursor_move
            .fire(&Some(PixelPoint::new(300.0, 430.0)));
        let preview = tool.state.borrow().preview.clone().expect("preview");
        let preview = preview.borrow();
        assert_eq!(preview.stop().price, 70.0);
        assert_eq!(preview.stop().time.0, 300);
        // Stop above entry flips the preview short.
        assert_eq!(preview.side(), crate::position::Side::Short);
    }

    #[test]
    fn test_enter_without_rectangle_is_a_no_op() {
        let (chart, _series, _toolbar, tool) = setup();
        chart.events().key_down.fire(&Key::Enter);
        assert!(tool.rectangle().is_none());
    }
}
