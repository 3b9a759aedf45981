//! Host test doubles.
//!
//! Deterministic in-memory implementations of the host traits with linear
//! coordinate mappings, used by the unit and integration tests. The chart
//! maps `x = time` over the valid time range `0..=1000`; the series maps
//! `y = 500 - price`, so the valid price range is `-500..=500`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chartdraw_core::constants::DEFAULT_PRICE_INCREMENT;
use chartdraw_core::{ChartTime, Delegate};

use crate::host::{ChartEvents, ChartHost, PanePrimitive, SeriesHost, ToolbarHost};

const TIME_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1000.0;
const PIXEL_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1000.0;

/// Chart host double with an identity time axis.
#[derive(Debug, Default)]
pub struct MockChart {
    events: ChartEvents,
    updates: Cell<usize>,
    gestures_disabled: Cell<bool>,
}

impl MockChart {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of redraws requested so far.
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }

    pub fn gestures_enabled(&self) -> bool {
        !self.gestures_disabled.get()
    }

    pub fn events(&self) -> &ChartEvents {
        &self.events
    }
}

impl ChartHost for MockChart {
    fn time_to_coordinate(&self, time: ChartTime) -> Option<f64> {
        let x = time.0 as f64;
        TIME_RANGE.contains(&x).then_some(x)
    }

    fn coordinate_to_time(&self, x: f64) -> Option<ChartTime> {
        TIME_RANGE
            .contains(&x)
            .then_some(ChartTime(x.round() as i64))
    }

    fn request_update(&self) {
        self.updates.set(self.updates.get() + 1);
    }

    fn set_gestures_enabled(&self, enabled: bool) {
        self.gestures_disabled.set(!enabled);
    }

    fn events(&self) -> &ChartEvents {
        &self.events
    }
}

/// Series host double with an inverted linear price axis.
pub struct MockSeries {
    min_increment: Cell<f64>,
    primitives: RefCell<Vec<Rc<dyn PanePrimitive>>>,
}

impl MockSeries {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            min_increment: Cell::new(DEFAULT_PRICE_INCREMENT),
            primitives: RefCell::new(Vec::new()),
        })
    }

    pub fn set_min_increment(&self, increment: f64) {
        self.min_increment.set(increment);
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.borrow().len()
    }
}

impl SeriesHost for MockSeries {
    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        let y = 500.0 - price;
        PIXEL_RANGE.contains(&y).then_some(y)
    }

    fn coordinate_to_price(&self, y: f64) -> Option<f64> {
        PIXEL_RANGE.contains(&y).then_some(500.0 - y)
    }

    fn min_price_increment(&self) -> f64 {
        self.min_increment.get()
    }

    fn attach_primitive(&self, primitive: Rc<dyn PanePrimitive>) {
        self.primitives.borrow_mut().push(primitive);
    }

    fn detach_primitive(&self, primitive: &Rc<dyn PanePrimitive>) {
        // Compare the data pointers; vtable pointers are not stable across
        // codegen units.
        let target = Rc::as_ptr(primitive) as *const ();
        self.primitives
            .borrow_mut()
            .retain(|p| Rc::as_ptr(p) as *const () != target);
    }
}

impl std::fmt::Debug for MockSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSeries")
            .field("min_increment", &self.min_increment.get())
            .field("primitives", &self.primitive_count())
            .finish()
    }
}

/// Toolbar double tracking the active flag.
#[derive(Debug, Default)]
pub struct MockToolbar {
    active: Cell<bool>,
    clicks: Delegate<()>,
}

impl MockToolbar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Simulates the user pressing the toolbar affordance.
    pub fn press(&self) {
        self.clicks.fire(&());
    }
}

impl ToolbarHost for MockToolbar {
    fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    fn clicks(&self) -> &Delegate<()> {
        &self.clicks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_chart_mapping_is_identity_within_range() {
        let chart = MockChart::new();
        assert_eq!(chart.time_to_coordinate(ChartTime(150)), Some(150.0));
        assert_eq!(chart.coordinate_to_time(150.4), Some(ChartTime(150)));
        assert_eq!(chart.time_to_coordinate(ChartTime(-5)), None);
        assert_eq!(chart.coordinate_to_time(1001.0), None);
    }

    #[test]
    fn test_mock_series_mapping_is_inverted() {
        let series = MockSeries::new();
        assert_eq!(series.price_to_coordinate(50.0), Some(450.0));
        assert_eq!(series.coordinate_to_price(450.0), Some(50.0));
        assert_eq!(series.price_to_coordinate(600.0), None);
    }
}
