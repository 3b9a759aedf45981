//! # chartdraw-core
//!
//! Core types, events, and utilities for the chartdraw overlay.
//! Provides the fundamental abstractions for event delegation,
//! chart-space coordinates, price rounding, and error handling.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;
pub mod units;

pub use error::{OverlayError, Result};
pub use event_bus::{Delegate, OwnerId, SubscriptionId};
pub use types::{ChartPoint, ChartTime, PixelPoint};
pub use units::{format_price, round_to_increment};
