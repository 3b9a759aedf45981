//! # chartdraw
//!
//! An interactive position-rectangle drawing tool for time/price charts.
//! The user draws a rectangle with two clicks (entry and stop); the tool
//! derives a profit target from a fixed risk/reward ratio and keeps the
//! three levels editable through corner handles and whole-body drags, with
//! a live risk/reward readout while the shape is hovered.
//!
//! The chart itself is an external collaborator: the overlay consumes a
//! small host interface for coordinate transforms, redraw scheduling, and
//! raw input streams, and produces plain draw-command lists for the host to
//! paint.
//!
//! ## Architecture
//!
//! chartdraw is organized as a workspace with two crates:
//!
//! 1. **chartdraw-core** - event delegates, chart/pixel coordinate types,
//!    price increment utilities, error types
//! 2. **chartdraw-overlay** - the pointer router, the position shape model
//!    and its interaction state machine, the renderer, and the drawing tool

pub use chartdraw_core as core;
pub use chartdraw_overlay as overlay;

pub use chartdraw_core::{
    format_price, round_to_increment, ChartPoint, ChartTime, Delegate, OverlayError, OwnerId,
    PixelPoint, Result, SubscriptionId,
};

pub use chartdraw_overlay::{
    render_position, AttachContext, BorderAlign, BorderStyle, ChartEvents, ChartHost, Color,
    DragSession, DrawCommand, Handle, Key, PanePrimitive, PointerRouter, PositionShape,
    PositionTool, RenderParams, RenderScope, SeriesHost, ShapeStyle, Side, ToolOptions,
    ToolbarHost, ViewPoint,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
