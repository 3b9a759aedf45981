//! # chartdraw-overlay
//!
//! The interactive drawing-tool subsystem: a stateful overlay that lets a
//! user draw a "position" rectangle on top of a time/price chart. The
//! rectangle encodes an entry price, a stop price, and a derived profit
//! target, with a live risk/reward readout while hovered.
//!
//! The chart itself is an external collaborator. The overlay consumes a
//! small host interface ([`host::ChartHost`], [`host::SeriesHost`]) for
//! coordinate transforms, redraw scheduling, and raw pointer/keyboard
//! streams, and produces plain [`render::DrawCommand`] lists for the host to
//! paint each frame.
//!
//! ## Components
//!
//! - [`pointer::PointerRouter`] normalizes raw pointer primitives into a
//!   semantic click/move/drag stream, fanned out over event delegates.
//! - [`position::PositionShape`] is the four-point constrained geometric
//!   model plus its interaction state machine.
//! - [`render`] renders the shape into pixel-snapped draw commands.
//! - [`tool::PositionTool`] manages shape lifecycle: toolbar toggle,
//!   two-click creation with live preview, deletion, and submit.

pub mod host;
pub mod pointer;
pub mod position;
pub mod render;
pub mod style;
pub mod testing;
pub mod tool;

pub use host::{ChartEvents, ChartHost, Key, PanePrimitive, SeriesHost, ToolbarHost};
pub use pointer::PointerRouter;
pub use position::{AttachContext, DragSession, Handle, PositionShape, Side};
pub use render::{render_position, DrawCommand, RenderParams, RenderScope, ViewPoint};
pub use style::{BorderAlign, BorderStyle, Color, ShapeStyle};
pub use tool::{PositionTool, ToolOptions};
