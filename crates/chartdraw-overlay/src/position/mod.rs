//! The position rectangle: geometry, constraints, and interaction.
//!
//! [`shape`] holds the pure four-point model and its drag mutations;
//! [`interaction`] wires a shape to a live chart host and drives the model
//! from the pointer router's semantic stream.

pub mod interaction;
pub mod shape;

pub use interaction::AttachContext;
pub use shape::{DragSession, Handle, PositionShape, Side};
