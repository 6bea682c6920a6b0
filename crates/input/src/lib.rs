//! Input: control schemes for the character host and pointer events mapped
//! to game actions.
//!
//! # Invariants
//! - The game kernel consumes actions, never raw pointer events.
//! - Locomotion itself is driven by the host character; this crate only
//!   describes which host inputs a scene enables.

pub mod action;

pub use action::{map_pointer, Action, CameraBehavior, ControlScheme, Cursor, InputSource, PointerEvent};

pub fn crate_info() -> &'static str {
    "orbchase-input v0.1.0"
}
