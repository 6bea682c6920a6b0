//! Shared types used by the game kernel, the scene graph and the renderers.

mod types;

pub use types::{Color, ColorParseError, NodeId, OrbId, Transform};
