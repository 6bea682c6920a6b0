//! Rendering Adapter: renderer-agnostic views of the scene graph.
//!
//! # Invariants
//! - Renderers read the scene graph; they never mutate it.
//! - Output depends only on the graph and the view.
//!
//! The GPU side lives in the host. These renderers give the CLI and tests a
//! textual picture of the same graph the host draws.

mod renderer;

pub use renderer::{DebugTextRenderer, HudRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "orbchase-render v0.1.0"
}
