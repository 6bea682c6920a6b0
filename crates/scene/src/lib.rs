//! Scene: a retained node graph for the two demo scenes.
//!
//! Scenes are built once into a [`SceneGraph`] and then mutated in place
//! through persistent [`NodeId`](orbchase_common::NodeId) handles. The host
//! renderer and physics engine read the graph; they never own game truth.
//!
//! # Invariants
//! - Every mutation is recorded as a [`SceneEvent`].
//! - Despawning a node despawns its whole subtree.
//! - Listing order is creation order, independent of id values.

pub mod graph;
pub mod levels;
pub mod node;
pub mod sensor;
pub mod sync;

pub use graph::{SceneError, SceneEvent, SceneGraph};
pub use levels::{build_arena, build_sandbox, ArenaHandles, SandboxHandles};
pub use node::{Body, Material, Node, NodeKind, Shadow, Shape};
pub use sensor::{CharacterCapsule, SensorSet};
pub use sync::{ambient_tint, health_color, ArenaSync};

pub fn crate_info() -> &'static str {
    "orbchase-scene v0.1.0"
}
