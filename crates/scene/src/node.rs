use serde::{Deserialize, Serialize};

use orbchase_common::{Color, NodeId, Transform};
use orbchase_input::ControlScheme;

/// Geometric primitive of a mesh node, in local units before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with the given full extents.
    Box { size: [f32; 3] },
    Sphere { radius: f32 },
}

impl Shape {
    pub const UNIT_BOX: Shape = Shape::Box {
        size: [1.0, 1.0, 1.0],
    };
}

/// Surface description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub emissive: Option<(Color, f32)>,
    /// Texture asset path; the host loads it.
    pub texture: Option<String>,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            emissive: None,
            texture: None,
        }
    }

    pub fn glowing(color: Color, intensity: f32) -> Self {
        Self {
            color,
            emissive: Some((color, intensity)),
            texture: None,
        }
    }

    pub fn textured(path: impl Into<String>) -> Self {
        Self {
            color: Color::WHITE,
            emissive: None,
            texture: Some(path.into()),
        }
    }
}

/// How a mesh takes part in the host physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    /// Visual only.
    None,
    /// Static collision geometry the character can stand on.
    Static,
    /// Trigger volume that reports overlaps but does not collide.
    Sensor,
}

/// Directional-light shadow settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub map_size: u32,
    /// Half-width of the orthographic shadow camera.
    pub extent: f32,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Procedural sky backdrop.
    Sky,
    DirectionalLight {
        intensity: f32,
        shadow: Option<Shadow>,
    },
    AmbientLight {
        intensity: f32,
        color: Color,
    },
    /// Linear distance fog.
    Fog {
        color: Color,
        near: f32,
        far: f32,
    },
    /// The host-controlled player character.
    Character {
        scheme: ControlScheme,
        show_model: bool,
    },
    Mesh {
        shape: Shape,
        material: Material,
        body: Body,
    },
    /// Transform-only parent for other nodes.
    Group,
    /// Billboard text, anchored at its centre.
    Text {
        content: String,
        font_size: f32,
        color: Color,
        /// Reports clicks back to the host input layer.
        clickable: bool,
    },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sky => "sky",
            Self::DirectionalLight { .. } => "directional-light",
            Self::AmbientLight { .. } => "ambient-light",
            Self::Fog { .. } => "fog",
            Self::Character { .. } => "character",
            Self::Mesh { .. } => "mesh",
            Self::Group => "group",
            Self::Text { .. } => "text",
        }
    }

    pub fn text(content: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self::Text {
            content: content.into(),
            font_size,
            color,
            clickable: false,
        }
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Transform relative to the parent (or the world for roots).
    pub transform: Transform,
    pub visible: bool,
    pub parent: Option<NodeId>,
    /// Creation sequence number, used for stable listing order.
    pub order: u64,
}
