use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use orbchase_common::{NodeId, Transform};

use crate::node::{Body, Node, NodeKind, Shape};

/// A record produced by every mutation to the scene graph.
///
/// Host adapters drain these to mirror the graph into their own scene
/// objects without diffing the whole tree each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Spawned { id: NodeId, parent: Option<NodeId> },
    Despawned { id: NodeId },
    TransformUpdated { id: NodeId, old: Transform, new: Transform },
    VisibilityChanged { id: NodeId, visible: bool },
    KindUpdated { id: NodeId },
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Retained scene: nodes keyed by persistent handle.
///
/// Uses a BTreeMap for deterministic iteration; listing order follows node
/// creation order via [`Node::order`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    next_order: u64,
    #[serde(skip)]
    events: Vec<SceneEvent>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Add a root node.
    pub fn spawn(&mut self, name: impl Into<String>, kind: NodeKind, transform: Transform) -> NodeId {
        self.insert(None, name.into(), kind, transform)
    }

    /// Add a node under `parent`. Its transform is relative to the parent.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        Ok(self.insert(Some(parent), name.into(), kind, transform))
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        kind: NodeKind,
        transform: Transform,
    ) -> NodeId {
        let id = NodeId::new();
        let order = self.next_order;
        self.next_order += 1;
        self.nodes.insert(
            id,
            Node {
                name,
                kind,
                transform,
                visible: true,
                parent,
                order,
            },
        );
        self.events.push(SceneEvent::Spawned { id, parent });
        id
    }

    /// Remove a node and all of its descendants. Returns the removed root.
    pub fn despawn(&mut self, id: NodeId) -> Result<Node, SceneError> {
        for child in self.children(id) {
            self.despawn(child)?;
        }
        let node = self.nodes.remove(&id).ok_or(SceneError::NodeNotFound(id))?;
        self.events.push(SceneEvent::Despawned { id });
        Ok(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Direct children of `id`, in creation order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<(u64, NodeId)> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(child, n)| (n.order, *child))
            .collect();
        children.sort_unstable();
        children.into_iter().map(|(_, c)| c).collect()
    }

    /// All nodes in creation order.
    pub fn iter_ordered(&self) -> Vec<(NodeId, &Node)> {
        let mut all: Vec<(NodeId, &Node)> = self.nodes.iter().map(|(id, n)| (*id, n)).collect();
        all.sort_by_key(|(_, n)| n.order);
        all
    }

    /// First node with the given name, in creation order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter_ordered()
            .into_iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| id)
    }

    /// Replace a node's local transform. No event when nothing changed.
    pub fn set_transform(&mut self, id: NodeId, new: Transform) -> Result<(), SceneError> {
        let node = self.get_mut(id)?;
        let old = node.transform;
        if old == new {
            return Ok(());
        }
        node.transform = new;
        self.events
            .push(SceneEvent::TransformUpdated { id, old, new });
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        let mut t = self.get_mut(id)?.transform;
        t.position = position;
        self.set_transform(id, t)
    }

    /// Show or hide a node. No event when nothing changed.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        let node = self.get_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        self.events
            .push(SceneEvent::VisibilityChanged { id, visible });
        Ok(())
    }

    /// Edit a node's kind in place (text content, light colour, ...).
    /// Records an event only if the edit changed something.
    pub fn update_kind(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut NodeKind),
    ) -> Result<(), SceneError> {
        let node = self.get_mut(id)?;
        let before = node.kind.clone();
        edit(&mut node.kind);
        if node.kind != before {
            self.events.push(SceneEvent::KindUpdated { id });
        }
        Ok(())
    }

    /// A node is effectively visible when it and all its ancestors are.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// World-space affine transform, composed through the parent chain.
    pub fn world_affine(&self, id: NodeId) -> Option<Affine3A> {
        let node = self.nodes.get(&id)?;
        let t = node.transform;
        let local = Affine3A::from_scale_rotation_translation(t.scale, t.rotation, t.position);
        match node.parent {
            Some(parent) => Some(self.world_affine(parent)? * local),
            None => Some(local),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_affine(id)
            .map(|a| a.transform_point3(Vec3::ZERO))
    }

    /// Top of the highest static box under `point`: its X/Z footprint
    /// contains the point and its top is at most `point.y + tolerance`.
    /// Boxes are treated as axis-aligned.
    pub fn static_surface_below(&self, point: Vec3, tolerance: f32) -> Option<f32> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| match node.kind {
                NodeKind::Mesh {
                    shape: Shape::Box { size },
                    body: Body::Static,
                    ..
                } => {
                    let affine = self.world_affine(*id)?;
                    let center = affine.transform_point3(Vec3::ZERO);
                    let half = affine.transform_vector3(Vec3::from(size) * 0.5).abs();
                    let inside = (point.x - center.x).abs() <= half.x
                        && (point.z - center.z).abs() <= half.z;
                    let top = center.y + half.y;
                    (inside && top <= point.y + tolerance).then_some(top)
                }
                _ => None,
            })
            .max_by(f32::total_cmp)
    }

    /// Serialize the graph as pretty JSON for tooling.
    pub fn to_json_pretty(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
