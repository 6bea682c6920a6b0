use glam::{Quat, Vec3};
use std::collections::BTreeMap;

use orbchase_common::{Color, NodeId, OrbId, Transform};
use orbchase_kernel::GameState;

use crate::graph::{SceneError, SceneGraph};
use crate::levels::ArenaHandles;
use crate::node::{Body, Material, NodeKind, Shape};
use crate::sensor::{CharacterCapsule, SensorSet};

/// Radius of an orb's mesh and trigger sphere.
pub const ORB_RADIUS: f32 = 0.5;

/// Distance in front of the camera at which the game-over card floats.
const GAME_OVER_DISTANCE: f32 = 5.0;

/// HUD colour for a health value: green above 50, orange above 25, red below.
pub fn health_color(health: u32) -> Color {
    match health {
        h if h > 50 => Color::hex(0x4CAF50),
        h if h > 25 => Color::hex(0xFFA500),
        _ => Color::RED,
    }
}

/// Ambient light colour for a damage-flash intensity: white when idle,
/// shifting toward red as the flash gets stronger.
pub fn ambient_tint(flash: f32) -> Color {
    if flash <= 0.0 {
        return Color::WHITE;
    }
    let fade = (255.0 * (1.0 - f64::from(flash.min(1.0)) * 0.8)).floor() as u8;
    Color::rgb(255, fade, fade)
}

/// Mirrors [`GameState`] into the arena's scene nodes and owns the orb
/// sensors.
#[derive(Debug)]
pub struct ArenaSync {
    handles: ArenaHandles,
    orb_nodes: BTreeMap<OrbId, NodeId>,
    sensors: SensorSet,
}

impl ArenaSync {
    pub fn new(handles: ArenaHandles, capsule: CharacterCapsule) -> Self {
        Self {
            handles,
            orb_nodes: BTreeMap::new(),
            sensors: SensorSet::new(capsule),
        }
    }

    pub fn handles(&self) -> &ArenaHandles {
        &self.handles
    }

    pub fn orb_node(&self, id: OrbId) -> Option<NodeId> {
        self.orb_nodes.get(&id).copied()
    }

    pub fn orb_count(&self) -> usize {
        self.orb_nodes.len()
    }

    /// Orbs the character started touching at `feet` since the last call.
    pub fn detect_contacts(&mut self, feet: Vec3) -> Vec<OrbId> {
        self.sensors.update(feet)
    }

    /// Bring the scene in line with `state`.
    ///
    /// `player` is the character's feet position and `camera` the host
    /// camera's eye; the game-over card is placed relative to it.
    pub fn apply(
        &mut self,
        graph: &mut SceneGraph,
        state: &GameState,
        player: Vec3,
        camera: Vec3,
    ) -> Result<(), SceneError> {
        let _span = tracing::trace_span!("arena_sync").entered();
        let h = self.handles;
        let playing = !state.is_game_over();

        graph.set_position(h.character, player)?;

        let zombie = state.zombie();
        let mut t = graph
            .get(h.zombie)
            .map(|n| n.transform)
            .ok_or(SceneError::NodeNotFound(h.zombie))?;
        t.position = zombie.position;
        t.rotation = Quat::from_rotation_y(zombie.facing);
        graph.set_transform(h.zombie, t)?;
        graph.set_visible(h.zombie, playing)?;

        self.sync_orbs(graph, state, playing)?;

        let flash = state.damage_flash();
        graph.set_visible(h.fog, flash > 0.0)?;
        let tint = ambient_tint(flash);
        graph.update_kind(h.ambient, |kind| {
            if let NodeKind::AmbientLight { color, .. } = kind {
                *color = tint;
            }
        })?;

        set_text(graph, h.score_text, format!("Score: {}", state.score()), None)?;
        set_text(
            graph,
            h.health_text,
            format!("Health: {}%", state.health()),
            Some(health_color(state.health())),
        )?;
        graph.set_visible(h.score_text, playing)?;
        graph.set_visible(h.health_text, playing)?;

        set_text(
            graph,
            h.final_score_text,
            format!("Final Score: {}", state.score()),
            None,
        )?;
        if !playing {
            graph.set_position(h.game_over, camera - Vec3::Z * GAME_OVER_DISTANCE)?;
        }
        graph.set_visible(h.game_over, !playing)?;
        Ok(())
    }

    fn sync_orbs(
        &mut self,
        graph: &mut SceneGraph,
        state: &GameState,
        playing: bool,
    ) -> Result<(), SceneError> {
        let stale: Vec<OrbId> = self
            .orb_nodes
            .keys()
            .filter(|id| !state.orbs().iter().any(|orb| orb.id == **id))
            .copied()
            .collect();
        for id in stale {
            if let Some(node) = self.orb_nodes.remove(&id) {
                graph.despawn(node)?;
            }
            self.sensors.untrack(id);
            tracing::trace!(%id, "orb node removed");
        }

        for orb in state.orbs() {
            let node = match self.orb_nodes.get(&orb.id) {
                Some(node) => *node,
                None => {
                    let node = graph.spawn(
                        orb.id.to_string(),
                        NodeKind::Mesh {
                            shape: Shape::Sphere {
                                radius: ORB_RADIUS,
                            },
                            material: Material::solid(Color::RED),
                            body: Body::Sensor,
                        },
                        Transform::from_position(orb.position),
                    );
                    self.orb_nodes.insert(orb.id, node);
                    self.sensors.track(orb.id, orb.position, ORB_RADIUS);
                    tracing::trace!(id = %orb.id, position = ?orb.position, "orb node added");
                    node
                }
            };
            graph.set_visible(node, playing)?;
        }
        Ok(())
    }
}

fn set_text(
    graph: &mut SceneGraph,
    id: NodeId,
    text: String,
    tint: Option<Color>,
) -> Result<(), SceneError> {
    graph.update_kind(id, |kind| {
        if let NodeKind::Text { content, color, .. } = kind {
            *content = text;
            if let Some(tint) = tint {
                *color = tint;
            }
        }
    })
}
