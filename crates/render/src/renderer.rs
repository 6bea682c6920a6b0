use glam::Vec3;
use orbchase_scene::{NodeKind, SceneGraph};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

impl RenderView {
    /// Offset of a third-person follow camera from the character's feet.
    pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 6.0);

    /// Third-person camera trailing a character standing at `feet`.
    pub fn follow(feet: Vec3) -> Self {
        Self {
            eye: feet + Self::FOLLOW_OFFSET,
            target: feet + Vec3::Y,
            ..Self::default()
        }
    }

    /// First-person camera at eye height above `feet`, looking along `forward`.
    pub fn first_person(feet: Vec3, forward: Vec3) -> Self {
        let eye = feet + Vec3::Y * 1.6;
        Self {
            eye,
            target: eye + forward.try_normalize().unwrap_or(Vec3::NEG_Z),
            ..Self::default()
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and a view configuration, then
/// produces output. Game truth lives in the kernel, not here.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Lists every effectively visible node with its world position.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> String {
        let nodes = scene.iter_ordered();
        let visible: Vec<_> = nodes
            .iter()
            .filter(|(id, _)| scene.is_effectively_visible(*id))
            .collect();

        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (nodes={}, visible={}) ===\n",
            nodes.len(),
            visible.len()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (id, node) in visible {
            let p = scene.world_position(*id).unwrap_or(node.transform.position);
            out.push_str(&format!(
                "  [{}] {:<18} {:<17} pos=({:.2}, {:.2}, {:.2})\n",
                id.short(),
                node.name,
                node.kind.label(),
                p.x,
                p.y,
                p.z
            ));
        }

        out
    }
}

/// Collects the visible text labels into a single status line.
///
/// Labels appear in creation order, joined by `" | "`.
#[derive(Debug, Default)]
pub struct HudRenderer;

impl HudRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HudRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, _view: &RenderView) -> String {
        scene
            .iter_ordered()
            .into_iter()
            .filter(|(id, _)| scene.is_effectively_visible(*id))
            .filter_map(|(_, node)| match &node.kind {
                NodeKind::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbchase_common::Transform;
    use orbchase_kernel::{GameConfig, GameState};
    use orbchase_scene::{build_arena, build_sandbox, ArenaSync, CharacterCapsule};

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneGraph::new();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());

        assert!(output.contains("nodes=0"));
        assert!(output.contains("visible=0"));
    }

    #[test]
    fn debug_renderer_lists_sandbox() {
        let mut scene = SceneGraph::new();
        build_sandbox(&mut scene);
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());

        assert!(output.contains("textured-box"));
        assert!(output.contains("pos=(0.00, 1.00, -3.00)"));
        assert!(output.contains("character"));
    }

    #[test]
    fn debug_renderer_skips_hidden_subtrees() {
        let mut scene = SceneGraph::new();
        let group = scene.spawn("group", NodeKind::Group, Transform::default());
        scene
            .spawn_child(group, "hidden-child", NodeKind::Group, Transform::default())
            .unwrap();
        scene.set_visible(group, false).unwrap();

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("nodes=2, visible=0"));
        assert!(!output.contains("hidden-child"));
    }

    #[test]
    fn hud_shows_score_and_health_while_playing() {
        let config = GameConfig::default();
        let mut scene = SceneGraph::new();
        build_arena(&mut scene, &config).unwrap();

        let hud = HudRenderer::new().render(&scene, &RenderView::default());
        assert_eq!(hud, "Score: 0 | Health: 100%");
    }

    #[test]
    fn hud_switches_to_game_over_card() {
        let config = GameConfig::default();
        let mut scene = SceneGraph::new();
        let handles = build_arena(&mut scene, &config).unwrap();
        let mut sync = ArenaSync::new(handles, CharacterCapsule::default());
        let mut state = GameState::new(&config);

        orbchase_kernel::step(&mut state, &config, 0.016, Vec3::new(0.0, -20.0, 0.0));
        assert!(state.is_game_over());
        let view = RenderView::follow(Vec3::ZERO);
        sync.apply(&mut scene, &state, Vec3::ZERO, view.eye).unwrap();

        let hud = HudRenderer::new().render(&scene, &view);
        assert_eq!(hud, "GAME OVER | Final Score: 0 | Click to Restart");
    }

    #[test]
    fn follow_camera_trails_the_character() {
        let view = RenderView::follow(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(view.eye, Vec3::new(1.0, 3.0, 8.0));
        assert_eq!(view.target, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn first_person_view_handles_zero_forward() {
        let view = RenderView::first_person(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(view.target - view.eye, Vec3::NEG_Z);
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
