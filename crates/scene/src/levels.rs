//! Layouts of the first-person sandbox and the third-person orb arena.

use glam::Vec3;

use orbchase_common::{Color, NodeId, Transform};
use orbchase_input::ControlScheme;
use orbchase_kernel::GameConfig;

use crate::graph::{SceneError, SceneGraph};
use crate::node::{Body, Material, NodeKind, Shadow, Shape};

/// Handles into the sandbox scene.
#[derive(Debug, Clone, Copy)]
pub struct SandboxHandles {
    pub character: NodeId,
    pub ground: NodeId,
    pub textured_box: NodeId,
}

/// Handles into the arena scene that the game loop mutates.
#[derive(Debug, Clone, Copy)]
pub struct ArenaHandles {
    pub character: NodeId,
    pub zombie: NodeId,
    pub fog: NodeId,
    pub ambient: NodeId,
    /// Parent of the level geometry.
    pub level: NodeId,
    pub score_text: NodeId,
    pub health_text: NodeId,
    pub game_over: NodeId,
    pub final_score_text: NodeId,
    pub restart_text: NodeId,
}

/// Texture shown on the sandbox's box.
pub const SANDBOX_TEXTURE: &str = "image.png";

/// Build the first-person sandbox: a ground slab and one textured box.
pub fn build_sandbox(graph: &mut SceneGraph) -> SandboxHandles {
    let _span = tracing::debug_span!("build_sandbox").entered();
    graph.spawn("sky", NodeKind::Sky, Transform::default());
    graph.spawn(
        "sun",
        NodeKind::DirectionalLight {
            intensity: 1.2,
            shadow: None,
        },
        Transform::from_position(Vec3::new(-10.0, 10.0, -10.0)),
    );
    graph.spawn(
        "ambient",
        NodeKind::AmbientLight {
            intensity: 1.0,
            color: Color::WHITE,
        },
        Transform::default(),
    );
    let character = graph.spawn(
        "player",
        NodeKind::Character {
            scheme: ControlScheme::first_person(),
            show_model: false,
        },
        Transform::default(),
    );
    let ground = graph.spawn(
        "ground",
        prototype_box(Color::WHITE),
        Transform::from_position_scale(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 1.0, 15.0)),
    );
    let textured_box = graph.spawn(
        "textured-box",
        NodeKind::Mesh {
            shape: Shape::UNIT_BOX,
            material: Material::textured(SANDBOX_TEXTURE),
            body: Body::Static,
        },
        Transform::from_position_scale(Vec3::new(0.0, 1.0, -3.0), Vec3::splat(2.0)),
    );
    tracing::debug!(nodes = graph.node_count(), "sandbox built");
    SandboxHandles {
        character,
        ground,
        textured_box,
    }
}

/// Build the orb arena. Orb nodes are not created here; [`crate::ArenaSync`]
/// adds them from the game state.
pub fn build_arena(graph: &mut SceneGraph, config: &GameConfig) -> Result<ArenaHandles, SceneError> {
    let _span = tracing::debug_span!("build_arena").entered();
    graph.spawn("sky", NodeKind::Sky, Transform::default());
    let fog = graph.spawn(
        "damage-fog",
        NodeKind::Fog {
            color: Color::RED,
            near: 1.0,
            far: 50.0,
        },
        Transform::default(),
    );
    graph.set_visible(fog, false)?;
    graph.spawn(
        "sun",
        NodeKind::DirectionalLight {
            intensity: 1.2,
            shadow: Some(Shadow {
                map_size: 1024,
                extent: 20.0,
            }),
        },
        Transform::from_position(Vec3::new(5.0, 10.0, 10.0)),
    );
    let ambient = graph.spawn(
        "ambient",
        NodeKind::AmbientLight {
            intensity: 1.0,
            color: Color::WHITE,
        },
        Transform::default(),
    );
    let character = graph.spawn(
        "player",
        NodeKind::Character {
            scheme: ControlScheme::third_person(),
            show_model: true,
        },
        Transform::from_position(config.player_spawn),
    );

    let zombie = spawn_zombie(graph, config.zombie_spawn)?;
    let level = spawn_level(graph)?;

    let score_text = graph.spawn(
        "score-text",
        NodeKind::text("Score: 0", 0.8, Color::WHITE),
        Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
    );
    let health_text = graph.spawn(
        "health-text",
        NodeKind::text(
            format!("Health: {}%", config.max_health),
            0.8,
            crate::sync::health_color(config.max_health),
        ),
        Transform::from_position(Vec3::new(0.0, 0.5, -2.0)),
    );

    let game_over = graph.spawn("game-over", NodeKind::Group, Transform::default());
    graph.spawn_child(
        game_over,
        "game-over-title",
        NodeKind::text("GAME OVER", 1.5, Color::RED),
        Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
    )?;
    let final_score_text = graph.spawn_child(
        game_over,
        "final-score",
        NodeKind::text("Final Score: 0", 0.8, Color::WHITE),
        Transform::default(),
    )?;
    let restart_text = graph.spawn_child(
        game_over,
        "restart-label",
        NodeKind::Text {
            content: "Click to Restart".into(),
            font_size: 0.6,
            color: Color::hex(0xAAAAAA),
            clickable: true,
        },
        Transform::from_position(Vec3::new(0.0, -1.0, 0.0)),
    )?;
    graph.set_visible(game_over, false)?;

    tracing::debug!(nodes = graph.node_count(), "arena built");
    Ok(ArenaHandles {
        character,
        zombie,
        fog,
        ambient,
        level,
        score_text,
        health_text,
        game_over,
        final_score_text,
        restart_text,
    })
}

fn prototype_box(color: Color) -> NodeKind {
    NodeKind::Mesh {
        shape: Shape::UNIT_BOX,
        material: Material::solid(color),
        body: Body::Static,
    }
}

/// Green box body with two glowing red eyes, rooted at `position`.
fn spawn_zombie(graph: &mut SceneGraph, position: Vec3) -> Result<NodeId, SceneError> {
    let zombie = graph.spawn("zombie", NodeKind::Group, Transform::from_position(position));
    graph.spawn_child(
        zombie,
        "zombie-body",
        NodeKind::Mesh {
            shape: Shape::Box {
                size: [0.8, 1.6, 0.8],
            },
            material: Material::solid(Color::GREEN),
            body: Body::None,
        },
        Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
    )?;
    for (name, x) in [("zombie-eye-left", 0.2), ("zombie-eye-right", -0.2)] {
        graph.spawn_child(
            zombie,
            name,
            NodeKind::Mesh {
                shape: Shape::Sphere { radius: 0.1 },
                material: Material::glowing(Color::RED, 2.0),
                body: Body::None,
            },
            Transform::from_position(Vec3::new(x, 1.0, 0.4)),
        )?;
    }
    Ok(zombie)
}

/// A platform and the ramps leading up to it.
struct Cluster {
    name: &'static str,
    platform: Color,
    ramp: Color,
    center: Vec3,
}

const fn cluster(name: &'static str, platform: u32, ramp: u32, center: Vec3) -> Cluster {
    Cluster {
        name,
        platform: Color::hex(platform),
        ramp: Color::hex(ramp),
        center,
    }
}

const CORNER_PLATFORM: Vec3 = Vec3::new(3.0, 0.5, 3.0);
const CORNER_RAMP: Vec3 = Vec3::new(1.5, 0.3, 1.5);
const MID_PLATFORM: Vec3 = Vec3::new(2.5, 0.5, 2.5);
const SMALL_STEP: Vec3 = Vec3::new(1.2, 0.3, 1.2);

/// Diagonal ramp from the ground to a corner platform, as (distance along
/// both axes, height).
const CORNER_RAMP_STEPS: [(f32, f32); 4] =
    [(2.0, -1.65), (4.0, -1.15), (6.0, -0.65), (7.2, -0.15)];

/// Ramp toward a mid platform, as (distance along the axis, height, lateral
/// offset). Each mid platform has a mirrored pair of these.
const MID_RAMP_STEPS: [(f32, f32, f32); 4] = [
    (9.0, 0.5, 2.0),
    (10.0, 1.0, 1.0),
    (11.0, 1.5, 0.5),
    (11.5, 1.85, 0.2),
];

/// Staircase from a mid platform up to the centre, as (distance along the
/// axis, height).
const CENTER_STAIRS: [(f32, f32); 6] = [
    (11.0, 2.4),
    (9.0, 2.9),
    (7.0, 3.4),
    (5.0, 3.9),
    (3.0, 4.4),
    (1.7, 4.85),
];

fn spawn_level(graph: &mut SceneGraph) -> Result<NodeId, SceneError> {
    let level = graph.spawn("level", NodeKind::Group, Transform::default());
    let add = |graph: &mut SceneGraph, name: String, color: Color, scale: Vec3, at: Vec3| {
        graph
            .spawn_child(level, name, prototype_box(color), Transform::from_position_scale(at, scale))
            .map(|_| ())
    };

    add(
        graph,
        "ground".into(),
        Color::hex(0x87CEEB),
        Vec3::new(20.0, 0.5, 20.0),
        Vec3::new(0.0, -2.0, 0.0),
    )?;

    let corners = [
        cluster("northeast", 0xFF6B6B, 0xFF8E8E, Vec3::new(8.0, 0.0, 8.0)),
        cluster("northwest", 0x4ECDC4, 0x6FD9D1, Vec3::new(-8.0, 0.0, 8.0)),
        cluster("southeast", 0x95E1D3, 0xAAEAE2, Vec3::new(8.0, 0.0, -8.0)),
        cluster("southwest", 0xFFD93D, 0xFFE066, Vec3::new(-8.0, 0.0, -8.0)),
    ];
    for c in &corners {
        add(graph, format!("{}-platform", c.name), c.platform, CORNER_PLATFORM, c.center)?;
        let (sx, sz) = (c.center.x.signum(), c.center.z.signum());
        for (i, (d, y)) in CORNER_RAMP_STEPS.iter().enumerate() {
            add(
                graph,
                format!("{}-ramp-{i}", c.name),
                c.ramp,
                CORNER_RAMP,
                Vec3::new(sx * d, *y, sz * d),
            )?;
        }
    }

    let mids = [
        cluster("east", 0xE76F51, 0xF4A261, Vec3::new(12.0, 2.0, 0.0)),
        cluster("west", 0x2A9D8F, 0x3CB9A9, Vec3::new(-12.0, 2.0, 0.0)),
        cluster("north", 0x9B59B6, 0xB57EDC, Vec3::new(0.0, 2.0, 12.0)),
        cluster("south", 0xE74C3C, 0xEC7063, Vec3::new(0.0, 2.0, -12.0)),
    ];
    for c in &mids {
        add(graph, format!("{}-platform", c.name), c.platform, MID_PLATFORM, c.center)?;
        // unit vector from the origin toward the platform
        let axis = Vec3::new(c.center.x, 0.0, c.center.z).normalize();
        let lateral = Vec3::new(axis.z, 0.0, axis.x);
        for side in [1.0, -1.0] {
            for (i, (d, y, off)) in MID_RAMP_STEPS.iter().enumerate() {
                let at = axis * *d + lateral * (*off * side) + Vec3::Y * *y;
                let tag = if side > 0.0 { "a" } else { "b" };
                add(graph, format!("{}-ramp-{tag}{i}", c.name), c.ramp, SMALL_STEP, at)?;
            }
        }
    }

    add(
        graph,
        "center-platform".into(),
        Color::hex(0xA78BFA),
        Vec3::new(3.0, 0.5, 3.0),
        Vec3::new(0.0, 5.0, 0.0),
    )?;
    for c in &mids {
        let axis = Vec3::new(c.center.x, 0.0, c.center.z).normalize();
        for (i, (d, y)) in CENTER_STAIRS.iter().enumerate() {
            add(
                graph,
                format!("{}-stair-{i}", c.name),
                Color::hex(0xC4B5FD),
                SMALL_STEP,
                axis * *d + Vec3::Y * *y,
            )?;
        }
    }

    Ok(level)
}
