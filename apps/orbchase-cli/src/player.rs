//! A scripted stand-in for the host's character controller.

use clap::ValueEnum;
use glam::Vec3;
use orbchase_scene::SceneGraph;

/// How the scripted player moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Fly straight at the live orb, ignoring gravity.
    Chase,
    /// Stand still on whatever is below.
    Idle,
    /// Walk along +X until the ground runs out.
    Fall,
}

pub const GRAVITY: f32 = 9.81;
pub const CHASE_SPEED: f32 = 4.0;
pub const WALK_SPEED: f32 = 3.0;
/// How far above the feet a surface may sit and still be stepped onto.
const STEP_TOLERANCE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    strategy: Strategy,
    position: Vec3,
    vertical_speed: f32,
}

impl ScriptedPlayer {
    pub fn new(strategy: Strategy, position: Vec3) -> Self {
        Self {
            strategy,
            position,
            vertical_speed: 0.0,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Feet position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the body, as the host does on a teleport request.
    pub fn teleport(&mut self, to: Vec3) {
        self.position = to;
        self.vertical_speed = 0.0;
    }

    /// Advance by `dt` seconds. `orb` is the live orb's centre.
    pub fn advance(&mut self, dt: f32, scene: &SceneGraph, orb: Option<Vec3>) {
        match self.strategy {
            Strategy::Chase => {
                // feet one unit below the centre puts the orb at waist height
                if let Some(orb) = orb {
                    let goal = orb - Vec3::Y;
                    let offset = goal - self.position;
                    let reach = CHASE_SPEED * dt;
                    self.position = if offset.length() <= reach {
                        goal
                    } else {
                        self.position + offset.normalize() * reach
                    };
                }
            }
            Strategy::Idle => self.fall(dt, scene),
            Strategy::Fall => {
                self.position.x += WALK_SPEED * dt;
                self.fall(dt, scene);
            }
        }
    }

    fn fall(&mut self, dt: f32, scene: &SceneGraph) {
        let support = scene.static_surface_below(self.position, STEP_TOLERANCE);
        self.vertical_speed -= GRAVITY * dt;
        let next = self.position.y + self.vertical_speed * dt;
        match support {
            Some(top) if next <= top => {
                self.position.y = top;
                self.vertical_speed = 0.0;
            }
            _ => self.position.y = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use orbchase_kernel::GameConfig;
    use orbchase_scene::build_arena;

    fn arena() -> SceneGraph {
        let mut scene = SceneGraph::new();
        build_arena(&mut scene, &GameConfig::default()).unwrap();
        scene
    }

    #[test]
    fn idle_player_lands_on_the_ground() {
        let scene = arena();
        let mut player = ScriptedPlayer::new(Strategy::Idle, Vec3::ZERO);
        for _ in 0..120 {
            player.advance(1.0 / 60.0, &scene, None);
        }
        assert_relative_eq!(player.position().y, -1.75, epsilon = 1e-5);
    }

    #[test]
    fn walker_drops_past_the_edge() {
        let scene = arena();
        let mut player = ScriptedPlayer::new(Strategy::Fall, Vec3::ZERO);
        for _ in 0..(60 * 6) {
            player.advance(1.0 / 60.0, &scene, None);
        }
        assert!(player.position().x > 10.0);
        assert!(player.position().y < -10.0);
    }

    #[test]
    fn chaser_reaches_the_orb_and_stops() {
        let scene = SceneGraph::new();
        let mut player = ScriptedPlayer::new(Strategy::Chase, Vec3::ZERO);
        let orb = Vec3::new(3.0, 0.0, 0.0);
        for _ in 0..30 {
            player.advance(0.1, &scene, Some(orb));
        }
        assert_eq!(player.position(), Vec3::new(3.0, -1.0, 0.0));
    }

    #[test]
    fn teleport_clears_fall_speed() {
        let scene = SceneGraph::new();
        let mut player = ScriptedPlayer::new(Strategy::Idle, Vec3::ZERO);
        player.advance(0.5, &scene, None);
        assert!(player.position().y < 0.0);
        player.teleport(Vec3::ZERO);
        player.advance(0.1, &scene, None);
        assert_relative_eq!(player.position().y, -GRAVITY * 0.01, epsilon = 1e-6);
    }
}
