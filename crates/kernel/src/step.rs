use glam::Vec3;

use crate::config::GameConfig;
use crate::game::{GameEvent, GameState};

/// What happened during one call to [`step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub events: Vec<GameEvent>,
}

impl StepReport {
    /// True when the zombie landed a hit this frame.
    pub fn was_hit(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
    }

    /// True when this frame ended the run.
    pub fn ended_run(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
    }

    /// Teleport target requested this frame, if any.
    pub fn teleport(&self) -> Option<Vec3> {
        self.events.iter().find_map(|e| match e {
            GameEvent::TeleportPlayer { to } => Some(*to),
            _ => None,
        })
    }
}

/// Advance the game by one frame.
///
/// `dt` is the time since the previous frame in seconds; negative or
/// non-finite values count as zero. `player` is the host character's current
/// position. Does nothing while the run is over.
///
/// Order within a frame: flash decay, cooldown tick, zombie step, hit check,
/// fall check. The hit check sees the zombie's post-step position.
pub fn step(state: &mut GameState, config: &GameConfig, dt: f32, player: Vec3) -> StepReport {
    let mut report = StepReport::default();
    if state.is_game_over() {
        return report;
    }
    let _span = tracing::debug_span!("game_step").entered();
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    state.fade_flash(config.flash_fade_per_frame);

    let zombie = state.zombie_mut();
    if zombie.attack_cooldown > 0.0 {
        zombie.attack_cooldown -= dt;
    }

    let interval = config.move_interval(state.score());
    let zombie = state.zombie_mut();
    zombie.move_timer += dt;
    if zombie.move_timer >= interval {
        zombie.move_timer = 0.0;
        let from = zombie.position;
        if let Some((to, facing)) = chase_step(from, player, config) {
            zombie.position = to;
            zombie.facing = facing;
            tracing::trace!(?from, ?to, interval, "zombie stepped");
            report.events.push(GameEvent::ZombieStepped { from, to });
        }
    }

    let zombie = state.zombie_mut();
    if zombie.attack_cooldown <= 0.0 && zombie.position.distance(player) < config.hit_radius {
        zombie.attack_cooldown = config.attack_cooldown;
        state.flash();
        let health = state.apply_damage(config.hit_damage);
        tracing::debug!(health, "zombie hit player");
        report.events.push(GameEvent::PlayerHit {
            damage: config.hit_damage,
            health,
        });
        if health == 0 && state.end_run() {
            tracing::info!(score = state.score(), "game over: killed by zombie");
            report.events.push(GameEvent::GameOver {
                score: state.score(),
            });
        }
    }

    if player.y < config.fall_threshold {
        state.flash();
        state.drain_health();
        report.events.push(GameEvent::PlayerFell { y: player.y });
        if state.end_run() {
            tracing::info!(score = state.score(), y = player.y, "game over: fell off the map");
            report.events.push(GameEvent::GameOver {
                score: state.score(),
            });
        }
        report.events.push(GameEvent::TeleportPlayer {
            to: config.player_spawn,
        });
    }

    report
}

/// One zombie step toward the player's horizontal position.
///
/// Returns the new position and the yaw facing the player, or `None` when the
/// two share the same X/Z and there is no direction to walk in.
fn chase_step(from: Vec3, player: Vec3, config: &GameConfig) -> Option<(Vec3, f32)> {
    let offset = Vec3::new(player.x - from.x, 0.0, player.z - from.z);
    let direction = offset.try_normalize()?;
    let to = Vec3::new(
        from.x + direction.x * config.zombie_step,
        player.y - config.zombie_height_offset,
        from.z + direction.z * config.zombie_step,
    );
    let facing = (player.x - to.x).atan2(player.z - to.z);
    Some((to, facing))
}
