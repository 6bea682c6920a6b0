use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;

/// Platform centres of the orb arena: ground, four low corners, four mid
/// platforms on the cardinal axes, and the high centre platform.
pub const ARENA_WAYPOINTS: [Vec3; 10] = [
    Vec3::new(0.0, -2.0, 0.0),
    Vec3::new(8.0, 0.0, 8.0),
    Vec3::new(-8.0, 0.0, 8.0),
    Vec3::new(8.0, 0.0, -8.0),
    Vec3::new(-8.0, 0.0, -8.0),
    Vec3::new(12.0, 2.0, 0.0),
    Vec3::new(-12.0, 2.0, 0.0),
    Vec3::new(0.0, 2.0, 12.0),
    Vec3::new(0.0, 2.0, -12.0),
    Vec3::new(0.0, 5.0, 0.0),
];

/// Pick a position for a freshly spawned orb.
///
/// A waypoint is drawn uniformly from `config.waypoints`, then offset by
/// uniform jitter in `[-orb_jitter, orb_jitter)` on X and Z and lifted by
/// `orb_lift`. The jitter can push an orb past the edge of the smaller
/// platforms; callers get the raw position.
pub fn respawn_position<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Vec3 {
    let Some(waypoint) = config.waypoints.choose(rng).copied() else {
        // validate() rules this out; fall back to the starting orb spot
        return config.initial_orb;
    };
    let span = config.orb_jitter * 2.0;
    let dx = (rng.r#gen::<f32>() - 0.5) * span;
    let dz = (rng.r#gen::<f32>() - 0.5) * span;
    Vec3::new(
        waypoint.x + dx,
        waypoint.y + config.orb_lift,
        waypoint.z + dz,
    )
}
