use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use orbchase_common::OrbId;

use crate::config::GameConfig;
use crate::spawn::respawn_position;

/// A record of something the game rules did during a frame or handler call.
///
/// Hosts use these to drive side effects the kernel does not own: moving the
/// player body, playing cues, syncing scene nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The zombie took one step.
    ZombieStepped { from: Vec3, to: Vec3 },
    /// The zombie landed a hit.
    PlayerHit { damage: u32, health: u32 },
    /// The player dropped below the fall threshold.
    PlayerFell { y: f32 },
    /// The run ended. Carries the final score.
    GameOver { score: u32 },
    /// The player picked up an orb.
    OrbCollected { id: OrbId, score: u32 },
    /// A new orb entered the arena.
    OrbSpawned { id: OrbId, position: Vec3 },
    /// The host should move the player body to this position.
    TeleportPlayer { to: Vec3 },
    /// State was reset to its starting values.
    Restarted,
}

/// The chasing antagonist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zombie {
    pub position: Vec3,
    /// Yaw in radians that turns the model's +Z toward the player.
    pub facing: f32,
    /// Seconds accumulated since the last step.
    pub move_timer: f32,
    /// Seconds left before the next hit may land.
    pub attack_cooldown: f32,
}

impl Zombie {
    pub fn spawned_at(position: Vec3) -> Self {
        Self {
            position,
            facing: 0.0,
            move_timer: 0.0,
            attack_cooldown: 0.0,
        }
    }
}

/// A collectible orb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub id: OrbId,
    pub position: Vec3,
}

/// Result of reporting a player/orb contact.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    /// The orb was removed and a replacement spawned in the same call.
    Collected {
        collected: Orb,
        spawned: Orb,
        score: u32,
    },
    /// Contacts are ignored once the run has ended.
    IgnoredGameOver,
    /// No live orb has this id (a stale sensor report).
    UnknownOrb(OrbId),
}

impl CollectOutcome {
    /// Events describing this outcome, empty when nothing changed.
    pub fn events(&self) -> Vec<GameEvent> {
        match self {
            Self::Collected {
                collected,
                spawned,
                score,
            } => vec![
                GameEvent::OrbCollected {
                    id: collected.id,
                    score: *score,
                },
                GameEvent::OrbSpawned {
                    id: spawned.id,
                    position: spawned.position,
                },
            ],
            Self::IgnoredGameOver | Self::UnknownOrb(_) => Vec::new(),
        }
    }
}

/// Authoritative state of one chase-game run.
///
/// The player's position is owned by the host character controller and is
/// passed into [`crate::step`] each frame; everything else lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    health: u32,
    score: u32,
    game_over: bool,
    /// Red-flash intensity in `[0, 1]`, raised on damage and decayed per frame.
    damage_flash: f32,
    zombie: Zombie,
    orbs: Vec<Orb>,
    next_orb_id: u64,
}

impl GameState {
    /// Fresh state: full health, no score, one orb at its starting spot.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            health: config.max_health,
            score: 0,
            game_over: false,
            damage_flash: 0.0,
            zombie: Zombie::spawned_at(config.zombie_spawn),
            orbs: vec![Orb {
                id: OrbId(0),
                position: config.initial_orb,
            }],
            next_orb_id: 1,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn damage_flash(&self) -> f32 {
        self.damage_flash
    }

    pub fn zombie(&self) -> &Zombie {
        &self.zombie
    }

    /// Live orbs, oldest first.
    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub(crate) fn zombie_mut(&mut self) -> &mut Zombie {
        &mut self.zombie
    }

    pub(crate) fn fade_flash(&mut self, amount: f32) {
        if self.damage_flash > 0.0 {
            self.damage_flash = (self.damage_flash - amount).max(0.0);
        }
    }

    pub(crate) fn flash(&mut self) {
        self.damage_flash = 1.0;
    }

    /// Subtract `damage` from health, saturating at 0. Returns the new health.
    pub(crate) fn apply_damage(&mut self, damage: u32) -> u32 {
        self.health = self.health.saturating_sub(damage);
        self.health
    }

    pub(crate) fn drain_health(&mut self) {
        self.health = 0;
    }

    /// Latch game over. Returns `true` only on the transition.
    pub(crate) fn end_run(&mut self) -> bool {
        let was_over = self.game_over;
        self.game_over = true;
        !was_over
    }

    /// Handle a player/orb contact reported by the host's sensor.
    ///
    /// Scores a point and swaps the orb for a new one at a random waypoint.
    /// Removal and insertion happen together, so the live set never shrinks.
    pub fn collect<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        id: OrbId,
        rng: &mut R,
    ) -> CollectOutcome {
        if self.game_over {
            return CollectOutcome::IgnoredGameOver;
        }
        let Some(index) = self.orbs.iter().position(|orb| orb.id == id) else {
            tracing::debug!(%id, "contact with unknown orb ignored");
            return CollectOutcome::UnknownOrb(id);
        };

        let collected = self.orbs.remove(index);
        self.score = self.score.saturating_add(1);
        let spawned = Orb {
            id: OrbId(self.next_orb_id),
            position: respawn_position(config, rng),
        };
        self.next_orb_id += 1;
        self.orbs.push(spawned);

        tracing::debug!(
            collected = %collected.id,
            spawned = %spawned.id,
            score = self.score,
            "orb collected"
        );
        CollectOutcome::Collected {
            collected,
            spawned,
            score: self.score,
        }
    }

    /// Reset to the starting state. The host should move the player body to
    /// the returned spawn point.
    pub fn restart(&mut self, config: &GameConfig) -> Vec<GameEvent> {
        let final_score = self.score;
        *self = Self::new(config);
        tracing::debug!(final_score, "game restarted");
        vec![
            GameEvent::Restarted,
            GameEvent::TeleportPlayer {
                to: config.player_spawn,
            },
        ]
    }

    /// Deterministic hash of the state, for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            mix(h, &v.x.to_le_bytes());
            mix(h, &v.y.to_le_bytes());
            mix(h, &v.z.to_le_bytes());
        };
        mix(&mut h, &self.health.to_le_bytes());
        mix(&mut h, &self.score.to_le_bytes());
        mix(&mut h, &[self.game_over as u8]);
        mix(&mut h, &self.damage_flash.to_le_bytes());
        mix_vec(&mut h, self.zombie.position);
        mix(&mut h, &self.zombie.facing.to_le_bytes());
        mix(&mut h, &self.zombie.move_timer.to_le_bytes());
        mix(&mut h, &self.zombie.attack_cooldown.to_le_bytes());
        for orb in &self.orbs {
            mix(&mut h, &orb.id.0.to_le_bytes());
            mix_vec(&mut h, orb.position);
        }
        mix(&mut h, &self.next_orb_id.to_le_bytes());
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fresh() -> (GameConfig, GameState, StdRng) {
        let config = GameConfig::default();
        let state = GameState::new(&config);
        (config, state, StdRng::seed_from_u64(5))
    }

    #[test]
    fn new_state_matches_config() {
        let (config, state, _) = fresh();
        assert_eq!(state.health(), 100);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
        assert_eq!(state.damage_flash(), 0.0);
        assert_eq!(state.zombie().position, config.zombie_spawn);
        assert_eq!(state.orbs().len(), 1);
        assert_eq!(state.orbs()[0].id, OrbId(0));
        assert_eq!(state.orbs()[0].position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn collect_scores_and_replaces_orb() {
        let (config, mut state, mut rng) = fresh();
        let outcome = state.collect(&config, OrbId(0), &mut rng);
        let CollectOutcome::Collected {
            collected,
            spawned,
            score,
        } = outcome
        else {
            panic!("expected a collection, got {outcome:?}");
        };
        assert_eq!(collected.id, OrbId(0));
        assert_eq!(spawned.id, OrbId(1));
        assert_eq!(score, 1);
        assert_eq!(state.score(), 1);
        assert_eq!(state.orbs(), &[spawned]);
    }

    #[test]
    fn collect_keeps_exactly_one_orb_with_fresh_ids() {
        let (config, mut state, mut rng) = fresh();
        for expected in 1..=20u64 {
            let id = state.orbs()[0].id;
            state.collect(&config, id, &mut rng);
            assert_eq!(state.orbs().len(), 1);
            assert_eq!(state.orbs()[0].id, OrbId(expected));
        }
        assert_eq!(state.score(), 20);
    }

    #[test]
    fn collect_unknown_orb_changes_nothing() {
        let (config, mut state, mut rng) = fresh();
        let before = state.clone();
        let outcome = state.collect(&config, OrbId(42), &mut rng);
        assert_eq!(outcome, CollectOutcome::UnknownOrb(OrbId(42)));
        assert!(outcome.events().is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn collect_ignored_after_game_over() {
        let (config, mut state, mut rng) = fresh();
        state.drain_health();
        state.end_run();
        let outcome = state.collect(&config, OrbId(0), &mut rng);
        assert_eq!(outcome, CollectOutcome::IgnoredGameOver);
        assert_eq!(state.score(), 0);
        assert_eq!(state.orbs()[0].id, OrbId(0));
    }

    #[test]
    fn collect_outcome_events_describe_swap() {
        let (config, mut state, mut rng) = fresh();
        let events = state.collect(&config, OrbId(0), &mut rng).events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            GameEvent::OrbCollected {
                id: OrbId(0),
                score: 1
            }
        ));
        assert!(matches!(events[1], GameEvent::OrbSpawned { id: OrbId(1), .. }));
    }

    #[test]
    fn apply_damage_saturates_at_zero() {
        let (_, mut state, _) = fresh();
        assert_eq!(state.apply_damage(25), 75);
        assert_eq!(state.apply_damage(500), 0);
        assert_eq!(state.health(), 0);
    }

    #[test]
    fn end_run_reports_only_the_transition() {
        let (_, mut state, _) = fresh();
        assert!(state.end_run());
        assert!(!state.end_run());
        assert!(state.is_game_over());
    }

    #[test]
    fn fade_flash_clamps_at_zero() {
        let (_, mut state, _) = fresh();
        state.flash();
        state.fade_flash(0.75);
        assert!((state.damage_flash() - 0.25).abs() < 1e-6);
        state.fade_flash(0.75);
        assert_eq!(state.damage_flash(), 0.0);
    }

    #[test]
    fn restart_equals_fresh_state() {
        let (config, mut state, mut rng) = fresh();
        for _ in 0..7 {
            let id = state.orbs()[0].id;
            state.collect(&config, id, &mut rng);
        }
        state.apply_damage(100);
        state.flash();
        state.end_run();
        state.zombie_mut().position = Vec3::new(1.0, 2.0, 3.0);
        state.zombie_mut().attack_cooldown = 0.7;

        let events = state.restart(&config);
        assert_eq!(state, GameState::new(&config));
        assert_eq!(
            events,
            vec![
                GameEvent::Restarted,
                GameEvent::TeleportPlayer { to: Vec3::ZERO }
            ]
        );
    }

    #[test]
    fn state_hash_tracks_changes() {
        let (config, mut state, mut rng) = fresh();
        let h0 = state.state_hash();
        assert_eq!(h0, GameState::new(&config).state_hash());
        state.collect(&config, OrbId(0), &mut rng);
        assert_ne!(state.state_hash(), h0);
    }
}
