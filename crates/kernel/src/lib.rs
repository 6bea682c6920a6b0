//! Game kernel: authoritative chase-game state and its per-frame update rules.
//!
//! # Invariants
//! - Health stays within `[0, max_health]`.
//! - Score never decreases except on restart, where it returns to 0.
//! - Exactly one zombie and exactly one live orb at all times.
//! - While game over is set, nothing but a restart changes the state.
//! - Randomness only enters through an injected `rand::Rng`.

pub mod config;
pub mod game;
pub mod spawn;
pub mod step;

pub use config::{ConfigError, GameConfig};
pub use game::{CollectOutcome, GameEvent, GameState, Orb, Zombie};
pub use spawn::{respawn_position, ARENA_WAYPOINTS};
pub use step::{step, StepReport};
