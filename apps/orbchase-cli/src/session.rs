//! One headless run of the orb arena.

use std::fmt;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use orbchase_input::{map_pointer, Action, ControlScheme, PointerEvent};
use orbchase_kernel::{step, GameConfig, GameEvent, GameState};
use orbchase_render::{HudRenderer, RenderView, Renderer};
use orbchase_scene::{build_arena, ArenaSync, CharacterCapsule, NodeKind, SceneError, SceneGraph};

use crate::player::{ScriptedPlayer, Strategy};

/// Game state, scene and scripted player advanced together frame by frame,
/// in the order a host would: move the body, run the game step, honour
/// teleports, report sensor contacts, then sync the scene.
pub struct Session {
    config: GameConfig,
    state: GameState,
    scene: SceneGraph,
    sync: ArenaSync,
    rng: StdRng,
    player: ScriptedPlayer,
    scheme: ControlScheme,
    tally: Tally,
}

/// Running counts of what happened during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub frames: u64,
    pub zombie_steps: u32,
    pub hits: u32,
    pub orbs_collected: u32,
    pub runs_ended: u32,
    pub restarts: u32,
    /// Scene graph mutations mirrored to the host.
    pub scene_changes: u64,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64, strategy: Strategy) -> Result<Self, SceneError> {
        let mut scene = SceneGraph::new();
        let handles = build_arena(&mut scene, &config)?;
        let scheme = match scene.get(handles.character).map(|n| &n.kind) {
            Some(NodeKind::Character { scheme, .. }) => scheme.clone(),
            _ => ControlScheme::third_person(),
        };
        let state = GameState::new(&config);
        let player = ScriptedPlayer::new(strategy, config.player_spawn);
        let mut session = Self {
            sync: ArenaSync::new(handles, CharacterCapsule::default()),
            rng: StdRng::seed_from_u64(seed),
            config,
            state,
            scene,
            player,
            scheme,
            tally: Tally::default(),
        };
        session.sync_scene()?;
        tracing::debug!(seed, ?strategy, nodes = session.scene.node_count(), "session ready");
        Ok(session)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player_position(&self) -> Vec3 {
        self.player.position()
    }

    pub fn view(&self) -> RenderView {
        RenderView::follow(self.player.position())
    }

    /// Advance one frame of `dt` seconds. Returns the game events it raised.
    pub fn frame(&mut self, dt: f32) -> Result<Vec<GameEvent>, SceneError> {
        self.tally.frames += 1;
        if !self.state.is_game_over() {
            let orb = self.state.orbs().first().map(|orb| orb.position);
            self.player.advance(dt, &self.scene, orb);
        }

        let report = step(&mut self.state, &self.config, dt, self.player.position());
        let mut events = report.events;
        if let Some(to) = report_teleport(&events) {
            self.player.teleport(to);
        }

        for id in self.sync.detect_contacts(self.player.position()) {
            let outcome = self.state.collect(&self.config, id, &mut self.rng);
            events.extend(outcome.events());
        }

        self.tally_events(&events);
        self.sync_scene()?;
        Ok(events)
    }

    /// Feed a pointer event through the control scheme and act on it.
    ///
    /// Restart-label events only count while the label is on screen, which
    /// is only the case after the run has ended.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<Action, SceneError> {
        let label_shown = self
            .scene
            .is_effectively_visible(self.sync.handles().restart_text);
        let action = match event {
            PointerEvent::RestartLabelClick | PointerEvent::RestartLabelHover(true)
                if !label_shown =>
            {
                Action::Noop
            }
            _ => map_pointer(&self.scheme, event),
        };
        if action == Action::Restart {
            let events = self.state.restart(&self.config);
            if let Some(to) = report_teleport(&events) {
                self.player.teleport(to);
            }
            self.tally_events(&events);
            self.sync_scene()?;
        }
        Ok(action)
    }

    /// The HUD line as currently shown.
    pub fn hud(&self) -> String {
        HudRenderer::new().render(&self.scene, &self.view())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            strategy: self.player.strategy(),
            score: self.state.score(),
            health: self.state.health(),
            game_over: self.state.is_game_over(),
            tally: self.tally,
            state_hash: self.state.state_hash(),
        }
    }

    fn tally_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ZombieStepped { .. } => self.tally.zombie_steps += 1,
                GameEvent::PlayerHit { .. } => self.tally.hits += 1,
                GameEvent::OrbCollected { .. } => self.tally.orbs_collected += 1,
                GameEvent::GameOver { .. } => self.tally.runs_ended += 1,
                GameEvent::Restarted => self.tally.restarts += 1,
                GameEvent::PlayerFell { .. }
                | GameEvent::OrbSpawned { .. }
                | GameEvent::TeleportPlayer { .. } => {}
            }
        }
    }

    fn sync_scene(&mut self) -> Result<(), SceneError> {
        let eye = self.view().eye;
        self.sync
            .apply(&mut self.scene, &self.state, self.player.position(), eye)?;
        for event in self.scene.drain_events() {
            tracing::trace!(?event, "scene changed");
            self.tally.scene_changes += 1;
        }
        Ok(())
    }
}

fn report_teleport(events: &[GameEvent]) -> Option<Vec3> {
    events.iter().find_map(|e| match e {
        GameEvent::TeleportPlayer { to } => Some(*to),
        _ => None,
    })
}

/// End-of-run numbers printed by the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub strategy: Strategy,
    pub score: u32,
    pub health: u32,
    pub game_over: bool,
    pub tally: Tally,
    pub state_hash: u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Run: strategy={:?} frames={} score={} health={} game_over={} zombie_steps={} hits={} orbs={} deaths={} restarts={} scene_changes={} hash={:#018x}",
            self.strategy,
            self.tally.frames,
            self.score,
            self.health,
            self.game_over,
            self.tally.zombie_steps,
            self.tally.hits,
            self.tally.orbs_collected,
            self.tally.runs_ended,
            self.tally.restarts,
            self.tally.scene_changes,
            self.state_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbchase_input::Cursor;

    const DT: f32 = 1.0 / 60.0;

    fn run(session: &mut Session, frames: usize) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..frames {
            all.extend(session.frame(DT).unwrap());
        }
        all
    }

    #[test]
    fn chaser_collects_orbs() {
        let mut session = Session::new(GameConfig::default(), 7, Strategy::Chase).unwrap();
        let events = run(&mut session, 60 * 5);
        assert!(session.state().score() >= 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::OrbCollected { .. })));
        assert_eq!(session.state().orbs().len(), 1);
        assert_eq!(session.summary().tally.orbs_collected, session.state().score());
    }

    #[test]
    fn walker_falls_and_is_sent_home() {
        let mut session = Session::new(GameConfig::default(), 1, Strategy::Fall).unwrap();
        let events = run(&mut session, 60 * 8);
        assert!(session.state().is_game_over());
        assert_eq!(session.state().health(), 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerFell { .. })));
        assert_eq!(session.player_position(), Vec3::ZERO);
        assert_eq!(session.summary().tally.runs_ended, 1);
        assert!(session.hud().starts_with("GAME OVER"));
    }

    #[test]
    fn game_over_freezes_the_session() {
        let mut session = Session::new(GameConfig::default(), 1, Strategy::Fall).unwrap();
        run(&mut session, 60 * 8);
        let hash = session.state().state_hash();
        let events = run(&mut session, 60);
        assert!(events.is_empty());
        assert_eq!(session.state().state_hash(), hash);
        assert_eq!(session.player_position(), Vec3::ZERO);
    }

    #[test]
    fn restart_label_click_resets_the_run() {
        let config = GameConfig::default();
        let mut session = Session::new(config.clone(), 1, Strategy::Fall).unwrap();
        run(&mut session, 60 * 8);
        assert!(session.state().is_game_over());

        let action = session.pointer(PointerEvent::RestartLabelClick).unwrap();
        assert_eq!(action, Action::Restart);
        assert_eq!(*session.state(), GameState::new(&config));
        assert_eq!(session.summary().tally.restarts, 1);
        assert_eq!(session.hud(), "Score: 0 | Health: 100%");
    }

    #[test]
    fn session_uses_the_character_control_scheme() {
        let session = Session::new(GameConfig::default(), 0, Strategy::Idle).unwrap();
        assert_eq!(session.scheme, ControlScheme::third_person());
    }

    #[test]
    fn restart_click_is_ignored_while_playing() {
        let mut session = Session::new(GameConfig::default(), 7, Strategy::Chase).unwrap();
        run(&mut session, 60 * 5);
        let score = session.state().score();
        assert!(score >= 1);

        let action = session.pointer(PointerEvent::RestartLabelClick).unwrap();
        assert_eq!(action, Action::Noop);
        assert_eq!(session.state().score(), score);
        assert!(!session.state().is_game_over());
        assert_eq!(session.summary().tally.restarts, 0);
    }

    #[test]
    fn restart_label_hover_needs_a_visible_label() {
        let mut session = Session::new(GameConfig::default(), 1, Strategy::Fall).unwrap();
        assert_eq!(
            session.pointer(PointerEvent::RestartLabelHover(true)).unwrap(),
            Action::Noop
        );
        run(&mut session, 60 * 8);
        assert_eq!(
            session.pointer(PointerEvent::RestartLabelHover(true)).unwrap(),
            Action::SetCursor(Cursor::Pointer)
        );
    }

    #[test]
    fn scene_changes_are_counted_and_settle() {
        let mut session = Session::new(GameConfig::default(), 1, Strategy::Fall).unwrap();
        let built = session.summary().tally.scene_changes;
        assert!(built > 0);
        run(&mut session, 60 * 8);
        assert!(session.state().is_game_over());
        let frozen = session.summary().tally.scene_changes;
        run(&mut session, 30);
        assert_eq!(session.summary().tally.scene_changes, frozen);
    }

    #[test]
    fn canvas_click_does_not_restart() {
        let mut session = Session::new(GameConfig::default(), 1, Strategy::Idle).unwrap();
        let action = session.pointer(PointerEvent::CanvasClick).unwrap();
        assert_eq!(action, Action::Noop);
        assert_eq!(session.summary().tally.restarts, 0);
    }

    #[test]
    fn idle_player_gets_hit() {
        let mut session = Session::new(GameConfig::default(), 3, Strategy::Idle).unwrap();
        run(&mut session, 60 * 12);
        assert!(session.summary().tally.hits >= 1);
        assert!(session.state().health() < 100);
    }

    #[test]
    fn same_seed_same_outcome() {
        let mut a = Session::new(GameConfig::default(), 99, Strategy::Chase).unwrap();
        let mut b = Session::new(GameConfig::default(), 99, Strategy::Chase).unwrap();
        run(&mut a, 600);
        run(&mut b, 600);
        assert_eq!(a.summary(), b.summary());
    }

    #[test]
    fn summary_display_lists_counts() {
        let session = Session::new(GameConfig::default(), 0, Strategy::Idle).unwrap();
        let text = session.summary().to_string();
        assert!(text.contains("strategy=Idle"));
        assert!(text.contains("score=0"));
        assert!(text.contains("health=100"));
    }
}
