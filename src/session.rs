//! Session driver: frame pacing around the fixed-step simulation
//!
//! Each rendered frame runs a fixed number of simulation sub-steps whose
//! length follows the measured frame rate, clamped so that a slow frame
//! never produces a step long enough to tunnel through a barrier.

use crate::error::ConfigError;
use crate::input::{HeldKeys, KeyMap};
use crate::settings::PhysicsConfig;
use crate::sim::{Arena, ArenaLayout, GameEvent, TickInput, tick};

/// One game from setup to the end of the grace period
#[derive(Debug, Clone)]
pub struct Session {
    arena: Arena,
    /// Key bindings per player id
    keymaps: Vec<(u32, KeyMap)>,
    held: Vec<(u32, HeldKeys)>,
    /// Simulated seconds left before the session reports finished
    grace_left: Option<f64>,
}

impl Session {
    pub fn new(layout: &ArenaLayout, config: PhysicsConfig, seed: u64) -> Result<Self, ConfigError> {
        let arena = Arena::from_layout(layout, config, seed)?;

        let mut keymaps: Vec<(u32, KeyMap)> = Vec::with_capacity(layout.players.len());
        for (player, spec) in arena.players.iter().zip(&layout.players) {
            // A key may only drive one player
            for (_, other) in &keymaps {
                if let Some(key) = spec.keymap.keys().find(|k| other.direction(k).is_some()) {
                    return Err(ConfigError::DuplicateKey(key.to_string()));
                }
            }
            keymaps.push((player.id, spec.keymap.clone()));
        }
        let held = arena.players.iter().map(|p| (p.id, HeldKeys::default())).collect();

        Ok(Self {
            arena,
            keymaps,
            held,
            grace_left: None,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Route a key press or release to whichever player owns the key.
    /// Returns false for unbound keys.
    pub fn key_event(&mut self, key: &str, pressed: bool) -> bool {
        for ((_, keymap), (_, held)) in self.keymaps.iter().zip(&mut self.held) {
            if keymap.apply(key, pressed, held) {
                return true;
            }
        }
        log::trace!("Unbound key {key:?}");
        false
    }

    /// Overwrite a player's held directions (for scripted input)
    pub fn set_held(&mut self, player_id: u32, keys: HeldKeys) {
        if let Some((_, held)) = self.held.iter_mut().find(|(id, _)| *id == player_id) {
            *held = keys;
        }
    }

    /// Length of one simulation sub-step at the measured frame rate
    pub fn step_dt(&self, measured_fps: f64) -> f64 {
        let config = &self.arena.config;
        let fps = if measured_fps.is_finite() {
            measured_fps.clamp(config.min_draw_fps, config.max_draw_fps)
        } else {
            config.min_draw_fps
        };
        1.0 / (fps * config.simulation_frames_per_draw as f64)
    }

    /// Run one rendered frame worth of simulation
    pub fn advance_frame(&mut self, measured_fps: f64) -> Vec<GameEvent> {
        let dt = self.step_dt(measured_fps);
        let input = TickInput {
            held: self.held.clone(),
        };

        let mut events = Vec::new();
        for _ in 0..self.arena.config.simulation_frames_per_draw {
            if self.is_finished() {
                break;
            }
            if let Some(left) = &mut self.grace_left {
                *left -= dt;
            }
            let step_events = tick(&mut self.arena, &input, dt);
            if step_events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
                self.grace_left = Some(self.arena.config.game_over_grace_secs);
            }
            events.extend(step_events);
        }
        events
    }

    /// The game is over and the grace period has run out
    pub fn is_finished(&self) -> bool {
        self.grace_left.is_some_and(|left| left <= 0.0)
    }
}
