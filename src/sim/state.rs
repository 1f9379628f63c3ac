//! Arena state: the registry of every live body
//!
//! One ordered collection per body kind, owned here and handed to the
//! update routines by reference.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Barrier, Body, Color, Enemy, Player};
use super::layout::{ArenaLayout, ENEMY_SIZE};
use super::noise::{NoiseParams, NoiseSignal};
use super::rules::WinZone;
use crate::error::ConfigError;
use crate::input::HeldKeys;
use crate::scores::Ranking;
use crate::settings::PhysicsConfig;

/// Something that happened during a tick, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyKilled { player_id: u32, enemy_id: u32 },
    PlayerKilled { player_id: u32, lives_left: u32 },
    PlayerWon { player_id: u32 },
    EnemyEscaped { enemy_id: u32 },
    /// Every player has finished; raised exactly once
    GameOver(Ranking),
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct Arena {
    pub config: PhysicsConfig,
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub barriers: Vec<Barrier>,
    pub win_zone: WinZone,
    /// Set once when the game ends
    pub ranking: Option<Ranking>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f64,
    seed: u64,
    rng: Pcg32,
    next_id: u32,
}

impl Arena {
    /// Create an empty arena
    pub fn new(config: PhysicsConfig, win_zone: WinZone, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            players: Vec::new(),
            enemies: Vec::new(),
            barriers: Vec::new(),
            win_zone,
            ranking: None,
            time_ticks: 0,
            elapsed: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Populate an arena from a layout
    pub fn from_layout(layout: &ArenaLayout, config: PhysicsConfig, seed: u64) -> Result<Self, ConfigError> {
        layout.validate()?;
        let mut arena = Self::new(config, layout.win_zone, seed)?;
        for spec in &layout.barriers {
            arena.add_barrier(spec.build()?);
        }
        for spec in &layout.players {
            arena.spawn_player(&spec.name, spec.spawn, spec.size, spec.color)?;
        }
        for &pos in &layout.enemies {
            arena.spawn_enemy(pos, ENEMY_SIZE)?;
        }
        log::info!(
            "Arena ready: {} players, {} enemies, {} barriers (seed {})",
            arena.players.len(),
            arena.enemies.len(),
            arena.barriers.len(),
            seed
        );
        Ok(arena)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_barrier(&mut self, barrier: Barrier) {
        self.barriers.push(barrier);
    }

    pub fn spawn_player(&mut self, name: &str, spawn: DVec2, size: DVec2, color: Color) -> Result<u32, ConfigError> {
        let body = Body::new(spawn, size)?;
        let id = self.next_entity_id();
        self.players
            .push(Player::new(id, name, body, color, self.config.starting_lives));
        Ok(id)
    }

    /// Spawn an enemy with its own freshly drawn wander signal
    pub fn spawn_enemy(&mut self, pos: DVec2, size: DVec2) -> Result<u32, ConfigError> {
        let body = Body::new(pos, size)?;
        let speed = self.config.enemy_run_velocity;
        let params = NoiseParams {
            range: (-speed, speed),
            repeatable: true,
            ..Default::default()
        };
        let noise = NoiseSignal::new(params, &mut self.rng)?;
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, body, noise));
        Ok(id)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Replace a player's held-direction snapshot
    pub fn set_keys(&mut self, id: u32, keys: HeldKeys) {
        if let Some(player) = self.player_mut(id) {
            player.keys = keys;
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.ranking.is_some()
    }
}
