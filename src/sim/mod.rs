//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies, then players, in spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod layout;
pub mod motion;
pub mod noise;
pub mod resolve;
pub mod rules;
pub mod state;
pub mod tick;

pub use body::{Barrier, Body, Collider, Color, Enemy, Facing, Player};
pub use collision::{Collision, CollisionRecord, Contacts, DetectMode, Side, SideMap, detect, detect_all};
pub use layout::{ArenaLayout, BarrierSpec, ENEMY_SIZE, PLAYER_SIZE, PlayerSpec};
pub use noise::{NoiseParams, NoiseSignal};
pub use resolve::{Motion, Resolved, WallResponse, pick, reduce, snap};
pub use rules::{WinZone, check_for_win, final_score, rank, running_score};
pub use state::{Arena, GameEvent};
pub use tick::{TickInput, tick};
