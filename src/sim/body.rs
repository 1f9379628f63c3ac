//! Bodies: the rectangles the simulation moves and collides
//!
//! Position is always the rectangle's center; every collision test works in
//! center ± half-extent terms.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::Contacts;
use super::noise::NoiseSignal;
use crate::error::ConfigError;
use crate::input::HeldKeys;

/// Opaque RGB rendering handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const GRAY: Color = Color(150, 150, 150);
    pub const DARK_GRAY: Color = Color(75, 75, 75);
    pub const GOLD: Color = Color(230, 230, 0);
}

/// Anything that can serve as a collision reference
pub trait Collider {
    fn position(&self) -> DVec2;
    fn size(&self) -> DVec2;
    fn velocity(&self) -> DVec2;

    fn half_size(&self) -> DVec2 {
        self.size() / 2.0
    }
}

/// A movable or placeable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: DVec2,
    pub size: DVec2,
    pub vel: DVec2,
}

impl Body {
    pub fn new(pos: DVec2, size: DVec2) -> Result<Self, ConfigError> {
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self {
            pos,
            size,
            vel: DVec2::ZERO,
        })
    }

    /// Top edge y
    pub fn top(&self) -> f64 {
        self.pos.y + self.size.y / 2.0
    }

    /// Bottom edge y
    pub fn bottom(&self) -> f64 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn left(&self) -> f64 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x / 2.0
    }
}

impl Collider for Body {
    fn position(&self) -> DVec2 {
        self.pos
    }
    fn size(&self) -> DVec2 {
        self.size
    }
    fn velocity(&self) -> DVec2 {
        self.vel
    }
}

macro_rules! collider_via_body {
    ($($ty:ty),*) => {
        $(impl Collider for $ty {
            fn position(&self) -> DVec2 {
                self.body.pos
            }
            fn size(&self) -> DVec2 {
                self.body.size
            }
            fn velocity(&self) -> DVec2 {
                self.body.vel
            }
        })*
    };
}

collider_via_body!(Barrier, Enemy, Player);

/// Static obstacle, immutable for the whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub body: Body,
    pub color: Color,
}

impl Barrier {
    pub fn new(center: DVec2, size: DVec2, color: Color) -> Result<Self, ConfigError> {
        Ok(Self {
            body: Body::new(center, size)?,
            color,
        })
    }

    /// Place a barrier by its top-left corner
    pub fn from_top_left(x_left: f64, y_top: f64, width: f64, height: f64, color: Color) -> Result<Self, ConfigError> {
        let center = DVec2::new(x_left + width / 2.0, y_top - height / 2.0);
        Self::new(center, DVec2::new(width, height), color)
    }
}

/// A wandering enemy driven by its own noise signal
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub color: Color,
    pub noise: NoiseSignal,
    /// Continuous index into `noise`
    pub noise_phase: f64,
    /// ±1, flipped on wall contact
    pub direction_sign: f64,
    pub contacts: Contacts,
}

impl Enemy {
    pub fn new(id: u32, body: Body, noise: NoiseSignal) -> Self {
        Self {
            id,
            body,
            color: Color::DARK_GRAY,
            noise,
            noise_phase: 0.0,
            direction_sign: 1.0,
            contacts: Contacts::default(),
        }
    }
}

/// Which way a player's sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// A human-controlled character
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub body: Body,
    pub color: Color,
    pub spawn: DVec2,
    pub keys: HeldKeys,
    pub lives: u32,
    pub enemies_killed: u32,
    pub won: bool,
    pub score: f64,
    pub contacts: Contacts,
    /// Positions of previous deaths
    pub corpses: Vec<DVec2>,
    pub facing: Facing,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, body: Body, color: Color, lives: u32) -> Self {
        Self {
            id,
            name: name.into(),
            spawn: body.pos,
            body,
            color,
            keys: HeldKeys::default(),
            lives,
            enemies_killed: 0,
            won: false,
            score: 0.0,
            contacts: Contacts::default(),
            corpses: Vec::new(),
            facing: Facing::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Won or out of lives: no more motion updates
    pub fn is_finished(&self) -> bool {
        self.won || !self.is_alive()
    }

    /// Lose a life and respawn in place
    pub fn kill(&mut self) {
        self.corpses.push(self.body.pos);
        self.lives = self.lives.saturating_sub(1);
        self.contacts = Contacts::default();
        self.body.vel = DVec2::ZERO;
        self.body.pos = self.spawn;
    }
}
