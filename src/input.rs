//! Player input: logical directions and key maps
//!
//! The core only sees which directions are held; mapping physical keys to
//! directions happens here, at the input-collection boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
}

/// Snapshot of the directions a player currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Left => self.left = held,
            Direction::Down => self.down = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }

    /// Builder-style helper, mostly for scripted input
    pub fn with(mut self, direction: Direction) -> Self {
        self.set(direction, true);
        self
    }

    /// Horizontal intent: +1 right, -1 left, 0 for neither or both
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        }
    }
}

/// Validated mapping of key names to directions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, Direction)>", into = "Vec<(String, Direction)>")]
pub struct KeyMap {
    bindings: HashMap<String, Direction>,
}

impl KeyMap {
    /// Build a key map covering each direction exactly once
    pub fn new<K, I>(entries: I) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Direction)>,
    {
        let mut bindings = HashMap::new();
        for (key, direction) in entries {
            let key = key.into();
            if bindings.values().any(|d| *d == direction) {
                return Err(ConfigError::DuplicateDirection(direction));
            }
            if bindings.insert(key.clone(), direction).is_some() {
                return Err(ConfigError::DuplicateKey(key));
            }
        }
        if let Some(missing) = Direction::ALL.into_iter().find(|d| !bindings.values().any(|b| b == d)) {
            return Err(ConfigError::MissingDirection(missing));
        }
        Ok(Self { bindings })
    }

    /// Arrow keys
    pub fn arrows() -> Self {
        Self::fixed([
            ("ArrowUp", Direction::Up),
            ("ArrowLeft", Direction::Left),
            ("ArrowDown", Direction::Down),
            ("ArrowRight", Direction::Right),
        ])
    }

    /// WASD
    pub fn wasd() -> Self {
        Self::fixed([
            ("w", Direction::Up),
            ("a", Direction::Left),
            ("s", Direction::Down),
            ("d", Direction::Right),
        ])
    }

    fn fixed(entries: [(&str, Direction); 4]) -> Self {
        Self {
            bindings: entries.into_iter().map(|(k, d)| (k.to_string(), d)).collect(),
        }
    }

    pub fn direction(&self, key: &str) -> Option<Direction> {
        self.bindings.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Apply a key event. Returns false if this map does not own the key.
    pub fn apply(&self, key: &str, pressed: bool, held: &mut HeldKeys) -> bool {
        match self.direction(key) {
            Some(direction) => {
                held.set(direction, pressed);
                true
            }
            None => false,
        }
    }
}

impl TryFrom<Vec<(String, Direction)>> for KeyMap {
    type Error = ConfigError;

    fn try_from(entries: Vec<(String, Direction)>) -> Result<Self, Self::Error> {
        KeyMap::new(entries)
    }
}

impl From<KeyMap> for Vec<(String, Direction)> {
    fn from(map: KeyMap) -> Self {
        let mut entries: Vec<_> = map.bindings.into_iter().collect();
        entries.sort_by_key(|(_, d)| Direction::ALL.iter().position(|a| a == d));
        entries
    }
}
