//! Arena layouts supplied by the setup collaborator
//!
//! Plain serializable data: barriers, spawn points, enemy positions and the
//! goal. Turned into live bodies by [`Arena::from_layout`](super::Arena::from_layout).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{Barrier, Color};
use super::rules::WinZone;
use crate::error::ConfigError;
use crate::input::KeyMap;

/// Default player hit box (m)
pub const PLAYER_SIZE: DVec2 = DVec2::new(1.0, 1.6);
/// Default enemy hit box (m), matching the 14x17 sprite
pub const ENEMY_SIZE: DVec2 = DVec2::new(14.0 * 0.075, 17.0 * 0.075);

/// A barrier placed by exactly one x anchor and one y anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_center: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_center: Option<f64>,
    #[serde(default = "one")]
    pub width: f64,
    #[serde(default = "one")]
    pub height: f64,
    #[serde(default = "barrier_color")]
    pub color: Color,
}

fn one() -> f64 {
    1.0
}

fn barrier_color() -> Color {
    Color::GRAY
}

impl BarrierSpec {
    /// Anchor by the top-left corner, the usual way levels are drawn up
    pub fn top_left(x_left: f64, y_top: f64, width: f64, height: f64) -> Self {
        Self {
            x_left: Some(x_left),
            x_center: None,
            y_top: Some(y_top),
            y_center: None,
            width,
            height,
            color: Color::GRAY,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn build(&self) -> Result<Barrier, ConfigError> {
        let x = match (self.x_left, self.x_center) {
            (Some(left), None) => left + self.width / 2.0,
            (None, Some(center)) => center,
            _ => return Err(ConfigError::AmbiguousCoordinate("x_left, x_center")),
        };
        let y = match (self.y_top, self.y_center) {
            (Some(top), None) => top - self.height / 2.0,
            (None, Some(center)) => center,
            _ => return Err(ConfigError::AmbiguousCoordinate("y_top, y_center")),
        };
        Barrier::new(DVec2::new(x, y), DVec2::new(self.width, self.height), self.color)
    }
}

/// A player slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    #[serde(default)]
    pub color: Color,
    pub spawn: DVec2,
    #[serde(default = "player_size")]
    pub size: DVec2,
    pub keymap: KeyMap,
}

fn player_size() -> DVec2 {
    PLAYER_SIZE
}

/// Everything needed to set up one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    /// Visible world size (m), for the renderer
    pub width: f64,
    pub height: f64,
    pub barriers: Vec<BarrierSpec>,
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub enemies: Vec<DVec2>,
    pub win_zone: WinZone,
}

impl Default for ArenaLayout {
    /// Two players, a staircase, a pyramid and a flag pole on the far right
    fn default() -> Self {
        let barriers = vec![
            // Window frame
            BarrierSpec::top_left(-1.0, 21.0, 52.0, 1.0),
            BarrierSpec::top_left(-1.0, 1.0, 52.0, 1.0),
            BarrierSpec::top_left(-1.0, 21.0, 1.0, 22.0),
            BarrierSpec::top_left(50.0, 21.0, 1.0, 22.0),
            // Steps
            BarrierSpec::top_left(12.0, 6.0, 5.0, 1.0),
            BarrierSpec::top_left(19.0, 8.0, 5.0, 1.0),
            BarrierSpec::top_left(26.0, 10.0, 5.0, 1.0),
            // Pyramid
            BarrierSpec::top_left(36.0, 9.0, 2.0, 8.0),
            BarrierSpec::top_left(38.0, 7.0, 2.0, 6.0),
            BarrierSpec::top_left(40.0, 5.0, 2.0, 4.0),
            BarrierSpec::top_left(42.0, 3.0, 2.0, 2.0),
            // Flag base
            BarrierSpec::top_left(45.5, 1.5, 3.0, 0.52).with_color(Color(200, 200, 0)),
        ];
        let players = vec![
            PlayerSpec {
                name: "Max".to_string(),
                color: Color(200, 0, 50),
                spawn: DVec2::new(21.5, 12.0),
                size: PLAYER_SIZE,
                keymap: KeyMap::wasd(),
            },
            PlayerSpec {
                name: "Moritz".to_string(),
                color: Color(50, 0, 200),
                spawn: DVec2::new(14.5, 12.0),
                size: PLAYER_SIZE,
                keymap: KeyMap::arrows(),
            },
        ];
        let enemies = (2..32).step_by(3).map(|x| DVec2::new(x as f64, 2.0)).collect();

        Self {
            width: 50.0,
            height: 20.0,
            barriers,
            players,
            enemies,
            win_zone: WinZone::new(DVec2::new(46.75, 1.5), DVec2::new(47.25, 12.0)),
        }
    }
}

impl ArenaLayout {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        for barrier in &self.barriers {
            barrier.build()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_anchors() {
        let spec = BarrierSpec {
            x_left: None,
            x_center: Some(3.0),
            y_top: Some(6.0),
            y_center: None,
            width: 2.0,
            height: 1.0,
            color: Color::GRAY,
        };
        let barrier = spec.build().unwrap();
        assert_eq!(barrier.body.pos, DVec2::new(3.0, 5.5));
    }

    #[test]
    fn test_barrier_requires_one_anchor() {
        let mut spec = BarrierSpec::top_left(0.0, 1.0, 1.0, 1.0);
        spec.x_center = Some(0.5);
        assert_eq!(spec.build().unwrap_err(), ConfigError::AmbiguousCoordinate("x_left, x_center"));

        spec.x_center = None;
        spec.y_top = None;
        assert_eq!(spec.build().unwrap_err(), ConfigError::AmbiguousCoordinate("y_top, y_center"));
    }

    #[test]
    fn test_default_layout_is_valid() {
        let layout = ArenaLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.players.len(), 2);
        assert_eq!(layout.enemies.len(), 10);
    }

    #[test]
    fn test_layout_json_round_trip() {
        let layout = ArenaLayout::default();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(ArenaLayout::from_json(&json).unwrap(), layout);
    }

    #[test]
    fn test_layout_json_defaults_and_errors() {
        let json = r#"{
            "width": 10, "height": 10,
            "barriers": [{"x_left": 0, "y_top": 1, "width": 10}],
            "players": [{"name": "Solo", "spawn": [2, 3],
                         "keymap": [["w","Up"],["a","Left"],["s","Down"],["d","Right"]]}],
            "win_zone": {"min": [8, 1], "max": [9, 5]}
        }"#;
        let layout = ArenaLayout::from_json(json).unwrap();
        assert_eq!(layout.players[0].size, PLAYER_SIZE);
        assert_eq!(layout.barriers[0].height, 1.0);
        assert!(layout.enemies.is_empty());

        let no_players = r#"{"width": 1, "height": 1, "barriers": [], "players": [],
            "win_zone": {"min": [0, 0], "max": [1, 1]}}"#;
        assert_eq!(ArenaLayout::from_json(no_players).unwrap_err(), ConfigError::NoPlayers);
    }
}
