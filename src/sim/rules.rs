//! Gameplay rules: combat, scoring, and the win condition

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Player};
use super::collision::{Collision, DetectMode, detect};
use crate::scores::{Ranking, ScoreEntry};

/// Points per stomped enemy
pub const KILL_POINTS: f64 = 10.0;
/// Points per remaining life
pub const LIFE_POINTS: f64 = 3.0;

/// Outcome of one player's overlaps with the live enemies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// Enemies the player landed on
    pub stomped: Vec<u32>,
    /// Enemy that caught the player, if any
    pub killed_by: Option<u32>,
}

/// Judge every player-enemy overlap. Each pair yields exactly one kill.
pub fn detect_combat(player: &Body, enemies: &[(u32, Body)], error_margin: f64) -> CombatReport {
    let mut report = CombatReport::default();
    for (id, enemy) in enemies {
        match detect(enemy, player, DetectMode::Combat, error_margin) {
            Some(Collision::ReferenceKilled) => report.stomped.push(*id),
            Some(Collision::MovingKilled) => {
                report.killed_by.get_or_insert(*id);
            }
            Some(other) => unreachable!("combat detection produced {other:?}"),
            None => {}
        }
    }
    report
}

/// Apply a combat report to the player. Returns true if the player died.
pub fn apply_combat(player: &mut Player, report: &CombatReport) -> bool {
    player.enemies_killed += report.stomped.len() as u32;
    for id in &report.stomped {
        log::debug!("{} stomped enemy {}", player.name, id);
    }
    match report.killed_by {
        Some(id) => {
            player.kill();
            log::debug!("{} killed by enemy {}, {} lives left", player.name, id, player.lives);
            true
        }
        None => false,
    }
}

/// Score shown while playing: zero once out of lives
pub fn running_score(player: &Player) -> f64 {
    if player.is_alive() {
        KILL_POINTS * player.enemies_killed as f64 + LIFE_POINTS * player.lives as f64
    } else {
        0.0
    }
}

/// Score used for the final ranking: zero unless the player reached the goal
pub fn final_score(player: &Player, height_bonus: bool) -> f64 {
    if !player.won {
        return 0.0;
    }
    let mut score = KILL_POINTS * player.enemies_killed as f64 + LIFE_POINTS * player.lives as f64;
    if height_bonus {
        score += player.body.pos.y;
    }
    crate::round_to(score, 2)
}

/// Axis-aligned goal area (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinZone {
    pub min: DVec2,
    pub max: DVec2,
}

impl WinZone {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Mark every unfinished player standing in the zone as won; returns their ids
pub fn check_for_win(zone: &WinZone, players: &mut [Player]) -> Vec<u32> {
    let mut winners = Vec::new();
    for player in players.iter_mut().filter(|p| !p.is_finished()) {
        if zone.contains(player.body.pos) {
            player.won = true;
            winners.push(player.id);
        }
    }
    winners
}

/// Every player has either won or run out of lives
pub fn all_finished(players: &[Player]) -> bool {
    !players.is_empty() && players.iter().all(Player::is_finished)
}

/// Final ranking, best first; equal scores keep player order
pub fn rank(players: &[Player], height_bonus: bool) -> Ranking {
    let mut ranking = Ranking::new();
    for player in players {
        ranking.add(ScoreEntry {
            player_id: player.id,
            name: player.name.clone(),
            score: final_score(player, height_bonus),
        });
    }
    ranking
}
