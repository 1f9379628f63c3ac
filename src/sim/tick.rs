//! Fixed timestep simulation tick
//!
//! Core loop that advances the arena deterministically. Order within a
//! tick: every enemy moves, then every unfinished player (combat first,
//! then movement), then cross-player corrections, then the win check.

use super::body::Body;
use super::motion::{self, World};
use super::rules;
use super::state::{Arena, GameEvent};
use crate::input::HeldKeys;

/// Held-direction snapshot per player for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: Vec<(u32, HeldKeys)>,
}

impl TickInput {
    pub fn with(mut self, player_id: u32, keys: HeldKeys) -> Self {
        self.held.push((player_id, keys));
        self
    }
}

/// Advance the arena by one timestep of `dt` seconds
pub fn tick(arena: &mut Arena, input: &TickInput, dt: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for &(id, keys) in &input.held {
        arena.set_keys(id, keys);
    }

    update_enemies(arena, dt, &mut events);
    update_players(arena, dt, &mut events);

    for player_id in rules::check_for_win(&arena.win_zone, &mut arena.players) {
        log::info!("Player {player_id} reached the goal");
        events.push(GameEvent::PlayerWon { player_id });
    }

    if arena.ranking.is_none() && rules::all_finished(&arena.players) {
        let ranking = rules::rank(&arena.players, arena.config.height_bonus);
        log::info!("Game over after {:.2}s: {}", arena.elapsed + dt, ranking.headline());
        arena.ranking = Some(ranking.clone());
        events.push(GameEvent::GameOver(ranking));
    }

    arena.time_ticks += 1;
    arena.elapsed += dt;
    events
}

fn update_enemies(arena: &mut Arena, dt: f64, events: &mut Vec<GameEvent>) {
    let mut escaped = Vec::new();
    for enemy in &mut arena.enemies {
        let step = motion::update_enemy(enemy, &arena.barriers, &arena.config, dt);
        if step.escaped {
            log::warn!("Enemy {} left the arena at {:?}", enemy.id, enemy.body.pos);
            escaped.push(enemy.id);
        }
    }
    if !escaped.is_empty() {
        arena.enemies.retain(|e| !escaped.contains(&e.id));
        events.extend(escaped.into_iter().map(|enemy_id| GameEvent::EnemyEscaped { enemy_id }));
    }
}

fn update_players(arena: &mut Arena, dt: f64, events: &mut Vec<GameEvent>) {
    // Enemies stomped this tick stay in the registry until every player is done
    let mut dead: Vec<u32> = Vec::new();
    let mut corrections = Vec::new();

    for i in 0..arena.players.len() {
        if arena.players[i].is_finished() {
            continue;
        }
        let others: Vec<(u32, Body)> = arena
            .players
            .iter()
            .enumerate()
            .filter(|(j, p)| *j != i && p.is_alive())
            .map(|(_, p)| (p.id, p.body))
            .collect();
        let enemies: Vec<(u32, Body)> = arena
            .enemies
            .iter()
            .filter(|e| !dead.contains(&e.id))
            .map(|e| (e.id, e.body))
            .collect();
        let world = World {
            barriers: &arena.barriers,
            players: &others,
            enemies: &enemies,
        };

        let player = &mut arena.players[i];
        let step = motion::update_player(player, &world, &arena.config, dt);
        for enemy_id in step.stomped {
            dead.push(enemy_id);
            events.push(GameEvent::EnemyKilled {
                player_id: player.id,
                enemy_id,
            });
        }
        if step.died {
            events.push(GameEvent::PlayerKilled {
                player_id: player.id,
                lives_left: player.lives,
            });
        }
        corrections.extend(step.corrections);
    }

    for correction in corrections {
        let pos_y = arena.config.round(correction.pos_y);
        // Finished players are frozen in place
        if let Some(player) = arena.player_mut(correction.player_id).filter(|p| !p.is_finished()) {
            player.body.pos.y = pos_y;
            player.body.vel.y = 0.0;
        }
    }

    if !dead.is_empty() {
        arena.enemies.retain(|e| !dead.contains(&e.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::settings::PhysicsConfig;
    use crate::sim::body::{Barrier, Color};
    use crate::sim::collision::Side;
    use crate::sim::layout::ArenaLayout;
    use crate::sim::rules::WinZone;
    use glam::DVec2;

    const DT: f64 = 1.0 / 60.0;

    /// Flat floor with its top at y = 1, goal far away
    fn flat_arena() -> Arena {
        let zone = WinZone::new(DVec2::new(40.0, 1.0), DVec2::new(41.0, 5.0));
        let mut arena = Arena::new(PhysicsConfig::default(), zone, 99).unwrap();
        arena.add_barrier(Barrier::from_top_left(-1.0, 1.0, 52.0, 1.0, Color::GRAY).unwrap());
        arena
    }

    #[test]
    fn test_jump_end_to_end() {
        let mut arena = flat_arena();
        let id = arena
            .spawn_player("Max", DVec2::new(5.0, 1.8), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();

        // Settle onto the floor
        tick(&mut arena, &TickInput::default(), DT);
        assert!(arena.player(id).unwrap().contacts.on_floor());

        let input = TickInput::default().with(id, HeldKeys::default().with(Direction::Up));
        tick(&mut arena, &input, DT);
        let player = arena.player(id).unwrap();
        assert_eq!(player.body.vel.y, arena.config.round(arena.config.jump_velocity()));
        assert_eq!(player.contacts.get(Side::Floor), None);
    }

    #[test]
    fn test_resting_is_stable() {
        let mut arena = flat_arena();
        let id = arena
            .spawn_player("Max", DVec2::new(5.0, 1.8), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        tick(&mut arena, &TickInput::default(), DT);
        let settled = arena.player(id).unwrap().body;
        for _ in 0..120 {
            tick(&mut arena, &TickInput::default(), DT);
        }
        assert_eq!(arena.player(id).unwrap().body, settled);
    }

    #[test]
    fn test_enemies_move_before_players_and_die_deferred() {
        let mut arena = flat_arena();
        let id = arena
            .spawn_player("Max", DVec2::new(5.0, 3.0), DVec2::new(1.0, 2.0), Color::default())
            .unwrap();
        arena.spawn_player("Moritz", DVec2::new(5.2, 3.0), DVec2::new(1.0, 2.0), Color::default()).unwrap();
        let enemy_id = arena.spawn_enemy(DVec2::new(5.0, 1.7), DVec2::new(0.8, 1.2)).unwrap();

        let events = tick(&mut arena, &TickInput::default(), DT);
        // Only the first player gets the stomp; the second sees it already gone
        let kills: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .collect();
        assert_eq!(
            kills,
            vec![&GameEvent::EnemyKilled {
                player_id: id,
                enemy_id
            }]
        );
        assert!(arena.enemies.is_empty());
        assert_eq!(arena.player(id).unwrap().enemies_killed, 1);
    }

    #[test]
    fn test_win_and_game_over_signaled_once() {
        let zone = WinZone::new(DVec2::new(4.0, 1.0), DVec2::new(6.0, 5.0));
        let mut arena = Arena::new(PhysicsConfig::default(), zone, 1).unwrap();
        arena.add_barrier(Barrier::from_top_left(-1.0, 1.0, 52.0, 1.0, Color::GRAY).unwrap());
        let id = arena
            .spawn_player("Max", DVec2::new(5.0, 1.8), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        arena.player_mut(id).unwrap().enemies_killed = 2;

        let events = tick(&mut arena, &TickInput::default(), DT);
        assert!(events.contains(&GameEvent::PlayerWon { player_id: id }));
        let ranking = arena.ranking.clone().unwrap();
        assert_eq!(ranking.entries[0].score, 29.0);
        assert!(events.contains(&GameEvent::GameOver(ranking)));

        // Finished players stop moving and the game ends only once
        let frozen = arena.player(id).unwrap().body;
        let events = tick(&mut arena, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(arena.player(id).unwrap().body, frozen);
    }

    #[test]
    fn test_ceiling_pushes_supporting_player_down() {
        let mut arena = flat_arena();
        // Low ceiling: bottom edge at y = 4.1, just into the upper player's head
        arena.add_barrier(Barrier::from_top_left(0.0, 5.1, 10.0, 1.0, Color::GRAY).unwrap());
        let lower = arena
            .spawn_player("Lower", DVec2::new(5.0, 1.7875), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        let upper = arena
            .spawn_player("Upper", DVec2::new(5.0, 3.375), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        arena.player_mut(upper).unwrap().contacts.sides[Side::Floor] = Some(2.5875);

        tick(&mut arena, &TickInput::default(), DT);
        let upper_body = arena.player(upper).unwrap().body;
        let lower_body = arena.player(lower).unwrap().body;
        assert_eq!(upper_body.vel.y, 0.0);
        assert!((upper_body.top() - (4.1 + arena.config.error_margin)).abs() < 1e-9);
        assert!(lower_body.pos.y < 1.7875);
        // Lower player sits just under the upper one
        assert!(lower_body.top() <= upper_body.bottom() + arena.config.error_margin + 1e-9);
        assert_eq!(lower_body.vel.y, 0.0);
    }

    #[test]
    fn test_finished_player_ignores_corrections() {
        let mut arena = flat_arena();
        arena.add_barrier(Barrier::from_top_left(0.0, 5.1, 10.0, 1.0, Color::GRAY).unwrap());
        let lower = arena
            .spawn_player("Lower", DVec2::new(5.0, 1.7875), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        let upper = arena
            .spawn_player("Upper", DVec2::new(5.0, 3.375), DVec2::new(1.0, 1.6), Color::default())
            .unwrap();
        arena.player_mut(upper).unwrap().contacts.sides[Side::Floor] = Some(2.5875);
        arena.player_mut(lower).unwrap().won = true;

        tick(&mut arena, &TickInput::default(), DT);
        // Upper still snaps under the ceiling, lower stays put
        let upper_body = arena.player(upper).unwrap().body;
        assert!((upper_body.top() - (4.1 + arena.config.error_margin)).abs() < 1e-9);
        assert_eq!(arena.player(lower).unwrap().body.pos, DVec2::new(5.0, 1.7875));
    }

    #[test]
    fn test_determinism() {
        let layout = ArenaLayout::default();
        let mut a = Arena::from_layout(&layout, PhysicsConfig::default(), 1234).unwrap();
        let mut b = Arena::from_layout(&layout, PhysicsConfig::default(), 1234).unwrap();
        let ids: Vec<u32> = a.players.iter().map(|p| p.id).collect();

        for frame in 0..600 {
            let mut keys = HeldKeys::default().with(Direction::Right);
            if frame % 40 < 5 {
                keys = keys.with(Direction::Up);
            }
            let input = ids.iter().fold(TickInput::default(), |input, &id| input.with(id, keys));
            assert_eq!(tick(&mut a, &input, DT / 5.0), tick(&mut b, &input, DT / 5.0));
        }

        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.body, pb.body);
            assert_eq!(pa.lives, pb.lives);
        }
        assert_eq!(a.enemies.len(), b.enemies.len());
    }
}
