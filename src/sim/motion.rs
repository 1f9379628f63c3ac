//! Per-body motion integration
//!
//! One fixed step for a player or an enemy: propose a velocity from input
//! (or the noise signal), integrate position, then bring the proposal into
//! compliance with whatever the body ran into.

use glam::DVec2;

use super::body::{Barrier, Body, Enemy, Facing, Player};
use super::collision::{CollisionRecord, Contacts, DetectMode, Side, detect_all};
use super::resolve::{Motion, WallResponse, reduce, snap};
use super::rules;
use crate::settings::PhysicsConfig;

/// Read-only view of everything a player collides with this tick
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    pub barriers: &'a [Barrier],
    /// Other live players, by id
    pub players: &'a [(u32, Body)],
    /// Live enemies, by id, at their already-advanced positions
    pub enemies: &'a [(u32, Body)],
}

/// Cross-body fix applied after every player has moved: the given player
/// is pushed down to `pos_y` and stops vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub player_id: u32,
    pub pos_y: f64,
}

/// Side effects of one player update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStep {
    /// Enemies this player stomped
    pub stomped: Vec<u32>,
    /// Player lost a life and respawned this tick
    pub died: bool,
    pub corrections: Vec<Correction>,
}

/// Side effects of one enemy update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyStep {
    pub turned: bool,
    /// Enemy left the playable area and should be dropped
    pub escaped: bool,
}

/// Velocity a player wants this tick, from held keys and last tick's contacts
pub fn propose_player_velocity(player: &mut Player, config: &PhysicsConfig, dt: f64) -> DVec2 {
    let keys = player.keys;
    let contacts = &player.contacts;
    let mut vel = DVec2::ZERO;

    match keys.horizontal() {
        1 => {
            player.facing = Facing::Right;
            if contacts.get(Side::RightWall).is_none() {
                vel.x = config.run_velocity;
            }
        }
        -1 => {
            player.facing = Facing::Left;
            if contacts.get(Side::LeftWall).is_none() {
                vel.x = -config.run_velocity;
            }
        }
        _ => {}
    }

    if contacts.on_floor() {
        if keys.up && !keys.down && player.body.vel.y < config.error_margin {
            vel.y = config.jump_velocity();
        }
    } else if keys.down {
        // Forced smash downwards
        vel.y = -config.jump_velocity();
    } else {
        vel.y = player.body.vel.y - config.gravity * dt;
    }

    vel
}

/// Advance one player by `dt`
pub fn update_player(player: &mut Player, world: &World<'_>, config: &PhysicsConfig, dt: f64) -> PlayerStep {
    let vel = propose_player_velocity(player, config, dt);
    let mut motion = Motion {
        pos: player.body.pos + vel * dt,
        vel,
    };

    // Combat is judged on the pre-move position, before any blocking
    let report = rules::detect_combat(&player.body, world.enemies, config.error_margin);
    let mut step = PlayerStep {
        stomped: report.stomped.clone(),
        ..Default::default()
    };
    if rules::apply_combat(player, &report) {
        step.died = true;
        player.score = rules::running_score(player);
        return step;
    }

    let size = player.body.size;
    let mover = Body {
        pos: motion.pos,
        size,
        vel: motion.vel,
    };
    let mut record = CollisionRecord::default();
    detect_all(
        world.barriers.iter().map(|b| (None, b)),
        &mover,
        DetectMode::Normal,
        config.error_margin,
        &mut record,
    );
    detect_all(
        world.players.iter().map(|(id, body)| (Some(*id), body)),
        &mover,
        DetectMode::Stacked,
        config.error_margin,
        &mut record,
    );
    let resolved = reduce(&record);
    let honored = snap(&mut motion, size, &resolved.sides, config.error_margin, WallResponse::Stop);

    let supporters: Vec<&(u32, Body)> = resolved
        .objects_below
        .iter()
        .filter_map(|id| world.players.iter().find(|(other, _)| other == id))
        .collect();

    // Head hits a ceiling while standing on someone: keep them just below us
    if honored[Side::Ceiling].is_some() {
        let our_bottom = motion.pos.y - size.y / 2.0;
        for (id, below) in &supporters {
            step.corrections.push(Correction {
                player_id: *id,
                pos_y: our_bottom - below.size.y / 2.0 + config.error_margin,
            });
        }
    }

    // Ride along with whoever we stand on, unless a wall is in the way
    if let Some((_, below)) = supporters.first() {
        let carry = below.vel.x;
        if (carry < 0.0 && honored[Side::LeftWall].is_none()) || (carry > 0.0 && honored[Side::RightWall].is_none()) {
            motion.pos.x += carry * dt;
        }
    }

    player.contacts = Contacts {
        sides: honored,
        objects_on_top: resolved.objects_on_top,
    };
    player.body.vel = motion.vel.map(|v| config.round(v));
    player.body.pos = motion.pos.map(|v| config.round(v));
    player.score = rules::running_score(player);
    step
}

/// Advance one enemy by `dt`. Enemies only collide with barriers.
pub fn update_enemy(enemy: &mut Enemy, barriers: &[Barrier], config: &PhysicsConfig, dt: f64) -> EnemyStep {
    enemy.noise_phase = wrap_phase(enemy.noise_phase + dt * config.enemy_noise_rate, enemy.noise.period());
    let speed = match enemy.noise.get(enemy.noise_phase) {
        Ok(speed) => speed,
        Err(err) => unreachable!("noise phase escaped its wrap range: {err}"),
    };
    let run = enemy.direction_sign * speed;

    let mut vel = DVec2::new(run, 0.0);
    if enemy.contacts.on_floor() {
        let eager = run.abs() > config.enemy_jump_threshold * config.enemy_run_velocity;
        if eager && enemy.body.vel.y < config.error_margin {
            vel.y = config.enemy_jump_velocity();
        }
    } else {
        vel.y = enemy.body.vel.y - config.gravity * dt;
    }

    let mut motion = Motion {
        pos: enemy.body.pos + vel * dt,
        vel,
    };
    let mover = Body {
        pos: motion.pos,
        size: enemy.body.size,
        vel,
    };
    let mut record = CollisionRecord::default();
    detect_all(
        barriers.iter().map(|b| (None, b)),
        &mover,
        DetectMode::Normal,
        config.error_margin,
        &mut record,
    );
    let honored = snap(
        &mut motion,
        enemy.body.size,
        &reduce(&record).sides,
        config.error_margin,
        WallResponse::Reverse,
    );

    let turned = honored[Side::LeftWall].is_some() || honored[Side::RightWall].is_some();
    if turned {
        enemy.direction_sign = -enemy.direction_sign;
        log::debug!("enemy {} turned around at {:?}", enemy.id, motion.pos);
    }

    enemy.contacts = Contacts {
        sides: honored,
        objects_on_top: Vec::new(),
    };
    enemy.body.vel = motion.vel.map(|v| config.round(v));
    enemy.body.pos = motion.pos.map(|v| config.round(v));

    let limit = config.enemy_escape_distance;
    EnemyStep {
        turned,
        escaped: enemy.body.pos.x.abs() > limit || enemy.body.pos.y.abs() > limit,
    }
}

/// Keep the noise phase inside the signal's queryable range `[0, period-1)`
fn wrap_phase(phase: f64, period: usize) -> f64 {
    if period < 2 {
        return 0.0;
    }
    phase.rem_euclid((period - 1) as f64)
}
