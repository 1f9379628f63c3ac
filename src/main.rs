//! Side Scroller headless runner
//!
//! Loads a layout (or the built-in level), drives every player with a
//! scripted input plan through the session driver, and prints the ranking.
//!
//! Usage: `side-scroller [layout.json]`

use std::{env, fs};

use anyhow::Context;

use side_scroller::input::{Direction, HeldKeys};
use side_scroller::sim::{ArenaLayout, GameEvent};
use side_scroller::{PhysicsConfig, Session};

/// Frame rate the runner pretends to render at
const FPS: f64 = 60.0;
/// Give up after this many simulated seconds
const TIME_LIMIT_SECS: f64 = 120.0;

/// Run right, hop every half second, and smash down when airborne for long
fn scripted_keys(frame: u64, player_index: usize) -> HeldKeys {
    let mut keys = HeldKeys::default().with(Direction::Right);
    // Offset the players so they don't jump in lockstep
    let cycle = (frame + player_index as u64 * 7) % 30;
    if cycle < 4 {
        keys = keys.with(Direction::Up);
    } else if cycle == 25 && player_index % 2 == 1 {
        keys = keys.with(Direction::Down);
    }
    keys
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Side Scroller (headless) starting...");

    let layout = match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading layout {path}"))?;
            ArenaLayout::from_json(&json).with_context(|| format!("parsing layout {path}"))?
        }
        None => ArenaLayout::default(),
    };

    let seed = env::var("SIDE_SCROLLER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    let mut session = Session::new(&layout, PhysicsConfig::default(), seed)?;
    log::info!("Game initialized with seed: {}", seed);

    let ids: Vec<u32> = session.arena().players.iter().map(|p| p.id).collect();
    let max_frames = (TIME_LIMIT_SECS * FPS) as u64;
    let mut frame = 0;
    while !session.is_finished() && frame < max_frames {
        for (index, &id) in ids.iter().enumerate() {
            session.set_held(id, scripted_keys(frame, index));
        }
        for event in session.advance_frame(FPS) {
            match event {
                GameEvent::GameOver(_) => log::info!("Game over at frame {frame}"),
                other => log::info!("{other:?}"),
            }
        }
        frame += 1;
    }

    let arena = session.arena();
    match &arena.ranking {
        Some(ranking) => {
            println!("{}", ranking.headline());
            for line in ranking.lines() {
                println!("  {line}");
            }
        }
        None => {
            println!("Time limit reached after {:.1}s", arena.elapsed);
            for player in &arena.players {
                println!(
                    "  {}: {} lives, {} kills, x = {:.2}",
                    player.name, player.lives, player.enemies_killed, player.body.pos.x
                );
            }
        }
    }
    Ok(())
}
