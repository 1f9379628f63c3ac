//! Renderer contract
//!
//! The simulation never touches pixels. `draw_arena` walks the arena and
//! issues draw calls against a [`Canvas`]; a front end supplies the canvas
//! and owns the actual sprites and fonts.

use glam::DVec2;

use crate::sim::{Arena, Color, Facing, Player};

/// Sprite pose derived from a body's velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Stand,
    Run,
    JumpUp,
    Fall,
}

impl Pose {
    pub fn from_velocity(vel: DVec2, error_margin: f64) -> Self {
        if vel.y > error_margin {
            Pose::JumpUp
        } else if vel.y < -error_margin {
            Pose::Fall
        } else if vel.x.abs() > error_margin {
            Pose::Run
        } else {
            Pose::Stand
        }
    }
}

/// Which image to blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player { color: Color, pose: Pose, facing: Facing },
    Enemy,
    Corpse { color: Color },
    Flag,
    Heart,
}

/// Screen rectangle in pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Draw target implemented by the front end
pub trait Canvas {
    fn fill_rect(&mut self, rect: PixelRect, color: Color, alpha: f64);
    fn circle(&mut self, center: DVec2, radius: f64, color: Color);
    fn sprite(&mut self, sprite: Sprite, rect: PixelRect);
    fn text(&mut self, text: &str, at: DVec2, color: Color);
}

/// World meters (y up) to screen pixels (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scaling_factor: f64,
    /// Window size in pixels
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scaling_factor: f64, world_size: DVec2) -> Self {
        Self {
            scaling_factor,
            width: world_size.x * scaling_factor,
            height: world_size.y * scaling_factor,
        }
    }

    pub fn to_pixels(&self, world: DVec2) -> DVec2 {
        DVec2::new(world.x * self.scaling_factor, self.height - world.y * self.scaling_factor)
    }

    /// Pixel rectangle covering a world-space box given by center and size
    pub fn rect(&self, center: DVec2, size: DVec2) -> PixelRect {
        let top_left = self.to_pixels(center + DVec2::new(-size.x, size.y) / 2.0);
        PixelRect {
            x: top_left.x,
            y: top_left.y,
            w: size.x * self.scaling_factor,
            h: size.y * self.scaling_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Overlay translucent collision boxes
    pub hitboxes: bool,
}

const HITBOX_ALPHA: f64 = 0.4;
/// World meters
const FLAG_KNOB_RADIUS: f64 = 0.25;
const HUD_MARGIN: f64 = 10.0;
const HUD_ROW: f64 = 24.0;
const HEART_SIZE: f64 = 18.0;
const TEXT_COLOR: Color = Color(255, 255, 255);

/// Draw one frame of the arena
pub fn draw_arena(arena: &Arena, canvas: &mut dyn Canvas, viewport: &Viewport, options: RenderOptions) {
    let em = arena.config.error_margin;

    for barrier in &arena.barriers {
        canvas.fill_rect(viewport.rect(barrier.body.pos, barrier.body.size), barrier.color, 1.0);
    }

    let zone = &arena.win_zone;
    canvas.sprite(Sprite::Flag, viewport.rect(zone.center(), zone.size()));
    let knob = DVec2::new(zone.center().x, zone.max.y);
    canvas.circle(viewport.to_pixels(knob), FLAG_KNOB_RADIUS * viewport.scaling_factor, Color::GOLD);

    for player in &arena.players {
        for &corpse in &player.corpses {
            canvas.sprite(Sprite::Corpse { color: player.color }, viewport.rect(corpse, player.body.size));
        }
    }

    for enemy in &arena.enemies {
        let rect = viewport.rect(enemy.body.pos, enemy.body.size);
        canvas.sprite(Sprite::Enemy, rect);
        if options.hitboxes {
            canvas.fill_rect(rect, enemy.color, HITBOX_ALPHA);
        }
    }

    // Out of lives: nothing left to draw but the corpses
    for player in arena.players.iter().filter(|p| p.is_alive()) {
        let rect = viewport.rect(player.body.pos, player.body.size);
        let sprite = Sprite::Player {
            color: player.color,
            pose: Pose::from_velocity(player.body.vel, em),
            facing: player.facing,
        };
        canvas.sprite(sprite, rect);
        if options.hitboxes {
            canvas.fill_rect(rect, player.color, HITBOX_ALPHA);
        }
    }

    for (row, player) in arena.players.iter().enumerate() {
        draw_hud_row(canvas, player, HUD_MARGIN + row as f64 * HUD_ROW);
    }

    if let Some(ranking) = &arena.ranking {
        let x = viewport.width / 2.0;
        let mut y = viewport.height / 3.0;
        canvas.text(&ranking.headline(), DVec2::new(x, y), TEXT_COLOR);
        for line in ranking.lines() {
            y += HUD_ROW;
            canvas.text(&line, DVec2::new(x, y), TEXT_COLOR);
        }
    }
}

/// Hearts for remaining lives followed by the kill counter
fn draw_hud_row(canvas: &mut dyn Canvas, player: &Player, y: f64) {
    let mut x = HUD_MARGIN;
    for _ in 0..player.lives {
        canvas.sprite(
            Sprite::Heart,
            PixelRect {
                x,
                y,
                w: HEART_SIZE,
                h: HEART_SIZE,
            },
        );
        x += HEART_SIZE + 4.0;
    }
    canvas.text(
        &format!("{}: {} kills", player.name, player.enemies_killed),
        DVec2::new(x + HUD_MARGIN, y),
        player.color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PhysicsConfig;
    use crate::sim::{ArenaLayout, TickInput, tick};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Rect(PixelRect, f64),
        Circle(DVec2, f64),
        Sprite(Sprite, PixelRect),
        Text(String),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<Call>,
    }

    impl Canvas for RecordingCanvas {
        fn fill_rect(&mut self, rect: PixelRect, _color: Color, alpha: f64) {
            self.calls.push(Call::Rect(rect, alpha));
        }
        fn circle(&mut self, center: DVec2, radius: f64, _color: Color) {
            self.calls.push(Call::Circle(center, radius));
        }
        fn sprite(&mut self, sprite: Sprite, rect: PixelRect) {
            self.calls.push(Call::Sprite(sprite, rect));
        }
        fn text(&mut self, text: &str, _at: DVec2, _color: Color) {
            self.calls.push(Call::Text(text.to_string()));
        }
    }

    impl RecordingCanvas {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    fn arena() -> Arena {
        Arena::from_layout(&ArenaLayout::default(), PhysicsConfig::default(), 3).unwrap()
    }

    #[test]
    fn test_viewport_flips_y() {
        let viewport = Viewport::new(30.0, DVec2::new(50.0, 20.0));
        assert_eq!(viewport.to_pixels(DVec2::new(0.0, 0.0)), DVec2::new(0.0, 600.0));
        assert_eq!(viewport.to_pixels(DVec2::new(2.0, 20.0)), DVec2::new(60.0, 0.0));

        let rect = viewport.rect(DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 0.0,
                y: 540.0,
                w: 60.0,
                h: 60.0
            }
        );
    }

    #[test]
    fn test_pose_from_velocity() {
        let em = 0.0125;
        assert_eq!(Pose::from_velocity(DVec2::new(0.0, 5.0), em), Pose::JumpUp);
        assert_eq!(Pose::from_velocity(DVec2::new(10.0, -5.0), em), Pose::Fall);
        assert_eq!(Pose::from_velocity(DVec2::new(-10.0, 0.0), em), Pose::Run);
        assert_eq!(Pose::from_velocity(DVec2::new(0.0, 0.01), em), Pose::Stand);
    }

    #[test]
    fn test_draws_every_body() {
        let arena = arena();
        let viewport = Viewport::new(arena.config.scaling_factor, DVec2::new(50.0, 20.0));
        let mut canvas = RecordingCanvas::default();
        draw_arena(&arena, &mut canvas, &viewport, RenderOptions::default());

        // Barriers are the only opaque rectangles
        assert_eq!(canvas.count(|c| matches!(c, Call::Rect(_, a) if *a == 1.0)), 12);
        assert_eq!(canvas.count(|c| matches!(c, Call::Sprite(Sprite::Enemy, _))), 10);
        assert_eq!(canvas.count(|c| matches!(c, Call::Sprite(Sprite::Player { .. }, _))), 2);
        assert_eq!(canvas.count(|c| matches!(c, Call::Sprite(Sprite::Heart, _))), 6);
        assert_eq!(canvas.count(|c| matches!(c, Call::Sprite(Sprite::Flag, _))), 1);
        // Knob on top of the pole at (47, 12) m
        assert!(canvas.calls.contains(&Call::Circle(DVec2::new(1410.0, 240.0), 7.5)));
        assert!(canvas.calls.contains(&Call::Text("Max: 0 kills".to_string())));
    }

    #[test]
    fn test_hitbox_overlay() {
        let arena = arena();
        let viewport = Viewport::new(arena.config.scaling_factor, DVec2::new(50.0, 20.0));
        let mut canvas = RecordingCanvas::default();
        draw_arena(&arena, &mut canvas, &viewport, RenderOptions { hitboxes: true });
        assert_eq!(canvas.count(|c| matches!(c, Call::Rect(_, a) if *a == HITBOX_ALPHA)), 12);
    }

    #[test]
    fn test_ranking_text_after_game_over() {
        let mut arena = arena();
        for player in &mut arena.players {
            player.lives = 0;
        }
        tick(&mut arena, &TickInput::default(), 1.0 / 300.0);
        assert!(arena.is_game_over());

        let viewport = Viewport::new(arena.config.scaling_factor, DVec2::new(50.0, 20.0));
        let mut canvas = RecordingCanvas::default();
        draw_arena(&arena, &mut canvas, &viewport, RenderOptions::default());
        assert!(canvas.calls.contains(&Call::Text("It's a tie!".to_string())));
        assert!(canvas.calls.contains(&Call::Text("Max: 0".to_string())));
        assert_eq!(canvas.count(|c| matches!(c, Call::Sprite(Sprite::Player { .. }, _))), 0);
    }
}
