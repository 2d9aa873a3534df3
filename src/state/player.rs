//! Player paddle and projectile simulation.
//!
//! Impulse-driven vertical movement with a hard speed cap and elastic
//! bounces at the screen edges. Projectiles launch with half the paddle's
//! vertical velocity, bounce off the top and bottom edges, despawn past
//! the sides and turn to face their travel direction.

use std::path::Path;

use crate::error::InitError;
use crate::render::sprite::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Sprite, SpriteBatch, TextureId};
use crate::state::{Rect, require_asset};

pub const PADDLE_WIDTH: f32 = 24.0;
pub const PADDLE_HEIGHT: f32 = 96.0;
const PADDLE_MARGIN: f32 = 48.0;
const PADDLE_ACCEL: f32 = 900.0;
pub const PADDLE_MAX_SPEED: f32 = 420.0;

pub const FIRE_COOLDOWN: f32 = 1.0;
pub const MAX_PROJECTILES: usize = 5;
const PROJECTILE_WIDTH: f32 = 32.0;
const PROJECTILE_HEIGHT: f32 = 16.0;
const PROJECTILE_SPEED: f32 = 520.0;

const PADDLE_DEPTH: f32 = 0.5;
const PROJECTILE_DEPTH: f32 = 0.45;

const PROJECTILE_FILE: &str = "projectile.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSide {
    One,
    Two,
}

/// Held-key state for one player, written by the frame loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

#[derive(Debug, Clone, Copy)]
struct Projectile {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    rotation: f32,
}

#[derive(Debug)]
pub struct PlayerState {
    side: PlayerSide,
    y: f32,
    vel_y: f32,
    active: bool,
    input: PlayerInput,
    fire_cooldown: f32,
    projectiles: Vec<Projectile>,
}

impl PlayerState {
    pub fn new(assets_dir: &Path, side: PlayerSide) -> Result<Self, InitError> {
        let paddle_file = match side {
            PlayerSide::One => "paddle_one.png",
            PlayerSide::Two => "paddle_two.png",
        };
        require_asset(assets_dir.join(paddle_file))?;
        require_asset(assets_dir.join(PROJECTILE_FILE))?;

        Ok(Self {
            side,
            y: spawn_y(),
            vel_y: 0.0,
            active: true,
            input: PlayerInput::default(),
            fire_cooldown: 0.0,
            projectiles: Vec::new(),
        })
    }

    fn x(&self) -> f32 {
        match self.side {
            PlayerSide::One => PADDLE_MARGIN,
            PlayerSide::Two => LOGICAL_WIDTH - PADDLE_MARGIN - PADDLE_WIDTH,
        }
    }

    pub fn side(&self) -> PlayerSide {
        self.side
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A hit paddle goes inert for the rest of the round.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn input_mut(&mut self) -> &mut PlayerInput {
        &mut self.input
    }

    pub fn velocity(&self) -> f32 {
        self.vel_y
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn paddle_rect(&self) -> Rect {
        Rect {
            x: self.x(),
            y: self.y,
            w: PADDLE_WIDTH,
            h: PADDLE_HEIGHT,
        }
    }

    pub fn reset(&mut self) {
        self.y = spawn_y();
        self.vel_y = 0.0;
        self.active = true;
        self.input = PlayerInput::default();
        self.fire_cooldown = 0.0;
        self.projectiles.clear();
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            if self.input.up {
                self.vel_y -= PADDLE_ACCEL * dt;
            }
            if self.input.down {
                self.vel_y += PADDLE_ACCEL * dt;
            }
            self.vel_y = self.vel_y.clamp(-PADDLE_MAX_SPEED, PADDLE_MAX_SPEED);
            self.y += self.vel_y * dt;

            // The paddle bounces off the edges rather than sticking to them.
            if self.y <= 0.0 {
                self.y = 0.0;
                self.vel_y = -self.vel_y;
            }
            if self.y + PADDLE_HEIGHT >= LOGICAL_HEIGHT {
                self.y = LOGICAL_HEIGHT - PADDLE_HEIGHT;
                self.vel_y = -self.vel_y;
            }

            self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
            if self.input.fire
                && self.fire_cooldown == 0.0
                && self.projectiles.len() < MAX_PROJECTILES
            {
                self.spawn_projectile();
                self.fire_cooldown = FIRE_COOLDOWN;
            }
        }

        for p in &mut self.projectiles {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            if p.y <= 0.0 {
                p.y = 0.0;
                p.vy = -p.vy;
            }
            if p.y + PROJECTILE_HEIGHT >= LOGICAL_HEIGHT {
                p.y = LOGICAL_HEIGHT - PROJECTILE_HEIGHT;
                p.vy = -p.vy;
            }
            p.rotation = p.vy.atan2(p.vx);
        }
        self.projectiles
            .retain(|p| p.x + PROJECTILE_WIDTH > 0.0 && p.x < LOGICAL_WIDTH);
    }

    fn spawn_projectile(&mut self) {
        let (x, vx) = match self.side {
            PlayerSide::One => (self.x() + PADDLE_WIDTH, PROJECTILE_SPEED),
            PlayerSide::Two => (self.x() - PROJECTILE_WIDTH, -PROJECTILE_SPEED),
        };
        // Launched with half the paddle's vertical velocity.
        let vy = self.vel_y / 2.0;
        self.projectiles.push(Projectile {
            x,
            y: self.y + PADDLE_HEIGHT / 2.0 - PROJECTILE_HEIGHT / 2.0,
            vx,
            vy,
            rotation: vy.atan2(vx),
        });
    }

    /// Removes the first projectile overlapping `target` and reports the hit.
    pub fn strike(&mut self, target: Rect) -> bool {
        let hit = self.projectiles.iter().position(|p| {
            Rect {
                x: p.x,
                y: p.y,
                w: PROJECTILE_WIDTH,
                h: PROJECTILE_HEIGHT,
            }
            .intersects(&target)
        });
        match hit {
            Some(i) => {
                self.projectiles.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn render(&self, batch: &mut SpriteBatch) {
        if self.active {
            let texture = match self.side {
                PlayerSide::One => TextureId::PaddleOne,
                PlayerSide::Two => TextureId::PaddleTwo,
            };
            batch.push(Sprite {
                texture,
                x: self.x(),
                y: self.y,
                w: PADDLE_WIDTH,
                h: PADDLE_HEIGHT,
                rotation: 0.0,
                depth: PADDLE_DEPTH,
                tint: [1.0; 4],
            });
        }
        for p in &self.projectiles {
            batch.push(Sprite {
                texture: TextureId::Projectile,
                x: p.x,
                y: p.y,
                w: PROJECTILE_WIDTH,
                h: PROJECTILE_HEIGHT,
                rotation: p.rotation,
                depth: PROJECTILE_DEPTH,
                tint: [1.0; 4],
            });
        }
    }
}

fn spawn_y() -> f32 {
    (LOGICAL_HEIGHT - PADDLE_HEIGHT) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn player(side: PlayerSide) -> (PlayerState, TempDir) {
        let dir = TempDir::new().unwrap();
        for file in ["paddle_one.png", "paddle_two.png", PROJECTILE_FILE] {
            File::create(dir.path().join(file)).unwrap();
        }
        (PlayerState::new(dir.path(), side).unwrap(), dir)
    }

    #[test]
    fn velocity_is_capped() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().down = true;
        for _ in 0..5 {
            p.update(0.1);
        }
        assert_eq!(p.velocity(), PADDLE_MAX_SPEED);
    }

    #[test]
    fn paddle_bounces_off_the_bottom_edge() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().down = true;
        for _ in 0..40 {
            p.update(0.1);
        }
        // After hitting the bottom the velocity flips sign.
        let rect = p.paddle_rect();
        assert!(rect.y + PADDLE_HEIGHT <= LOGICAL_HEIGHT);
        assert!(rect.y >= 0.0);
    }

    #[test]
    fn fire_respects_cooldown() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().fire = true;

        p.update(0.016);
        assert_eq!(p.projectile_count(), 1);

        // Cooldown not yet elapsed.
        p.update(0.016);
        assert_eq!(p.projectile_count(), 1);

        p.update(1.0);
        assert_eq!(p.projectile_count(), 2);
    }

    #[test]
    fn live_projectiles_never_exceed_the_cap() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().fire = true;
        for _ in 0..20 {
            p.update(1.0);
            assert!(p.projectile_count() <= MAX_PROJECTILES);
        }
    }

    #[test]
    fn projectiles_despawn_past_the_far_edge() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().fire = true;
        p.update(0.016);
        assert_eq!(p.projectile_count(), 1);
        p.input_mut().fire = false;

        // 520 px/s across a 1280 px field.
        for _ in 0..40 {
            p.update(0.1);
        }
        assert_eq!(p.projectile_count(), 0);
    }

    #[test]
    fn strike_consumes_the_hitting_projectile() {
        let (mut p, _dir) = player(PlayerSide::One);
        p.input_mut().fire = true;
        p.update(0.016);
        p.input_mut().fire = false;

        // Directly in front of the muzzle.
        let target = Rect {
            x: PADDLE_MARGIN + PADDLE_WIDTH,
            y: 0.0,
            w: 10.0,
            h: LOGICAL_HEIGHT,
        };
        assert!(p.strike(target));
        assert_eq!(p.projectile_count(), 0);
        assert!(!p.strike(target));
    }

    #[test]
    fn inactive_paddle_ignores_input_but_projectiles_keep_flying() {
        let (mut p, _dir) = player(PlayerSide::Two);
        p.input_mut().fire = true;
        p.update(0.016);
        p.deactivate();

        let before = p.paddle_rect();
        p.input_mut().down = true;
        p.update(0.1);
        assert_eq!(p.paddle_rect(), before);
        assert_eq!(p.projectile_count(), 1);
    }
}
