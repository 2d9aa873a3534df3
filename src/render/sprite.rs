//! CPU-side sprite batch the game composes each frame.
//!
//! Sub-states push sprites and text in logical coordinates; the renderer
//! consumes the finished batch. Keeping the batch plain data is what lets
//! the dispatch logic be tested without a GPU.

use std::cmp::Ordering;

/// Logical playfield size. The window stretches this to its actual size.
pub const LOGICAL_WIDTH: f32 = 1280.0;
pub const LOGICAL_HEIGHT: f32 = 720.0;

/// Every texture the game draws with. Missing files fall back to a white
/// 1x1 texture at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    MenuBackdrop,
    Instructions,
    Background,
    ResultsOverlay,
    PaddleOne,
    PaddleTwo,
    Projectile,
}

/// One textured quad in logical pixels. Depth 1.0 is the far plane.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub texture: TextureId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Rotation around the sprite center, radians.
    pub rotation: f32,
    pub depth: f32,
    pub tint: [f32; 4],
}

/// A text run, drawn above all sprites.
#[derive(Debug, Clone)]
pub struct TextDraw {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub px: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Draw in submission order.
    Deferred,
    /// Stable sort far-to-near on `end()`; equal depths keep submission order.
    BackToFront,
}

pub struct SpriteBatch {
    sort_mode: SortMode,
    sprites: Vec<Sprite>,
    texts: Vec<TextDraw>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self {
            sort_mode: SortMode::Deferred,
            sprites: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn begin(&mut self, sort_mode: SortMode) {
        self.sort_mode = sort_mode;
        self.sprites.clear();
        self.texts.clear();
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn text(&mut self, draw: TextDraw) {
        self.texts.push(draw);
    }

    pub fn end(&mut self) {
        if self.sort_mode == SortMode::BackToFront {
            self.sprites.sort_by(|a, b| {
                b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal)
            });
        }
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn texts(&self) -> &[TextDraw] {
        &self.texts
    }
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(texture: TextureId, depth: f32) -> Sprite {
        Sprite {
            texture,
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
            rotation: 0.0,
            depth,
            tint: [1.0; 4],
        }
    }

    #[test]
    fn back_to_front_sort_is_stable() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortMode::BackToFront);
        batch.push(sprite(TextureId::PaddleOne, 0.5));
        batch.push(sprite(TextureId::Background, 0.9));
        batch.push(sprite(TextureId::PaddleTwo, 0.5));
        batch.push(sprite(TextureId::ResultsOverlay, 0.2));
        batch.end();

        let order: Vec<TextureId> = batch.sprites().iter().map(|s| s.texture).collect();
        assert_eq!(
            order,
            vec![
                TextureId::Background,
                TextureId::PaddleOne,
                TextureId::PaddleTwo,
                TextureId::ResultsOverlay,
            ]
        );
    }

    #[test]
    fn begin_clears_previous_frame() {
        let mut batch = SpriteBatch::new();
        batch.begin(SortMode::BackToFront);
        batch.push(sprite(TextureId::Background, 0.9));
        batch.text(TextDraw {
            text: "hello".into(),
            x: 0.0,
            y: 0.0,
            px: 12.0,
            color: [1.0; 4],
        });
        batch.end();

        batch.begin(SortMode::BackToFront);
        batch.end();
        assert!(batch.sprites().is_empty());
        assert!(batch.texts().is_empty());
    }
}
