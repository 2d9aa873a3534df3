//! Shared scenery views and the two music tracks.
//!
//! The background owns the track handles; the orchestrator's crossfade
//! policy reaches the tracks only through the accessors here.

use std::path::Path;

use crate::audio::{AudioHandles, TrackHandle};
use crate::error::InitError;
use crate::render::sprite::{
    LOGICAL_HEIGHT, LOGICAL_WIDTH, Sprite, SpriteBatch, TextDraw, TextureId,
};
use crate::state::require_asset;

const BACKGROUND_FILE: &str = "background.png";
const INSTRUCTIONS_FILE: &str = "instructions.png";
const RESULTS_FILE: &str = "results.png";
const MENU_THEME_FILE: &str = "menu_theme.ogg";
const GAMEPLAY_THEME_FILE: &str = "gameplay_theme.ogg";

const SCENERY_DEPTH: f32 = 0.9;
const OVERLAY_DEPTH: f32 = 0.2;

#[derive(Debug)]
pub struct BackgroundState {
    menu_music: TrackHandle,
    gameplay_music: TrackHandle,
}

impl BackgroundState {
    /// Verifies the shared assets and points both tracks at their sources.
    pub fn new(assets_dir: &Path, audio: AudioHandles) -> Result<Self, InitError> {
        for file in [BACKGROUND_FILE, INSTRUCTIONS_FILE, RESULTS_FILE] {
            require_asset(assets_dir.join(file))?;
        }
        let menu_theme = require_asset(assets_dir.join(MENU_THEME_FILE))?;
        let gameplay_theme = require_asset(assets_dir.join(GAMEPLAY_THEME_FILE))?;

        audio.menu.load(&menu_theme);
        audio.gameplay.load(&gameplay_theme);

        Ok(Self {
            menu_music: audio.menu,
            gameplay_music: audio.gameplay,
        })
    }

    pub fn menu_music(&self) -> &TrackHandle {
        &self.menu_music
    }

    pub fn gameplay_music(&self) -> &TrackHandle {
        &self.gameplay_music
    }

    /// Gameplay backdrop, drawn behind both players.
    pub fn render(&self, batch: &mut SpriteBatch) {
        batch.push(full_screen(TextureId::Background, SCENERY_DEPTH));
    }

    pub fn render_instructions(&self, batch: &mut SpriteBatch) {
        batch.push(full_screen(TextureId::Instructions, SCENERY_DEPTH));
        batch.text(TextDraw {
            text: "Press Escape to return".into(),
            x: LOGICAL_WIDTH / 2.0 - 160.0,
            y: LOGICAL_HEIGHT - 60.0,
            px: 28.0,
            color: [0.8, 0.8, 0.8, 1.0],
        });
    }

    /// Results overlay, drawn above the victor.
    pub fn render_results(&self, batch: &mut SpriteBatch) {
        batch.push(full_screen(TextureId::ResultsOverlay, OVERLAY_DEPTH));
        batch.text(TextDraw {
            text: "Press Enter for the menu".into(),
            x: LOGICAL_WIDTH / 2.0 - 180.0,
            y: LOGICAL_HEIGHT - 60.0,
            px: 28.0,
            color: [0.8, 0.8, 0.8, 1.0],
        });
    }
}

fn full_screen(texture: TextureId, depth: f32) -> Sprite {
    Sprite {
        texture,
        x: 0.0,
        y: 0.0,
        w: LOGICAL_WIDTH,
        h: LOGICAL_HEIGHT,
        rotation: 0.0,
        depth,
        tint: [1.0; 4],
    }
}
