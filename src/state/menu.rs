//! Main menu sub-state: entry selection and the exit flag.

use std::path::Path;

use crate::error::InitError;
use crate::render::sprite::{
    LOGICAL_HEIGHT, LOGICAL_WIDTH, Sprite, SpriteBatch, TextDraw, TextureId,
};
use crate::state::require_asset;

const MENU_FILE: &str = "menu.png";
const BACKDROP_DEPTH: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Play,
    Instructions,
    Exit,
}

const ENTRIES: [MenuEntry; 3] = [MenuEntry::Play, MenuEntry::Instructions, MenuEntry::Exit];

#[derive(Debug)]
pub struct MenuState {
    selected: usize,
    exit_chosen: bool,
}

impl MenuState {
    pub fn new(assets_dir: &Path) -> Result<Self, InitError> {
        require_asset(assets_dir.join(MENU_FILE))?;
        Ok(Self {
            selected: 0,
            exit_chosen: false,
        })
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(ENTRIES.len() - 1);
    }

    pub fn selected(&self) -> MenuEntry {
        ENTRIES[self.selected]
    }

    /// Confirms the highlighted entry. Choosing Exit latches the exit flag
    /// the main loop polls every frame.
    pub fn confirm(&mut self) -> MenuEntry {
        let entry = ENTRIES[self.selected];
        if entry == MenuEntry::Exit {
            self.exit_chosen = true;
        }
        entry
    }

    pub fn choose_exit(&mut self) {
        self.exit_chosen = true;
    }

    pub fn exit_chosen(&self) -> bool {
        self.exit_chosen
    }

    pub fn render(&self, batch: &mut SpriteBatch) {
        batch.push(Sprite {
            texture: TextureId::MenuBackdrop,
            x: 0.0,
            y: 0.0,
            w: LOGICAL_WIDTH,
            h: LOGICAL_HEIGHT,
            rotation: 0.0,
            depth: BACKDROP_DEPTH,
            tint: [1.0; 4],
        });

        batch.text(TextDraw {
            text: "ULTRA SHEEP FIELD".into(),
            x: LOGICAL_WIDTH / 2.0 - 280.0,
            y: 120.0,
            px: 64.0,
            color: [1.0, 1.0, 1.0, 1.0],
        });

        for (i, entry) in ENTRIES.iter().enumerate() {
            let label = match entry {
                MenuEntry::Play => "Play",
                MenuEntry::Instructions => "Instructions",
                MenuEntry::Exit => "Exit",
            };
            let color = if i == self.selected {
                [1.0, 0.9, 0.2, 1.0]
            } else {
                [0.85, 0.85, 0.85, 1.0]
            };
            batch.text(TextDraw {
                text: label.into(),
                x: LOGICAL_WIDTH / 2.0 - 90.0,
                y: 320.0 + i as f32 * 64.0,
                px: 36.0,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn menu() -> (MenuState, TempDir) {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join(MENU_FILE)).unwrap();
        (MenuState::new(dir.path()).unwrap(), dir)
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let (mut menu, _dir) = menu();
        menu.move_up();
        assert_eq!(menu.selected(), MenuEntry::Play);

        for _ in 0..10 {
            menu.move_down();
        }
        assert_eq!(menu.selected(), MenuEntry::Exit);
    }

    #[test]
    fn confirming_exit_latches_the_flag() {
        let (mut menu, _dir) = menu();
        assert!(!menu.exit_chosen());

        menu.move_down();
        assert_eq!(menu.confirm(), MenuEntry::Instructions);
        assert!(!menu.exit_chosen());

        menu.move_down();
        assert_eq!(menu.confirm(), MenuEntry::Exit);
        assert!(menu.exit_chosen());
    }

    #[test]
    fn missing_backdrop_fails_init() {
        let dir = TempDir::new().unwrap();
        assert!(MenuState::new(dir.path()).is_err());
    }
}
