//! The four owned presentation units the orchestrator drives each frame:
//! shared background/results, the menu and the two players.

pub mod background;
pub mod menu;
pub mod player;

pub use background::BackgroundState;
pub use menu::{MenuEntry, MenuState};
pub use player::{PlayerSide, PlayerState};

use crate::error::InitError;
use std::path::PathBuf;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Init-time asset check: states fail fast on the first missing file.
pub(crate) fn require_asset(path: PathBuf) -> Result<PathBuf, InitError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(InitError::MissingAsset(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_overlap() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let b = Rect {
            x: 5.0,
            y: 5.0,
            w: 10.0,
            h: 10.0,
        };
        let c = Rect {
            x: 20.0,
            y: 0.0,
            w: 5.0,
            h: 5.0,
        };
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }
}
