//! Frame orchestrator.
//!
//! Owns the four sub-states, dispatches rendering by the current phase
//! once per frame and keeps the two music tracks in step with it. The
//! phase itself is only read here; the main loop mutates it by applying
//! the transitions this module reports.

pub mod music;
pub mod phase;
pub mod transition;

use winit::keyboard::KeyCode;

use crate::audio::AudioHandles;
use crate::error::InitError;
use crate::render::renderer::Renderer;
use crate::render::sprite::{SortMode, SpriteBatch};
use crate::settings::GameSettings;
use crate::state::{BackgroundState, MenuEntry, MenuState, PlayerSide, PlayerState};
use music::MusicDirector;
use phase::GamePhase;
use transition::Transition;

#[derive(Debug)]
pub struct Game {
    phase: GamePhase,
    player_one_victory: bool,
    music: MusicDirector,
    background: BackgroundState,
    menu: MenuState,
    player_one: PlayerState,
    player_two: PlayerState,
}

impl Game {
    /// Builds the four sub-states in fixed order, stopping at the first
    /// failed init. Partially built states are dropped by the unwind.
    pub fn new(settings: &GameSettings, audio: AudioHandles) -> Result<Self, InitError> {
        log::info!("GAME: Initializing game states");
        let background = BackgroundState::new(&settings.assets_dir, audio)?;
        let menu = MenuState::new(&settings.assets_dir)?;
        let player_one = PlayerState::new(&settings.assets_dir, PlayerSide::One)?;
        let player_two = PlayerState::new(&settings.assets_dir, PlayerSide::Two)?;

        Ok(Self {
            phase: GamePhase::Menu,
            player_one_victory: false,
            music: MusicDirector::new(settings.music_volume),
            background,
            menu,
            player_one,
            player_two,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    pub fn player_one_victory(&self) -> bool {
        self.player_one_victory
    }

    pub fn set_player_one_victory(&mut self, victory: bool) {
        self.player_one_victory = victory;
    }

    pub fn music_volume(&self) -> f32 {
        self.music.volume()
    }

    /// True iff the menu reports that Exit has been chosen. The caller
    /// decides what to do with it.
    pub fn exit_requested(&self) -> bool {
        self.menu.exit_chosen()
    }

    pub fn reset_round(&mut self) {
        self.player_one.reset();
        self.player_two.reset();
    }

    /// Routes a key event to whatever the current phase does with it.
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> Transition {
        match self.phase {
            GamePhase::Menu => {
                if !pressed {
                    return Transition::None;
                }
                match code {
                    KeyCode::ArrowUp => self.menu.move_up(),
                    KeyCode::ArrowDown => self.menu.move_down(),
                    KeyCode::Enter | KeyCode::Space => match self.menu.confirm() {
                        MenuEntry::Play => return Transition::ToGameplay,
                        MenuEntry::Instructions => return Transition::ToInstructions,
                        MenuEntry::Exit => {}
                    },
                    KeyCode::Escape => self.menu.choose_exit(),
                    _ => {}
                }
                Transition::None
            }
            GamePhase::Instructions | GamePhase::Results => {
                if pressed && matches!(code, KeyCode::Escape | KeyCode::Enter) {
                    Transition::ToMenu
                } else {
                    Transition::None
                }
            }
            GamePhase::Gameplay => {
                self.apply_gameplay_key(code, pressed);
                Transition::None
            }
        }
    }

    fn apply_gameplay_key(&mut self, code: KeyCode, pressed: bool) {
        match code {
            KeyCode::KeyS => self.player_one.input_mut().up = pressed,
            KeyCode::KeyX => self.player_one.input_mut().down = pressed,
            KeyCode::KeyV => self.player_one.input_mut().fire = pressed,
            KeyCode::ArrowUp => self.player_two.input_mut().up = pressed,
            KeyCode::ArrowDown => self.player_two.input_mut().down = pressed,
            KeyCode::ControlRight => self.player_two.input_mut().fire = pressed,
            _ => {}
        }
    }

    /// Ticks the gameplay simulation. Other phases have nothing to advance.
    pub fn update(&mut self, dt: f32) -> Transition {
        if self.phase != GamePhase::Gameplay {
            return Transition::None;
        }

        self.player_one.update(dt);
        self.player_two.update(dt);

        if self.player_one.strike(self.player_two.paddle_rect()) {
            self.player_two.deactivate();
        }
        if self.player_two.strike(self.player_one.paddle_rect()) {
            self.player_one.deactivate();
        }

        if !self.player_one.is_active() {
            log::info!("GAME: Player two wins the round");
            Transition::ToResults {
                player_one_victory: false,
            }
        } else if !self.player_two.is_active() {
            log::info!("GAME: Player one wins the round");
            Transition::ToResults {
                player_one_victory: true,
            }
        } else {
            Transition::None
        }
    }

    /// The per-frame dispatch: visuals by phase, then the audio policy for
    /// the phases that carry one. Audio always runs after the visual calls
    /// of its branch.
    pub(crate) fn compose(&mut self, batch: &mut SpriteBatch) {
        batch.begin(SortMode::BackToFront);

        match self.phase {
            GamePhase::Menu => {
                self.menu.render(batch);
                self.music.crossfade(
                    self.background.menu_music(),
                    self.background.gameplay_music(),
                );
            }
            GamePhase::Instructions => {
                self.background.render_instructions(batch);
            }
            GamePhase::Gameplay => {
                self.background.render(batch);
                self.player_one.render(batch);
                self.player_two.render(batch);
                self.music.crossfade(
                    self.background.gameplay_music(),
                    self.background.menu_music(),
                );
            }
            GamePhase::Results => {
                self.background.render(batch);
                if self.player_one_victory {
                    self.player_one.render(batch);
                } else {
                    self.player_two.render(batch);
                }
                self.background.render_results(batch);
            }
        }

        batch.end();
    }

    /// Composes and presents one frame. Blocks until the swapchain hands
    /// over the next vsynced image.
    pub fn render(&mut self, renderer: &mut Renderer) -> Result<(), wgpu::SurfaceError> {
        let mut batch = SpriteBatch::new();
        self.compose(&mut batch);
        renderer.draw(&batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, TrackHandle, TrackId};
    use crate::error::InitError;
    use crate::render::sprite::TextureId;
    use crossbeam_channel::{Receiver, unbounded};
    use std::fs::File;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    const ASSET_FILES: &[&str] = &[
        "background.png",
        "instructions.png",
        "results.png",
        "menu.png",
        "paddle_one.png",
        "paddle_two.png",
        "projectile.png",
        "menu_theme.ogg",
        "gameplay_theme.ogg",
    ];

    struct Harness {
        game: Game,
        commands: Receiver<AudioCommand>,
        menu_playing: Arc<AtomicBool>,
        gameplay_playing: Arc<AtomicBool>,
        _assets: TempDir,
    }

    fn write_assets(dir: &TempDir, files: &[&str]) {
        for file in files {
            File::create(dir.path().join(file)).unwrap();
        }
    }

    fn harness() -> Harness {
        let assets = TempDir::new().unwrap();
        write_assets(&assets, ASSET_FILES);

        let (tx, rx) = unbounded();
        let menu_playing = Arc::new(AtomicBool::new(false));
        let gameplay_playing = Arc::new(AtomicBool::new(false));
        let handles = AudioHandles {
            menu: TrackHandle::new(TrackId::Menu, tx.clone(), menu_playing.clone()),
            gameplay: TrackHandle::new(TrackId::Gameplay, tx, gameplay_playing.clone()),
        };

        let settings = GameSettings {
            assets_dir: assets.path().to_path_buf(),
            ..Default::default()
        };
        let game = Game::new(&settings, handles).unwrap();

        // Drop the two Load commands issued during init.
        let _: Vec<AudioCommand> = rx.try_iter().collect();

        Harness {
            game,
            commands: rx,
            menu_playing,
            gameplay_playing,
            _assets: assets,
        }
    }

    fn compose(h: &mut Harness) -> Vec<TextureId> {
        let mut batch = SpriteBatch::new();
        h.game.compose(&mut batch);
        batch.sprites().iter().map(|s| s.texture).collect()
    }

    fn drain(h: &Harness) -> Vec<AudioCommand> {
        h.commands.try_iter().collect()
    }

    #[test]
    fn fresh_init_defaults() {
        let h = harness();
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert!(!h.game.player_one_victory());
        assert_eq!(h.game.music_volume(), 0.5);
    }

    #[test]
    fn default_phase_is_menu() {
        assert_eq!(GamePhase::default(), GamePhase::Menu);
    }

    #[test]
    fn missing_asset_fails_init_fast() {
        let assets = TempDir::new().unwrap();
        // Everything except the gameplay backdrop.
        write_assets(
            &assets,
            &ASSET_FILES
                .iter()
                .copied()
                .filter(|f| *f != "background.png")
                .collect::<Vec<_>>(),
        );

        let (tx, _rx) = unbounded();
        let handles = AudioHandles {
            menu: TrackHandle::new(TrackId::Menu, tx.clone(), Arc::new(AtomicBool::new(false))),
            gameplay: TrackHandle::new(TrackId::Gameplay, tx, Arc::new(AtomicBool::new(false))),
        };
        let settings = GameSettings {
            assets_dir: assets.path().to_path_buf(),
            ..Default::default()
        };

        let err = Game::new(&settings, handles).unwrap_err();
        let InitError::MissingAsset(path) = err;
        assert!(path.ends_with("background.png"));
    }

    #[test]
    fn menu_frame_fades_a_playing_gameplay_track() {
        let mut h = harness();
        h.gameplay_playing.store(true, Ordering::Relaxed);

        compose(&mut h);

        let cmds = drain(&h);
        assert_eq!(
            cmds,
            vec![AudioCommand::FadeOut {
                track: TrackId::Gameplay,
                secs: music::MUSIC_FADE_SECS,
            }]
        );
    }

    #[test]
    fn menu_frame_restarts_a_stopped_menu_track() {
        let mut h = harness();

        compose(&mut h);

        let cmds = drain(&h);
        assert_eq!(
            cmds,
            vec![
                AudioCommand::Reset {
                    track: TrackId::Menu
                },
                AudioCommand::SetVolume {
                    track: TrackId::Menu,
                    volume: 0.5,
                },
                AudioCommand::Play {
                    track: TrackId::Menu
                },
            ]
        );
    }

    #[test]
    fn gameplay_frame_renders_background_then_both_players() {
        let mut h = harness();
        h.game.set_phase(GamePhase::Gameplay);
        h.gameplay_playing.store(true, Ordering::Relaxed);

        let order = compose(&mut h);
        assert_eq!(
            order,
            vec![
                TextureId::Background,
                TextureId::PaddleOne,
                TextureId::PaddleTwo,
            ]
        );
        // Music already in place: nothing on the wire.
        assert!(drain(&h).is_empty());
    }

    #[test]
    fn gameplay_frame_fades_a_playing_menu_track() {
        let mut h = harness();
        h.game.set_phase(GamePhase::Gameplay);
        h.menu_playing.store(true, Ordering::Relaxed);

        compose(&mut h);

        let cmds = drain(&h);
        assert_eq!(
            cmds,
            vec![AudioCommand::FadeOut {
                track: TrackId::Menu,
                secs: music::MUSIC_FADE_SECS,
            }]
        );
    }

    #[test]
    fn instructions_and_results_touch_no_tracks() {
        let mut h = harness();
        h.gameplay_playing.store(true, Ordering::Relaxed);
        h.menu_playing.store(true, Ordering::Relaxed);

        h.game.set_phase(GamePhase::Instructions);
        compose(&mut h);
        h.game.set_phase(GamePhase::Results);
        compose(&mut h);

        assert!(drain(&h).is_empty());
    }

    #[test]
    fn results_frame_shows_the_victor_under_the_overlay() {
        let mut h = harness();
        h.game.set_phase(GamePhase::Results);

        h.game.set_player_one_victory(true);
        let order = compose(&mut h);
        assert!(order.contains(&TextureId::PaddleOne));
        assert!(!order.contains(&TextureId::PaddleTwo));
        assert_eq!(*order.last().unwrap(), TextureId::ResultsOverlay);

        h.game.set_player_one_victory(false);
        let order = compose(&mut h);
        assert!(order.contains(&TextureId::PaddleTwo));
        assert!(!order.contains(&TextureId::PaddleOne));
        assert_eq!(*order.last().unwrap(), TextureId::ResultsOverlay);
    }

    #[test]
    fn exit_request_mirrors_the_menu_flag() {
        let mut h = harness();
        assert!(!h.game.exit_requested());

        h.game.handle_key(KeyCode::ArrowDown, true);
        h.game.handle_key(KeyCode::ArrowDown, true);
        let transition = h.game.handle_key(KeyCode::Enter, true);
        assert_eq!(transition, Transition::None);
        assert!(h.game.exit_requested());
    }

    #[test]
    fn confirming_play_reports_a_gameplay_transition() {
        let mut h = harness();
        assert_eq!(
            h.game.handle_key(KeyCode::Enter, true),
            Transition::ToGameplay
        );
        assert!(!h.game.exit_requested());
    }

    #[test]
    fn round_ends_when_a_paddle_goes_down() {
        let mut h = harness();
        h.game.set_phase(GamePhase::Gameplay);

        assert_eq!(h.game.update(0.016), Transition::None);

        h.game.player_two.deactivate();
        assert_eq!(
            h.game.update(0.016),
            Transition::ToResults {
                player_one_victory: true
            }
        );
    }

    #[test]
    fn update_outside_gameplay_is_inert() {
        let mut h = harness();
        h.game.player_one.deactivate();
        assert_eq!(h.game.update(0.016), Transition::None);
    }
}
