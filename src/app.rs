//! Window plumbing and the frame loop.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::game::phase::GamePhase;
use crate::game::transition::Transition;
use crate::game::Game;
use crate::render::renderer::Renderer;
use crate::settings::GameSettings;

pub struct App {
    settings: GameSettings,
    game: Game,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    last_frame: Instant,
}

impl App {
    pub fn run(settings: GameSettings, game: Game) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = Self {
            settings,
            game,
            window: None,
            renderer: None,
            last_frame: Instant::now(),
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::ToMenu => {
                // Leaving Results is the only thing that clears the victory
                // flag; the game itself never resets it.
                self.game.set_player_one_victory(false);
                self.game.set_phase(GamePhase::Menu);
            }
            Transition::ToInstructions => {
                self.game.set_phase(GamePhase::Instructions);
            }
            Transition::ToGameplay => {
                self.game.reset_round();
                self.game.set_phase(GamePhase::Gameplay);
            }
            Transition::ToResults { player_one_victory } => {
                self.game.set_player_one_victory(player_one_victory);
                self.game.set_phase(GamePhase::Results);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title("Sheepfield")
            .with_inner_size(LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("MAIN: Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.settings.assets_dir));
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("MAIN: Window close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let transition = self.game.handle_key(code, state.is_pressed());
                self.apply_transition(transition);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                let transition = self.game.update(dt);
                self.apply_transition(transition);

                if let Some(renderer) = self.renderer.as_mut() {
                    match self.game.render(renderer) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("RENDER: Out of GPU memory, shutting down");
                            event_loop.exit();
                            return;
                        }
                        Err(e) => log::error!("RENDER: Surface error: {e:?}"),
                    }
                }

                if self.game.exit_requested() {
                    log::info!("GAME: Exit chosen from the menu");
                    event_loop.exit();
                    return;
                }

                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
