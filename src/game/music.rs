//! Crossfade policy between the menu and gameplay tracks.
//!
//! Applied once per menu/gameplay frame, always after that frame's visual
//! calls. The policy is level-triggered: it looks only at what is audible
//! right now, never at which phase was active last frame.

use crate::audio::TrackHandle;

/// How long a displaced track takes to fade to silence.
pub const MUSIC_FADE_SECS: f32 = 1.2;

#[derive(Debug)]
pub struct MusicDirector {
    volume: f32,
}

impl MusicDirector {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Steers playback toward `wanted`.
    ///
    /// If the displaced track is still audible it gets a fade and nothing
    /// else happens this frame. Otherwise a stopped `wanted` track is
    /// rewound, set to the configured volume and restarted. The restart is
    /// also what loops the track: it is never configured to loop natively,
    /// it is simply re-triggered on the first frame it is found stopped.
    pub fn crossfade(&self, wanted: &TrackHandle, displaced: &TrackHandle) {
        if displaced.is_playing() {
            displaced.fade_out(MUSIC_FADE_SECS);
        } else if !wanted.is_playing() {
            wanted.reset();
            wanted.set_volume(self.volume);
            wanted.play();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, TrackHandle, TrackId};
    use crossbeam_channel::{Receiver, unbounded};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Stub {
        handle: TrackHandle,
        playing: Arc<AtomicBool>,
    }

    fn stub(id: TrackId, tx: &crossbeam_channel::Sender<AudioCommand>) -> Stub {
        let playing = Arc::new(AtomicBool::new(false));
        Stub {
            handle: TrackHandle::new(id, tx.clone(), playing.clone()),
            playing,
        }
    }

    fn setup() -> (Stub, Stub, Receiver<AudioCommand>) {
        let (tx, rx) = unbounded();
        (stub(TrackId::Menu, &tx), stub(TrackId::Gameplay, &tx), rx)
    }

    #[test]
    fn fades_the_displaced_track_and_nothing_else() {
        let (menu, gameplay, rx) = setup();
        gameplay.playing.store(true, Ordering::Relaxed);

        MusicDirector::new(0.5).crossfade(&menu.handle, &gameplay.handle);

        let cmds: Vec<AudioCommand> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![AudioCommand::FadeOut {
                track: TrackId::Gameplay,
                secs: MUSIC_FADE_SECS,
            }]
        );
    }

    #[test]
    fn restarts_a_stopped_wanted_track_in_order() {
        let (menu, gameplay, rx) = setup();

        MusicDirector::new(0.5).crossfade(&menu.handle, &gameplay.handle);

        let cmds: Vec<AudioCommand> = rx.try_iter().collect();
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
    fn steady_state_is_silent_on_the_wire() {
        let (menu, gameplay, rx) = setup();
        menu.playing.store(true, Ordering::Relaxed);

        MusicDirector::new(0.5).crossfade(&menu.handle, &gameplay.handle);

        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn configured_volume_reaches_the_play_call() {
        let (menu, gameplay, rx) = setup();

        MusicDirector::new(0.3).crossfade(&gameplay.handle, &menu.handle);

        let cmds: Vec<AudioCommand> = rx.try_iter().collect();
        assert!(cmds.contains(&AudioCommand::SetVolume {
            track: TrackId::Gameplay,
            volume: 0.3,
        }));
    }
}
