//! Track handles and the command protocol for the dedicated audio thread.
//!
//! The game never touches rodio directly. It holds cheap [`TrackHandle`]s
//! that send commands over a channel and read a shared playing flag, so
//! audio control never blocks the frame loop.

mod worker;

use crossbeam_channel::{Sender, unbounded};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The two music tracks the game switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackId {
    Menu,
    Gameplay,
}

/// Commands sent to the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Point a track at its source file. Does not start playback.
    Load { track: TrackId, path: PathBuf },
    /// Start (or resume) playback.
    Play { track: TrackId },
    /// Rewind the track to its beginning, leaving it paused.
    Reset { track: TrackId },
    /// Change the track volume.
    SetVolume { track: TrackId, volume: f32 },
    /// Ramp the track down to silence over `secs`, then stop it.
    FadeOut { track: TrackId, secs: f32 },
}

/// Handle to one track living on the audio thread.
///
/// Sending never blocks. If the audio thread is gone the commands are
/// silently dropped, which doubles as the silent mode used when no audio
/// device exists.
#[derive(Debug, Clone)]
pub struct TrackHandle {
    id: TrackId,
    cmd_tx: Sender<AudioCommand>,
    playing: Arc<AtomicBool>,
}

impl TrackHandle {
    pub(crate) fn new(id: TrackId, cmd_tx: Sender<AudioCommand>, playing: Arc<AtomicBool>) -> Self {
        Self {
            id,
            cmd_tx,
            playing,
        }
    }

    /// Whether the track is currently audible (fading counts as playing).
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn load(&self, path: &Path) {
        let _ = self.cmd_tx.send(AudioCommand::Load {
            track: self.id,
            path: path.to_path_buf(),
        });
    }

    pub fn play(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Play { track: self.id });
    }

    pub fn reset(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Reset { track: self.id });
    }

    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume {
            track: self.id,
            volume,
        });
    }

    pub fn fade_out(&self, secs: f32) {
        let _ = self.cmd_tx.send(AudioCommand::FadeOut {
            track: self.id,
            secs,
        });
    }
}

/// The two handles produced by [`start_thread`].
pub struct AudioHandles {
    pub menu: TrackHandle,
    pub gameplay: TrackHandle,
}

/// Spawns the audio thread and returns handles for both tracks.
pub fn start_thread() -> AudioHandles {
    let (cmd_tx, cmd_rx) = unbounded();
    let menu_playing = Arc::new(AtomicBool::new(false));
    let gameplay_playing = Arc::new(AtomicBool::new(false));

    worker::spawn(cmd_rx, menu_playing.clone(), gameplay_playing.clone());

    AudioHandles {
        menu: TrackHandle::new(TrackId::Menu, cmd_tx.clone(), menu_playing),
        gameplay: TrackHandle::new(TrackId::Gameplay, cmd_tx, gameplay_playing),
    }
}
