//! Dedicated audio thread owning the rodio output and one sink per track.
//!
//! Fades run here on the thread's own tick, so a fade requested by the
//! frame loop completes over the following frames without blocking it.

use super::{AudioCommand, TrackId};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(25);

struct Fade {
    started: Instant,
    from: f32,
    duration: Duration,
}

struct TrackSlot {
    path: Option<PathBuf>,
    sink: Option<Sink>,
    volume: f32,
    fade: Option<Fade>,
    playing: Arc<AtomicBool>,
}

impl TrackSlot {
    fn new(playing: Arc<AtomicBool>) -> Self {
        Self {
            path: None,
            sink: None,
            volume: 1.0,
            fade: None,
            playing,
        }
    }

    /// Rebuilds the sink from the source file, paused at the start.
    fn rebuild_sink(&mut self, stream_handle: &OutputStreamHandle) {
        self.fade = None;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let Some(path) = &self.path else {
            return;
        };

        let Ok(file) = File::open(path) else {
            log::error!("AUDIO: Cannot open file {:?}", path);
            return;
        };

        let Ok(source) = Decoder::new(BufReader::new(file)) else {
            log::error!("AUDIO: Cannot decode file {:?}", path);
            return;
        };

        let Ok(sink) = Sink::try_new(stream_handle) else {
            log::error!("AUDIO: Cannot create sink for {:?}", path);
            return;
        };

        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);
        self.sink = Some(sink);
    }

    fn tick(&mut self) {
        if let Some(fade) = &self.fade {
            let t = fade.started.elapsed().as_secs_f32() / fade.duration.as_secs_f32();
            if t >= 1.0 {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.fade = None;
            } else if let Some(sink) = &self.sink {
                sink.set_volume(fade.from * (1.0 - t));
            }
        }

        let playing = self
            .sink
            .as_ref()
            .is_some_and(|sink| !sink.empty() && !sink.is_paused());
        self.playing.store(playing, Ordering::Relaxed);
    }
}

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    menu: TrackSlot,
    gameplay: TrackSlot,
}

impl AudioWorker {
    fn new(menu_playing: Arc<AtomicBool>, gameplay_playing: Arc<AtomicBool>) -> Self {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                Self {
                    _stream: Some(stream),
                    stream_handle: Some(stream_handle),
                    menu: TrackSlot::new(menu_playing),
                    gameplay: TrackSlot::new(gameplay_playing),
                }
            }
            Err(e) => {
                log::warn!(
                    "AUDIO: No audio device found ({}), running in silent mode",
                    e
                );
                Self {
                    _stream: None,
                    stream_handle: None,
                    menu: TrackSlot::new(menu_playing),
                    gameplay: TrackSlot::new(gameplay_playing),
                }
            }
        }
    }

    fn slot(&mut self, track: TrackId) -> &mut TrackSlot {
        match track {
            TrackId::Menu => &mut self.menu,
            TrackId::Gameplay => &mut self.gameplay,
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        // Silent mode: accept and drop everything.
        let Some(stream_handle) = self.stream_handle.clone() else {
            return;
        };

        match cmd {
            AudioCommand::Load { track, path } => {
                self.slot(track).path = Some(path);
            }
            AudioCommand::Reset { track } => {
                self.slot(track).rebuild_sink(&stream_handle);
            }
            AudioCommand::Play { track } => {
                let slot = self.slot(track);
                if slot.sink.is_none() {
                    slot.rebuild_sink(&stream_handle);
                }
                if let Some(sink) = &slot.sink {
                    sink.play();
                }
            }
            AudioCommand::SetVolume { track, volume } => {
                let slot = self.slot(track);
                slot.volume = volume;
                if let Some(sink) = &slot.sink {
                    sink.set_volume(volume);
                }
            }
            AudioCommand::FadeOut { track, secs } => {
                let slot = self.slot(track);
                // A fade already in flight keeps its own schedule.
                if slot.fade.is_none() && slot.sink.is_some() {
                    slot.fade = Some(Fade {
                        started: Instant::now(),
                        from: slot.volume,
                        duration: Duration::from_secs_f32(secs.max(0.01)),
                    });
                }
            }
        }
    }

    fn run(mut self, cmd_rx: Receiver<AudioCommand>) {
        loop {
            match cmd_rx.recv_timeout(TICK) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.menu.tick();
            self.gameplay.tick();
        }
        log::info!("AUDIO: Shutting down");
    }
}

pub(super) fn spawn(
    cmd_rx: Receiver<AudioCommand>,
    menu_playing: Arc<AtomicBool>,
    gameplay_playing: Arc<AtomicBool>,
) {
    std::thread::spawn(move || {
        AudioWorker::new(menu_playing, gameplay_playing).run(cmd_rx);
    });
}
