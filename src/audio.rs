//! Background music as a scoped service.
//!
//! `BackgroundMusic::start` spawns a worker that replays one clip through an
//! `AudioSink` until told to stop. The worker owns nothing the simulation
//! touches; the clip's shared play flag and a stop channel are the only links.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, trace, warn};

use crate::assets::{Sound, SoundClip};

/// Pause between two plays of a looping clip.
pub const LOOP_GAP: Duration = Duration::from_millis(250);

/// Output device. `play` blocks for the length of the clip.
pub trait AudioSink: Send + 'static {
    fn play(&mut self, clip: &SoundClip);
}

/// Sink for hosts without an audio device: plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, clip: &SoundClip) {
        trace!("silent playback of {} ({} bytes)", clip.name(), clip.bytes().len());
    }
}

/// Speaker output through rodio.
///
/// The output stream is opened on the playing thread for each play, so the
/// sink itself stays `Send`. A host without a usable device is reported once
/// and then treated as silent.
#[cfg(feature = "rodio")]
#[derive(Debug, Default)]
pub struct RodioSink {
    disabled: bool,
}

#[cfg(feature = "rodio")]
impl AudioSink for RodioSink {
    fn play(&mut self, clip: &SoundClip) {
        if self.disabled {
            return;
        }
        let mut stream = match rodio::OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                warn!("audio output unavailable, music disabled: {e}");
                self.disabled = true;
                return;
            }
        };
        // Its drop message would land on the game screen
        stream.log_on_drop(false);

        let source = match rodio::Decoder::new(std::io::Cursor::new(clip.bytes().to_vec())) {
            Ok(source) => source,
            Err(e) => {
                warn!("cannot decode {}, music disabled: {e}", clip.name());
                self.disabled = true;
                return;
            }
        };
        let sink = rodio::Sink::connect_new(stream.mixer());
        sink.append(source);

        // Wait out the clip, but give up as soon as the clip is stopped.
        while !sink.empty() {
            if !clip.is_active() {
                sink.stop();
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

pub struct BackgroundMusic {
    clip: Sound,
    stop_tx: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundMusic {
    /// Start looping `clip` on a worker thread.
    pub fn start(clip: Sound, sink: impl AudioSink) -> Self {
        Self::start_with_gap(clip, sink, LOOP_GAP)
    }

    pub fn start_with_gap(clip: Sound, mut sink: impl AudioSink, gap: Duration) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        clip.activate();
        debug!("looping sound {}", clip.name());

        let worker_clip = Sound::clone(&clip);
        let worker = thread::spawn(move || {
            while worker_clip.is_active() {
                sink.play(&worker_clip);
                match stop_rx.recv_timeout(gap) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // An explicit stop or the service being dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            clip,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop playback and wait for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.clip.stop();
        if let Some(tx) = self.stop_tx.take() {
            // The worker may already be gone after a cleanup
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("music worker for {} panicked", self.clip.name());
            }
            debug!("stopped sound {}", self.clip.name());
        }
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        self.shutdown();
    }
}
