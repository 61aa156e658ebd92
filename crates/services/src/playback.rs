use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, warn};

use lesson_core::audio::{AudioBuffer, decode_pcm16};
use lesson_core::model::AudioData;

use crate::error::PlaybackError;

/// Output device abstraction.
pub trait AudioSink: Send + Sync {
    /// Begin playing `buffer` and return a handle to the running stream.
    ///
    /// The sink calls `completion.finish()` when the clip ends naturally,
    /// from any thread, possibly before `start` has returned.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` when the device cannot start the stream.
    fn start(
        &self,
        buffer: AudioBuffer,
        completion: Completion,
    ) -> Result<Box<dyn ActiveStream>, PlaybackError>;
}

/// A stream started by an `AudioSink`. Dropping it releases the stream.
pub trait ActiveStream: Send {
    /// Halt output.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::AlreadyStopped` if the stream had ended.
    fn stop(&mut self) -> Result<(), PlaybackError>;
}

/// Called once a clip ends on its own.
pub type FinishHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct PlaybackState {
    token: u64,
    finished: u64,
    active: Option<Box<dyn ActiveStream>>,
    playing: bool,
    on_finish: Option<FinishHook>,
}

/// End-of-clip notification bound to the `play` call that issued it.
pub struct Completion {
    token: u64,
    state: Weak<Mutex<PlaybackState>>,
}

impl Completion {
    /// Mark the clip finished.
    ///
    /// Ignored when a newer `play` call has superseded this one, or when the
    /// controller is gone.
    pub fn finish(self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let (released, hook) = {
            let mut state = lock(&state);
            if state.token != self.token {
                debug!(token = self.token, current = state.token, "stale completion ignored");
                return;
            }
            state.finished = self.token;
            state.playing = false;
            (state.active.take(), state.on_finish.clone())
        };
        drop(released);
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Plays at most one clip at a time.
///
/// Every `play` stops the current stream first and issues a new token; stream
/// completions carrying an older token are ignored.
pub struct PlaybackController {
    sink: Arc<dyn AudioSink>,
    state: Arc<Mutex<PlaybackState>>,
}

impl PlaybackController {
    #[must_use]
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            state: Arc::new(Mutex::new(PlaybackState::default())),
        }
    }

    /// Run `hook` whenever the current clip finishes naturally. Stale and
    /// stopped clips do not trigger it.
    pub fn set_on_finish(&self, hook: FinishHook) {
        lock(&self.state).on_finish = Some(hook);
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    /// Replace whatever is playing with `audio`.
    ///
    /// Undecodable audio plays as one second of silence and sink failures
    /// leave the controller stopped. Returns the token issued for this clip.
    pub fn play(&self, audio: &AudioData) -> u64 {
        self.stop();

        let buffer = decode_pcm16(audio).unwrap_or_else(|err| {
            warn!(error = %err, "audio decode failed; playing silence");
            AudioBuffer::silence()
        });

        let token = {
            let mut state = lock(&self.state);
            state.token += 1;
            state.token
        };
        let completion = Completion {
            token,
            state: Arc::downgrade(&self.state),
        };

        let frames = buffer.frames();
        match self.sink.start(buffer, completion) {
            Ok(stream) => {
                let mut state = lock(&self.state);
                if state.finished == token {
                    debug!(token, frames, "clip ended before start returned");
                } else if state.token == token {
                    state.active = Some(stream);
                    state.playing = true;
                    debug!(token, frames, "playback started");
                }
            }
            Err(err) => {
                warn!(token, error = %err, "playback failed to start");
            }
        }
        token
    }

    /// Halt and release the active stream, if any.
    pub fn stop(&self) {
        let active = {
            let mut state = lock(&self.state);
            state.playing = false;
            state.active.take()
        };
        if let Some(mut stream) = active {
            if let Err(err) = stream.stop() {
                debug!(error = %err, "ignoring stop error");
            }
        }
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("PlaybackController")
            .field("token", &state.token)
            .field("playing", &state.playing)
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<PlaybackState>) -> MutexGuard<'_, PlaybackState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeSink {
        fail_start: AtomicBool,
        stop_errors: AtomicBool,
        instant: AtomicBool,
        started: Mutex<Vec<Started>>,
    }

    struct Started {
        frames: usize,
        stopped: Arc<AtomicBool>,
        completion: Option<Completion>,
    }

    struct FakeStream {
        stopped: Arc<AtomicBool>,
        error_on_stop: bool,
    }

    impl ActiveStream for FakeStream {
        fn stop(&mut self) -> Result<(), PlaybackError> {
            if self.error_on_stop || self.stopped.swap(true, Ordering::SeqCst) {
                return Err(PlaybackError::AlreadyStopped);
            }
            Ok(())
        }
    }

    impl AudioSink for FakeSink {
        fn start(
            &self,
            buffer: AudioBuffer,
            completion: Completion,
        ) -> Result<Box<dyn ActiveStream>, PlaybackError> {
            if self.fail_start.load(Ordering::SeqCst) {
                return Err(PlaybackError::Device("no output".into()));
            }
            let stopped = Arc::new(AtomicBool::new(false));
            let completion = if self.instant.load(Ordering::SeqCst) {
                completion.finish();
                None
            } else {
                Some(completion)
            };
            self.started.lock().unwrap().push(Started {
                frames: buffer.frames(),
                stopped: Arc::clone(&stopped),
                completion,
            });
            Ok(Box::new(FakeStream {
                stopped,
                error_on_stop: self.stop_errors.load(Ordering::SeqCst),
            }))
        }
    }

    impl FakeSink {
        fn take_completion(&self, index: usize) -> Completion {
            let mut started = self.started.lock().unwrap();
            started[index].completion.take().unwrap()
        }
    }

    // 4 bytes of PCM, two frames.
    fn clip() -> AudioData {
        AudioData::new("AAEAAQ==")
    }

    #[test]
    fn replacing_stops_previous_and_ignores_stale_completion() {
        let sink = Arc::new(FakeSink::default());
        let controller = PlaybackController::new(sink.clone());

        let first = controller.play(&clip());
        let second = controller.play(&clip());
        assert!(second > first);
        assert!(controller.is_playing());

        {
            let started = sink.started.lock().unwrap();
            assert_eq!(started.len(), 2);
            assert!(started[0].stopped.load(Ordering::SeqCst));
            assert!(!started[1].stopped.load(Ordering::SeqCst));
        }

        sink.take_completion(0).finish();
        assert!(controller.is_playing());

        sink.take_completion(1).finish();
        assert!(!controller.is_playing());
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let controller = PlaybackController::new(Arc::new(FakeSink::default()));
        controller.stop();
        controller.stop();
        assert!(!controller.is_playing());
    }

    #[test]
    fn stop_errors_are_swallowed() {
        let sink = Arc::new(FakeSink::default());
        sink.stop_errors.store(true, Ordering::SeqCst);
        let controller = PlaybackController::new(sink.clone());

        controller.play(&clip());
        controller.play(&clip());
        assert!(controller.is_playing());
        controller.stop();
        assert!(!controller.is_playing());
    }

    #[test]
    fn completion_after_stop_is_harmless() {
        let sink = Arc::new(FakeSink::default());
        let controller = PlaybackController::new(sink.clone());
        controller.play(&clip());
        controller.stop();
        sink.take_completion(0).finish();
        assert!(!controller.is_playing());
    }

    #[test]
    fn malformed_audio_plays_silence() {
        let sink = Arc::new(FakeSink::default());
        let controller = PlaybackController::new(sink.clone());
        controller.play(&AudioData::new("@@ definitely not audio @@"));
        assert!(controller.is_playing());
        assert_eq!(sink.started.lock().unwrap()[0].frames, 24_000);
    }

    #[test]
    fn sink_failure_leaves_stopped() {
        let sink = Arc::new(FakeSink::default());
        sink.fail_start.store(true, Ordering::SeqCst);
        let controller = PlaybackController::new(sink);
        let token = controller.play(&clip());
        assert_eq!(token, 1);
        assert!(!controller.is_playing());
    }

    #[test]
    fn clip_finishing_inside_start_is_not_left_playing() {
        let sink = Arc::new(FakeSink::default());
        sink.instant.store(true, Ordering::SeqCst);
        let controller = PlaybackController::new(sink);
        controller.play(&clip());
        assert!(!controller.is_playing());
    }

    #[test]
    fn finish_hook_fires_only_for_current_clip() {
        use std::sync::atomic::AtomicUsize;

        let sink = Arc::new(FakeSink::default());
        let controller = PlaybackController::new(sink.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        controller.set_on_finish(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        controller.play(&clip());
        controller.play(&clip());
        sink.take_completion(0).finish();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        sink.take_completion(1).finish();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completion_outliving_controller_is_ignored() {
        let sink = Arc::new(FakeSink::default());
        let controller = PlaybackController::new(sink.clone());
        controller.play(&clip());
        drop(controller);
        sink.take_completion(0).finish();
    }
}
