use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use hound::{SampleFormat, WavSpec, WavWriter};
use tokio::task::JoinHandle;
use tracing::debug;

use lesson_core::audio::AudioBuffer;
use services::{ActiveStream, AudioSink, Completion, PlaybackError};

/// Terminal stand-in for a speaker.
///
/// Each clip "plays" for its real duration before completing, and is
/// optionally written to `clip_dir` as a 16-bit mono WAV.
pub struct PacedSink {
    clip_dir: Option<PathBuf>,
    clips: AtomicU64,
}

impl PacedSink {
    #[must_use]
    pub fn new(clip_dir: Option<PathBuf>) -> Self {
        Self {
            clip_dir,
            clips: AtomicU64::new(0),
        }
    }
}

impl AudioSink for PacedSink {
    fn start(
        &self,
        buffer: AudioBuffer,
        completion: Completion,
    ) -> Result<Box<dyn ActiveStream>, PlaybackError> {
        let clip = self.clips.fetch_add(1, Ordering::Relaxed);
        if let Some(dir) = &self.clip_dir {
            let path = dir.join(format!("clip-{clip:04}.wav"));
            write_wav(&path, &buffer).map_err(|err| PlaybackError::Device(err.to_string()))?;
            debug!(path = %path.display(), "clip written");
        }

        let duration = buffer.duration();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            completion.finish();
        });
        Ok(Box::new(PacedStream { timer }))
    }
}

struct PacedStream {
    timer: JoinHandle<()>,
}

impl ActiveStream for PacedStream {
    fn stop(&mut self) -> Result<(), PlaybackError> {
        if self.timer.is_finished() {
            return Err(PlaybackError::AlreadyStopped);
        }
        self.timer.abort();
        Ok(())
    }
}

impl Drop for PacedStream {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in buffer.samples() {
        writer.write_sample((sample.clamp(-1.0, 1.0) * 32767.0) as i16)?;
    }
    writer.finalize()
}
