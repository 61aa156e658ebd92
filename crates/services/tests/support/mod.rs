#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use lesson_core::audio::AudioBuffer;
use lesson_core::model::{AudioData, GeneratedLesson, ImageData, Topic};
use services::{ActiveStream, AudioSink, Completion, ContentProvider, PlaybackError, ProviderError};

/// Six zero bytes: three frames of silent PCM.
pub const QUESTION_AUDIO: &str = "AAAAAAAA";

/// Provider that answers instantly and counts every call.
#[derive(Default)]
pub struct FakeProvider {
    content_calls: AtomicUsize,
    image_calls: AtomicUsize,
    speech_texts: Mutex<Vec<String>>,
    topics: Mutex<Vec<Topic>>,
    fail_content: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every lesson-text call waits for one `notify_one` on the returned gate.
    pub fn gated() -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let provider = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (Arc::new(provider), gate)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn speech_texts(&self) -> Vec<String> {
        self.speech_texts.lock().unwrap().clone()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.topics.lock().unwrap().clone()
    }

    pub fn fail_content(&self, fail: bool) {
        self.fail_content.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentProvider for FakeProvider {
    async fn generate_lesson_content(
        &self,
        topic: Topic,
        concept: &str,
    ) -> Result<GeneratedLesson, ProviderError> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.topics.lock().unwrap().push(topic);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(ProviderError::EmptyResponse);
        }

        let simple = concept.rsplit(' ').next().unwrap_or(concept).to_string();
        Ok(GeneratedLesson {
            image_prompt: format!("photo of {simple}"),
            concept: simple,
            question: "What is this?".into(),
        })
    }

    async fn generate_image(&self, prompt: &str, _topic: Topic) -> Option<ImageData> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Some(ImageData::png(format!("img:{prompt}")))
    }

    async fn generate_speech(&self, text: &str) -> Option<AudioData> {
        self.speech_texts.lock().unwrap().push(text.to_string());
        Some(AudioData::new(QUESTION_AUDIO))
    }
}

/// Sink that never finishes on its own; tests drive completions by hand.
#[derive(Default)]
pub struct RecordingSink {
    starts: AtomicUsize,
    completions: Mutex<Vec<Completion>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn finish_latest(&self) {
        if let Some(completion) = self.completions.lock().unwrap().pop() {
            completion.finish();
        }
    }
}

struct Stream;

impl ActiveStream for Stream {
    fn stop(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

impl AudioSink for RecordingSink {
    fn start(
        &self,
        _buffer: AudioBuffer,
        completion: Completion,
    ) -> Result<Box<dyn ActiveStream>, PlaybackError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.completions.lock().unwrap().push(completion);
        Ok(Box::new(Stream))
    }
}

/// Let spawned prefetch tasks run to completion on the test runtime.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn fixed_picker(concept: &'static str) -> services::ConceptPicker {
    Arc::new(move |_topic: Topic| concept.to_string())
}

/// Picker cycling through numbered descriptions, so every draw is a cache miss.
pub fn counting_picker() -> services::ConceptPicker {
    let counter = Arc::new(AtomicUsize::new(0));
    Arc::new(move |topic: Topic| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        format!("{} item {n}", topic.slug())
    })
}

/// Fresh descriptions ending in the topic slug, so every draw misses the
/// cache and each item's concept names its topic.
pub fn topic_picker() -> services::ConceptPicker {
    let counter = Arc::new(AtomicUsize::new(0));
    Arc::new(move |topic: Topic| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        format!("{n} real {}", topic.slug())
    })
}
