use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};

use lesson_core::model::{LessonItem, Topic};
use lesson_core::pronunciation::speech_text;

use super::view::{LessonView, SessionPhase};
use crate::cache::ConceptCache;
use crate::error::SessionError;
use crate::loader::{ConceptPicker, LookaheadLoader};
use crate::playback::{AudioSink, PlaybackController};
use crate::provider::ContentProvider;

/// Drives one child's lesson: topic choice, history navigation, reveal and
/// audio, on top of the lookahead loader.
///
/// Visited items live in `history` and are replayed without touching the
/// loader; the concept cache outlives the session and is never cleared here.
pub struct LessonSession {
    provider: Arc<dyn ContentProvider>,
    loader: LookaheadLoader,
    playback: PlaybackController,
    topic: Option<Topic>,
    history: Vec<Arc<LessonItem>>,
    cursor: usize,
    phase: SessionPhase,
    revealed: bool,
    last_error: Option<String>,
    views: Arc<watch::Sender<LessonView>>,
}

impl LessonSession {
    #[must_use]
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        cache: Arc<ConceptCache>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        let loader = LookaheadLoader::new(Arc::clone(&provider), cache);
        let (views, _) = watch::channel(LessonView::default());
        let views = Arc::new(views);

        // A clip ending on its own is a transition subscribers must see too.
        let playback = PlaybackController::new(sink);
        let finished = Arc::clone(&views);
        playback.set_on_finish(Arc::new(move || {
            finished.send_if_modified(|view| std::mem::replace(&mut view.playing, false));
        }));

        Self {
            provider,
            loader,
            playback,
            topic: None,
            history: Vec::new(),
            cursor: 0,
            phase: SessionPhase::Idle,
            revealed: false,
            last_error: None,
            views,
        }
    }

    #[must_use]
    pub fn with_concept_picker(mut self, picker: ConceptPicker) -> Self {
        self.loader = self.loader.with_picker(picker);
        self
    }

    #[must_use]
    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn history(&self) -> &[Arc<LessonItem>] {
        &self.history
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    #[must_use]
    pub fn loader(&self) -> &LookaheadLoader {
        &self.loader
    }

    /// Item under the cursor, hidden while loading.
    #[must_use]
    pub fn current_item(&self) -> Option<&Arc<LessonItem>> {
        if self.phase == SessionPhase::Ready {
            self.history.get(self.cursor)
        } else {
            None
        }
    }

    #[must_use]
    pub fn view(&self) -> LessonView {
        LessonView {
            topic: self.topic,
            phase: self.phase,
            item: self.current_item().cloned(),
            position: self.cursor,
            history_len: self.history.len(),
            has_previous: self.cursor > 0,
            revealed: self.revealed,
            playing: self.playback.is_playing(),
            last_error: self.last_error.clone(),
        }
    }

    /// Receive a fresh `LessonView` after each transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LessonView> {
        self.views.subscribe()
    }

    /// Start over on `topic` and load its first item.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` when the first item fails; the session
    /// stays on the topic and `next` retries.
    pub async fn select_topic(&mut self, topic: Topic) -> Result<(), SessionError> {
        info!(%topic, "topic selected");
        self.playback.stop();
        self.loader.reset();
        self.topic = Some(topic);
        self.history.clear();
        self.cursor = 0;
        self.fetch_next(topic).await
    }

    /// Move forward: replay a visited item if there is one ahead, otherwise
    /// load a new item and start prefetching the one after it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoTopic` before a topic is chosen and
    /// `SessionError::Load` when generation fails. Either way the session
    /// is left in a usable, non-loading state.
    pub async fn next(&mut self) -> Result<(), SessionError> {
        self.playback.stop();
        let topic = self.topic.ok_or(SessionError::NoTopic)?;

        let ahead = self.cursor + 1;
        if ahead < self.history.len() {
            self.restore(ahead);
            return Ok(());
        }
        self.fetch_next(topic).await
    }

    /// Step back one visited item. Returns false when already at the start.
    pub fn previous(&mut self) -> bool {
        self.playback.stop();
        if self.cursor == 0 || self.history.is_empty() {
            return false;
        }
        self.restore(self.cursor - 1);
        true
    }

    /// Leave the topic. History goes, the concept cache stays.
    pub fn exit(&mut self) {
        info!(topic = ?self.topic, visited = self.history.len(), "leaving lesson");
        self.playback.stop();
        self.loader.reset();
        self.topic = None;
        self.history.clear();
        self.cursor = 0;
        self.phase = SessionPhase::Idle;
        self.revealed = false;
        self.last_error = None;
        self.publish();
    }

    /// Flip the answer overlay on the displayed item. Returns the new state;
    /// nothing changes while loading or with no item on screen.
    pub fn toggle_reveal(&mut self) -> bool {
        if self.current_item().is_none() {
            return self.revealed;
        }
        self.revealed = !self.revealed;
        self.publish();
        self.revealed
    }

    /// Speak `text` on demand. Returns whether any audio was played.
    pub async fn request_pronunciation(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let spoken = speech_text(self.topic, text);
        debug!(text = %spoken, "pronunciation requested");
        let Some(audio) = self.provider.generate_speech(&spoken).await else {
            return false;
        };
        self.playback.play(&audio);
        self.publish();
        true
    }

    /// Pronounce the displayed concept, only once it has been revealed.
    pub async fn pronounce_current(&mut self) -> bool {
        let Some(concept) = self
            .current_item()
            .filter(|_| self.revealed)
            .map(|item| item.concept().to_string())
        else {
            return false;
        };
        self.request_pronunciation(&concept).await
    }

    fn restore(&mut self, index: usize) {
        let Some(item) = self.history.get(index).cloned() else {
            return;
        };
        debug!(index, concept = item.concept(), "restoring visited item");
        self.cursor = index;
        self.phase = SessionPhase::Ready;
        self.revealed = false;
        self.last_error = None;

        if let Some(audio) = item.question_audio() {
            self.playback.play(audio);
        }
        if let Some(topic) = self.topic {
            self.loader.ensure_prefetch(topic);
        }
        self.publish();
    }

    async fn fetch_next(&mut self, topic: Topic) -> Result<(), SessionError> {
        self.phase = SessionPhase::Loading;
        self.revealed = false;
        self.last_error = None;
        self.publish();

        match self.loader.consume_next(topic).await {
            Ok(item) => {
                self.history.push(Arc::clone(&item));
                self.cursor = self.history.len() - 1;
                self.phase = SessionPhase::Ready;
                info!(
                    %topic,
                    concept = item.concept(),
                    position = self.cursor,
                    "lesson item ready"
                );

                if let Some(audio) = item.question_audio() {
                    self.playback.play(audio);
                }
                self.loader.ensure_prefetch(topic);
                self.publish();
                Ok(())
            }
            Err(err) => {
                error!(%topic, error = %err, "lesson load failed");
                self.cursor = self.cursor.min(self.history.len().saturating_sub(1));
                self.phase = SessionPhase::Ready;
                self.last_error = Some(err.to_string());
                self.publish();
                Err(err.into())
            }
        }
    }

    fn publish(&self) {
        self.views.send_replace(self.view());
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("topic", &self.topic)
            .field("phase", &self.phase)
            .field("history_len", &self.history.len())
            .field("cursor", &self.cursor)
            .field("revealed", &self.revealed)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
