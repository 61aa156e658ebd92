use std::fmt;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use tokio::task::JoinHandle;
use tracing::debug;

use lesson_core::concepts;
use lesson_core::model::{LessonItem, Topic};

use crate::cache::ConceptCache;
use crate::error::LoadError;
use crate::provider::ContentProvider;

/// Chooses the concept description for the next item of a topic.
pub type ConceptPicker = Arc<dyn Fn(Topic) -> String + Send + Sync>;

/// Uniform random draw from the topic's static pool. Repeats are allowed.
#[must_use]
pub fn random_concept(topic: Topic) -> String {
    concepts::pool(topic)
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| topic.label().to_string())
}

/// Fetch one lesson item, serving it from the cache when possible.
///
/// On a miss the lesson text is generated first, then image and question
/// speech are generated concurrently. The finished item is cached under the
/// drawn description, not the simplified concept the generator returns.
///
/// # Errors
///
/// Returns `LoadError::Provider` when lesson text generation fails.
pub async fn load_item(
    provider: &dyn ContentProvider,
    cache: &ConceptCache,
    topic: Topic,
    concept: &str,
) -> Result<Arc<LessonItem>, LoadError> {
    if let Some(hit) = cache.get(concept) {
        debug!(concept, "cache hit");
        return Ok(hit);
    }

    debug!(concept, "cache miss, generating");
    let lesson = provider.generate_lesson_content(topic, concept).await?;
    let (image, question_audio) = tokio::join!(
        provider.generate_image(&lesson.image_prompt, topic),
        provider.generate_speech(&lesson.question),
    );

    let item = Arc::new(LessonItem::from_generated(lesson, image, question_audio));
    cache.put(concept, Arc::clone(&item));
    Ok(item)
}

/// The single in-flight "next item" request.
struct PendingLoad {
    topic: Topic,
    concept: String,
    handle: JoinHandle<Result<Arc<LessonItem>, LoadError>>,
}

/// Keeps at most one lesson item generating ahead of the session.
///
/// The pending slot is only touched through `&mut self`, so the
/// check-then-set in `ensure_prefetch` cannot interleave with another caller.
pub struct LookaheadLoader {
    provider: Arc<dyn ContentProvider>,
    cache: Arc<ConceptCache>,
    picker: ConceptPicker,
    pending: Option<PendingLoad>,
}

impl LookaheadLoader {
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>, cache: Arc<ConceptCache>) -> Self {
        Self {
            provider,
            cache,
            picker: Arc::new(random_concept),
            pending: None,
        }
    }

    /// Replace the random concept draw, e.g. for deterministic tests.
    #[must_use]
    pub fn with_picker(mut self, picker: ConceptPicker) -> Self {
        self.picker = picker;
        self
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Topic of the in-flight request, if any.
    #[must_use]
    pub fn pending_topic(&self) -> Option<Topic> {
        self.pending.as_ref().map(|p| p.topic)
    }

    /// Start generating the next item unless one is already in flight.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn ensure_prefetch(&mut self, topic: Topic) {
        if self.pending.is_some() {
            return;
        }

        let concept = (self.picker)(topic);
        debug!(%topic, concept = %concept, "prefetching next lesson item");

        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);
        let task_concept = concept.clone();
        let handle = tokio::spawn(async move {
            load_item(provider.as_ref(), &cache, topic, &task_concept).await
        });

        self.pending = Some(PendingLoad {
            topic,
            concept,
            handle,
        });
    }

    /// Wait for the next item and free the slot.
    ///
    /// A request left over from another topic is dropped and replaced. The
    /// slot is emptied before awaiting, so a failure never leaves it occupied.
    ///
    /// # Errors
    ///
    /// Returns the load's `LoadError`, or `LoadError::Interrupted` when the
    /// background task panicked or was aborted.
    pub async fn consume_next(&mut self, topic: Topic) -> Result<Arc<LessonItem>, LoadError> {
        if self.pending_topic().is_some_and(|pending| pending != topic) {
            debug!(%topic, "dropping prefetch started for another topic");
            self.pending = None;
        }
        self.ensure_prefetch(topic);

        let pending = self
            .pending
            .take()
            .ok_or_else(|| LoadError::Interrupted("no pending load".into()))?;
        debug!(concept = %pending.concept, "awaiting lesson item");

        match pending.handle.await {
            Ok(result) => result,
            Err(join) => Err(LoadError::Interrupted(join.to_string())),
        }
    }

    /// Forget the in-flight request without waiting for it.
    ///
    /// The detached task still runs to completion and may fill the cache, but
    /// its item is never handed to a session.
    pub fn reset(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(concept = %pending.concept, "detaching pending lesson load");
        }
    }
}

impl fmt::Debug for LookaheadLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookaheadLoader")
            .field("cache_len", &self.cache.len())
            .field("pending", &self.pending.as_ref().map(|p| &p.concept))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_concept_comes_from_pool() {
        for topic in Topic::ALL {
            let concept = random_concept(topic);
            assert!(concepts::pool(topic).contains(&concept));
        }
    }
}
