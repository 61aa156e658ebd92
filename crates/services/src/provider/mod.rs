//! Generation backend seam.

mod gemini;

use async_trait::async_trait;

use lesson_core::model::{AudioData, GeneratedLesson, ImageData, Topic};

use crate::error::ProviderError;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Text, image and speech generation for lesson items.
///
/// Only lesson text is load-bearing. Image and speech are best-effort and
/// report failure as `None`.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Turn a concept description into displayable lesson text.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the backend fails or returns no parsable
    /// structured result.
    async fn generate_lesson_content(
        &self,
        topic: Topic,
        concept: &str,
    ) -> Result<GeneratedLesson, ProviderError>;

    async fn generate_image(&self, prompt: &str, topic: Topic) -> Option<ImageData>;

    async fn generate_speech(&self, text: &str) -> Option<AudioData>;
}
